//! Forced breaking of a segment wider than the line.
//!
//! The segment is scanned one atom at a time, accumulating a candidate
//! piece; when the next atom would push the candidate past `width` the
//! candidate is sealed and a new one starts with that atom.
//!
//! Escape sequences are always whole atoms. Other atoms come from the
//! measure's [`AtomKind`]:
//! - `Scalars` (char mode): every scalar costs one column, so this is
//!   fixed-size chunking.
//! - `Clusters` (visual mode): grapheme clusters and whole escape
//!   sequences. Escapes are zero-width and ride along with the current piece.
//!
//! An atom that is alone wider than `width` (a double-width glyph at
//! `width == 1`) still becomes a piece of its own. It cannot be subdivided,
//! so that piece overflows.

use std::ops::Range;

use colwrap_core::ansi;
use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;

use crate::measure::{AtomKind, WidthMeasure};

/// A slice of a broken segment with its measured width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece<'a> {
    pub text: &'a str,
    pub width: usize,
}

/// Pieces of one segment; most forced breaks produce only a few.
pub type Pieces<'a> = SmallVec<[Piece<'a>; 4]>;

/// Slice `segment` into pieces of at most `width` columns.
///
/// Concatenating the pieces gives back `segment`. An empty segment yields
/// no pieces.
///
/// # Example
/// ```
/// use colwrap_text::breaker::force_break;
/// use colwrap_text::measure::CharCount;
///
/// let pieces: Vec<&str> = force_break("onetwothreefour", 7, &CharCount)
///     .iter()
///     .map(|p| p.text)
///     .collect();
/// assert_eq!(pieces, vec!["onetwot", "hreefou", "r"]);
/// ```
#[must_use]
pub fn force_break<'a, M>(segment: &'a str, width: usize, measure: &M) -> Pieces<'a>
where
    M: WidthMeasure + ?Sized,
{
    let mut pieces = Pieces::new();
    let mut start = 0;
    let mut end = 0;
    let mut current = 0;

    for (offset, atom) in atoms(segment, measure.atom_kind()) {
        let atom_width = measure.width(atom);
        if current + atom_width > width && end > start {
            pieces.push(Piece {
                text: &segment[start..end],
                width: current,
            });
            start = end;
            current = 0;
        }
        end = offset + atom.len();
        current += atom_width;
    }

    if end > start {
        pieces.push(Piece {
            text: &segment[start..end],
            width: current,
        });
    }
    pieces
}

/// `(byte offset, atom)` pairs covering `text` in order. Escape sequences
/// are always whole atoms.
fn atoms(text: &str, kind: AtomKind) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut pos = 0;
    for range in ansi::escape_ranges(text) {
        plain_atoms(text, pos..range.start, kind, &mut out);
        out.push((range.start, &text[range.clone()]));
        pos = range.end;
    }
    plain_atoms(text, pos..text.len(), kind, &mut out);
    out
}

fn plain_atoms<'a>(
    text: &'a str,
    span: Range<usize>,
    kind: AtomKind,
    out: &mut Vec<(usize, &'a str)>,
) {
    let base = span.start;
    let plain = &text[span];
    match kind {
        AtomKind::Scalars => out.extend(
            plain
                .char_indices()
                .map(|(i, c)| (base + i, &plain[i..i + c.len_utf8()])),
        ),
        AtomKind::Clusters => out.extend(
            plain
                .grapheme_indices(true)
                .map(|(i, g)| (base + i, g)),
        ),
    }
}
