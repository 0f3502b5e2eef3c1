//! Segmentation: raw text to an ordered stream of atomic units.
//!
//! # Invariants
//!
//! 1. **Lossless**: concatenating every segment reproduces the input.
//! 2. **Breaks are standalone**: `\n`, `\r\n` and `\r` are always their own
//!    segment, whatever the granularity.
//! 3. **Escapes are atomic**: an ANSI escape sequence is never split. A run
//!    of escapes on a segment boundary sticks to the preceding segment when
//!    that segment is visible non-whitespace, otherwise to the following one.
//! 4. **Total**: no text content makes segmentation fail; empty text yields
//!    no segments.
//!
//! Input is consumed one physical line at a time, so memory is bounded by
//! the longest line rather than the whole text.

use std::collections::VecDeque;
use std::ops::Range;

use colwrap_core::ansi;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::{Granularity, Locale};
use crate::error::ConfigError;

/// Whether `text` is exactly one line terminator.
#[inline]
#[must_use]
pub fn is_line_break(text: &str) -> bool {
    matches!(text, "\n" | "\r\n" | "\r")
}

/// An atomic unit of input, tagged by content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Visible content (words, punctuation, graphemes, escape-only runs).
    Text(&'a str),
    /// Whitespace only.
    Space(&'a str),
    /// An explicit line break.
    Break(&'a str),
}

impl<'a> Segment<'a> {
    /// Tag a raw segment by its content.
    #[must_use]
    pub fn classify(raw: &'a str) -> Self {
        if is_line_break(raw) {
            return Self::Break(raw);
        }
        let visible = ansi::strip(raw);
        if !visible.is_empty() && visible.chars().all(char::is_whitespace) {
            Self::Space(raw)
        } else {
            Self::Text(raw)
        }
    }

    /// The underlying slice.
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        match *self {
            Self::Text(s) | Self::Space(s) | Self::Break(s) => s,
        }
    }
}

/// Lazily produced raw segments of one input.
pub type RawSegments<'a> = Box<dyn Iterator<Item = &'a str> + 'a>;

/// Source of segments for a granularity and locale.
///
/// Implementations must honor the module invariants: lossless output and
/// line terminators as standalone segments.
pub trait Segmenter {
    /// Fail if this segmenter cannot handle the combination.
    fn check(&self, granularity: Granularity, locale: Option<&Locale>) -> Result<(), ConfigError>;

    /// Segment `text`. Each call starts a fresh sequence.
    fn segment<'a>(
        &self,
        text: &'a str,
        granularity: Granularity,
        locale: Option<&Locale>,
    ) -> RawSegments<'a>;
}

/// Languages whose words are not delimited and need dictionary segmentation.
const DICTIONARY_LANGUAGES: &[&str] = &["th", "lo", "km", "my"];

/// UAX #29 segmentation (grapheme clusters, word and sentence bounds).
///
/// The rules are locale-independent. Locales whose scripts need dictionary
/// segmentation are rejected at word and sentence granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnicodeSegmenter;

impl Segmenter for UnicodeSegmenter {
    fn check(&self, granularity: Granularity, locale: Option<&Locale>) -> Result<(), ConfigError> {
        match locale {
            Some(locale)
                if granularity != Granularity::Grapheme
                    && DICTIONARY_LANGUAGES.contains(&locale.language()) =>
            {
                Err(ConfigError::UnsupportedLocale {
                    locale: locale.to_string(),
                    granularity,
                })
            }
            _ => Ok(()),
        }
    }

    fn segment<'a>(
        &self,
        text: &'a str,
        granularity: Granularity,
        _locale: Option<&Locale>,
    ) -> RawSegments<'a> {
        Box::new(LineSegments::new(text, granularity))
    }
}

/// Iterator yielding the segments of one physical line at a time.
#[derive(Debug, Clone)]
pub struct LineSegments<'a> {
    rest: &'a str,
    granularity: Granularity,
    pending: VecDeque<&'a str>,
}

impl<'a> LineSegments<'a> {
    #[must_use]
    pub fn new(text: &'a str, granularity: Granularity) -> Self {
        Self {
            rest: text,
            granularity,
            pending: VecDeque::new(),
        }
    }
}

impl<'a> Iterator for LineSegments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(segment) = self.pending.pop_front() {
                return Some(segment);
            }
            if self.rest.is_empty() {
                return None;
            }
            let (line, terminator, rest) = split_line(self.rest);
            self.rest = rest;
            split_visible(line, self.granularity, &mut self.pending);
            if !terminator.is_empty() {
                self.pending.push_back(terminator);
            }
        }
    }
}

/// Split off the first physical line: `(content, terminator, rest)`.
fn split_line(text: &str) -> (&str, &str, &str) {
    match text.find(['\n', '\r']) {
        None => (text, "", ""),
        Some(i) => {
            let end = if text[i..].starts_with("\r\n") { i + 2 } else { i + 1 };
            (&text[..i], &text[i..end], &text[end..])
        }
    }
}

fn base_segments<'a>(text: &'a str, granularity: Granularity, out: &mut impl Extend<&'a str>) {
    match granularity {
        Granularity::Grapheme => out.extend(text.graphemes(true)),
        Granularity::Word => out.extend(text.split_word_bounds()),
        Granularity::Sentence => out.extend(text.split_sentence_bounds()),
    }
}

/// A maximal run of adjacent escape sequences.
#[derive(Debug)]
struct EscapeRun {
    /// Byte position in the visible (stripped) text.
    at: usize,
    /// Byte range in the raw line.
    span: Range<usize>,
    /// Whether the run belongs to the segment before it.
    sticks_back: bool,
}

/// Segment one line (no terminators) into `out`.
fn split_visible<'a>(line: &'a str, granularity: Granularity, out: &mut VecDeque<&'a str>) {
    if line.is_empty() {
        return;
    }
    if !ansi::has_escape(line) {
        base_segments(line, granularity, out);
        return;
    }

    let mut visible = String::with_capacity(line.len());
    let mut runs: Vec<EscapeRun> = Vec::new();
    let mut pos = 0;
    for range in ansi::escape_ranges(line) {
        if let Some(last) = runs.last_mut()
            && last.span.end == range.start
        {
            last.span.end = range.end;
        } else {
            visible.push_str(&line[pos..range.start]);
            let sticks_back = visible.chars().next_back().is_some_and(|c| !c.is_whitespace());
            runs.push(EscapeRun {
                at: visible.len(),
                span: range.clone(),
                sticks_back,
            });
        }
        pos = range.end;
    }
    visible.push_str(&line[pos..]);

    if runs.is_empty() {
        base_segments(line, granularity, out);
        return;
    }
    if visible.is_empty() {
        out.push_back(line);
        return;
    }

    let mut pieces = Vec::new();
    base_segments(&visible, granularity, &mut pieces);

    // Map each interior visible boundary back to an offset in `line`.
    let mut start = 0;
    let mut boundary = 0;
    let mut shift = 0;
    let mut next_run = 0;
    for piece in &pieces[..pieces.len().saturating_sub(1)] {
        boundary += piece.len();
        while let Some(run) = runs.get(next_run)
            && run.at < boundary
        {
            shift += run.span.len();
            next_run += 1;
        }
        let mut cut = boundary + shift;
        if let Some(run) = runs.get(next_run)
            && run.at == boundary
            && run.sticks_back
        {
            cut += run.span.len();
        }
        out.push_back(&line[start..cut]);
        start = cut;
    }
    out.push_back(&line[start..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(text: &str, granularity: Granularity) -> Vec<&str> {
        UnicodeSegmenter.segment(text, granularity, None).collect()
    }

    #[test]
    fn word_segments_keep_whitespace() {
        assert_eq!(
            segments("one two  three", Granularity::Word),
            vec!["one", " ", "two", "  ", "three"]
        );
    }

    #[test]
    fn word_segments_split_hyphen_compounds() {
        assert_eq!(
            segments("ones-and-twos", Granularity::Word),
            vec!["ones", "-", "and", "-", "twos"]
        );
    }

    #[test]
    fn breaks_are_standalone_for_every_granularity() {
        let text = "Hi there.\r\nBye.\rOk\n";
        for granularity in [Granularity::Grapheme, Granularity::Word, Granularity::Sentence] {
            let segs = segments(text, granularity);
            assert_eq!(segs.concat(), text, "{granularity}");
            let breaks: Vec<_> = segs.iter().copied().filter(|s| is_line_break(s)).collect();
            assert_eq!(breaks, vec!["\r\n", "\r", "\n"], "{granularity}");
            assert!(
                segs.iter()
                    .all(|s| is_line_break(s) || !s.contains(['\n', '\r'])),
                "{granularity}: {segs:?}"
            );
        }
    }

    #[test]
    fn sentence_segments() {
        assert_eq!(
            segments("One two. Three four? Five", Granularity::Sentence),
            vec!["One two. ", "Three four? ", "Five"]
        );
    }

    #[test]
    fn grapheme_segments_keep_clusters() {
        assert_eq!(
            segments("e\u{0301}你\u{1F468}\u{200D}\u{1F469}", Granularity::Grapheme),
            vec!["e\u{0301}", "你", "\u{1F468}\u{200D}\u{1F469}"]
        );
    }

    #[test]
    fn empty_text_has_no_segments() {
        assert!(segments("", Granularity::Word).is_empty());
        assert_eq!(segments("\n\n", Granularity::Word), vec!["\n", "\n"]);
    }

    #[test]
    fn escapes_stick_to_words() {
        let text = "\x1b[32mhello\x1b[0m world";
        assert_eq!(
            segments(text, Granularity::Word),
            vec!["\x1b[32mhello\x1b[0m", " ", "world"]
        );
    }

    #[test]
    fn escape_after_whitespace_sticks_forward() {
        let text = "a \x1b[1m\x1b[4mbold";
        assert_eq!(
            segments(text, Granularity::Word),
            vec!["a", " ", "\x1b[1m\x1b[4mbold"]
        );
    }

    #[test]
    fn escape_inside_word_is_absorbed() {
        let text = "he\x1b[1mllo there";
        assert_eq!(
            segments(text, Granularity::Word),
            vec!["he\x1b[1mllo", " ", "there"]
        );
    }

    #[test]
    fn escape_between_graphemes() {
        let text = "a\x1b[1mb";
        assert_eq!(
            segments(text, Granularity::Grapheme),
            vec!["a\x1b[1m", "b"]
        );
    }

    #[test]
    fn escape_only_line_is_one_segment() {
        assert_eq!(
            segments("\x1b[0m\nx", Granularity::Word),
            vec!["\x1b[0m", "\n", "x"]
        );
    }

    #[test]
    fn classify_tags_by_content() {
        assert_eq!(Segment::classify("\r\n"), Segment::Break("\r\n"));
        assert_eq!(Segment::classify("  "), Segment::Space("  "));
        assert_eq!(Segment::classify("\u{3000}"), Segment::Space("\u{3000}"));
        assert_eq!(Segment::classify("word"), Segment::Text("word"));
        assert_eq!(Segment::classify("\x1b[0m "), Segment::Space("\x1b[0m "));
        assert_eq!(Segment::classify("\x1b[0m"), Segment::Text("\x1b[0m"));
    }

    #[test]
    fn dictionary_locales_are_unsupported_for_words() {
        let th: Locale = "th-TH".parse().unwrap();
        let err = UnicodeSegmenter
            .check(Granularity::Word, Some(&th))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnsupportedLocale {
                locale: "th-TH".into(),
                granularity: Granularity::Word,
            }
        );
        assert!(UnicodeSegmenter.check(Granularity::Grapheme, Some(&th)).is_ok());
        let zh: Locale = "zh-CN".parse().unwrap();
        assert!(UnicodeSegmenter.check(Granularity::Word, Some(&zh)).is_ok());
        assert!(UnicodeSegmenter.check(Granularity::Sentence, None).is_ok());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn segmentation_is_lossless(
            s in "([a-z]{1,6}|[ \t]{1,3}|\n|\r\n|\r|-|\x1b\\[[0-9]{1,2}m|你好|\\.){0,24}",
            g in prop_oneof![
                Just(Granularity::Grapheme),
                Just(Granularity::Word),
                Just(Granularity::Sentence),
            ],
        ) {
            let segs: Vec<&str> = UnicodeSegmenter.segment(&s, g, None).collect();
            prop_assert_eq!(segs.concat(), s.clone());
            prop_assert!(segs.iter().all(|seg| !seg.is_empty()));
        }

        #[test]
        fn escape_sequences_are_never_split(
            words in proptest::collection::vec("[a-z]{1,5}", 1..8),
            code in 0u8..50,
        ) {
            let text = words
                .iter()
                .map(|w| format!("\x1b[{code}m{w}\x1b[0m"))
                .collect::<Vec<_>>()
                .join(" ");
            let stripped: String = UnicodeSegmenter
                .segment(&text, Granularity::Word, None)
                .map(ansi::strip)
                .collect();
            prop_assert_eq!(stripped, ansi::strip(&text).into_owned());
        }
    }
}
