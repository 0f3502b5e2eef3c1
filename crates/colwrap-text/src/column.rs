//! Greedy line packing.
//!
//! A [`Column`] consumes segments one at a time and seals width-bounded
//! lines as it goes. The state is a single open row plus the sealed output;
//! there is no lookahead past the segment being added.
//!
//! # Invariants
//!
//! 1. **Width bound**: a sealed line fits in `width` columns unless it is a
//!    single segment that is alone too wide (kept whole without forced
//!    breaking) or a single glyph wider than `width`.
//! 2. **Content conservation**: every visible segment lands in exactly one
//!    line, in input order.
//! 3. **Explicit breaks**: each break closes the current input line; an input
//!    line without visible content yields exactly one empty line.
//! 4. **Whitespace artifacts**: a row holding only whitespace, produced by a
//!    wrap inside a non-blank input line, is dropped. Escape sequences in a
//!    dropped row are kept: they open the next row, or close the last line
//!    of the input line when no row follows.
//!
//! # Example
//! ```
//! use colwrap_text::column::Column;
//! use colwrap_text::config::WrapConfig;
//! use colwrap_text::measure::CharCount;
//! use colwrap_text::segment::Segment;
//!
//! let config = WrapConfig::with_width(8).unwrap();
//! let mut column = Column::new(&config, CharCount);
//! for raw in ["one", " ", "\n", " ", "\n", "two", " ", "three"] {
//!     column.add(Segment::classify(raw));
//! }
//! column.end();
//! assert_eq!(column.lines(), ["one", "", "two", "three"]);
//! ```

use std::fmt;

use colwrap_core::ansi;
use tracing::trace;

use crate::breaker::force_break;
use crate::config::WrapConfig;
use crate::measure::{Metric, WidthMeasure};
use crate::segment::Segment;

/// The open row: an append-only accumulation of segments.
#[derive(Debug, Default)]
struct Row {
    text: String,
    width: usize,
    has_text: bool,
}

impl Row {
    fn push(&mut self, text: &str, width: usize, has_text: bool) {
        self.text.push_str(text);
        self.width += width;
        self.has_text |= has_text;
    }
}

/// A line on its way to the output.
enum Sealed {
    /// An input line with no visible content, holding only its escapes.
    Blank(String),
    /// A packed row with visible content.
    Packed(String),
}

/// Greedy packer and the lines it has sealed so far.
///
/// `Display` joins the lines with the configured end-of-line string.
#[derive(Debug)]
pub struct Column<M = Metric> {
    width: usize,
    force_break: bool,
    trim_lines: bool,
    pad: bool,
    eol: String,
    measure: M,
    row: Row,
    /// The current input line has seen a `Text` segment.
    line_has_text: bool,
    /// A segment arrived since the last `end`.
    open: bool,
    lines: Vec<String>,
}

impl<M: WidthMeasure> Column<M> {
    /// An empty column packing under `config` with `measure`.
    #[must_use]
    pub fn new(config: &WrapConfig, measure: M) -> Self {
        Self {
            width: config.width(),
            force_break: config.force_break(),
            trim_lines: config.trim_lines(),
            pad: config.pad(),
            eol: config.eol().to_owned(),
            measure,
            row: Row::default(),
            line_has_text: false,
            open: false,
            lines: Vec::new(),
        }
    }

    /// Pack every segment of `segments` and close the stream.
    pub fn pack<'a>(&mut self, segments: impl IntoIterator<Item = Segment<'a>>) {
        for segment in segments {
            self.add(segment);
        }
        self.end();
    }

    /// Add the next segment.
    pub fn add(&mut self, segment: Segment<'_>) {
        self.open = true;
        let (text, is_text) = match segment {
            Segment::Break(_) => {
                self.finish_line();
                return;
            }
            Segment::Text(text) => (text, true),
            Segment::Space(text) => (text, false),
        };
        self.line_has_text |= is_text;

        let width = self.measure.width(text);
        if self.force_break && width > self.width {
            self.add_broken(text, width, is_text);
        } else if self.row.width + width <= self.width {
            self.row.push(text, width, is_text);
        } else {
            self.seal_row();
            if width > self.width {
                trace!(width, limit = self.width, "segment overflows line");
            }
            self.row.push(text, width, is_text);
        }
    }

    /// Close the stream. A trailing break leaves an empty last line.
    ///
    /// Calling `end` again without new segments does nothing.
    pub fn end(&mut self) {
        if std::mem::take(&mut self.open) {
            self.finish_line();
        }
    }

    /// Lines sealed so far.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// End-of-line string used by `Display`.
    #[must_use]
    pub fn eol(&self) -> &str {
        &self.eol
    }

    fn add_broken(&mut self, text: &str, width: usize, is_text: bool) {
        trace!(width, limit = self.width, "force-breaking segment");
        self.seal_row();
        let pieces = force_break(text, self.width, &self.measure);
        if let Some((last, full)) = pieces.split_last() {
            for piece in full {
                self.row.push(piece.text, piece.width, is_text);
                self.seal_row();
            }
            self.row.push(last.text, last.width, is_text);
        }
    }

    fn finish_line(&mut self) {
        if self.line_has_text {
            self.seal_row();
            // Escapes trailing the last visible content close the last line.
            let carried = std::mem::take(&mut self.row).text;
            if let Some(last) = self.lines.last_mut() {
                last.push_str(&carried);
            }
        } else {
            let row = std::mem::take(&mut self.row);
            self.push(Sealed::Blank(escapes_of(&row.text)));
        }
        self.line_has_text = false;
    }

    /// Seal the open row. A row without text is dropped, and its escape
    /// sequences become the start of the next row.
    fn seal_row(&mut self) {
        let row = std::mem::take(&mut self.row);
        if row.has_text {
            self.push(Sealed::Packed(row.text));
        } else {
            self.row.text = escapes_of(&row.text);
        }
    }

    fn push(&mut self, sealed: Sealed) {
        let mut line = match sealed {
            Sealed::Blank(escapes) => escapes,
            Sealed::Packed(text) if self.trim_lines => text.trim().to_owned(),
            Sealed::Packed(text) => text,
        };
        if self.pad {
            let used = self.measure.width(&ansi::strip(&line));
            line.extend(std::iter::repeat_n(' ', self.width.saturating_sub(used)));
        }
        self.lines.push(line);
    }
}

/// Every escape sequence in `text`, concatenated.
fn escapes_of(text: &str) -> String {
    ansi::escape_ranges(text).map(|range| &text[range]).collect()
}

impl Default for Column<Metric> {
    fn default() -> Self {
        let config = WrapConfig::default();
        Self::new(&config, Metric::for_config(&config))
    }
}

impl<M> fmt::Display for Column<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str(&self.eol)?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}
