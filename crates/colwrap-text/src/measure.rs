//! Width metrics.
//!
//! The packer never measures text itself; it asks a [`WidthMeasure`].
//! Any `Fn(&str) -> usize` is a measure, which keeps the packing logic
//! testable with fake deterministic widths.

use colwrap_core::text_width;

use crate::config::{WidthMode, WrapConfig};

/// How the forced breaker steps through a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomKind {
    /// One Unicode scalar at a time.
    Scalars,
    /// Whole escape sequences and grapheme clusters.
    Clusters,
}

/// A pure `text -> columns` function.
pub trait WidthMeasure {
    /// Width of `text` in columns.
    fn width(&self, text: &str) -> usize;

    /// Smallest unit the forced breaker may cut between.
    fn atom_kind(&self) -> AtomKind {
        AtomKind::Clusters
    }
}

impl<F> WidthMeasure for F
where
    F: Fn(&str) -> usize,
{
    fn width(&self, text: &str) -> usize {
        self(text)
    }
}

/// Plain length: one column per Unicode scalar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharCount;

impl WidthMeasure for CharCount {
    #[inline]
    fn width(&self, text: &str) -> usize {
        text.chars().count()
    }

    fn atom_kind(&self) -> AtomKind {
        AtomKind::Scalars
    }
}

/// Terminal cell width, ignoring escape sequences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisualWidth {
    cjk: bool,
}

impl VisualWidth {
    /// Visual width with an explicit ambiguous-width policy.
    #[must_use]
    pub const fn new(cjk: bool) -> Self {
        Self { cjk }
    }

    /// Visual width using the process environment policy.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(text_width::cjk_width_enabled())
    }
}

impl WidthMeasure for VisualWidth {
    #[inline]
    fn width(&self, text: &str) -> usize {
        text_width::visible_width(text, self.cjk)
    }
}

/// The measure selected by a [`WrapConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Char(CharCount),
    Visual(VisualWidth),
}

impl Metric {
    /// Pick the metric for `config`.
    ///
    /// Visual width treats ambiguous characters as wide when the locale is
    /// Chinese, Japanese or Korean, and otherwise follows the environment.
    #[must_use]
    pub fn for_config(config: &WrapConfig) -> Self {
        match config.width_mode() {
            WidthMode::Char => Self::Char(CharCount),
            WidthMode::Visual => match config.locale() {
                Some(locale) if locale.prefers_wide_ambiguous() => {
                    Self::Visual(VisualWidth::new(true))
                }
                _ => Self::Visual(VisualWidth::from_env()),
            },
        }
    }
}

impl WidthMeasure for Metric {
    #[inline]
    fn width(&self, text: &str) -> usize {
        match self {
            Self::Char(m) => m.width(text),
            Self::Visual(m) => m.width(text),
        }
    }

    fn atom_kind(&self) -> AtomKind {
        match self {
            Self::Char(m) => m.atom_kind(),
            Self::Visual(m) => m.atom_kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_count_counts_scalars() {
        assert_eq!(CharCount.width("hello"), 5);
        assert_eq!(CharCount.width("你好"), 2);
        assert_eq!(CharCount.width("e\u{0301}"), 2);
        assert_eq!(CharCount.atom_kind(), AtomKind::Scalars);
    }

    #[test]
    fn visual_width_counts_cells() {
        let visual = VisualWidth::new(false);
        assert_eq!(visual.width("你好"), 4);
        assert_eq!(visual.width("\x1b[31mred\x1b[0m"), 3);
        assert_eq!(visual.atom_kind(), AtomKind::Clusters);
    }

    #[test]
    fn closures_are_measures() {
        let bytes = |s: &str| s.len();
        assert_eq!(bytes.width("你"), 3);
        assert_eq!(bytes.atom_kind(), AtomKind::Clusters);
    }

    #[test]
    fn metric_follows_config() {
        let config = WrapConfig::default();
        assert_eq!(Metric::for_config(&config), Metric::Char(CharCount));

        let config = WrapConfig::builder()
            .width_mode(WidthMode::Visual)
            .locale("ja")
            .build()
            .unwrap();
        assert_eq!(
            Metric::for_config(&config),
            Metric::Visual(VisualWidth::new(true))
        );
    }
}
