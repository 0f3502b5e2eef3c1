#![forbid(unsafe_code)]

//! Greedy column wrapping.
//!
//! # Role in colwrap
//! `colwrap-text` turns a block of text into lines no wider than a column.
//! Text is segmented into words, sentences or grapheme clusters, and the
//! segments are packed greedily, one pass, no lookahead.
//!
//! # Primary responsibilities
//! - **segment**: locale-aware segmentation, lossless, with line breaks and
//!   ANSI escape sequences kept atomic.
//! - **measure**: character-count and terminal-cell width metrics.
//! - **column**: the greedy line packer.
//! - **breaker**: splits a segment wider than the line when asked to.
//! - **config**: validated options.
//! - **value**: coercion of dynamic inputs to text.
//!
//! # Example
//! ```
//! use colwrap_text::{WrapConfig, lines};
//!
//! let config = WrapConfig::with_width(10).unwrap();
//! let text = "That no contestant will be considered defeated.";
//! assert_eq!(
//!     lines(text, &config).unwrap(),
//!     ["That no", "contestant", "will be", "considered", "defeated."]
//! );
//! ```

pub mod breaker;
pub mod column;
pub mod config;
pub mod error;
pub mod measure;
pub mod segment;
pub mod value;

pub use column::Column;
pub use config::{Granularity, Locale, WidthMode, WrapConfig, WrapConfigBuilder};
pub use error::ConfigError;
pub use measure::{CharCount, Metric, VisualWidth, WidthMeasure};
pub use segment::{Segment, Segmenter, UnicodeSegmenter};
pub use value::{Text, Value};

use tracing::{debug, debug_span};

/// Inputs at least this long get a `debug!` event.
const LARGE_INPUT: usize = 10_000;

/// A validated configuration bound to a segmenter and a metric.
///
/// Construction runs every capability check, so the operations cannot fail.
///
/// # Example
/// ```
/// use colwrap_text::{WrapConfig, Wrapper};
///
/// let config = WrapConfig::builder().width(5).build().unwrap();
/// let wrapper = Wrapper::new(config).unwrap();
/// assert_eq!(wrapper.wrap("ones-and-twos"), "ones-\nand-\ntwos");
/// assert!(wrapper.is_wrappable("one two"));
/// ```
#[derive(Debug, Clone)]
pub struct Wrapper<S = UnicodeSegmenter> {
    config: WrapConfig,
    segmenter: S,
    metric: Metric,
}

impl Wrapper {
    /// Wrapper using UAX #29 segmentation.
    pub fn new(config: WrapConfig) -> Result<Self, ConfigError> {
        Self::with_segmenter(config, UnicodeSegmenter)
    }
}

impl<S: Segmenter> Wrapper<S> {
    /// Wrapper using a custom segmenter.
    pub fn with_segmenter(config: WrapConfig, segmenter: S) -> Result<Self, ConfigError> {
        segmenter.check(config.granularity(), config.locale())?;
        let metric = Metric::for_config(&config);
        Ok(Self {
            config,
            segmenter,
            metric,
        })
    }

    #[must_use]
    pub fn config(&self) -> &WrapConfig {
        &self.config
    }

    /// Classified segments of `text`.
    pub fn segments<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Segment<'a>> + 'a {
        self.segmenter
            .segment(text, self.config.granularity(), self.config.locale())
            .map(Segment::classify)
    }

    /// Pack `text` into a [`Column`].
    pub fn column<'t>(&self, text: impl Into<Text<'t>>) -> Column {
        let text = text.into();
        let text = text.as_str();
        let _span = debug_span!(
            "colwrap.wrap",
            width = self.config.width(),
            mode = %self.config.width_mode(),
            granularity = %self.config.granularity(),
            len = text.len()
        )
        .entered();
        if text.len() >= LARGE_INPUT {
            debug!(len = text.len(), "wrapping large input");
        }

        let mut column = Column::new(&self.config, self.metric);
        column.pack(self.segments(text));
        debug!(lines = column.lines().len(), "wrapped");
        column
    }

    /// Wrapped lines of `text`.
    pub fn lines<'t>(&self, text: impl Into<Text<'t>>) -> Vec<String> {
        self.column(text).into_lines()
    }

    /// Wrapped lines joined with the configured end-of-line string.
    pub fn wrap<'t>(&self, text: impl Into<Text<'t>>) -> String {
        self.column(text).to_string()
    }

    /// Whether `text` splits into more than one segment.
    pub fn is_wrappable<'t>(&self, text: impl Into<Text<'t>>) -> bool {
        let text = text.into();
        let second = self.segments(text.as_str()).nth(1);
        second.is_some()
    }

    /// Raw segments of `text`, in order.
    pub fn get_segments<'t>(&self, text: impl Into<Text<'t>>) -> Vec<String> {
        let text = text.into();
        self.segments(text.as_str())
            .map(|segment| segment.as_str().to_owned())
            .collect()
    }
}

/// Wrap `text` and return the lines joined with `config.eol()`.
///
/// # Errors
/// Fails when the default segmenter cannot handle the configured
/// granularity and locale.
pub fn wrap<'t>(text: impl Into<Text<'t>>, config: &WrapConfig) -> Result<String, ConfigError> {
    Ok(Wrapper::new(config.clone())?.wrap(text))
}

/// Wrap `text` and return the lines.
///
/// # Errors
/// See [`wrap`].
pub fn lines<'t>(
    text: impl Into<Text<'t>>,
    config: &WrapConfig,
) -> Result<Vec<String>, ConfigError> {
    Ok(Wrapper::new(config.clone())?.lines(text))
}

/// Wrap `text` into a [`Column`].
///
/// # Errors
/// See [`wrap`].
pub fn column<'t>(text: impl Into<Text<'t>>, config: &WrapConfig) -> Result<Column, ConfigError> {
    Ok(Wrapper::new(config.clone())?.column(text))
}

/// Whether `text` has more than one segment under `config`.
///
/// # Errors
/// See [`wrap`].
pub fn is_wrappable<'t>(
    text: impl Into<Text<'t>>,
    config: &WrapConfig,
) -> Result<bool, ConfigError> {
    Ok(Wrapper::new(config.clone())?.is_wrappable(text))
}

/// The segments `text` is split into under `config`.
///
/// # Errors
/// See [`wrap`].
pub fn get_segments<'t>(
    text: impl Into<Text<'t>>,
    config: &WrapConfig,
) -> Result<Vec<String>, ConfigError> {
    Ok(Wrapper::new(config.clone())?.get_segments(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn wrapper_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Wrapper>();
        assert_send_sync::<WrapConfig>();
    }

    #[test]
    fn unsupported_locale_fails_at_construction() {
        let config = WrapConfig::builder().locale("th").build().unwrap();
        let err = Wrapper::new(config.clone()).unwrap_err();
        assert_eq!(err.field(), "locale");
        assert!(wrap("x", &config).is_err());

        let config = WrapConfig::builder()
            .locale("th")
            .granularity(Granularity::Grapheme)
            .build()
            .unwrap();
        assert!(Wrapper::new(config).is_ok());
    }

    #[test]
    fn segments_are_classified() {
        let wrapper = Wrapper::new(WrapConfig::default()).unwrap();
        let segments: Vec<_> = wrapper.segments("a b\n").collect();
        assert_eq!(
            segments,
            vec![
                Segment::Text("a"),
                Segment::Space(" "),
                Segment::Text("b"),
                Segment::Break("\n")
            ]
        );
    }

    #[test]
    fn custom_segmenter_is_used() {
        struct Chars;
        impl Segmenter for Chars {
            fn check(&self, _: Granularity, _: Option<&Locale>) -> Result<(), ConfigError> {
                Ok(())
            }
            fn segment<'a>(
                &self,
                text: &'a str,
                _: Granularity,
                _: Option<&Locale>,
            ) -> segment::RawSegments<'a> {
                Box::new(text.char_indices().map(move |(i, c)| &text[i..i + c.len_utf8()]))
            }
        }

        let config = WrapConfig::with_width(2).unwrap();
        let wrapper = Wrapper::with_segmenter(config, Chars).unwrap();
        assert_eq!(wrapper.lines("abcde"), ["ab", "cd", "e"]);
    }

    #[test]
    #[traced_test]
    fn wrap_emits_span() {
        let wrapper = Wrapper::new(WrapConfig::with_width(4).unwrap()).unwrap();
        wrapper.wrap("one two");
        assert!(logs_contain("colwrap.wrap"));
        assert!(logs_contain("wrapped"));
        assert!(!logs_contain("wrapping large input"));
    }

    #[test]
    #[traced_test]
    fn large_input_is_logged() {
        let wrapper = Wrapper::new(WrapConfig::default()).unwrap();
        wrapper.wrap("word ".repeat(LARGE_INPUT / 5));
        assert!(logs_contain("wrapping large input"));
    }

    #[test]
    #[traced_test]
    fn forced_break_is_traced() {
        let config = WrapConfig::builder()
            .width(3)
            .force_break(true)
            .build()
            .unwrap();
        let wrapper = Wrapper::new(config).unwrap();
        assert_eq!(wrapper.lines("abcdefg"), ["abc", "def", "g"]);
        assert!(logs_contain("force-breaking segment"));
    }
}
