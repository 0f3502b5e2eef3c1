//! Wrapping configuration.
//!
//! [`WrapConfig`] is an immutable, validated value. It is produced by
//! [`WrapConfigBuilder::build`], which applies defaults only to *absent*
//! fields and rejects explicit invalid ones.
//!
//! | Field | Default |
//! |-------|---------|
//! | `width` | 30 |
//! | `width_mode` | [`WidthMode::Char`] |
//! | `granularity` | [`Granularity::Word`] |
//! | `locale` | none |
//! | `force_break` | false |
//! | `trim_lines` | true |
//! | `eol` | `"\n"` |
//! | `pad` | false |

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Default packing width in columns.
pub const DEFAULT_WIDTH: usize = 30;

/// Default separator used when lines are joined.
pub const DEFAULT_EOL: &str = "\n";

/// How segment width is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "String"))]
pub enum WidthMode {
    /// Unicode scalar count.
    #[default]
    Char,
    /// Terminal cells: wide glyphs take two, escape sequences none.
    Visual,
}

impl WidthMode {
    /// The option name of this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::Visual => "visual",
        }
    }
}

impl fmt::Display for WidthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidthMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "char" => Ok(Self::Char),
            "visual" => Ok(Self::Visual),
            other => Err(ConfigError::InvalidWidthMode(other.to_string())),
        }
    }
}

impl TryFrom<String> for WidthMode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Unit of segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "String"))]
pub enum Granularity {
    /// Extended grapheme clusters.
    Grapheme,
    /// Words and the whitespace runs between them.
    #[default]
    Word,
    /// Sentences.
    Sentence,
}

impl Granularity {
    /// The option name of this granularity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grapheme => "grapheme",
            Self::Word => "word",
            Self::Sentence => "sentence",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grapheme" => Ok(Self::Grapheme),
            "word" => Ok(Self::Word),
            "sentence" => Ok(Self::Sentence),
            other => Err(ConfigError::InvalidGranularity(other.to_string())),
        }
    }
}

impl TryFrom<String> for Granularity {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A well-formed language tag such as `en`, `zh-Hans` or `pt_BR`.
///
/// Only the shape is checked: a 2-3 or 5-8 letter language subtag followed
/// by alphanumeric subtags of at most 8 characters. `_` is accepted as a
/// separator and normalized to `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    tag: String,
    language_len: usize,
}

impl Locale {
    /// The normalized tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// The lowercase primary language subtag.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.tag[..self.language_len]
    }

    /// Whether ambiguous-width characters render double-width in this locale.
    #[must_use]
    pub fn prefers_wide_ambiguous(&self) -> bool {
        colwrap_core::text_width::is_cjk_locale(self.language())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidLocale(s.to_string());
        let mut subtags = s.trim().split(['-', '_']);
        let language = subtags.next().ok_or_else(invalid)?;
        if !matches!(language.len(), 2..=3 | 5..=8)
            || !language.bytes().all(|b| b.is_ascii_alphabetic())
        {
            return Err(invalid());
        }

        let mut tag = language.to_ascii_lowercase();
        for subtag in subtags {
            if subtag.is_empty()
                || subtag.len() > 8
                || !subtag.bytes().all(|b| b.is_ascii_alphanumeric())
            {
                return Err(invalid());
            }
            tag.push('-');
            let alpha = subtag.bytes().all(|b| b.is_ascii_alphabetic());
            match (subtag.len(), alpha) {
                // Region: ISO 3166 upper case.
                (2, true) => tag.push_str(&subtag.to_ascii_uppercase()),
                // Script: ISO 15924 title case.
                (4, true) => {
                    let lower = subtag.to_ascii_lowercase();
                    tag.push_str(&lower[..1].to_ascii_uppercase());
                    tag.push_str(&lower[1..]);
                }
                _ => tag.push_str(&subtag.to_ascii_lowercase()),
            }
        }

        Ok(Self {
            language_len: language.len(),
            tag,
        })
    }
}

/// Validated wrapping configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapConfig {
    width: usize,
    width_mode: WidthMode,
    granularity: Granularity,
    locale: Option<Locale>,
    force_break: bool,
    trim_lines: bool,
    eol: String,
    pad: bool,
}

impl WrapConfig {
    /// Start building a configuration.
    #[must_use]
    pub fn builder() -> WrapConfigBuilder {
        WrapConfigBuilder::default()
    }

    /// Default configuration with a different width.
    pub fn with_width(width: usize) -> Result<Self, ConfigError> {
        Self::builder().width(width).build()
    }

    /// Packing limit in columns of the active metric.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn width_mode(&self) -> WidthMode {
        self.width_mode
    }

    #[inline]
    #[must_use]
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    #[inline]
    #[must_use]
    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    /// Whether over-wide segments are sliced across lines.
    #[inline]
    #[must_use]
    pub fn force_break(&self) -> bool {
        self.force_break
    }

    /// Whether leading and trailing whitespace is stripped per line.
    #[inline]
    #[must_use]
    pub fn trim_lines(&self) -> bool {
        self.trim_lines
    }

    /// Separator used when lines are joined into one string.
    #[inline]
    #[must_use]
    pub fn eol(&self) -> &str {
        &self.eol
    }

    /// Whether lines are right-padded to `width`.
    #[inline]
    #[must_use]
    pub fn pad(&self) -> bool {
        self.pad
    }
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            width_mode: WidthMode::default(),
            granularity: Granularity::default(),
            locale: None,
            force_break: false,
            trim_lines: true,
            eol: DEFAULT_EOL.to_string(),
            pad: false,
        }
    }
}

/// Builder for [`WrapConfig`]. Every field is optional.
///
/// With the `serde` feature the builder deserializes from camelCase
/// options (`width`, `widthMode`, `granularity`, `locale`, `forceBreak` or
/// `break`, `trimLines`, `eol`, `pad`).
///
/// # Example
/// ```
/// use colwrap_text::config::{WidthMode, WrapConfig};
///
/// let config = WrapConfig::builder()
///     .width(10)
///     .width_mode(WidthMode::Visual)
///     .force_break(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.width(), 10);
/// assert!(config.trim_lines());
///
/// assert!(WrapConfig::builder().width(0).build().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase", default, deny_unknown_fields)
)]
pub struct WrapConfigBuilder {
    width: Option<usize>,
    width_mode: Option<WidthMode>,
    granularity: Option<Granularity>,
    locale: Option<String>,
    #[cfg_attr(feature = "serde", serde(alias = "break"))]
    force_break: Option<bool>,
    trim_lines: Option<bool>,
    eol: Option<String>,
    pad: Option<bool>,
}

impl WrapConfigBuilder {
    /// Set the packing width.
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the width metric.
    #[must_use]
    pub fn width_mode(mut self, mode: WidthMode) -> Self {
        self.width_mode = Some(mode);
        self
    }

    /// Set the segmentation granularity.
    #[must_use]
    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }

    /// Set the locale passed to the segmenter. Parsed by [`build`](Self::build).
    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Set whether over-wide segments are sliced.
    #[must_use]
    pub fn force_break(mut self, force: bool) -> Self {
        self.force_break = Some(force);
        self
    }

    /// Set whether lines are trimmed.
    #[must_use]
    pub fn trim_lines(mut self, trim: bool) -> Self {
        self.trim_lines = Some(trim);
        self
    }

    /// Set the join separator.
    #[must_use]
    pub fn eol(mut self, eol: impl Into<String>) -> Self {
        self.eol = Some(eol.into());
        self
    }

    /// Set whether lines are right-padded to the width.
    #[must_use]
    pub fn pad(mut self, pad: bool) -> Self {
        self.pad = Some(pad);
        self
    }

    /// Validate and produce the configuration.
    pub fn build(&self) -> Result<WrapConfig, ConfigError> {
        let defaults = WrapConfig::default();
        let width = self.width.unwrap_or(defaults.width);
        if width == 0 {
            return Err(ConfigError::InvalidWidth(width));
        }
        let locale = self.locale.as_deref().map(str::parse::<Locale>).transpose()?;

        Ok(WrapConfig {
            width,
            width_mode: self.width_mode.unwrap_or(defaults.width_mode),
            granularity: self.granularity.unwrap_or(defaults.granularity),
            locale,
            force_break: self.force_break.unwrap_or(defaults.force_break),
            trim_lines: self.trim_lines.unwrap_or(defaults.trim_lines),
            eol: self.eol.clone().unwrap_or(defaults.eol),
            pad: self.pad.unwrap_or(defaults.pad),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = WrapConfig::builder().build().unwrap();
        assert_eq!(config, WrapConfig::default());
        assert_eq!(config.width(), 30);
        assert_eq!(config.width_mode(), WidthMode::Char);
        assert_eq!(config.granularity(), Granularity::Word);
        assert_eq!(config.locale(), None);
        assert!(!config.force_break());
        assert!(config.trim_lines());
        assert_eq!(config.eol(), "\n");
        assert!(!config.pad());
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = WrapConfig::builder().width(0).build().unwrap_err();
        assert_eq!(err, ConfigError::InvalidWidth(0));
        assert_eq!(err.field(), "width");
    }

    #[test]
    fn explicit_values_are_kept() {
        let config = WrapConfig::builder()
            .width(12)
            .width_mode(WidthMode::Visual)
            .granularity(Granularity::Grapheme)
            .locale("zh_hans_cn")
            .force_break(true)
            .trim_lines(false)
            .eol("\r\n")
            .pad(true)
            .build()
            .unwrap();
        assert_eq!(config.width(), 12);
        assert_eq!(config.width_mode(), WidthMode::Visual);
        assert_eq!(config.granularity(), Granularity::Grapheme);
        assert_eq!(config.locale().map(Locale::as_str), Some("zh-Hans-CN"));
        assert!(config.force_break());
        assert!(!config.trim_lines());
        assert_eq!(config.eol(), "\r\n");
        assert!(config.pad());
    }

    #[test]
    fn width_mode_parsing() {
        assert_eq!("char".parse::<WidthMode>(), Ok(WidthMode::Char));
        assert_eq!("visual".parse::<WidthMode>(), Ok(WidthMode::Visual));
        let err = "Visual".parse::<WidthMode>().unwrap_err();
        assert_eq!(err, ConfigError::InvalidWidthMode("Visual".into()));
        assert_eq!(err.field(), "widthMode");
    }

    #[test]
    fn granularity_parsing_and_display() {
        for g in [Granularity::Grapheme, Granularity::Word, Granularity::Sentence] {
            assert_eq!(g.to_string().parse::<Granularity>(), Ok(g));
        }
        assert_eq!(
            "line".parse::<Granularity>(),
            Err(ConfigError::InvalidGranularity("line".into()))
        );
    }

    #[test]
    fn locale_shapes() {
        let en: Locale = "en".parse().unwrap();
        assert_eq!(en.language(), "en");
        assert!(!en.prefers_wide_ambiguous());

        let ja: Locale = "JA-jp".parse().unwrap();
        assert_eq!(ja.as_str(), "ja-JP");
        assert_eq!(ja.language(), "ja");
        assert!(ja.prefers_wide_ambiguous());

        let sr: Locale = "sr-Latn-RS-1996".parse().unwrap();
        assert_eq!(sr.to_string(), "sr-Latn-RS-1996");
    }

    #[test]
    fn malformed_locales_are_rejected() {
        for bad in ["", "e", "englishlanguage", "en--US", "en-US!", "12"] {
            let err = bad.parse::<Locale>().unwrap_err();
            assert_eq!(err, ConfigError::InvalidLocale(bad.to_string()), "{bad:?}");
        }
        let err = WrapConfig::builder().locale("x").build().unwrap_err();
        assert_eq!(err.field(), "locale");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn builder_from_options_json() {
        let builder: WrapConfigBuilder = serde_json::from_str(
            r#"{"width": 7, "widthMode": "visual", "break": true, "trimLines": false}"#,
        )
        .unwrap();
        let config = builder.build().unwrap();
        assert_eq!(config.width(), 7);
        assert_eq!(config.width_mode(), WidthMode::Visual);
        assert!(config.force_break());
        assert!(!config.trim_lines());
        assert_eq!(config.granularity(), Granularity::Word);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn invalid_enum_in_options_json_names_the_value() {
        let err = serde_json::from_str::<WrapConfigBuilder>(r#"{"widthMode": "pixels"}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("invalid widthMode 'pixels'"), "{err}");
    }
}
