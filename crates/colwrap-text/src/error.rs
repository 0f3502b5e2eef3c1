//! Configuration errors.

use crate::config::Granularity;

/// An invalid or unsupported wrapping configuration.
///
/// Raised before any segmentation or packing starts, so a failing call
/// never produces partial output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `width` must be at least one column.
    #[error("invalid width {0}: must be a positive number of columns")]
    InvalidWidth(usize),

    /// `widthMode` was not `char` or `visual`.
    #[error("invalid widthMode '{0}': expected 'char' or 'visual'")]
    InvalidWidthMode(String),

    /// `granularity` was not `grapheme`, `word` or `sentence`.
    #[error("invalid granularity '{0}': expected 'grapheme', 'word' or 'sentence'")]
    InvalidGranularity(String),

    /// `locale` is not a well-formed language tag.
    #[error("invalid locale '{0}': not a well-formed language tag")]
    InvalidLocale(String),

    /// The segmenter cannot segment this locale at this granularity.
    #[error("unsupported locale '{locale}' for {granularity} segmentation")]
    UnsupportedLocale {
        locale: String,
        granularity: Granularity,
    },
}

impl ConfigError {
    /// Name of the configuration field at fault.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidWidth(_) => "width",
            Self::InvalidWidthMode(_) => "widthMode",
            Self::InvalidGranularity(_) => "granularity",
            Self::InvalidLocale(_) | Self::UnsupportedLocale { .. } => "locale",
        }
    }
}
