//! Display width helpers for terminal columns.
//!
//! Width follows Unicode data tables rather than ad-hoc emoji heuristics:
//! grapheme clusters (ZWJ sequences, flags, combining marks) count as one
//! glyph, East Asian wide characters take two cells, and control or
//! zero-width code points take none.
//!
//! Ambiguous-width characters are narrow unless the caller asks for the
//! CJK policy, either explicitly (a `ja`/`zh`/`ko` locale) or through the
//! environment (`COLWRAP_CJK_WIDTH`, then `LC_CTYPE`/`LANG`).

use std::sync::OnceLock;

use unicode_display_width::width as unicode_display_width;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::ansi;

#[inline]
fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Whether a locale or language tag names a CJK language.
#[inline]
#[must_use]
pub fn is_cjk_locale(locale: &str) -> bool {
    let lower = locale.trim().to_ascii_lowercase();
    lower.starts_with("ja") || lower.starts_with("zh") || lower.starts_with("ko")
}

/// Compute the CJK width policy using a custom environment lookup.
#[inline]
pub fn cjk_width_from_env<F>(get_env: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = get_env("COLWRAP_CJK_WIDTH") {
        return env_flag(&value);
    }
    if let Some(locale) = get_env("LC_CTYPE").or_else(|| get_env("LANG")) {
        return is_cjk_locale(&locale);
    }
    false
}

/// Cached CJK width policy of the current process.
#[inline]
pub fn cjk_width_enabled() -> bool {
    static CJK_WIDTH: OnceLock<bool> = OnceLock::new();
    *CJK_WIDTH.get_or_init(|| cjk_width_from_env(|key| std::env::var(key).ok()))
}

#[inline]
fn ascii_display_width(text: &str) -> usize {
    let mut width = 0;
    for b in text.bytes() {
        match b {
            b'\t' | b'\n' | b'\r' => width += 1,
            0x20..=0x7E => width += 1,
            _ => {}
        }
    }
    width
}

/// Fast-path width for pure printable ASCII.
#[inline]
#[must_use]
pub fn ascii_width(text: &str) -> Option<usize> {
    if text.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
        Some(text.len())
    } else {
        None
    }
}

#[inline]
fn is_zero_width_codepoint(c: char) -> bool {
    let u = c as u32;
    matches!(u, 0x0000..=0x001F | 0x007F..=0x009F)
        || matches!(u, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF)
        || matches!(u, 0xFE20..=0xFE2F)
        || matches!(u, 0xFE00..=0xFE0F | 0xE0100..=0xE01EF)
        || matches!(
            u,
            0x00AD
                | 0x034F
                | 0x180E
                | 0x200B
                | 0x200C
                | 0x200D
                | 0x200E
                | 0x200F
                | 0x2060
                | 0xFEFF
        )
        || matches!(u, 0x202A..=0x202E | 0x2066..=0x2069 | 0x206A..=0x206F)
}

/// Width of a single grapheme cluster.
#[inline]
#[must_use]
pub fn grapheme_width(grapheme: &str, cjk: bool) -> usize {
    if grapheme.is_ascii() {
        return ascii_display_width(grapheme);
    }
    if grapheme.chars().all(is_zero_width_codepoint) {
        return 0;
    }
    if cjk {
        return grapheme.width_cjk();
    }
    unicode_display_width(grapheme) as usize
}

/// Width of a string in terminal cells. Escape sequences are not special here.
#[inline]
#[must_use]
pub fn display_width(text: &str, cjk: bool) -> usize {
    if let Some(width) = ascii_width(text) {
        return width;
    }
    if text.is_ascii() {
        return ascii_display_width(text);
    }
    if !text.chars().any(is_zero_width_codepoint) {
        if cjk {
            return text.width_cjk();
        }
        return unicode_display_width(text) as usize;
    }
    text.graphemes(true).map(|g| grapheme_width(g, cjk)).sum()
}

/// Width of a string in terminal cells, with escape sequences taking none.
///
/// # Example
/// ```
/// use colwrap_core::text_width::visible_width;
///
/// assert_eq!(visible_width("\x1b[32mhello\x1b[0m", false), 5);
/// assert_eq!(visible_width("你好", false), 4);
/// ```
#[inline]
#[must_use]
pub fn visible_width(text: &str, cjk: bool) -> usize {
    display_width(&ansi::strip(text), cjk)
}
