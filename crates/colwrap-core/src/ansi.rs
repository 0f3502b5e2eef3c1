//! ANSI escape sequence scanning.
//!
//! Escape sequences occupy no terminal cells, so width measurement has to
//! skip them and segmentation must never cut through one. Recognized forms:
//!
//! | Introducer | Form | Terminator |
//! |------------|------|------------|
//! | `ESC [` + `0x20..=0x3F` | CSI | final byte `0x40..=0x7E` |
//! | `ESC ]` | OSC | `BEL` or `ESC \` |
//! | `ESC P`, `ESC X`, `ESC ^`, `ESC _` | DCS/SOS/PM/APC | `ESC \` |
//! | `ESC` + `0x20..=0x2F` | nF | final byte `0x30..=0x7E` |
//! | `ESC` + `0x40..=0x7E` | Fe/Fs | (two bytes) |
//!
//! An `ESC` that does not start a complete sequence is ordinary text.
//! All terminators are ASCII, so every range returned here falls on `char`
//! boundaries.

use std::borrow::Cow;
use std::ops::{Range, RangeInclusive};

/// The escape byte.
pub const ESC: u8 = 0x1b;

const BEL: u8 = 0x07;
const ST_FINAL: u8 = b'\\';

/// Length in bytes of the escape sequence starting at `pos`, if any.
#[must_use]
pub fn sequence_len(bytes: &[u8], pos: usize) -> Option<usize> {
    if bytes.get(pos) != Some(&ESC) {
        return None;
    }
    let body = bytes.get(pos + 2..).unwrap_or(&[]);
    match *bytes.get(pos + 1)? {
        b'[' => final_byte_end(body, 0x20..=0x3f, 0x40..=0x7e),
        b']' => body.iter().enumerate().find_map(|(i, &b)| {
            if b == BEL {
                Some(i + 3)
            } else if b == ESC && body.get(i + 1) == Some(&ST_FINAL) {
                Some(i + 4)
            } else {
                None
            }
        }),
        b'P' | b'X' | b'^' | b'_' => body
            .windows(2)
            .position(|w| w == [ESC, ST_FINAL])
            .map(|i| i + 4),
        0x20..=0x2f => final_byte_end(body, 0x20..=0x2f, 0x30..=0x7e),
        0x40..=0x7e => Some(2),
        _ => None,
    }
}

/// Sequence length up to the first `last` byte, if only `inner` bytes
/// precede it.
fn final_byte_end(
    body: &[u8],
    inner: RangeInclusive<u8>,
    last: RangeInclusive<u8>,
) -> Option<usize> {
    for (i, b) in body.iter().enumerate() {
        if last.contains(b) {
            return Some(i + 3);
        }
        if !inner.contains(b) {
            return None;
        }
    }
    None
}

/// Whether `text` contains an escape byte at all (fast pre-check).
#[inline]
#[must_use]
pub fn has_escape(text: &str) -> bool {
    text.as_bytes().contains(&ESC)
}

/// Iterator over the byte ranges of escape sequences in a string.
#[derive(Debug, Clone)]
pub struct EscapeRanges<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Iterator for EscapeRanges<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.bytes.len() {
            let offset = self.bytes[self.pos..].iter().position(|&b| b == ESC)?;
            let start = self.pos + offset;
            match sequence_len(self.bytes, start) {
                Some(len) => {
                    self.pos = start + len;
                    return Some(start..start + len);
                }
                None => self.pos = start + 1,
            }
        }
        None
    }
}

/// Byte ranges of every complete escape sequence in `text`, in order.
///
/// # Example
/// ```
/// use colwrap_core::ansi::escape_ranges;
///
/// let ranges: Vec<_> = escape_ranges("\x1b[1mhi\x1b[0m").collect();
/// assert_eq!(ranges, vec![0..4, 6..10]);
/// ```
#[must_use]
pub fn escape_ranges(text: &str) -> EscapeRanges<'_> {
    EscapeRanges {
        bytes: text.as_bytes(),
        pos: 0,
    }
}

/// Remove every escape sequence, borrowing when there is nothing to remove.
#[must_use]
pub fn strip(text: &str) -> Cow<'_, str> {
    if !has_escape(text) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for range in escape_ranges(text) {
        out.push_str(&text[pos..range.start]);
        pos = range.end;
    }
    if pos == 0 {
        return Cow::Borrowed(text);
    }
    out.push_str(&text[pos..]);
    Cow::Owned(out)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn strip_is_identity_without_escape(s in "[^\x1b]{0,64}") {
            prop_assert_eq!(strip(&s), s.as_str());
        }

        #[test]
        fn wrapped_sgr_strips_to_payload(s in "[a-zA-Z0-9 ]{0,32}", code in 0u8..108) {
            let colored = format!("\x1b[{code}m{s}\x1b[0m");
            prop_assert_eq!(strip(&colored), s.as_str());
        }
    }
}
