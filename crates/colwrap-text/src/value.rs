//! Input coercion.
//!
//! Every operation accepts anything convertible into [`Text`]. Plain strings
//! are borrowed as-is; dynamic [`Value`]s are rendered with the usual
//! script-language string conversion, so `Undefined` becomes `""` and
//! `Null` becomes `"null"`.

use std::borrow::Cow;
use std::fmt;

/// A dynamically typed input value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// A callable, rendered as its source text.
    Function(String),
    /// Any non-array object.
    Object,
    Array(Vec<Value>),
}

impl Value {
    fn write_element(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined | Self::Null => Ok(()),
            other => fmt::Display::fmt(other, f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => Ok(()),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::String(s) | Self::Function(s) => f.write_str(s),
            Self::Object => f.write_str("[object Object]"),
            Self::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    item.write_element(f)?;
                }
                Ok(())
            }
        }
    }
}

/// Shortest round-trip decimal, switching to exponent form outside
/// `[1e-6, 1e21)`.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        let name = if n > 0.0 { "Infinity" } else { "-Infinity" };
        return name.to_owned();
    }
    if n == 0.0 {
        return "0".to_owned();
    }
    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return n.to_string();
    }
    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Undefined, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match value {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => n.as_f64().map_or(Self::Number(f64::NAN), Self::Number),
            Json::String(s) => Self::String(s),
            Json::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Json::Object(_) => Self::Object,
        }
    }
}

/// Text to wrap, borrowed when the caller already has a string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Text<'a>(Cow<'a, str>);

impl Text<'_> {
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0.into_owned()
    }
}

impl fmt::Display for Text<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'a> From<&'a str> for Text<'a> {
    fn from(s: &'a str) -> Self {
        Self(Cow::Borrowed(s))
    }
}

impl<'a> From<&'a String> for Text<'a> {
    fn from(s: &'a String) -> Self {
        Self(Cow::Borrowed(s))
    }
}

impl From<String> for Text<'_> {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

impl From<Value> for Text<'_> {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) | Value::Function(s) => Self(Cow::Owned(s)),
            other => Self(Cow::Owned(other.to_string())),
        }
    }
}

impl From<bool> for Text<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b).into()
    }
}

impl From<f64> for Text<'_> {
    fn from(n: f64) -> Self {
        Value::Number(n).into()
    }
}

impl From<f32> for Text<'_> {
    fn from(n: f32) -> Self {
        Value::Number(f64::from(n)).into()
    }
}

macro_rules! text_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Text<'_> {
                fn from(n: $ty) -> Self {
                    Self(Cow::Owned(n.to_string()))
                }
            }
        )*
    };
}

text_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<'a, T: Into<Text<'a>>> From<Option<T>> for Text<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Text::default, Into::into)
    }
}
