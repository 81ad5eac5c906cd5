use itertools::Itertools;
use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// An unsigned fraction. Neither reduced nor checked for a zero denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl Rational {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// A signed fraction. Neither reduced nor checked for a zero denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SignedRational {
    pub numerator: i32,
    pub denominator: i32,
}

impl SignedRational {
    pub fn new(numerator: i32, denominator: i32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

impl Display for SignedRational {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// The decoded (native) form of a tag value.
///
/// [TagType::Byte](crate::TagType::Byte) and [TagType::Undefined](crate::TagType::Undefined)
/// share [Value::Bytes], both ASCII flavours share [Value::Text].
///
/// Text is kept as the bytes found on the wire. Cameras write Latin-1 and worse into ASCII
/// tags, and those bytes must survive a decode/encode cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bytes(Vec<u8>),
    Text(Vec<u8>),
    Shorts(Vec<u16>),
    Longs(Vec<u32>),
    SignedLongs(Vec<i32>),
    Rationals(Vec<Rational>),
    SignedRationals(Vec<SignedRational>),
}

impl Value {
    /// The number of logical units. For text this is the length without a terminator.
    pub fn unit_count(&self) -> usize {
        match self {
            Value::Bytes(v) => v.len(),
            Value::Text(s) => s.len(),
            Value::Shorts(v) => v.len(),
            Value::Longs(v) => v.len(),
            Value::SignedLongs(v) => v.len(),
            Value::Rationals(v) => v.len(),
            Value::SignedRationals(v) => v.len(),
        }
    }

    /// The text of a [Value::Text], with invalid UTF-8 replaced for display.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Text(bytes) => Some(String::from_utf8_lossy(bytes)),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bytes(_) => "bytes",
            Value::Text(_) => "text",
            Value::Shorts(_) => "shorts",
            Value::Longs(_) => "longs",
            Value::SignedLongs(_) => "signed longs",
            Value::Rationals(_) => "rationals",
            Value::SignedRationals(_) => "signed rationals",
        }
    }

    /// Renders only the first unit, without brackets. Bytes render as `0x01`.
    pub fn format_first(&self) -> String {
        fn first<T: ToString>(values: &[T]) -> String {
            values.first().map(T::to_string).unwrap_or_default()
        }
        match self {
            Value::Bytes(v) => v.first().map(|b| format!("0x{b:02x}")).unwrap_or_default(),
            Value::Text(s) => String::from_utf8_lossy(s).into_owned(),
            Value::Shorts(v) => first(v),
            Value::Longs(v) => first(v),
            Value::SignedLongs(v) => first(v),
            Value::Rationals(v) => first(v),
            Value::SignedRationals(v) => first(v),
        }
    }
}

fn bracketed<T: Display>(values: &[T]) -> String {
    format!("[{}]", values.iter().join(" "))
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bytes(v) => f.write_str(&v.iter().map(|b| format!("{b:02x}")).join(" ")),
            Value::Text(s) => f.write_str(&String::from_utf8_lossy(s)),
            Value::Shorts(v) => f.write_str(&bracketed(v)),
            Value::Longs(v) => f.write_str(&bracketed(v)),
            Value::SignedLongs(v) => f.write_str(&bracketed(v)),
            Value::Rationals(v) => f.write_str(&bracketed(v)),
            Value::SignedRationals(v) => f.write_str(&bracketed(v)),
        }
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}
impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v.into_bytes())
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.as_bytes().to_vec())
    }
}
impl From<Vec<u16>> for Value {
    fn from(v: Vec<u16>) -> Self {
        Value::Shorts(v)
    }
}
impl From<Vec<u32>> for Value {
    fn from(v: Vec<u32>) -> Self {
        Value::Longs(v)
    }
}
impl From<Vec<i32>> for Value {
    fn from(v: Vec<i32>) -> Self {
        Value::SignedLongs(v)
    }
}
impl From<Vec<Rational>> for Value {
    fn from(v: Vec<Rational>) -> Self {
        Value::Rationals(v)
    }
}
impl From<Vec<SignedRational>> for Value {
    fn from(v: Vec<SignedRational>) -> Self {
        Value::SignedRationals(v)
    }
}
