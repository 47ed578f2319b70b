use crate::error::{QrError, Result};
use std::fmt;

/// Largest value a two-digit length field can describe.
pub const MAX_VALUE_LEN: usize = 99;

/// Left-pads the textual form of `value` with `'0'` to exactly `width` characters.
///
/// Longer representations are truncated to their rightmost `width` characters
/// without signalling an error, so `pad(123, 2)` yields `"23"`.
pub fn pad(value: impl fmt::Display, width: usize) -> String {
    let text = value.to_string();
    let len = text.chars().count();
    if len >= width {
        text.chars().skip(len - width).collect()
    } else {
        let mut out = "0".repeat(width - len);
        out.push_str(&text);
        out
    }
}

/// A two-character tag identifying a data object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag([u8; 2]);

impl Tag {
    pub const PAYLOAD_FORMAT: Tag = Tag(*b"00");
    pub const INITIATION_METHOD: Tag = Tag(*b"01");
    pub const CATEGORY: Tag = Tag(*b"52");
    pub const CURRENCY: Tag = Tag(*b"53");
    pub const AMOUNT: Tag = Tag(*b"54");
    pub const TIP: Tag = Tag(*b"55");
    pub const FEE_FIXED: Tag = Tag(*b"56");
    pub const FEE_PERCENTAGE: Tag = Tag(*b"57");
    pub const COUNTRY: Tag = Tag(*b"58");
    pub const NAME: Tag = Tag(*b"59");
    pub const CITY: Tag = Tag(*b"60");
    pub const POSTAL: Tag = Tag(*b"61");
    pub const DATA_TEMPLATE: Tag = Tag(*b"62");
    pub const CRC: Tag = Tag(*b"63");
    pub const LANGUAGE_TEMPLATE: Tag = Tag(*b"64");

    /// Parses a tag that must already be exactly two ASCII letters or digits.
    pub fn parse(text: &str) -> Result<Self> {
        match text.as_bytes() {
            [a, b] if a.is_ascii_alphanumeric() && b.is_ascii_alphanumeric() => {
                Ok(Self([*a, *b]))
            }
            _ => Err(QrError::InvalidTag(text.to_string())),
        }
    }

    /// Zero-pads (or truncates) `text` to two characters before parsing it,
    /// so a key of `"5"` becomes tag `05`.
    pub fn padded(text: &str) -> Result<Self> {
        Self::parse(&pad(text, 2)).map_err(|_| QrError::InvalidTag(text.to_string()))
    }

    /// Builds a numeric tag from the two least significant decimal digits of `n`.
    pub fn from_number(n: u32) -> Self {
        let n = n % 100;
        Self([b'0' + (n / 10) as u8, b'0' + (n % 10) as u8])
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0[0] as char, self.0[1] as char)
    }
}

/// A value whose character count fits the two-digit length field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value(String);

impl Value {
    /// Validates `text` as the value of `tag`.
    ///
    /// Fails with [`QrError::LengthOverflow`] when the text has more than
    /// [`MAX_VALUE_LEN`] characters.
    pub fn new(tag: Tag, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let length = text.chars().count();
        if length > MAX_VALUE_LEN {
            return Err(QrError::LengthOverflow {
                tag: tag.to_string(),
                length,
            });
        }
        Ok(Self(text))
    }

    /// Length in characters, not bytes.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One tag/length/value triple. The length is derived from the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    tag: Tag,
    value: Value,
}

impl Segment {
    pub fn new(tag: Tag, value: impl Into<String>) -> Result<Self> {
        let value = Value::new(tag, value)?;
        Ok(Self { tag, value })
    }

    /// Appends `tag ++ length ++ value` to `out`.
    pub fn write_to(&self, out: &mut String) {
        out.push_str(&self.to_string());
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.tag, pad(self.value.len(), 2), self.value.as_str())
    }
}

/// Encodes a single data object as `tag ++ pad(len, 2) ++ value`.
pub fn tlv(tag: Tag, value: &str) -> Result<String> {
    Segment::new(tag, value).map(|segment| segment.to_string())
}
