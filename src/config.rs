use crate::error::Result;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// How the encoder treats input it cannot encode faithfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Reject unknown keys, invalid initiation methods, symbolic currencies
    /// and out-of-range numbers.
    Strict,
    /// Drop or pad such input and keep going.
    #[default]
    Permissive,
}

/// Encoding of the language code (sub-tag `00`) in the language template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCodeMode {
    /// Zero-pad or truncate the code to two characters.
    Legacy,
    /// Emit the code as given, with its real length.
    #[default]
    Verbatim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncoderConfig {
    pub strictness: Strictness,
    pub language_code: LanguageCodeMode,
    /// Append a CRC-16 field (tag `63`) after the payload.
    pub checksum: bool,
}

impl EncoderConfig {
    pub fn strict() -> Self {
        Self {
            strictness: Strictness::Strict,
            ..Self::default()
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strictness == Strictness::Strict
    }

    /// Loads a configuration from a JSON file. Missing keys take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}
