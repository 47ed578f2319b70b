use std::io::{Error, Write};
use tempfile::NamedTempFile;

pub const SHOP: &str =
    "00020101021101170013A000000123456520458125802HK5909Test Shop6009Hong Kong5303344";

/// A complete payload description with `additional` fields supplied by the caller.
pub fn payload_json(additional: &str) -> String {
    format!(
        r#"{{"init": "STATIC", "merchant": {{"operator": 1, "info": {{"guid": "A000000123456"}}}}, "additional": {{{}}}}}"#,
        additional
    )
}

pub fn shop_fields() -> &'static str {
    r#""category": 5812, "country": "HK", "name": "Test Shop", "city": "Hong Kong", "currency": 344"#
}

/// Writes one JSON document per line to a temporary file.
pub fn write_payloads(documents: &[String]) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    for document in documents {
        writeln!(file, "{}", document)?;
    }
    file.flush()?;
    Ok(file)
}
