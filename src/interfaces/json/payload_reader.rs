use crate::domain::payload::Payload;
use crate::error::{QrError, Result};
use serde_json::Value;
use std::io::Read;

/// Reads payload descriptions from a JSON source.
///
/// The source may hold a single object, several concatenated objects or one
/// object per line. Each document is parsed on its own, so a document with an
/// invalid field yields an error without affecting the ones after it. A syntax
/// error ends the stream.
pub struct PayloadReader<R: Read> {
    source: R,
}

impl<R: Read> PayloadReader<R> {
    /// Creates a new `PayloadReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Returns an iterator that lazily reads and deserializes payloads.
    pub fn payloads(self) -> impl Iterator<Item = Result<Payload>> {
        let mut failed = false;
        serde_json::Deserializer::from_reader(self.source)
            .into_iter::<Value>()
            .map_while(move |document| {
                if failed {
                    return None;
                }
                match document {
                    Ok(value) => Some(serde_json::from_value(value).map_err(QrError::from)),
                    Err(e) => {
                        failed = true;
                        Some(Err(QrError::from(e)))
                    }
                }
            })
    }
}
