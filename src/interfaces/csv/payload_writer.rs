use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct EncodedRecord<'a> {
    record: usize,
    payload: &'a str,
}

/// Writes encoded payloads as `record,payload` CSV rows.
pub struct PayloadWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PayloadWriter<W> {
    /// Creates a new `PayloadWriter` wrapping any `Write` sink (e.g., Stdout).
    pub fn new(sink: W) -> Self {
        let writer = csv::WriterBuilder::new().from_writer(sink);
        Self { writer }
    }

    /// Writes one encoded payload. `record` is the 1-based position of the
    /// payload in the input.
    pub fn write_payload(&mut self, record: usize, payload: &str) -> Result<()> {
        self.writer.serialize(EncodedRecord { record, payload })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
