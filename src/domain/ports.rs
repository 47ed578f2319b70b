use super::tlv::Tag;

/// Computes the checksum appended after an encoded payload.
///
/// The encoder writes `tag ++ "04"` first and passes the whole payload,
/// including that prefix, to [`PayloadChecksum::checksum`]. The returned
/// text must be exactly four characters.
pub trait PayloadChecksum: Send + Sync {
    fn tag(&self) -> Tag;
    fn checksum(&self, data: &str) -> String;
}

pub type ChecksumBox = Box<dyn PayloadChecksum>;
