use crate::domain::ports::PayloadChecksum;
use crate::domain::tlv::Tag;

const POLY: u16 = 0x1021;
const INIT: u16 = 0xFFFF;

/// CRC-16/CCITT-FALSE over the payload bytes, rendered as four upper-case
/// hex digits under tag `63`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Crc16Ccitt;

impl Crc16Ccitt {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(data: &[u8]) -> u16 {
        data.iter().fold(INIT, |crc, byte| {
            let mut crc = crc ^ ((*byte as u16) << 8);
            for _ in 0..8 {
                crc = if crc & 0x8000 != 0 {
                    (crc << 1) ^ POLY
                } else {
                    crc << 1
                };
            }
            crc
        })
    }
}

impl PayloadChecksum for Crc16Ccitt {
    fn tag(&self) -> Tag {
        Tag::CRC
    }

    fn checksum(&self, data: &str) -> String {
        format!("{:04X}", Self::compute(data.as_bytes()))
    }
}
