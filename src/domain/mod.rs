//! Domain layer: the payload data model, the TLV primitives and the ports
//! through which external collaborators plug into encoding.

pub mod payload;
pub mod ports;
pub mod tlv;
