//! Application layer: assembling complete payloads.
//!
//! [`encoder::PayloadEncoder`] walks a payload in its mandated field order and
//! delegates the nested templates to [`templates`]. Every call is a pure,
//! single-pass transformation of its input.

pub mod encoder;
pub mod templates;
