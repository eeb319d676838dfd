//! Session log text codec
//!
//! A session log is plain text with one `Label: value` record per line.
//! Encoding always writes every field in a fixed order; decoding accepts
//! partial, reordered and timestamp-prefixed logs.

pub mod format;
pub mod encoder;
pub mod decoder;

pub use format::{quantize, FieldKind, LogField, POSITION_DECIMALS, SERIES_DECIMALS, SUMMARY_DECIMALS};
pub use encoder::{encode, LogEncoder};
pub use decoder::{decode, DecodedLog};
