//! Payload handling: detect the generation, then split into fields.

/// Generation detection
pub mod detect;
/// Decimal rendering of binary payloads
pub mod numeric;
/// Inflation and field splitting
pub mod split;

pub use detect::{Container, DEFAULT_SCAN_WINDOW, Sniffed, compression_container, detect_format, sniff};
pub use numeric::{decode_decimal, encode_decimal, is_decimal};
pub use split::{inflate, split_payload};
