//! Format detector: classify a payload by structural signature.
//!
//! Total over all byte sequences. `Unknown` is the failure signal; nothing
//! here returns an error.

use std::borrow::Cow;

use super::numeric::{decode_decimal, is_decimal};
use crate::models::PayloadFormat;

/// Default number of leading bytes searched for the legacy delimiter
pub const DEFAULT_SCAN_WINDOW: usize = 64;

const GZIP_MAGIC: [u8; 3] = [0x1F, 0x8B, 0x08];

// Deflate with a 32K window at each compression level. Looser zlib header
// checks also match ordinary text such as "80" or "HK".
const ZLIB_MAGIC: [[u8; 2]; 4] = [[0x78, 0x01], [0x78, 0x5E], [0x78, 0x9C], [0x78, 0xDA]];

/// Compression container wrapping a deflate stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// RFC 1952
    Gzip,
    /// RFC 1950
    Zlib,
}

/// Classification plus the bytes the splitter should work on
#[derive(Clone, PartialEq, Eq)]
pub struct Sniffed<'a> {
    /// Detected generation
    pub format: PayloadFormat,
    /// Set for `CompressedV2`
    pub container: Option<Container>,
    /// Compressed stream for `CompressedV2`, raw text for `LegacyV1`
    pub body: Cow<'a, [u8]>,
}

impl std::fmt::Debug for Sniffed<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sniffed")
            .field("format", &self.format)
            .field("container", &self.container)
            .field("body_len", &self.body.len())
            .finish()
    }
}

/// Recognise a compression header at the start of `bytes`
pub fn compression_container(bytes: &[u8]) -> Option<Container> {
    if bytes.starts_with(&GZIP_MAGIC) {
        return Some(Container::Gzip);
    }
    ZLIB_MAGIC
        .iter()
        .any(|magic| bytes.starts_with(magic))
        .then_some(Container::Zlib)
}

/// Classify `bytes` and prepare the body for splitting.
///
/// Order of checks:
/// 1. compression magic at the start of the bytes
/// 2. compression magic at the start of the integer a decimal payload encodes
/// 3. legacy delimiter within the first `scan_window` bytes
pub fn sniff(bytes: &[u8], scan_window: usize) -> Sniffed<'_> {
    if let Some(container) = compression_container(bytes) {
        return Sniffed {
            format: PayloadFormat::CompressedV2,
            container: Some(container),
            body: Cow::Borrowed(bytes),
        };
    }

    if is_decimal(bytes) {
        if let Some(binary) = decode_decimal(bytes) {
            if let Some(container) = compression_container(&binary) {
                return Sniffed {
                    format: PayloadFormat::CompressedV2,
                    container: Some(container),
                    body: Cow::Owned(binary),
                };
            }
        }
    }

    let window = &bytes[..bytes.len().min(scan_window)];
    let legacy_delimiter = PayloadFormat::LegacyV1.delimiter();
    if window.iter().any(|&b| Some(b) == legacy_delimiter) {
        return Sniffed {
            format: PayloadFormat::LegacyV1,
            container: None,
            body: Cow::Borrowed(bytes),
        };
    }

    Sniffed {
        format: PayloadFormat::Unknown,
        container: None,
        body: Cow::Borrowed(bytes),
    }
}

/// Classify `bytes` with the default scan window
pub fn detect_format(bytes: &[u8]) -> PayloadFormat {
    sniff(bytes, DEFAULT_SCAN_WINDOW).format
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::numeric::encode_decimal;

    #[test]
    fn test_gzip_magic() {
        let sniffed = sniff(&[0x1F, 0x8B, 0x08, 0x00, 0x01], 64);
        assert_eq!(sniffed.format, PayloadFormat::CompressedV2);
        assert_eq!(sniffed.container, Some(Container::Gzip));
    }

    #[test]
    fn test_zlib_magic() {
        for header in [[0x78, 0x01], [0x78, 0x5E], [0x78, 0x9C], [0x78, 0xDA]] {
            assert_eq!(compression_container(&header), Some(Container::Zlib));
        }
        assert_eq!(compression_container(&[0x78, 0x00]), None);
        // Valid zlib checksums that are also plain text
        assert_eq!(compression_container(b"80123"), None);
        assert_eq!(compression_container(b"HK|x"), None);
    }

    #[test]
    fn test_decimal_rendering_of_gzip() {
        let text = encode_decimal(&[0x1F, 0x8B, 0x08, 0x00, 0xAA, 0xBB, 0xCC, 0xDD]);
        let sniffed = sniff(text.as_bytes(), 64);
        assert_eq!(sniffed.format, PayloadFormat::CompressedV2);
        assert_eq!(sniffed.container, Some(Container::Gzip));
        assert_eq!(&sniffed.body[..3], &GZIP_MAGIC);
    }

    #[test]
    fn test_plain_digits_are_unknown() {
        assert_eq!(detect_format(b"123456789012"), PayloadFormat::Unknown);
    }

    #[test]
    fn test_legacy_delimiter_in_window() {
        assert_eq!(detect_format(b"R1|Name|M|1995-03-10"), PayloadFormat::LegacyV1);

        let mut late = vec![b'a'; 100];
        late.push(b'|');
        assert_eq!(detect_format(&late), PayloadFormat::Unknown);
        assert_eq!(sniff(&late, 128).format, PayloadFormat::LegacyV1);
    }

    #[test]
    fn test_total_over_odd_inputs() {
        assert_eq!(detect_format(&[]), PayloadFormat::Unknown);
        assert_eq!(detect_format(&[0x1F]), PayloadFormat::Unknown);
        assert_eq!(detect_format(&[0xFF; 300]), PayloadFormat::Unknown);
        assert_eq!(detect_format(b"hello world"), PayloadFormat::Unknown);
    }
}
