use std::fmt;

use serde::Serialize;

use super::Point;

/// Bytes recovered from one QR symbol, before any format interpretation
#[derive(Clone, PartialEq)]
pub struct RawPayload {
    bytes: Vec<u8>,
    corners: [Point; 4],
}

impl RawPayload {
    /// Wrap decoded bytes with the symbol's corner points
    pub fn new(bytes: Vec<u8>, corners: [Point; 4]) -> Self {
        Self { bytes, corners }
    }

    /// Payload without geometry (synthetic or externally supplied)
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(bytes.into(), [Point::default(); 4])
    }

    /// Raw payload bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Corner points of the symbol in candidate-image coordinates
    pub fn corners(&self) -> &[Point; 4] {
        &self.corners
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when no bytes were decoded
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Payload bytes hold personal data; only the length is ever printed.
impl fmt::Debug for RawPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawPayload")
            .field("len", &self.bytes.len())
            .field("corners", &self.corners)
            .finish()
    }
}

/// Historical encoding generation of an identity QR payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PayloadFormat {
    /// Plain text, `|`-delimited, full date of birth
    #[serde(rename = "LEGACY_V1")]
    LegacyV1,
    /// Deflate-compressed, `0xFF`-delimited, year of birth only
    #[serde(rename = "COMPRESSED_V2")]
    CompressedV2,
    /// Not recognised
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl PayloadFormat {
    /// Field separator for this generation
    pub fn delimiter(&self) -> Option<u8> {
        match self {
            PayloadFormat::LegacyV1 => Some(b'|'),
            PayloadFormat::CompressedV2 => Some(0xFF),
            PayloadFormat::Unknown => None,
        }
    }

    /// Label used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadFormat::LegacyV1 => "LEGACY_V1",
            PayloadFormat::CompressedV2 => "COMPRESSED_V2",
            PayloadFormat::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position-indexed fields of one payload.
///
/// Field meaning is purely positional, so empty fields are kept as empty
/// entries rather than dropped.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct FieldTable {
    fields: Vec<Vec<u8>>,
}

impl FieldTable {
    /// Split `bytes` on `delimiter`, keeping empty fields
    pub fn split(bytes: &[u8], delimiter: u8) -> Self {
        let fields = bytes
            .split(|&b| b == delimiter)
            .map(<[u8]>::to_vec)
            .collect();
        Self { fields }
    }

    /// Build from already-separated fields
    pub fn from_fields<I, F>(fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Vec<u8>>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Field at `index`
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.fields.get(index).map(Vec::as_slice)
    }

    /// Number of fields, including empty ones
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the table has no fields at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Join the fields back together with `delimiter`
    pub fn join(&self, delimiter: u8) -> Vec<u8> {
        self.fields.join(&delimiter)
    }
}

impl fmt::Debug for FieldTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lens: Vec<usize> = self.fields.iter().map(Vec::len).collect();
        f.debug_struct("FieldTable").field("field_lens", &lens).finish()
    }
}
