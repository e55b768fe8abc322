//! Synthetic payloads in both supported generations, for fixtures, benches
//! and printing test cards. The personal fields are placeholders.

use std::io::{self, Write};

use chrono::NaiveDate;
use flate2::Compression;
use flate2::write::GzEncoder;

use crate::models::{FieldTable, PayloadFormat};
use crate::payload::encode_decimal;

/// Version marker written into compressed payloads
pub const V2_MARKER: &str = "V2";

/// Builder for one synthetic payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticPayload {
    format: PayloadFormat,
    birth: String,
    reference: String,
    name: String,
    decimal: bool,
}

impl SyntheticPayload {
    /// Legacy payload carrying a full date of birth
    pub fn legacy(date_of_birth: NaiveDate) -> Self {
        Self {
            format: PayloadFormat::LegacyV1,
            birth: date_of_birth.format("%Y-%m-%d").to_string(),
            reference: String::from("100000000001"),
            name: String::from("Sample Holder"),
            decimal: false,
        }
    }

    /// Compressed payload carrying a year of birth, rendered as decimal digits
    pub fn compressed(birth_year: i32) -> Self {
        Self {
            format: PayloadFormat::CompressedV2,
            birth: format!("{birth_year:04}"),
            reference: String::from("100000000001"),
            name: String::from("Sample Holder"),
            decimal: true,
        }
    }

    /// Override the reference id
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    /// Override the placeholder name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Write the birth field verbatim, bypassing date formatting
    pub fn with_birth_text(mut self, birth: impl Into<String>) -> Self {
        self.birth = birth.into();
        self
    }

    /// Emit a compressed payload as raw gzip bytes instead of decimal digits
    pub fn binary(mut self) -> Self {
        self.decimal = false;
        self
    }

    /// Generation this builder produces
    pub fn format(&self) -> PayloadFormat {
        self.format
    }

    /// Field table before any compression
    pub fn fields(&self) -> FieldTable {
        match self.format {
            PayloadFormat::CompressedV2 => FieldTable::from_fields([
                V2_MARKER.as_bytes().to_vec(),
                b"3".to_vec(),
                self.reference.as_bytes().to_vec(),
                latin1(&self.name),
                self.birth.as_bytes().to_vec(),
                b"Sample Street".to_vec(),
                b"Sample City".to_vec(),
            ]),
            _ => FieldTable::from_fields([
                self.reference.as_bytes().to_vec(),
                self.name.as_bytes().to_vec(),
                b"F".to_vec(),
                self.birth.as_bytes().to_vec(),
                b"Sample City".to_vec(),
            ]),
        }
    }

    /// Bytes as they would be stored in the QR symbol
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let delimiter = self.format.delimiter().unwrap_or(b'|');
        let plain = self.fields().join(delimiter);
        if self.format != PayloadFormat::CompressedV2 {
            return Ok(plain);
        }

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&plain)?;
        let gz = encoder.finish()?;
        if self.decimal {
            Ok(encode_decimal(&gz).into_bytes())
        } else {
            Ok(gz)
        }
    }
}

/// ISO-8859-1 encoding; characters outside it become `?`
fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
