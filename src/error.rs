//! Error taxonomy for the verification pipeline.
//!
//! [`VerifyError`] carries enough context for logs; [`ErrorKind`] is the stable
//! identifier that crosses the boundary. Display strings never include payload
//! or field contents.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::models::PayloadFormat;

/// Stable, closed set of failure identifiers exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Input bytes could not be decoded into a pixel grid
    InvalidImage,
    /// Every normalized candidate was tried without a decode
    NoSymbolFound,
    /// The payload matched no known generation
    UnknownFormat,
    /// A compressed payload failed to inflate
    CorruptPayload,
    /// Field count or field parse failed against the generation's schema
    SchemaMismatch,
}

impl ErrorKind {
    /// Identifier string used in the boundary response
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidImage => "InvalidImage",
            ErrorKind::NoSymbolFound => "NoSymbolFound",
            ErrorKind::UnknownFormat => "UnknownFormat",
            ErrorKind::CorruptPayload => "CorruptPayload",
            ErrorKind::SchemaMismatch => "SchemaMismatch",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field table was rejected by its schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaIssue {
    /// Fewer fields than the generation's layout needs
    #[error("expected at least {required} fields, found {found}")]
    TooFewFields {
        /// Minimum field count
        required: usize,
        /// Field count present
        found: usize,
    },

    /// Marker field empty or not alphanumeric
    #[error("reference marker at index {index} is empty or malformed")]
    MalformedMarker {
        /// Field position
        index: usize,
    },

    /// Reference id empty or not all digits
    #[error("reference id at index {index} is empty or malformed")]
    MalformedReference {
        /// Field position
        index: usize,
    },

    /// Birth field present but blank
    #[error("date of birth at index {index} is empty")]
    EmptyBirthField {
        /// Field position
        index: usize,
    },

    /// Birth field matches no accepted date layout
    #[error("date of birth at index {index} is not a valid date")]
    MalformedDate {
        /// Field position
        index: usize,
    },

    /// Birth field is not exactly four digits
    #[error("year of birth at index {index} is not a four-digit year")]
    MalformedYear {
        /// Field position
        index: usize,
    },

    /// Birth lies after the reference date
    #[error("birth date lies after the reference date")]
    BirthInFuture,
}

/// Every failure the pipeline can report.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Bytes are not a supported image
    #[error("input could not be decoded as an image: {0}")]
    InvalidImage(#[source] image::ImageError),

    /// Image is empty or larger than the configured limit
    #[error("image dimensions {width}x{height} are outside the accepted range")]
    ImageDimensions {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },

    /// No candidate yielded a symbol
    #[error("no QR symbol found after {attempts} candidates")]
    NoSymbolFound {
        /// Candidates tried
        attempts: usize,
    },

    /// Payload matches no known generation
    #[error("payload format not recognised")]
    UnknownFormat,

    /// Compressed stream is truncated or invalid
    #[error("compressed payload could not be inflated: {0}")]
    CorruptPayload(#[source] std::io::Error),

    /// Inflated output passed the configured cap
    #[error("inflated payload exceeds {limit} bytes")]
    PayloadTooLarge {
        /// Cap in bytes
        limit: usize,
    },

    /// Field table rejected by its generation's layout
    #[error("{format} payload does not match its field schema: {issue}")]
    SchemaMismatch {
        /// Generation whose layout was applied
        format: PayloadFormat,
        /// Reason for rejection
        #[source]
        issue: SchemaIssue,
    },
}

impl VerifyError {
    /// Collapse to the boundary identifier
    pub fn kind(&self) -> ErrorKind {
        match self {
            VerifyError::InvalidImage(_) | VerifyError::ImageDimensions { .. } => {
                ErrorKind::InvalidImage
            }
            VerifyError::NoSymbolFound { .. } => ErrorKind::NoSymbolFound,
            VerifyError::UnknownFormat => ErrorKind::UnknownFormat,
            VerifyError::CorruptPayload(_) | VerifyError::PayloadTooLarge { .. } => {
                ErrorKind::CorruptPayload
            }
            VerifyError::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
        }
    }
}

/// Alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VerifyError>;
