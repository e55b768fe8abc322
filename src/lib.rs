//! qr_age_verify - age verification from QR-coded identity documents
//!
//! Takes a photo of a card, recovers the QR symbol under poor capture
//! conditions, recognises which payload generation it carries, and reduces it
//! to an age and an under-18 flag. Personal fields are read only long enough to
//! find the birth date and are never returned, stored or logged.
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use qr_age_verify::Verifier;
//!
//! let bytes = std::fs::read("card.jpg").unwrap();
//! let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
//! let response = Verifier::new().respond(&bytes, today);
//! println!("{}", response.to_json());
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Age arithmetic over extracted birth information
pub mod age;
/// Tuning knobs and environment overrides
pub mod config;
/// Error taxonomy and boundary error kinds
pub mod error;
/// Positional field schemas and birth field parsing
pub mod fields;
/// Subscriber setup for binaries
pub mod logging;
/// Core data structures (RawImage, RawPayload, FieldTable, AgeResult, etc.)
pub mod models;
/// Candidate image transforms
pub mod normalizer;
/// Payload detection, inflation and splitting
pub mod payload;
/// End-to-end verification
pub mod pipeline;
/// Try candidates until a symbol decodes
pub mod recovery;
/// QR decoding capability and the bundled implementation
pub mod symbol;
/// Synthetic payloads for fixtures and test cards
pub mod synth;
/// Disk helpers for the CLI
pub mod tools;
/// Pixel-level helpers (grayscale, binarization, enhancement)
pub mod utils;

pub use config::{NormalizerConfig, PayloadConfig, PipelineConfig};
pub use error::{ErrorKind, Result, SchemaIssue, VerifyError};
pub use models::{
    AgeResult, BirthDate, FieldTable, IdentityFacts, PayloadFormat, Point, RawImage, RawPayload,
    VerificationResponse,
};
pub use normalizer::{MAX_CANDIDATES, Normalizer, Transform};
pub use pipeline::{Verifier, verify_image};
pub use symbol::{DecodedSymbol, RqrrDecoder, SymbolDecoder};
