//! Field extractor: pull birth information out of a field table using the
//! fixed positional schema of each payload generation.
//!
//! Only the marker, the reference id and the birth field are ever looked at.
//! Name, gender and contact fields are skipped by position.

use chrono::NaiveDate;
use tracing::trace;

use crate::error::{Result, SchemaIssue, VerifyError};
use crate::models::{BirthDate, FieldTable, IdentityFacts, PayloadFormat};

/// Date layouts accepted in the legacy birth field
pub const DATE_LAYOUTS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Precision of a generation's birth field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthKind {
    /// Day, month and year
    FullDate,
    /// Four-digit year
    YearOnly,
}

/// Positional layout of one payload generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    /// Reference or version marker
    pub marker_index: usize,
    /// Numeric reference id
    pub reference_index: usize,
    /// Date or year of birth
    pub birth_index: usize,
    /// Precision of the birth field
    pub birth_kind: BirthKind,
    /// Shortest acceptable table
    pub min_fields: usize,
}

impl FieldSchema {
    /// `reference | name | gender | date-of-birth | ...`
    pub const LEGACY_V1: FieldSchema = FieldSchema {
        marker_index: 0,
        reference_index: 0,
        birth_index: 3,
        birth_kind: BirthKind::FullDate,
        min_fields: 4,
    };

    /// `version | contact indicator | reference | name | year-of-birth | ...`
    pub const COMPRESSED_V2: FieldSchema = FieldSchema {
        marker_index: 0,
        reference_index: 2,
        birth_index: 4,
        birth_kind: BirthKind::YearOnly,
        min_fields: 5,
    };

    /// Schema for `format`; `None` for `Unknown`
    pub fn for_format(format: PayloadFormat) -> Option<FieldSchema> {
        match format {
            PayloadFormat::LegacyV1 => Some(Self::LEGACY_V1),
            PayloadFormat::CompressedV2 => Some(Self::COMPRESSED_V2),
            PayloadFormat::Unknown => None,
        }
    }
}

/// Field text in the generation's character set.
///
/// Legacy payloads are UTF-8; compressed ones are ISO-8859-1, where every
/// byte maps to the code point of the same value.
fn field_text(raw: &[u8], format: PayloadFormat) -> String {
    match format {
        PayloadFormat::CompressedV2 => raw.iter().map(|&b| char::from(b)).collect(),
        _ => String::from_utf8_lossy(raw).into_owned(),
    }
}

/// Whether `text` has the exact digit widths of `layout`: four for `%Y`,
/// two for `%m` and `%d`, every other layout byte literal.
///
/// chrono accepts short and signed numbers for these specifiers, so the width
/// is checked before parsing.
fn has_layout_shape(text: &str, layout: &str) -> bool {
    let mut text = text.bytes();
    let mut layout = layout.bytes();
    while let Some(spec) = layout.next() {
        let width = match spec {
            b'%' => match layout.next() {
                Some(b'Y') => 4,
                Some(b'm' | b'd') => 2,
                _ => return false,
            },
            literal => {
                if text.next() != Some(literal) {
                    return false;
                }
                continue;
            }
        };
        for _ in 0..width {
            if !text.next().is_some_and(|b| b.is_ascii_digit()) {
                return false;
            }
        }
    }
    text.next().is_none()
}

/// Parse a legacy date of birth in any of [`DATE_LAYOUTS`].
///
/// Years must have four digits and months and days two.
pub fn parse_birth_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_LAYOUTS
        .iter()
        .filter(|layout| has_layout_shape(text, layout))
        .find_map(|layout| NaiveDate::parse_from_str(text, layout).ok())
}

/// Parse an exactly four-digit year of birth
pub fn parse_birth_year(text: &str) -> Option<i32> {
    let text = text.trim();
    if text.len() != 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Extract [`IdentityFacts`] from `table` laid out as `format`.
///
/// Every failure is `SchemaMismatch` carrying a reason without field
/// contents. The reference id is validated here and then dropped.
pub fn extract_facts(table: &FieldTable, format: PayloadFormat) -> Result<IdentityFacts> {
    let schema = FieldSchema::for_format(format).ok_or(VerifyError::UnknownFormat)?;
    let mismatch = |issue| VerifyError::SchemaMismatch { format, issue };

    if table.len() < schema.min_fields {
        return Err(mismatch(SchemaIssue::TooFewFields {
            required: schema.min_fields,
            found: table.len(),
        }));
    }

    let field = |index: usize| field_text(table.get(index).unwrap_or_default(), format);

    let marker = field(schema.marker_index);
    let marker = marker.trim();
    if marker.is_empty() || !marker.chars().all(char::is_alphanumeric) {
        return Err(mismatch(SchemaIssue::MalformedMarker {
            index: schema.marker_index,
        }));
    }

    let reference = field(schema.reference_index);
    let reference = reference.trim();
    if reference.is_empty() || !reference.bytes().all(|b| b.is_ascii_digit()) {
        return Err(mismatch(SchemaIssue::MalformedReference {
            index: schema.reference_index,
        }));
    }

    let index = schema.birth_index;
    let birth_text = field(index);
    if birth_text.trim().is_empty() {
        return Err(mismatch(SchemaIssue::EmptyBirthField { index }));
    }

    let birth = match schema.birth_kind {
        BirthKind::FullDate => parse_birth_date(&birth_text)
            .map(BirthDate::Exact)
            .ok_or(mismatch(SchemaIssue::MalformedDate { index }))?,
        BirthKind::YearOnly => parse_birth_year(&birth_text)
            .map(BirthDate::YearOnly)
            .ok_or(mismatch(SchemaIssue::MalformedYear { index }))?,
    };

    trace!(%format, exact = birth.is_exact(), "birth field extracted");
    Ok(IdentityFacts::new(birth))
}
