//! Age evaluator.

use chrono::{Datelike, NaiveDate};

use crate::error::{Result, SchemaIssue, VerifyError};
use crate::models::{AgeResult, BirthDate, IdentityFacts, PayloadFormat};

/// Age at which a holder is no longer a minor
pub const ADULT_AGE: u32 = 18;

/// Completed years between `birth` and `today`.
///
/// With an exact date the age increments on the birthday itself; a 29 February
/// birthday counts as reached on 1 March in common years. With a year only the
/// answer is the plain year difference, which can overstate the age by one
/// until the unknown birthday has passed.
pub fn age_on(birth: BirthDate, today: NaiveDate) -> Option<u32> {
    let years = match birth {
        BirthDate::Exact(dob) => {
            if dob > today {
                return None;
            }
            let before_birthday = (today.month(), today.day()) < (dob.month(), dob.day());
            today.year() - dob.year() - i32::from(before_birthday)
        }
        BirthDate::YearOnly(year) => today.year() - year,
    };
    u32::try_from(years).ok()
}

/// Compute age and minor status relative to the injected `today`.
///
/// A birth after `today` is a `SchemaMismatch`.
pub fn evaluate_age(facts: &IdentityFacts, today: NaiveDate) -> Result<AgeResult> {
    let birth = facts.birth();
    let age = age_on(birth, today).ok_or(VerifyError::SchemaMismatch {
        format: match birth {
            BirthDate::Exact(_) => PayloadFormat::LegacyV1,
            BirthDate::YearOnly(_) => PayloadFormat::CompressedV2,
        },
        issue: SchemaIssue::BirthInFuture,
    })?;

    Ok(AgeResult {
        age,
        is_under_18: age < ADULT_AGE,
    })
}
