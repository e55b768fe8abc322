use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Birth information at the precision the payload generation carries
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum BirthDate {
    /// Full calendar date
    Exact(NaiveDate),
    /// Year only; month and day are unknown
    YearOnly(i32),
}

impl BirthDate {
    /// Calendar year of birth
    pub fn year(&self) -> i32 {
        match self {
            BirthDate::Exact(date) => date.year(),
            BirthDate::YearOnly(year) => *year,
        }
    }

    /// True when month and day are known
    pub fn is_exact(&self) -> bool {
        matches!(self, BirthDate::Exact(_))
    }
}

impl fmt::Debug for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BirthDate::Exact(_) => f.write_str("Exact(<redacted>)"),
            BirthDate::YearOnly(_) => f.write_str("YearOnly(<redacted>)"),
        }
    }
}

/// Minimal record extracted from a payload. Never leaves the crate boundary.
///
/// The reference id is validated by the field extractor and dropped there; it
/// is not carried in this record.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct IdentityFacts {
    birth: BirthDate,
}

impl IdentityFacts {
    /// Wrap extracted birth information
    pub fn new(birth: BirthDate) -> Self {
        Self { birth }
    }

    /// Birth information
    pub fn birth(&self) -> BirthDate {
        self.birth
    }

    /// Exact date of birth, when the generation carries one
    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        match self.birth {
            BirthDate::Exact(date) => Some(date),
            BirthDate::YearOnly(_) => None,
        }
    }

    /// Year of birth, when only the year is known
    pub fn birth_year(&self) -> Option<i32> {
        match self.birth {
            BirthDate::Exact(_) => None,
            BirthDate::YearOnly(year) => Some(year),
        }
    }
}

impl fmt::Debug for IdentityFacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityFacts")
            .field("birth", &self.birth)
            .finish()
    }
}

/// Derived age; the only product of the pipeline that leaves the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeResult {
    /// Age in whole years
    pub age: u32,
    /// `age < 18`
    pub is_under_18: bool,
}
