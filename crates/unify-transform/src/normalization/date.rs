//! Calendar date parsing against a declared list of candidate formats.
//!
//! Formats are chrono `strftime` patterns tried in declared order; the first
//! one that parses wins. Sources such as `DD/MM` vs `MM/DD` are ambiguous, so
//! the order in the mapping is the tie-break.

use chrono::{Datelike, NaiveDate};

use crate::error::TransformError;
use crate::normalization::numeric::parse_integer;

/// Default earliest plausible year.
pub const DEFAULT_MIN_YEAR: i32 = 1900;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTransformer {
    formats: Vec<String>,
    earliest: NaiveDate,
    latest: NaiveDate,
    /// Year used as "now" when deriving the birth year from an age.
    age_reference_year: Option<i32>,
}

impl DateTransformer {
    /// Dates are accepted from 1900-01-01 up to and including `as_of`.
    pub fn new(formats: Vec<String>, as_of: NaiveDate) -> Self {
        Self {
            formats,
            earliest: NaiveDate::from_ymd_opt(DEFAULT_MIN_YEAR, 1, 1).unwrap_or(NaiveDate::MIN),
            latest: as_of,
            age_reference_year: None,
        }
    }

    pub fn with_min_year(mut self, year: i32) -> Self {
        self.earliest = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
        self
    }

    /// Replace the parsed year with `as_of.year - age`.
    pub fn with_year_from_age(mut self, enable: bool) -> Self {
        self.age_reference_year = enable.then(|| self.latest.year());
        self
    }

    pub fn uses_age(&self) -> bool {
        self.age_reference_year.is_some()
    }

    /// Parse with the first candidate format that matches.
    pub fn parse_candidates(&self, raw: &str) -> Result<NaiveDate, TransformError> {
        let trimmed = raw.trim();
        for format in &self.formats {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return Ok(date);
            }
        }
        Err(TransformError::date(format!(
            "value matched none of {} candidate format(s)",
            self.formats.len()
        )))
    }

    /// Parse, optionally re-derive the year from `age`, and range-check.
    pub fn transform(&self, raw: &str, age: Option<&str>) -> Result<NaiveDate, TransformError> {
        let mut date = self.parse_candidates(raw)?;
        if let Some(reference_year) = self.age_reference_year {
            let age = age.ok_or_else(|| TransformError::numeric("age value is missing"))?;
            let age = parse_integer(age)?;
            if !(0..=150).contains(&age) {
                return Err(TransformError::numeric(format!("age {age} is out of range")));
            }
            let year = reference_year - age as i32;
            date = date.with_year(year).ok_or_else(|| {
                TransformError::date(format!("{}-{:02} does not exist in {year}", date.month(), date.day()))
            })?;
        }
        if date < self.earliest || date > self.latest {
            return Err(TransformError::date(format!(
                "{date} is outside the plausible range {} to {}",
                self.earliest, self.latest
            )));
        }
        Ok(date)
    }
}
