use serde::{Deserialize, Serialize};

use crate::schema::StampedField;

/// Trusted identity of a source, supplied by configuration.
///
/// Stamped canonical fields are filled from here, never from raw data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceIdentity {
    /// Source label, e.g. "UK".
    pub id: String,
    /// Uppercase two/three-letter country code.
    pub country_code: String,
    /// ISO 4217 currency code attached to salaries.
    pub currency: String,
    /// International dialing code, if configured.
    pub dial_code: Option<String>,
}

impl SourceIdentity {
    pub fn stamp(&self, field: StampedField) -> Option<&str> {
        match field {
            StampedField::CountryCode => Some(&self.country_code),
            StampedField::SalaryCurrency => Some(&self.currency),
            StampedField::DialCode => self.dial_code.as_deref(),
        }
    }
}
