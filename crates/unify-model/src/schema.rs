//! Canonical schema of the `users` and `logins` tables.
//!
//! The storage layer creates its tables from these definitions and the
//! normalizer emits fields in this order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output table targeted by a merge run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetTable {
    Users,
    Logins,
}

impl TargetTable {
    pub const ALL: [TargetTable; 2] = [TargetTable::Users, TargetTable::Logins];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetTable::Users => "users",
            TargetTable::Logins => "logins",
        }
    }

    /// Field definitions in canonical order.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            TargetTable::Users => USERS_FIELDS,
            TargetTable::Logins => LOGINS_FIELDS,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|spec| spec.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields().iter().filter(|spec| spec.required)
    }
}

impl fmt::Display for TargetTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetTable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "users" => Ok(TargetTable::Users),
            "logins" => Ok(TargetTable::Logins),
            _ => Err(format!("unknown target table: {s}")),
        }
    }
}

/// Kind of value a canonical field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Text,
    Date,
    Timestamp,
    Money,
    Gender,
    Integer,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Date => "date",
            ValueKind::Timestamp => "timestamp",
            ValueKind::Money => "money",
            ValueKind::Gender => "gender",
            ValueKind::Integer => "integer",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields filled from the source identity instead of raw data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StampedField {
    CountryCode,
    SalaryCurrency,
    DialCode,
}

/// Definition of one canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: ValueKind,
    pub required: bool,
    /// Set when the value comes from the source identity.
    pub stamped: Option<StampedField>,
}

impl FieldSpec {
    const fn mapped(name: &'static str, kind: ValueKind, required: bool) -> Self {
        Self {
            name,
            kind,
            required,
            stamped: None,
        }
    }

    const fn stamped(name: &'static str, required: bool, origin: StampedField) -> Self {
        Self {
            name,
            kind: ValueKind::Text,
            required,
            stamped: Some(origin),
        }
    }

    pub fn is_stamped(&self) -> bool {
        self.stamped.is_some()
    }
}

const USERS_FIELDS: &[FieldSpec] = &[
    FieldSpec::mapped("user_id", ValueKind::Text, true),
    FieldSpec::stamped("country_code", true, StampedField::CountryCode),
    FieldSpec::mapped("first_name", ValueKind::Text, false),
    FieldSpec::mapped("surname", ValueKind::Text, false),
    FieldSpec::mapped("date_of_birth", ValueKind::Date, true),
    FieldSpec::mapped("gender", ValueKind::Gender, true),
    FieldSpec::mapped("salary", ValueKind::Money, true),
    FieldSpec::stamped("salary_currency", true, StampedField::SalaryCurrency),
    FieldSpec::mapped("email", ValueKind::Text, false),
    FieldSpec::mapped("password_hash", ValueKind::Text, false),
    FieldSpec::mapped("phone", ValueKind::Text, false),
    FieldSpec::mapped("mobile", ValueKind::Text, false),
    FieldSpec::stamped("dial_code", false, StampedField::DialCode),
    FieldSpec::mapped("city", ValueKind::Text, false),
    FieldSpec::mapped("county", ValueKind::Text, false),
    FieldSpec::mapped("county_code", ValueKind::Text, false),
    FieldSpec::mapped("postcode", ValueKind::Text, false),
    FieldSpec::mapped("education", ValueKind::Text, false),
    FieldSpec::mapped("rqf", ValueKind::Text, false),
    FieldSpec::mapped("website_visits_last_30_days", ValueKind::Integer, false),
    FieldSpec::mapped("favourite_colour", ValueKind::Text, false),
    FieldSpec::mapped("favourite_animal", ValueKind::Text, false),
    FieldSpec::mapped("favourite_food", ValueKind::Text, false),
];

const LOGINS_FIELDS: &[FieldSpec] = &[
    FieldSpec::mapped("user_id", ValueKind::Text, true),
    FieldSpec::stamped("country_code", true, StampedField::CountryCode),
    FieldSpec::mapped("login_timestamp", ValueKind::Timestamp, true),
];
