//! Raw input rows and canonical output rows.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::{TargetTable, ValueKind};

/// Normalize a source column name: trim, lowercase, inner whitespace to `_`.
///
/// `"First Name"`, `" first name "` and `first_name` all address the same column.
pub fn normalize_column_name(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut normalized = String::with_capacity(trimmed.len());
    for (idx, part) in trimmed.split_whitespace().enumerate() {
        if idx > 0 {
            normalized.push('_');
        }
        normalized.push_str(&part.to_lowercase());
    }
    normalized
}

/// One input row: an ordered mapping from source column name to raw string.
///
/// Column names are normalized on construction; the record is immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    row: usize,
    columns: Vec<(String, String)>,
}

impl RawRecord {
    /// Build a record from `(column, value)` pairs. `row` is the 1-based data row index.
    pub fn from_pairs<I, K, V>(row: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let columns = pairs
            .into_iter()
            .map(|(key, value)| (normalize_column_name(key.as_ref()), value.into()))
            .collect();
        Self { row, columns }
    }

    /// Build a record by zipping a header row with a value row.
    ///
    /// Missing trailing values are stored as empty strings.
    pub fn from_row(row: usize, headers: &[String], values: &[String]) -> Self {
        let columns = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let value = values.get(idx).cloned().unwrap_or_default();
                (normalize_column_name(header), value)
            })
            .collect();
        Self { row, columns }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    /// Look up a raw value by column name (normalized before comparison).
    pub fn get(&self, column: &str) -> Option<&str> {
        let key = normalize_column_name(column);
        self.columns
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Canonical gender codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[serde(rename = "Non-Binary")]
    NonBinary,
    Other,
    Unknown,
}

impl Gender {
    pub const ALL: [Gender; 5] = [
        Gender::Male,
        Gender::Female,
        Gender::NonBinary,
        Gender::Other,
        Gender::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::NonBinary => "Non-Binary",
            Gender::Other => "Other",
            Gender::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    /// Parse a canonical label (case-insensitive, `-`/`_`/space insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_' | ' '))
            .collect::<String>()
            .to_uppercase();
        match compact.as_str() {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            "NONBINARY" => Ok(Gender::NonBinary),
            "OTHER" => Ok(Gender::Other),
            "UNKNOWN" => Ok(Gender::Unknown),
            _ => Err(format!("unknown gender label: {s}")),
        }
    }
}

/// An exact monetary amount in minor units (cents) with its currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    pub minor_units: i64,
    pub currency: String,
}

impl Money {
    pub fn new(minor_units: i64, currency: impl Into<String>) -> Self {
        Self {
            minor_units,
            currency: currency.into(),
        }
    }

    /// Amount in major units, for sinks that store floating point values.
    pub fn amount(&self) -> f64 {
        self.minor_units as f64 / 100.0
    }

    pub fn is_negative(&self) -> bool {
        self.minor_units < 0
    }
}

impl fmt::Display for Money {
    /// Renders the amount with two decimals, without the currency code.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor_units < 0 { "-" } else { "" };
        let abs = self.minor_units.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// A typed, normalized value of a canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CanonicalValue {
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Money(Money),
    Gender(Gender),
    Integer(i64),
    Null,
}

impl CanonicalValue {
    /// Value kind, or `None` for `Null` (which fits any field).
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            CanonicalValue::Text(_) => Some(ValueKind::Text),
            CanonicalValue::Date(_) => Some(ValueKind::Date),
            CanonicalValue::Timestamp(_) => Some(ValueKind::Timestamp),
            CanonicalValue::Money(_) => Some(ValueKind::Money),
            CanonicalValue::Gender(_) => Some(ValueKind::Gender),
            CanonicalValue::Integer(_) => Some(ValueKind::Integer),
            CanonicalValue::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CanonicalValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CanonicalValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CanonicalValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Text rendering used by sinks and reports. `Null` renders as `None`.
    pub fn render(&self) -> Option<String> {
        match self {
            CanonicalValue::Text(value) => Some(value.clone()),
            CanonicalValue::Date(date) => Some(date.format("%Y-%m-%d").to_string()),
            CanonicalValue::Timestamp(ts) => Some(ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
            CanonicalValue::Money(money) => Some(money.to_string()),
            CanonicalValue::Gender(gender) => Some(gender.as_str().to_string()),
            CanonicalValue::Integer(value) => Some(value.to_string()),
            CanonicalValue::Null => None,
        }
    }
}

/// One normalized output row for a target table.
///
/// Fields are kept in canonical schema order and carry canonical names only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub table: TargetTable,
    pub fields: Vec<(String, CanonicalValue)>,
}

impl CanonicalRecord {
    pub fn new(table: TargetTable) -> Self {
        Self {
            table,
            fields: Vec::new(),
        }
    }

    pub fn push(&mut self, field: impl Into<String>, value: CanonicalValue) {
        self.fields.push((field.into(), value));
    }

    pub fn get(&self, field: &str) -> Option<&CanonicalValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(CanonicalValue::as_text)
    }

    pub fn country_code(&self) -> Option<&str> {
        self.text("country_code")
    }

    pub fn user_id(&self) -> Option<&str> {
        self.text("user_id")
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}
