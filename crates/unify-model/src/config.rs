//! Per-source mapping configuration as read from JSON.
//!
//! These are unvalidated shapes. Mapping resolution turns them into checked
//! field mappings and reports problems as [`ConfigurationError`](crate::ConfigurationError).
//!
//! ```json
//! {
//!   "label": "FR",
//!   "currency": "EUR",
//!   "locale": "fr-FR",
//!   "payment_period": 12,
//!   "users": {
//!     "path": "data/FR User Data.csv",
//!     "natural_key": "adresse_électronique",
//!     "fields": {
//!       "user_id": { "columns": ["adresse_électronique"], "transform": { "kind": "text", "case": "lower" } },
//!       "salary":  { "columns": ["salaire"], "transform": { "kind": "salary" } }
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::path::PathBuf;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::schema::TargetTable;

fn default_locale() -> String {
    "plain".to_string()
}

fn default_payment_period() -> u32 {
    1
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

/// Mapping configuration for one source (one country dataset).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Source label; also the stamped `country_code`.
    pub label: String,
    /// Currency attached to every salary of this source.
    pub currency: String,
    /// Salary locale profile name (`en-GB`, `en-US`, `fr-FR`, `plain`).
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub dial_code: Option<String>,
    /// Multiplier turning the raw salary into an annual amount.
    #[serde(default = "default_payment_period")]
    pub payment_period: u32,
    /// IANA timezone of login timestamps.
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub users: Option<TableSourceConfig>,
    #[serde(default)]
    pub logins: Option<TableSourceConfig>,
    /// Raw gender token -> canonical label.
    #[serde(default)]
    pub gender_mapping: BTreeMap<String, String>,
    /// Named lookup tables referenced by `lookup` transforms.
    #[serde(default)]
    pub lookups: BTreeMap<String, BTreeMap<String, String>>,
}

impl SourceConfig {
    pub fn table(&self, table: TargetTable) -> Option<&TableSourceConfig> {
        match table {
            TargetTable::Users => self.users.as_ref(),
            TargetTable::Logins => self.logins.as_ref(),
        }
    }
}

/// Mapping of one source file onto one target table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSourceConfig {
    /// Input file, relative to the source config file.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// Raw column used to identify records in rejection reports.
    #[serde(default)]
    pub natural_key: Option<String>,
    /// Canonical field name -> mapping entry. A name may appear once.
    #[serde(deserialize_with = "unique_fields")]
    pub fields: BTreeMap<String, FieldMappingSpec>,
    /// Rules dropping records before normalization.
    #[serde(default)]
    pub exclusions: Vec<ExclusionRuleSpec>,
}

/// How one canonical field is derived from raw columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldMappingSpec {
    /// Source columns. Most transforms take the first present value; a date
    /// with `year_from_age` reads `[date, age]`.
    pub columns: Vec<String>,
    pub transform: TransformSpec,
    /// Marks an optional schema field as required for this source.
    #[serde(default)]
    pub required: bool,
    /// Raw value substituted when every column is absent.
    #[serde(default)]
    pub default: Option<String>,
}

/// Casing applied by the text transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasePolicy {
    #[default]
    Preserve,
    Lower,
    Upper,
    Title,
}

/// Transformer selected by a mapping entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformSpec {
    Text {
        #[serde(default)]
        case: CasePolicy,
        #[serde(default)]
        max_length: Option<usize>,
    },
    Date {
        /// chrono format strings, tried in order.
        formats: Vec<String>,
        /// Replace the parsed year with `as_of.year - age` (age in the second column).
        #[serde(default)]
        year_from_age: bool,
        /// Earliest plausible year (default 1900).
        #[serde(default)]
        min_year: Option<i32>,
    },
    /// Uses the source's currency, locale and payment period.
    Salary,
    /// Uses the source's `gender_mapping`.
    GenderCode,
    /// Epoch seconds of local time in the source's timezone.
    Timestamp,
    Phone,
    PasswordHash,
    Lookup {
        table: String,
    },
    Integer,
}

impl TransformSpec {
    pub fn name(&self) -> &'static str {
        match self {
            TransformSpec::Text { .. } => "text",
            TransformSpec::Date { .. } => "date",
            TransformSpec::Salary => "salary",
            TransformSpec::GenderCode => "gender_code",
            TransformSpec::Timestamp => "timestamp",
            TransformSpec::Phone => "phone",
            TransformSpec::PasswordHash => "password_hash",
            TransformSpec::Lookup { .. } => "lookup",
            TransformSpec::Integer => "integer",
        }
    }
}

/// Match condition of an exclusion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCondition {
    Equals,
    Contains,
    Regex,
}

/// A rule dropping a raw record when its column matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExclusionRuleSpec {
    /// Raw (source) column name.
    pub field: String,
    #[serde(rename = "match")]
    pub condition: MatchCondition,
    pub pattern: String,
    #[serde(default)]
    pub case_sensitive: bool,
}

fn unique_fields<'de, D>(deserializer: D) -> Result<BTreeMap<String, FieldMappingSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    struct UniqueFields;

    impl<'de> Visitor<'de> for UniqueFields {
        type Value = BTreeMap<String, FieldMappingSpec>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of canonical field names to mapping entries")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut fields = BTreeMap::new();
            while let Some((name, spec)) = access.next_entry::<String, FieldMappingSpec>()? {
                match fields.entry(name) {
                    Entry::Occupied(slot) => {
                        return Err(de::Error::custom(format_args!(
                            "field {} is mapped more than once",
                            slot.key()
                        )));
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(spec);
                    }
                }
            }
            Ok(fields)
        }
    }

    deserializer.deserialize_map(UniqueFields)
}
