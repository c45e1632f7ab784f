//! Resolved transformers: a closed set selected by mapping entries.

use unify_model::{CanonicalValue, ValueKind};

use crate::error::TransformError;
use crate::normalization::{
    DateTransformer, GenderTransformer, LookupTransformer, SalaryTransformer, TextTransformer,
    TimestampTransformer, hash_password, normalize_phone, parse_integer,
};

/// A transformer bound to everything it needs from its source configuration.
///
/// Transformers are pure: the same input always yields the same output,
/// which keeps re-runs of a merge idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformer {
    Text(TextTransformer),
    Date(DateTransformer),
    Salary(SalaryTransformer),
    GenderCode(GenderTransformer),
    Timestamp(TimestampTransformer),
    Phone,
    PasswordHash,
    Lookup(LookupTransformer),
    Integer,
}

impl Transformer {
    pub fn name(&self) -> &'static str {
        match self {
            Transformer::Text(_) => "text",
            Transformer::Date(_) => "date",
            Transformer::Salary(_) => "salary",
            Transformer::GenderCode(_) => "gender_code",
            Transformer::Timestamp(_) => "timestamp",
            Transformer::Phone => "phone",
            Transformer::PasswordHash => "password_hash",
            Transformer::Lookup(_) => "lookup",
            Transformer::Integer => "integer",
        }
    }

    /// Kind of value produced on success.
    pub fn output_kind(&self) -> ValueKind {
        match self {
            Transformer::Text(_)
            | Transformer::Phone
            | Transformer::PasswordHash
            | Transformer::Lookup(_) => ValueKind::Text,
            Transformer::Date(_) => ValueKind::Date,
            Transformer::Salary(_) => ValueKind::Money,
            Transformer::GenderCode(_) => ValueKind::Gender,
            Transformer::Timestamp(_) => ValueKind::Timestamp,
            Transformer::Integer => ValueKind::Integer,
        }
    }

    /// Number of columns read positionally, or `None` when the first
    /// present column is used.
    pub fn positional_columns(&self) -> Option<usize> {
        match self {
            Transformer::Date(date) if date.uses_age() => Some(2),
            _ => None,
        }
    }

    /// Apply to the extracted raw values. `inputs[0]` is the primary value;
    /// positional transformers read further entries.
    pub fn apply(&self, inputs: &[&str]) -> Result<CanonicalValue, TransformError> {
        let Some(raw) = inputs.first().copied() else {
            return Ok(CanonicalValue::Null);
        };
        let value = match self {
            Transformer::Text(text) => CanonicalValue::Text(text.transform(raw)?),
            Transformer::Date(date) => {
                CanonicalValue::Date(date.transform(raw, inputs.get(1).copied())?)
            }
            Transformer::Salary(salary) => CanonicalValue::Money(salary.transform(raw)?),
            Transformer::GenderCode(gender) => CanonicalValue::Gender(gender.transform(raw)),
            Transformer::Timestamp(timestamp) => {
                CanonicalValue::Timestamp(timestamp.transform(raw)?)
            }
            Transformer::Phone => CanonicalValue::Text(normalize_phone(raw)?),
            Transformer::PasswordHash => CanonicalValue::Text(hash_password(raw)),
            Transformer::Lookup(lookup) => lookup
                .transform(raw)
                .map_or(CanonicalValue::Null, CanonicalValue::Text),
            Transformer::Integer => CanonicalValue::Integer(parse_integer(raw)?),
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use unify_model::{CasePolicy, Gender};

    use super::*;
    use crate::normalization::salary::EN_GB;

    #[test]
    fn output_kinds_match_values() {
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let cases: Vec<(Transformer, &str)> = vec![
            (
                Transformer::Text(TextTransformer::new(CasePolicy::Lower, None)),
                "A@B.COM",
            ),
            (
                Transformer::Date(DateTransformer::new(vec!["%Y-%m-%d".into()], as_of)),
                "1990-05-17",
            ),
            (
                Transformer::Salary(SalaryTransformer::new(EN_GB, "GBP", 1)),
                "£45,000",
            ),
            (Transformer::GenderCode(GenderTransformer::default()), "F"),
            (Transformer::Phone, "07700 900123"),
            (Transformer::PasswordHash, "hunter2"),
            (Transformer::Integer, "14"),
        ];
        for (transformer, raw) in cases {
            let value = transformer.apply(&[raw]).unwrap();
            assert_eq!(value.kind(), Some(transformer.output_kind()), "{}", transformer.name());
        }
    }

    #[test]
    fn unknown_gender_is_a_value_not_an_error() {
        let t = Transformer::GenderCode(GenderTransformer::default());
        assert_eq!(t.apply(&["X"]), Ok(CanonicalValue::Gender(Gender::Unknown)));
    }

    #[test]
    fn date_with_age_is_positional() {
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let t = Transformer::Date(
            DateTransformer::new(vec!["%d/%m/%y".into()], as_of).with_year_from_age(true),
        );
        assert_eq!(t.positional_columns(), Some(2));
        assert_eq!(
            t.apply(&["05/06/01", "40"]),
            Ok(CanonicalValue::Date(NaiveDate::from_ymd_opt(1984, 6, 5).unwrap()))
        );
    }

    #[test]
    fn missing_lookup_code_is_null() {
        let t = Transformer::Lookup(LookupTransformer::new("rqf", Default::default()));
        assert_eq!(t.apply(&["Level 9"]), Ok(CanonicalValue::Null));
    }
}
