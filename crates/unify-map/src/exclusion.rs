//! Exclusion rules: intentional drops of raw records before normalization.
//!
//! Rules see raw values only. A record is excluded when ANY rule matches.
//! Exclusions are not failures and never produce a rejection report.

use regex::{Regex, RegexBuilder};
use unify_model::{ConfigurationError, ExclusionRuleSpec, MatchCondition, RawRecord, normalize_column_name};

use crate::missing::NullTokens;

#[derive(Debug, Clone)]
enum Matcher {
    Equals(String),
    Contains(String),
    Regex(Regex),
}

/// A compiled exclusion rule bound to one raw column.
#[derive(Debug, Clone)]
pub struct ExclusionRule {
    column: String,
    matcher: Matcher,
    case_sensitive: bool,
}

impl ExclusionRule {
    /// Compile a rule; an invalid regex is a configuration error.
    pub fn compile(source_id: &str, spec: &ExclusionRuleSpec) -> Result<Self, ConfigurationError> {
        let fold = |s: &str| {
            if spec.case_sensitive {
                s.to_string()
            } else {
                s.to_lowercase()
            }
        };
        let matcher = match spec.condition {
            MatchCondition::Equals => Matcher::Equals(fold(spec.pattern.trim())),
            MatchCondition::Contains => Matcher::Contains(fold(&spec.pattern)),
            MatchCondition::Regex => {
                let regex = RegexBuilder::new(&spec.pattern)
                    .case_insensitive(!spec.case_sensitive)
                    .build()
                    .map_err(|err| ConfigurationError::InvalidPattern {
                        source_id: source_id.to_string(),
                        field: spec.field.clone(),
                        message: err.to_string(),
                    })?;
                Matcher::Regex(regex)
            }
        };
        Ok(Self {
            column: normalize_column_name(&spec.field),
            matcher,
            case_sensitive: spec.case_sensitive,
        })
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// A record without the rule's column never matches.
    pub fn matches(&self, record: &RawRecord) -> bool {
        let Some(value) = record.get(&self.column) else {
            return false;
        };
        let folded = if self.case_sensitive {
            value.to_string()
        } else {
            value.to_lowercase()
        };
        match &self.matcher {
            Matcher::Equals(expected) => folded.trim() == expected,
            Matcher::Contains(needle) => folded.contains(needle.as_str()),
            Matcher::Regex(regex) => regex.is_match(value),
        }
    }
}

/// True when any rule matches.
pub fn should_exclude(record: &RawRecord, rules: &[ExclusionRule]) -> bool {
    rules.iter().any(|rule| rule.matches(record))
}

/// Why a record was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionCause {
    /// Index of the first matching rule.
    Rule(usize),
    /// More than the threshold fraction of values were missing.
    SparseRow { missing: usize, total: usize },
}

/// Exclusion rules plus the sparse-row check for one source table.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    rules: Vec<ExclusionRule>,
    sparse_row_threshold: Option<f64>,
    null_tokens: NullTokens,
}

impl ExclusionFilter {
    pub fn new(rules: Vec<ExclusionRule>) -> Self {
        Self {
            rules,
            sparse_row_threshold: None,
            null_tokens: NullTokens::default(),
        }
    }

    pub fn with_sparse_row_threshold(mut self, threshold: Option<f64>, null_tokens: NullTokens) -> Self {
        self.sparse_row_threshold = threshold;
        self.null_tokens = null_tokens;
        self
    }

    pub fn rules(&self) -> &[ExclusionRule] {
        &self.rules
    }

    pub fn check(&self, record: &RawRecord) -> Option<ExclusionCause> {
        if let Some(index) = self.rules.iter().position(|rule| rule.matches(record)) {
            return Some(ExclusionCause::Rule(index));
        }
        let threshold = self.sparse_row_threshold?;
        let total = record.len();
        if total == 0 {
            return None;
        }
        let missing = record
            .columns()
            .filter(|(_, value)| self.null_tokens.is_missing(value))
            .count();
        (missing as f64 / total as f64 > threshold).then_some(ExclusionCause::SparseRow { missing, total })
    }

    pub fn should_exclude(&self, record: &RawRecord) -> bool {
        self.check(record).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(field: &str, condition: MatchCondition, pattern: &str, case_sensitive: bool) -> ExclusionRule {
        ExclusionRule::compile(
            "UK",
            &ExclusionRuleSpec {
                field: field.to_string(),
                condition,
                pattern: pattern.to_string(),
                case_sensitive,
            },
        )
        .unwrap()
    }

    fn record() -> RawRecord {
        RawRecord::from_pairs(1, [("Email", "QA+test@example.com"), ("First Name", "Test")])
    }

    #[test]
    fn equals_is_case_insensitive_by_default() {
        assert!(rule("first name", MatchCondition::Equals, "TEST", false).matches(&record()));
        assert!(!rule("first name", MatchCondition::Equals, "TEST", true).matches(&record()));
    }

    #[test]
    fn contains_and_regex() {
        assert!(rule("email", MatchCondition::Contains, "qa+", false).matches(&record()));
        assert!(rule("email", MatchCondition::Regex, r"^qa\+.*@example\.com$", false).matches(&record()));
        assert!(!rule("email", MatchCondition::Regex, r"^qa\+", true).matches(&record()));
    }

    #[test]
    fn missing_column_never_matches() {
        assert!(!rule("username", MatchCondition::Contains, "", false).matches(&record()));
    }

    #[test]
    fn any_rule_excludes() {
        let rules = vec![
            rule("email", MatchCondition::Equals, "nobody@example.com", false),
            rule("first_name", MatchCondition::Equals, "test", false),
        ];
        assert!(should_exclude(&record(), &rules));
        assert!(!should_exclude(&record(), &rules[..1]));
        assert!(!should_exclude(&record(), &[]));
    }

    #[test]
    fn invalid_regex_is_configuration_error() {
        let err = ExclusionRule::compile(
            "UK",
            &ExclusionRuleSpec {
                field: "email".to_string(),
                condition: MatchCondition::Regex,
                pattern: "(".to_string(),
                case_sensitive: false,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidPattern { .. }));
    }

    #[test]
    fn sparse_rows_are_excluded() {
        let filter = ExclusionFilter::new(Vec::new()).with_sparse_row_threshold(Some(0.5), NullTokens::default());
        let sparse = RawRecord::from_pairs(3, [("a", "NA"), ("b", ""), ("c", "x")]);
        assert_eq!(
            filter.check(&sparse),
            Some(ExclusionCause::SparseRow { missing: 2, total: 3 })
        );
        let half = RawRecord::from_pairs(4, [("a", "NA"), ("b", "y")]);
        assert_eq!(filter.check(&half), None);
        assert!(!ExclusionFilter::new(Vec::new()).should_exclude(&sparse));
    }
}
