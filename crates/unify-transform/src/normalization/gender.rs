//! Gender code normalization.
//!
//! Each source supplies its own token table (`"1" -> Male`, `"H" -> Male`).
//! Lookup is exact first, then case-insensitive, then a canonical label
//! spelled out in the data. Anything else is `Unknown`, never a rejection.

use std::collections::BTreeMap;

use tracing::warn;
use unify_model::Gender;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenderTransformer {
    exact: BTreeMap<String, Gender>,
    folded: BTreeMap<String, Gender>,
}

impl GenderTransformer {
    pub fn new(mapping: BTreeMap<String, Gender>) -> Self {
        let folded = mapping
            .iter()
            .map(|(token, gender)| (token.trim().to_lowercase(), *gender))
            .collect();
        Self {
            exact: mapping,
            folded,
        }
    }

    pub fn transform(&self, raw: &str) -> Gender {
        let token = raw.trim();
        if let Some(gender) = self.exact.get(token) {
            return *gender;
        }
        if let Some(gender) = self.folded.get(&token.to_lowercase()) {
            return *gender;
        }
        if let Ok(gender) = token.parse::<Gender>() {
            return gender;
        }
        warn!(token_len = token.len(), "unmapped gender token normalized to Unknown");
        Gender::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transformer() -> GenderTransformer {
        GenderTransformer::new(BTreeMap::from([
            ("M".to_string(), Gender::Male),
            ("F".to_string(), Gender::Female),
            ("nb".to_string(), Gender::NonBinary),
        ]))
    }

    #[test]
    fn exact_then_case_insensitive() {
        let t = transformer();
        assert_eq!(t.transform("M"), Gender::Male);
        assert_eq!(t.transform(" f "), Gender::Female);
        assert_eq!(t.transform("NB"), Gender::NonBinary);
    }

    #[test]
    fn canonical_labels_pass_through() {
        let t = GenderTransformer::default();
        assert_eq!(t.transform("Female"), Gender::Female);
        assert_eq!(t.transform("non-binary"), Gender::NonBinary);
    }

    #[test]
    fn unmapped_tokens_become_unknown() {
        assert_eq!(transformer().transform("X"), Gender::Unknown);
        assert_eq!(transformer().transform("?"), Gender::Unknown);
    }
}
