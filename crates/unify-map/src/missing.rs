//! Tokens that sources use to spell "no value".

use std::collections::BTreeSet;

/// Tokens treated as missing when no list is configured.
pub const DEFAULT_NULL_TOKENS: [&str; 7] = ["BLANK", "NA", "NONE", "-", "{NULL}", "VIDE", ""];

/// Case-insensitive set of missing-value tokens. Blank values are always missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullTokens {
    tokens: BTreeSet<String>,
}

impl NullTokens {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|token| token.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    pub fn is_missing(&self, value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty() || self.tokens.contains(&trimmed.to_lowercase())
    }

    /// `None` when the value is missing.
    pub fn present<'a>(&self, value: Option<&'a str>) -> Option<&'a str> {
        value.filter(|v| !self.is_missing(v))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for NullTokens {
    fn default() -> Self {
        Self::new(DEFAULT_NULL_TOKENS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tokens_are_case_insensitive() {
        let tokens = NullTokens::default();
        assert!(tokens.is_missing("NA"));
        assert!(tokens.is_missing(" na "));
        assert!(tokens.is_missing("{null}"));
        assert!(tokens.is_missing("Vide"));
        assert!(tokens.is_missing("   "));
        assert!(!tokens.is_missing("Nathalie"));
        assert!(!tokens.is_missing("0"));
    }

    #[test]
    fn blank_is_missing_even_without_tokens() {
        let tokens = NullTokens::new(Vec::<String>::new());
        assert!(tokens.is_empty());
        assert!(tokens.is_missing(""));
        assert!(!tokens.is_missing("NA"));
        assert_eq!(tokens.present(Some("x")), Some("x"));
        assert_eq!(tokens.present(Some(" ")), None);
    }
}
