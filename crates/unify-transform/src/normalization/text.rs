//! Free-text normalization: trimming, casing and length limits.

use unify_model::CasePolicy;

use crate::error::TransformError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextTransformer {
    case: CasePolicy,
    max_length: Option<usize>,
}

impl TextTransformer {
    pub fn new(case: CasePolicy, max_length: Option<usize>) -> Self {
        Self { case, max_length }
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Length is counted in characters after casing.
    pub fn transform(&self, raw: &str) -> Result<String, TransformError> {
        let value = apply_case(raw.trim(), self.case);
        if let Some(max_length) = self.max_length {
            let length = value.chars().count();
            if length > max_length {
                return Err(TransformError::FieldTooLong { length, max_length });
            }
        }
        Ok(value)
    }
}

pub fn apply_case(value: &str, case: CasePolicy) -> String {
    match case {
        CasePolicy::Preserve => value.to_string(),
        CasePolicy::Lower => value.to_lowercase(),
        CasePolicy::Upper => value.to_uppercase(),
        CasePolicy::Title => title_case(value),
    }
}

/// Upper-cases the first letter of every word; `o'brien-smith` becomes `O'Brien-Smith`.
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = !ch.is_numeric();
        }
    }
    out
}
