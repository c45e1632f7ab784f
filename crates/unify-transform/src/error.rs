use unify_model::ReasonCode;

/// A value that could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("no candidate date format matched: {message}")]
    DateParse { message: String },

    #[error("not a number: {message}")]
    NumericParse { message: String },

    #[error("value has {length} characters, limit is {max_length}")]
    FieldTooLong { length: usize, max_length: usize },
}

impl TransformError {
    pub fn date(message: impl Into<String>) -> Self {
        Self::DateParse {
            message: message.into(),
        }
    }

    pub fn numeric(message: impl Into<String>) -> Self {
        Self::NumericParse {
            message: message.into(),
        }
    }

    /// Reason code reported in a rejection.
    pub fn reason(&self) -> ReasonCode {
        match self {
            TransformError::DateParse { .. } => ReasonCode::DateParseError,
            TransformError::NumericParse { .. } => ReasonCode::NumericParseError,
            TransformError::FieldTooLong { .. } => ReasonCode::FieldTooLongError,
        }
    }
}
