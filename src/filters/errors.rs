//! Filter normalization errors

use thiserror::Error;

/// Errors raised while normalizing a filter expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Filter item of an unsupported shape
    #[error("{0}")]
    InvalidFilter(String),

    /// Logical operator other than and/all/or/any
    #[error("unknown logical operator: {0}")]
    UnknownOperator(String),

    /// Group mapping without an operator or without conditions
    #[error("missing {0}")]
    MissingFilterField(&'static str),

    /// Mapping that is neither a nested group nor a canonical condition
    #[error("invalid complex filter: {0}")]
    MalformedCondition(String),
}

impl FilterError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            FilterError::InvalidFilter(_) => "EQ_INVALID_FILTER",
            FilterError::UnknownOperator(_) => "EQ_UNKNOWN_OPERATOR",
            FilterError::MissingFilterField(_) => "EQ_MISSING_FILTER_FIELD",
            FilterError::MalformedCondition(_) => "EQ_MALFORMED_CONDITION",
        }
    }
}

/// Result type for filter normalization
pub type FilterResult<T> = Result<T, FilterError>;
