//! # Query Errors
//!
//! Error types shared by every layer of the query engine.
//!
//! Errors fall into four classes:
//! - Input validation: rejected before any network activity
//! - Remote: the service answered with an exception
//! - Malformed response: the service answered with something unusable
//! - Transport: the transport or codec failed
//!
//! Nothing is retried. Any error aborts the fetch that produced it.

use std::fmt;

use thiserror::Error;

use crate::client::{CodecError, TransportError};
use crate::filters::FilterError;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caller input rejected before any request was made
    InputValidation,
    /// The service reported an exception
    Remote,
    /// The service response did not have the expected shape
    MalformedResponse,
    /// Transport or codec failure
    Transport,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::InputValidation => "INPUT_VALIDATION",
            ErrorClass::Remote => "REMOTE",
            ErrorClass::MalformedResponse => "MALFORMED_RESPONSE",
            ErrorClass::Transport => "TRANSPORT",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Query engine errors
#[derive(Debug, Error)]
pub enum QueryError {
    // ==================
    // Input Validation
    // ==================
    /// Filter expression could not be normalized
    #[error("Invalid filter: {0}")]
    Filter(#[from] FilterError),

    /// Sort descriptor could not be normalized
    #[error("Invalid sort: {0}")]
    InvalidSort(String),

    /// Negative or oversized page, limit or per-page value
    #[error("Invalid paging parameter '{name}': {reason}")]
    InvalidPagingParameter { name: &'static str, reason: String },

    /// Concurrency window must be positive
    #[error("Concurrency must be greater than 0; got {0}")]
    InvalidConcurrency(i64),

    /// RPC call made with the wrong parameter shape
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Client configuration rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ==================
    // Remote
    // ==================
    /// The service answered with `exception: true`
    #[error("Remote error: {0}")]
    Remote(String),

    // ==================
    // Malformed Response
    // ==================
    /// The response lacked the entities list
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    // ==================
    // Transport
    // ==================
    /// Transport failure, propagated unchanged
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Encoding or decoding failure
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// A page fetch worker exited before delivering its result
    #[error("Page fetch task lost before completion")]
    TaskLost,

    /// A page fetch worker thread could not be started
    #[error("Failed to spawn page fetch worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}

impl QueryError {
    /// Create a paging parameter error
    pub fn invalid_paging(name: &'static str, reason: impl Into<String>) -> Self {
        QueryError::InvalidPagingParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Returns the classification of this error
    pub fn class(&self) -> ErrorClass {
        match self {
            QueryError::Filter(_)
            | QueryError::InvalidSort(_)
            | QueryError::InvalidPagingParameter { .. }
            | QueryError::InvalidConcurrency(_)
            | QueryError::InvalidRequest(_)
            | QueryError::InvalidConfig(_) => ErrorClass::InputValidation,

            QueryError::Remote(_) => ErrorClass::Remote,

            QueryError::MalformedResponse(_) => ErrorClass::MalformedResponse,

            QueryError::Transport(_)
            | QueryError::Codec(_)
            | QueryError::TaskLost
            | QueryError::WorkerSpawn(_) => ErrorClass::Transport,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Filter(e) => e.code(),
            QueryError::InvalidSort(_) => "EQ_INVALID_SORT",
            QueryError::InvalidPagingParameter { .. } => "EQ_INVALID_PAGING_PARAMETER",
            QueryError::InvalidConcurrency(_) => "EQ_INVALID_CONCURRENCY",
            QueryError::InvalidRequest(_) => "EQ_INVALID_REQUEST",
            QueryError::InvalidConfig(_) => "EQ_INVALID_CONFIG",
            QueryError::Remote(_) => "EQ_REMOTE",
            QueryError::MalformedResponse(_) => "EQ_MALFORMED_RESPONSE",
            QueryError::Transport(_) => "EQ_TRANSPORT",
            QueryError::Codec(_) => "EQ_CODEC",
            QueryError::TaskLost => "EQ_TASK_LOST",
            QueryError::WorkerSpawn(_) => "EQ_WORKER_SPAWN",
        }
    }

    /// Returns true if the caller's input was rejected
    pub fn is_input_error(&self) -> bool {
        self.class() == ErrorClass::InputValidation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert_eq!(
            QueryError::invalid_paging("per_page", "too large").class(),
            ErrorClass::InputValidation
        );
        assert_eq!(QueryError::InvalidConcurrency(0).class(), ErrorClass::InputValidation);
        assert_eq!(QueryError::Remote("boom".into()).class(), ErrorClass::Remote);
        assert_eq!(
            QueryError::MalformedResponse("no entities".into()).class(),
            ErrorClass::MalformedResponse
        );
        assert_eq!(QueryError::TaskLost.class(), ErrorClass::Transport);
    }

    #[test]
    fn test_filter_error_passes_code_through() {
        let err = QueryError::from(FilterError::UnknownOperator("xor".into()));
        assert_eq!(err.code(), "EQ_UNKNOWN_OPERATOR");
        assert!(err.is_input_error());
    }

    #[test]
    fn test_error_display() {
        let err = QueryError::invalid_paging("page", "must be non-negative: -1");
        let display = err.to_string();
        assert!(display.contains("page"));
        assert!(display.contains("-1"));
    }
}
