//! Transport seam
//!
//! Connection handling, TLS, headers and timeouts belong to the transport.
//! The engine only needs one blocking POST.

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

/// Raw HTTP response handed back by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// `Content-Type` header, if the server sent one
    pub content_type: Option<String>,
    /// Response body as text
    pub body: String,
}

impl TransportResponse {
    pub fn new(content_type: Option<String>, body: impl Into<String>) -> Self {
        Self {
            content_type,
            body: body.into(),
        }
    }

    /// A JSON response
    pub fn json(body: impl Into<String>) -> Self {
        Self::new(Some("application/json".to_string()), body)
    }
}

/// Failure reported by a transport
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error, keeping it as the source
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Blocking request/response transport.
///
/// Implementations are shared across page fetch workers, so they must be
/// `Send + Sync`.
pub trait Transport: Send + Sync {
    /// POST `body` to `endpoint` and return the response
    fn post(&self, endpoint: &str, body: Vec<u8>) -> Result<TransportResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn post(&self, endpoint: &str, body: Vec<u8>) -> Result<TransportResponse, TransportError> {
        (**self).post(endpoint, body)
    }
}
