//! RPC client
//!
//! Every remote method goes through one endpoint with the envelope
//!
//! ```json
//! {"method_name": "read", "params": [{"script_name": "...", "script_key": "..."}, {...}]}
//! ```
//!
//! The credentials block is present only on authenticated calls, and the
//! method parameters only for methods that take them (everything but `info`).

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{QueryError, QueryResult};
use crate::wire::is_truthy;

use super::codec::{Codec, CodecError, JsonCodec};
use super::config::ClientConfig;
use super::transport::Transport;

/// Decoded reply of one RPC call
#[derive(Debug, Clone, PartialEq)]
pub enum RpcReply {
    /// JSON reply: the `results` member when present, else the whole document
    Json(Value),
    /// Non-JSON content type, returned unparsed
    Text(String),
}

impl RpcReply {
    /// The reply as a JSON value; text replies become a JSON string
    pub fn into_value(self) -> Value {
        match self {
            RpcReply::Json(value) => value,
            RpcReply::Text(text) => Value::String(text),
        }
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    script_name: &'a str,
    script_key: &'a str,
}

#[derive(Serialize)]
struct Envelope<'a> {
    method_name: &'a str,
    params: Vec<Value>,
}

/// Handle to the remote service.
///
/// Cloning is cheap; clones share the transport and codec.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    endpoint: Arc<str>,
    transport: Arc<dyn Transport>,
    codec: Arc<dyn Codec>,
}

impl Client {
    /// Create a client using the JSON codec
    pub fn new(config: ClientConfig, transport: impl Transport + 'static) -> QueryResult<Self> {
        config.validate()?;
        let endpoint = Arc::from(config.endpoint());
        Ok(Self {
            config: Arc::new(config),
            endpoint,
            transport: Arc::new(transport),
            codec: Arc::new(JsonCodec),
        })
    }

    /// Replace the codec
    pub fn with_codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Make a raw RPC call.
    ///
    /// `info` takes no parameters; every other method requires them.
    pub fn call(
        &self,
        method_name: &str,
        method_params: Option<Value>,
        authenticate: bool,
    ) -> QueryResult<RpcReply> {
        match (method_name, &method_params) {
            ("info", Some(_)) => {
                return Err(QueryError::InvalidRequest("info takes no params".into()))
            }
            (name, None) if name != "info" => {
                return Err(QueryError::InvalidRequest(format!("{} takes params", name)))
            }
            _ => {}
        }

        let mut params = Vec::with_capacity(2);
        if authenticate {
            params.push(serde_json::to_value(Credentials {
                script_name: &self.config.script_name,
                script_key: &self.config.api_key,
            })
            .map_err(CodecError::from)?);
        }
        if let Some(method_params) = method_params {
            params.push(method_params);
        }

        let envelope = serde_json::to_value(Envelope {
            method_name,
            params,
        })
        .map_err(CodecError::from)?;
        let body = self.codec.encode(&envelope)?;

        debug!(method = method_name, endpoint = %self.endpoint, bytes = body.len(), "RPC call");
        let response = self.transport.post(&self.endpoint, body)?;

        let content_type = response
            .content_type
            .as_deref()
            .unwrap_or("application/json")
            .to_lowercase();
        if !(content_type.starts_with("application/json")
            || content_type.starts_with("text/javascript"))
        {
            debug!(method = method_name, content_type = %content_type, "Non-JSON reply");
            return Ok(RpcReply::Text(response.body));
        }

        let decoded = self.codec.decode(response.body.as_bytes())?;

        if decoded.get("exception").map_or(false, is_truthy) {
            let message = match decoded.get("message") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => "unknown error".to_string(),
            };
            warn!(method = method_name, message = %message, "Remote exception");
            return Err(QueryError::Remote(message));
        }

        match decoded.get("results") {
            Some(results) if is_truthy(results) => Ok(RpcReply::Json(results.clone())),
            _ => Ok(RpcReply::Json(decoded)),
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .field("records_per_page", &self.config.records_per_page)
            .finish()
    }
}
