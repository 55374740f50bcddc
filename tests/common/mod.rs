//! In-memory stand-in for the remote entity service.
//!
//! Serves `count` entities of whatever type is asked for, honouring the
//! paging block of each `read` request, and records every request and the
//! size of every page it answered.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use entity_query::client::TransportError;
use entity_query::{Client, ClientConfig, Transport, TransportResponse};
use serde_json::{json, Value};

/// How the service misbehaves on a given page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The transport itself fails
    Transport,
    /// The reply has no `entities` list
    Malformed,
    /// The service reports an exception
    Remote,
}

pub struct MockService {
    count: usize,
    failure: Option<(u64, Failure)>,
    stagger: bool,
    reads: Mutex<Vec<Value>>,
    envelopes: Mutex<Vec<Value>>,
    page_sizes: Mutex<Vec<usize>>,
}

impl MockService {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            failure: None,
            stagger: false,
            reads: Mutex::new(Vec::new()),
            envelopes: Mutex::new(Vec::new()),
            page_sizes: Mutex::new(Vec::new()),
        }
    }

    /// Misbehave when asked for `page`
    pub fn failing_on(mut self, page: u64, failure: Failure) -> Self {
        self.failure = Some((page, failure));
        self
    }

    /// Answer early pages slower than later ones, so concurrent requests
    /// complete out of order
    pub fn staggered(mut self) -> Self {
        self.stagger = true;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Method params of every `read` call, in arrival order
    pub fn reads(&self) -> Vec<Value> {
        self.reads.lock().unwrap().clone()
    }

    /// Whole request envelopes, in arrival order
    pub fn envelopes(&self) -> Vec<Value> {
        self.envelopes.lock().unwrap().clone()
    }

    pub fn read_count(&self) -> usize {
        self.reads.lock().unwrap().len()
    }

    /// Pages requested, sorted (concurrent requests arrive in any order)
    pub fn pages_requested(&self) -> Vec<u64> {
        let mut pages: Vec<u64> = self
            .reads()
            .iter()
            .map(|r| r["paging"]["current_page"].as_u64().unwrap())
            .collect();
        pages.sort_unstable();
        pages
    }

    /// Number of entities in each answered page, in answer order
    pub fn page_sizes(&self) -> Vec<usize> {
        self.page_sizes.lock().unwrap().clone()
    }

    fn read(&self, params: &Value) -> Result<TransportResponse, TransportError> {
        let page = params["paging"]["current_page"].as_u64().unwrap();
        let per_page = params["paging"]["entities_per_page"].as_u64().unwrap() as usize;

        if self.stagger {
            thread::sleep(Duration::from_millis(10 * 6u64.saturating_sub(page.min(6))));
        }

        match self.failure {
            Some((p, Failure::Transport)) if p == page => {
                return Err(TransportError::new("connection reset by peer"));
            }
            Some((p, Failure::Malformed)) if p == page => {
                return Ok(TransportResponse::json(
                    json!({"results": {"rows": []}}).to_string(),
                ));
            }
            Some((p, Failure::Remote)) if p == page => {
                return Ok(TransportResponse::json(
                    json!({"exception": true, "message": "read failed"}).to_string(),
                ));
            }
            _ => {}
        }

        let start = ((page as usize - 1) * per_page).min(self.count);
        let end = (start + per_page).min(self.count);
        let entities: Vec<Value> = (start..end)
            .map(|i| json!({"type": params["type"], "id": i + 1}))
            .collect();
        self.page_sizes.lock().unwrap().push(entities.len());

        let mut results = json!({"entities": entities});
        if params["return_paging_info"] == json!(true) {
            results["paging_info"] = json!({"entity_count": self.count});
        }

        Ok(TransportResponse::json(json!({"results": results}).to_string()))
    }
}

impl Transport for MockService {
    fn post(&self, _endpoint: &str, body: Vec<u8>) -> Result<TransportResponse, TransportError> {
        let envelope: Value = serde_json::from_slice(&body).unwrap();
        self.envelopes.lock().unwrap().push(envelope.clone());

        match envelope["method_name"].as_str() {
            Some("info") => Ok(TransportResponse::json(
                json!({"version": [8, 0, 0], "s3_uploads_enabled": true}).to_string(),
            )),
            Some("read") => {
                let params = envelope["params"][1].clone();
                self.reads.lock().unwrap().push(params.clone());
                self.read(&params)
            }
            other => Err(TransportError::new(format!("unexpected method {:?}", other))),
        }
    }
}

pub fn client(service: &Arc<MockService>) -> Client {
    Client::new(
        ClientConfig::new("https://studio.example.com", "pipeline", "secret"),
        Arc::clone(service),
    )
    .unwrap()
}

/// Entity ids, in yielded order
pub fn ids(entities: &[entity_query::Entity]) -> Vec<u64> {
    entities.iter().map(|e| e["id"].as_u64().unwrap()).collect()
}
