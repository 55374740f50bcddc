//! `read` method parameters for one page

use serde::Serialize;
use serde_json::Value;

use crate::client::CodecError;
use crate::error::QueryResult;
use crate::query::QuerySpec;

/// Paging block of a `read` request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Paging {
    pub current_page: u32,
    pub entities_per_page: u32,
}

/// Parameters of one `read` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadRequest {
    #[serde(flatten)]
    pub query: QuerySpec,
    pub paging: Paging,
    /// Ask the service for the total entity count
    pub return_paging_info: bool,
}

impl ReadRequest {
    pub fn page(&self) -> u32 {
        self.paging.current_page
    }

    /// Method parameters as sent on the wire
    pub fn to_value(&self) -> QueryResult<Value> {
        Ok(serde_json::to_value(self).map_err(CodecError::from)?)
    }
}
