//! entity-query - client-side query engine for a paged entity RPC service
//!
//! Filters in any of the accepted dialects are normalized into one
//! canonical condition tree, then fetched page by page, either sequentially
//! or with a bounded window of concurrent requests.
//!
//! ```no_run
//! use entity_query::{Client, ClientConfig, FindRequest, Transport};
//! use serde_json::json;
//!
//! fn shots(transport: impl Transport + 'static) -> entity_query::QueryResult<()> {
//!     let client = Client::new(
//!         ClientConfig::new("https://studio.example.com", "pipeline", "key"),
//!         transport,
//!     )?;
//!
//!     let request = FindRequest::new("Shot", json!([["sg_status_list", "is", "ip"]]))
//!         .with_fields(["code"])
//!         .with_concurrency(4);
//!
//!     for shot in client.find_iter(request)? {
//!         println!("{}", shot?["code"]);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod filters;
pub mod order;
pub mod paging;
pub mod query;
pub mod wire;

pub use client::{Client, ClientConfig, Codec, JsonCodec, RpcReply, Transport, TransportResponse};
pub use error::{ErrorClass, QueryError, QueryResult};
pub use filters::{Condition, FilterNode, LogicalGroup, LogicalOperator};
pub use order::{SortDirection, SortSpec};
pub use paging::Entity;
pub use query::{Entities, EntityStream, FindRequest, QuerySpec};
