//! Pagination subsystem
//!
//! Turns one [`QuerySpec`](crate::query::QuerySpec) into a sequence of page
//! requests and the replies back into a stream of entities.
//!
//! # Drivers
//!
//! - [`SyncPager`]: one request at a time, stops when the controller is done
//! - [`ConcurrentPager`]: a window of requests in flight, stops at the first
//!   empty page
//!
//! # Invariants
//!
//! - Fetch state is owned by exactly one controller, one per query
//! - The page cursor advances by one for every request built
//! - `done` never reverts once set
//! - Entities are yielded in page order on both drivers

mod concurrent;
mod controller;
mod page;
mod pool;
mod request;
mod state;
mod sync;

pub use concurrent::{validate_concurrency, ConcurrentPager, MAX_CONCURRENCY};
pub use controller::PageFetchController;
pub use page::{Entity, PageResult};
pub use pool::{TaskHandle, TaskPool};
pub use request::{Paging, ReadRequest};
pub use state::{FetchState, PagingParams};
pub use sync::SyncPager;
