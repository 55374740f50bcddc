//! Query facade
//!
//! Public find API on [`Client`](crate::client::Client):
//!
//! - `find_iter`: lazy stream, sequential or concurrent
//! - `find`: materialized list for sequential finds, stream for concurrent
//! - `find_one`: first match only
//! - `info`: unauthenticated server information

mod facade;
mod request;
mod spec;
mod stream;

pub use request::FindRequest;
pub use spec::{QuerySpec, ReturnOnly};
pub use stream::{Entities, EntitiesIter, EntityStream};
