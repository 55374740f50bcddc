//! RPC client subsystem
//!
//! Talks to the service's single JSON-RPC style endpoint. HTTP itself is
//! delegated to a [`Transport`]; bytes on the wire are produced by a
//! [`Codec`] (JSON unless replaced).

mod codec;
mod config;
mod rpc;
mod transport;

pub use codec::{Codec, CodecError, JsonCodec};
pub use config::{ClientConfig, MAX_PER_PAGE};
pub use rpc::{Client, RpcReply};
pub use transport::{Transport, TransportError, TransportResponse};
