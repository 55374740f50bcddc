//! Filter normalization subsystem
//!
//! Every filter the caller hands in, whatever its dialect, leaves this module
//! as a [`LogicalGroup`] in the canonical wire form.
//!
//! # Invariants
//!
//! - The canonical form is a fixed point of normalization
//! - Condition and group order is preserved
//! - Errors are raised before any request is built

mod ast;
mod errors;
mod normalize;

pub use ast::{Condition, FilterNode, LogicalGroup, LogicalOperator};
pub use errors::{FilterError, FilterResult};
pub use normalize::{normalize_filters, FilterNormalizer};
