//! Compact, time-sortable, mostly-unique 64-bit identifiers for
//! distributed processes, without central coordination.
//!
//! A [`TsId`] packs a 42-bit millisecond timestamp, a 6-bit node ID and a
//! 16-bit counter into a single `u64`, so identifiers sort numerically in
//! generation order. A [`TsIdGenerator`] mints them lock-free from any
//! number of threads; a process-wide default instance is available through
//! [`TsId::generate`].
//!
//! ```
//! use tsid::{TsId, TsIdGenerator};
//!
//! // Explicit generator with a fixed node ID
//! let generator = TsIdGenerator::with_node_id(7);
//! let id = generator.next_id();
//! assert_eq!(id.node_id(), 7);
//!
//! // Canonical string form: fixed-width Crockford base32
//! let s = id.encode();
//! assert_eq!(s.len(), tsid::ENCODED_LEN);
//! assert_eq!(TsId::decode(&s).unwrap(), id);
//!
//! // The raw u64 is the only persisted form
//! let restored = TsId::from_raw(id.to_raw());
//! assert_eq!(restored, id);
//! ```

mod base32;
mod error;
mod generator;
mod id;
mod node;
mod time;

pub use crate::base32::ENCODED_LEN;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::node::*;
pub use crate::time::*;
