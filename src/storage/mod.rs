//! Node-Local State
//!
//! All shared mutable state of a node lives in the structures of this module.
//! They are owned by the node service and injected into it; nothing here is
//! global.
//!
//! ## Components
//! - **`map`**: `ConcurrentMap`, a `HashMap` behind one coarse mutex. The
//!   building block for everything else.
//! - **`local`**: `LocalStore`, the node's own key-value partition.
//! - **`ledger`**: `RequestLedger`, the "seen this request id before?" set
//!   that stops floods from looping.
//! - **`pending`**: `PendingLookupTable`, which hands responses to the
//!   lookup calls waiting on them.

pub mod ledger;
pub mod local;
pub mod map;
pub mod pending;

#[cfg(test)]
mod tests;
