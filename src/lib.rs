//! Flood-Search Overlay Node Library
//!
//! This library crate defines the modules that make up a node of an
//! unstructured overlay network. It serves as the foundation for the binary
//! executable (`main.rs`).
//!
//! Each node owns a private key-value partition. Lookups for keys held
//! elsewhere are flooded to statically configured peers and resolved by
//! whichever node holds the value, or fail after a fixed timeout. There is no
//! central directory and no replication.
//!
//! ## Modules
//! - **`node`**: The flood-search protocol (`FloodNode`), its peer transport,
//!   and the HTTP surface.
//! - **`storage`**: Node-local state: the coarse-locked `ConcurrentMap`, the
//!   local store, the request-id ledger, and the pending-lookup table.
//! - **`config`**: Command-line parsing into a `NodeConfig`.
//! - **`error`**: Typed errors for lookups and configuration.

pub mod config;
pub mod error;
pub mod node;
pub mod storage;
