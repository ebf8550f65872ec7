//! Flood-Search Node Module
//!
//! A node in an unstructured overlay. It owns a private key-value partition
//! and answers lookups for keys it does not hold by flooding a request to its
//! statically configured peers. Whichever node holds the key answers the
//! originator directly; if nobody answers in time the lookup fails.
//!
//! ## Core Mechanisms
//! - **Flooding**: A miss is re-broadcast, unchanged, to every peer in the routing table.
//! - **Deduplication**: Each node processes a request id at most once, which bounds the
//!   flood and makes cyclic peer graphs safe.
//! - **Correlation**: Responses are matched to waiting lookups by key; the first one wins
//!   and anything after a timeout is dropped.
//!
//! ## Submodules
//! - **`service`**: `FloodNode`, the protocol state machine.
//! - **`transport`**: The fire-and-forget send seam and its HTTP implementation.
//! - **`handlers`** / **`server`**: The axum surface and node lifecycle.
//! - **`protocol`** / **`types`**: Wire messages and shared types.

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod service;
pub mod transport;
pub mod types;
