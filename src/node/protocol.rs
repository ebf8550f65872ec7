//! Node Network Protocol
//!
//! Defines the HTTP endpoints and the JSON bodies exchanged on them, both
//! between peers (`/request`, `/response`) and with clients (`/get`, `/put`,
//! `/delete`).

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Peer endpoint receiving flooded lookup requests.
pub const ENDPOINT_REQUEST: &str = "/request";
/// Peer endpoint receiving answers, unicast to the request's origin.
pub const ENDPOINT_RESPONSE: &str = "/response";
/// Client endpoint resolving a key through the overlay.
pub const ENDPOINT_GET: &str = "/get";
/// Client endpoint writing to this node's own partition.
pub const ENDPOINT_PUT: &str = "/put";
/// Client endpoint removing a key from this node's own partition.
pub const ENDPOINT_DELETE: &str = "/delete";

// --- Peer Messages ---

/// A lookup flooding through the overlay.
///
/// `origin` is the address of the node that started the lookup. It is
/// carried unchanged through every hop so the holder can answer the origin
/// directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Request {
    /// Globally unique id (UUID v4) used for deduplication.
    pub id: String,
    pub resource_id: String,
    pub origin: String,
}

/// Answer to a [`Request`], sent only to its origin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Response {
    #[serde(flatten)]
    pub request: Request,
    /// The resolved value.
    pub body: String,
}

// --- Client DTOs ---

#[derive(Debug, Serialize, Deserialize)]
pub struct GetRequest {
    pub resource_id: String,
}

/// Result of a client lookup. `resource` is absent when the lookup failed.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetResponse {
    pub resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PutRequest {
    pub resource_id: String,
    pub resource: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub resource_id: String,
}
