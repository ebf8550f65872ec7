use super::protocol::{Request, Response};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A message travelling between peers.
#[derive(Debug, Clone, PartialEq)]
pub enum PeerMessage {
    Request(Request),
    Response(Response),
}

/// What a node did with an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The request id was already in the ledger; nothing was sent.
    Duplicate,
    /// The key was held locally and a response went straight to the origin.
    Answered,
    /// The key was missing and the request was re-sent to this many peers.
    Forwarded(usize),
}
