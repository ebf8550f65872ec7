//! Flood-Search Node
//!
//! `FloodNode` ties the local state together with the transport and runs the
//! lookup protocol.
//!
//! ## Lookup (originating side)
//! 1. A local hit returns immediately; nothing is sent or recorded.
//! 2. On a miss the caller registers a waiter for the key, mints a fresh
//!    request id, records it in its own ledger (so the request is dropped if
//!    the topology routes it back here) and broadcasts it to every peer.
//!    Concurrent waiters for the same key share one table entry, so the first
//!    response completes all of them, but each still floods its own request.
//! 3. The caller waits on its waiter with a fixed timeout. On timeout it
//!    withdraws the waiter so a late response cannot complete it.
//!
//! ## Inbound request
//! Dedup on the request id, then either answer the origin directly (key held
//! here) or re-broadcast the request unchanged to this node's own peers.
//!
//! ## Inbound response
//! Hand the value to whoever is waiting on the key. If nobody is, the
//! response is stale or spurious and is dropped.

use super::protocol::{Request, Response};
use super::transport::PeerTransport;
use super::types::{NodeId, PeerMessage, RequestOutcome};
use crate::config::NodeConfig;
use crate::error::LookupError;
use crate::storage::ledger::RequestLedger;
use crate::storage::local::LocalStore;
use crate::storage::pending::PendingLookupTable;

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub struct FloodNode {
    pub id: NodeId,
    addr: String,
    routing_table: Vec<String>,
    store: LocalStore,
    ledger: RequestLedger,
    pending: PendingLookupTable,
    transport: Arc<dyn PeerTransport>,
    lookup_timeout: Duration,
}

impl FloodNode {
    pub fn new(config: NodeConfig, transport: Arc<dyn PeerTransport>) -> Arc<Self> {
        Arc::new(Self {
            id: NodeId::new(),
            addr: config.addr,
            routing_table: config.routing_table,
            store: LocalStore::with_seed(config.data),
            ledger: RequestLedger::with_retention(config.ledger_retention),
            pending: PendingLookupTable::new(),
            transport,
            lookup_timeout: config.lookup_timeout,
        })
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn routing_table(&self) -> &[String] {
        &self.routing_table
    }

    /// Resolves `key` locally or through the overlay.
    ///
    /// Fails with [`LookupError::Timeout`] when no answer reaches this node
    /// within the lookup timeout.
    pub async fn lookup(&self, key: &str) -> Result<String, LookupError> {
        if let Some(value) = self.store.get(key) {
            tracing::debug!("Lookup '{}' resolved locally", key);
            return Ok(value);
        }

        let mut registration = self.pending.register(key);

        let request = Request {
            id: Uuid::new_v4().to_string(),
            resource_id: key.to_string(),
            origin: self.addr.clone(),
        };
        self.ledger.record_if_new(&request.id);

        let sent = self.broadcast(&request);
        tracing::debug!(
            "Lookup '{}' missed locally, broadcast {} to {} peers{}",
            key,
            request.id,
            sent,
            if registration.first { "" } else { " (joined pending lookup)" }
        );

        match tokio::time::timeout(self.lookup_timeout, &mut registration.receiver).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(_)) => Err(LookupError::Abandoned {
                key: key.to_string(),
            }),
            Err(_) => {
                if self.pending.remove_waiter(key, registration.waiter).is_some() {
                    tracing::warn!("Lookup '{}' timed out after {:?}", key, self.lookup_timeout);
                    return Err(LookupError::Timeout {
                        key: key.to_string(),
                        after: self.lookup_timeout,
                    });
                }

                // A response completed the waiter between the timer firing
                // and the withdrawal; its value is already in the channel.
                registration
                    .receiver
                    .try_recv()
                    .map_err(|_| LookupError::Abandoned {
                        key: key.to_string(),
                    })
            }
        }
    }

    /// Processes a request flooded to this node.
    pub fn handle_request(&self, request: Request) -> RequestOutcome {
        if !self.ledger.record_if_new(&request.id) {
            tracing::debug!("Dropping duplicate request {}", request.id);
            return RequestOutcome::Duplicate;
        }

        if let Some(value) = self.store.get(&request.resource_id) {
            tracing::debug!(
                "Request {} hit '{}', answering {}",
                request.id,
                request.resource_id,
                request.origin
            );
            let origin = request.origin.clone();
            self.transport.send(
                &origin,
                PeerMessage::Response(Response {
                    request,
                    body: value,
                }),
            );
            return RequestOutcome::Answered;
        }

        let sent = self.broadcast(&request);
        tracing::debug!(
            "Request {} missed '{}', forwarded to {} peers",
            request.id,
            request.resource_id,
            sent
        );
        RequestOutcome::Forwarded(sent)
    }

    /// Processes a response addressed to this node. Returns whether it
    /// completed a pending lookup.
    pub fn handle_response(&self, response: Response) -> bool {
        let key = response.request.resource_id;
        let delivered = self.pending.complete_and_remove(&key, response.body);

        if delivered {
            tracing::debug!("Response {} resolved '{}'", response.request.id, key);
        } else {
            tracing::debug!(
                "Dropping response {} for '{}': no pending lookup",
                response.request.id,
                key
            );
        }
        delivered
    }

    /// Writes to this node's partition only. Never propagated.
    pub fn put(&self, key: String, value: String) {
        tracing::debug!("PUT '{}'", key);
        self.store.put(key, value);
    }

    /// Removes from this node's partition only. Never propagated.
    pub fn delete(&self, key: &str) {
        tracing::debug!("DELETE '{}'", key);
        self.store.delete(key);
    }

    pub fn get_local(&self, key: &str) -> Option<String> {
        self.store.get(key)
    }

    /// Forgets request ids older than the ledger retention.
    pub fn prune_ledger(&self) -> usize {
        self.ledger.prune()
    }

    pub fn has_seen(&self, request_id: &str) -> bool {
        self.ledger.contains(request_id)
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.is_pending(key)
    }

    pub fn local_entry_count(&self) -> usize {
        self.store.len()
    }

    pub fn ledger_size(&self) -> usize {
        self.ledger.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Sends `request` to every peer in the routing table. Returns the
    /// number of sends issued.
    fn broadcast(&self, request: &Request) -> usize {
        for addr in &self.routing_table {
            self.transport
                .send(addr, PeerMessage::Request(request.clone()));
        }
        self.routing_table.len()
    }
}
