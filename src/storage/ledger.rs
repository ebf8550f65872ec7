use super::map::ConcurrentMap;
use std::time::{Duration, Instant};

/// Record of every request id this node has already processed.
///
/// A flooded request can reach the same node over several paths (or loop
/// back around a cycle). The first arrival wins; every later copy is
/// dropped. Entries remember when they were first seen so a long-running
/// node can forget ids whose flood has long since died out.
pub struct RequestLedger {
    seen: ConcurrentMap<String, Instant>,
    retention: Option<Duration>,
}

impl RequestLedger {
    /// Ledger that never forgets.
    pub fn new() -> Self {
        Self::with_retention(None)
    }

    /// Ledger whose entries become eligible for [`prune`](Self::prune) once
    /// they are older than `retention`. `None` keeps them forever.
    pub fn with_retention(retention: Option<Duration>) -> Self {
        Self {
            seen: ConcurrentMap::new(),
            retention,
        }
    }

    /// Atomically marks `id` as seen. Returns `true` only for the first
    /// caller to observe it.
    pub fn record_if_new(&self, id: &str) -> bool {
        self.seen.insert_if_absent(id.to_string(), Instant::now())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.exists(&id.to_string())
    }

    /// Forgets ids recorded more than `retention` ago. Returns the number
    /// of evicted entries; always 0 when retention is disabled.
    pub fn prune(&self) -> usize {
        let Some(retention) = self.retention else {
            return 0;
        };
        let now = Instant::now();
        self.seen
            .retain(|_, first_seen| now.duration_since(*first_seen) < retention)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl Default for RequestLedger {
    fn default() -> Self {
        Self::new()
    }
}
