//! Pending Lookup Table
//!
//! Correlates responses arriving on the HTTP side with the lookup calls
//! awaiting them. Each key has at most one entry; concurrent lookups for the
//! same key share that entry as separate waiters and are all completed by
//! the first response.
//!
//! Completion goes through `tokio::sync::oneshot`, whose sender is consumed
//! on send, so a waiter can be completed at most once. Whichever path gets
//! to the sender first (a response, or the waiter's own timeout) removes it
//! from the table; the other path finds nothing and does nothing.

use super::map::ConcurrentMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::oneshot;

/// Identifies one caller waiting on a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaiterId(u64);

/// Handle returned to a caller that registered interest in a key.
pub struct Registration {
    pub waiter: WaiterId,
    pub receiver: oneshot::Receiver<String>,
    /// `true` when this call created the entry; later callers joined an
    /// in-flight lookup.
    pub first: bool,
}

type Waiters = Vec<(WaiterId, oneshot::Sender<String>)>;

pub struct PendingLookupTable {
    entries: ConcurrentMap<String, Waiters>,
    next_waiter: AtomicU64,
}

impl PendingLookupTable {
    pub fn new() -> Self {
        Self {
            entries: ConcurrentMap::new(),
            next_waiter: AtomicU64::new(1),
        }
    }

    /// Adds a waiter for `key`, creating the entry if none is pending.
    pub fn register(&self, key: &str) -> Registration {
        let waiter = WaiterId(self.next_waiter.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = oneshot::channel();

        let first = self.entries.update(key.to_string(), |slot| {
            if let Some(waiters) = slot {
                waiters.push((waiter, sender));
                return false;
            }
            *slot = Some(vec![(waiter, sender)]);
            true
        });

        Registration {
            waiter,
            receiver,
            first,
        }
    }

    /// Removes the entry for `key` and delivers `value` to every waiter.
    /// Returns `false` when nothing was pending (stale or spurious response).
    pub fn complete_and_remove(&self, key: &str, value: String) -> bool {
        let Some(waiters) = self.entries.take(&key.to_string()) else {
            return false;
        };

        for (waiter, sender) in waiters {
            if sender.send(value.clone()).is_err() {
                tracing::debug!("Waiter {:?} for '{}' already gone", waiter, key);
            }
        }
        true
    }

    /// Withdraws a single waiter, used when its timeout fires. The entry
    /// itself disappears once its last waiter is withdrawn.
    ///
    /// Returns the waiter's sender if it was still pending; `None` means a
    /// response already completed it.
    pub fn remove_waiter(&self, key: &str, waiter: WaiterId) -> Option<oneshot::Sender<String>> {
        self.entries.update(key.to_string(), |slot| {
            let waiters = slot.as_mut()?;
            let position = waiters.iter().position(|(id, _)| *id == waiter)?;
            let (_, sender) = waiters.swap_remove(position);
            if waiters.is_empty() {
                *slot = None;
            }
            Some(sender)
        })
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.entries.exists(&key.to_string())
    }

    /// Number of keys with at least one waiter.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PendingLookupTable {
    fn default() -> Self {
        Self::new()
    }
}
