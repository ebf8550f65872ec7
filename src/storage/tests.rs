//! Storage Module Tests
//!
//! Validates the node-local state containers in isolation.
//!
//! ## Test Scopes
//! - **ConcurrentMap**: Basic CRUD plus the atomic compound operations.
//! - **LocalStore**: Seeding, overwrite and delete semantics.
//! - **RequestLedger**: First-observer wins, including under contention; retention pruning.
//! - **PendingLookupTable**: Exactly-once completion and the timeout/response race.

#[cfg(test)]
mod tests {
    use crate::storage::ledger::RequestLedger;
    use crate::storage::local::LocalStore;
    use crate::storage::map::ConcurrentMap;
    use crate::storage::pending::PendingLookupTable;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // ============================================================
    // CONCURRENT MAP TESTS
    // ============================================================

    #[test]
    fn test_map_put_get_delete() {
        let map: ConcurrentMap<String, u32> = ConcurrentMap::new();

        assert_eq!(map.get(&"a".to_string()), None);
        assert!(!map.exists(&"a".to_string()));

        map.put("a".to_string(), 1);
        assert_eq!(map.get(&"a".to_string()), Some(1));
        assert!(map.exists(&"a".to_string()));

        // Overwrite returns the displaced value
        assert_eq!(map.put("a".to_string(), 2), Some(1));
        assert_eq!(map.get(&"a".to_string()), Some(2));

        map.delete(&"a".to_string());
        assert!(!map.exists(&"a".to_string()));

        // Deleting a missing key is a no-op
        map.delete(&"a".to_string());
        assert!(map.is_empty());
    }

    #[test]
    fn test_map_insert_if_absent_only_first_wins() {
        let map: ConcurrentMap<&str, &str> = ConcurrentMap::new();

        assert!(map.insert_if_absent("k", "first"));
        assert!(!map.insert_if_absent("k", "second"));
        assert_eq!(map.get(&"k"), Some("first"));
    }

    #[test]
    fn test_map_take_removes_entry() {
        let map: ConcurrentMap<u32, String> = ConcurrentMap::new();
        map.put(7, "seven".to_string());

        assert_eq!(map.take(&7), Some("seven".to_string()));
        assert_eq!(map.take(&7), None);
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_map_update_can_insert_mutate_and_clear() {
        let map: ConcurrentMap<&str, Vec<u32>> = ConcurrentMap::new();

        map.update("k", |slot| *slot = Some(vec![1]));
        map.update("k", |slot| {
            if let Some(v) = slot.as_mut() {
                v.push(2);
            }
        });
        assert_eq!(map.get(&"k"), Some(vec![1, 2]));

        map.update("k", |slot| *slot = None);
        assert!(!map.exists(&"k"));
    }

    #[test]
    fn test_map_retain_reports_removed_count() {
        let map: ConcurrentMap<u32, u32> = (0..10).map(|i| (i, i)).collect();

        let removed = map.retain(|_, v| v % 2 == 0);
        assert_eq!(removed, 5);
        assert_eq!(map.len(), 5);
    }

    // ============================================================
    // LOCAL STORE TESTS
    // ============================================================

    #[test]
    fn test_local_store_seed_and_mutation() {
        let mut seed = HashMap::new();
        seed.insert("key".to_string(), "42".to_string());

        let store = LocalStore::with_seed(seed);
        assert_eq!(store.get("key"), Some("42".to_string()));
        assert_eq!(store.len(), 1);

        store.put("a".to_string(), "1".to_string());
        store.put("a".to_string(), "2".to_string());
        assert_eq!(store.get("a"), Some("2".to_string()));

        store.delete("a");
        assert!(!store.contains("a"));
        assert!(store.contains("key"));
    }

    // ============================================================
    // REQUEST LEDGER TESTS
    // ============================================================

    #[test]
    fn test_ledger_records_once() {
        let ledger = RequestLedger::new();

        assert!(ledger.record_if_new("req-1"));
        assert!(!ledger.record_if_new("req-1"));
        assert!(ledger.record_if_new("req-2"));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_ledger_single_winner_under_contention() {
        let ledger = Arc::new(RequestLedger::new());
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let ledger = ledger.clone();
                let winners = winners.clone();
                std::thread::spawn(move || {
                    if ledger.record_if_new("contended") {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ledger_without_retention_never_prunes() {
        let ledger = RequestLedger::new();
        ledger.record_if_new("req-1");

        assert_eq!(ledger.prune(), 0);
        assert!(ledger.contains("req-1"));
    }

    #[test]
    fn test_ledger_prunes_expired_entries() {
        let ledger = RequestLedger::with_retention(Some(Duration::from_millis(20)));
        ledger.record_if_new("old");
        std::thread::sleep(Duration::from_millis(40));
        ledger.record_if_new("fresh");

        assert_eq!(ledger.prune(), 1);
        assert!(!ledger.contains("old"));
        assert!(ledger.contains("fresh"));
    }

    // ============================================================
    // PENDING LOOKUP TABLE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_pending_complete_delivers_value() {
        let table = PendingLookupTable::new();
        let registration = table.register("key");
        assert!(registration.first);
        assert!(table.is_pending("key"));

        assert!(table.complete_and_remove("key", "42".to_string()));
        assert!(!table.is_pending("key"));

        assert_eq!(registration.receiver.await.unwrap(), "42");
    }

    #[test]
    fn test_pending_complete_without_entry_is_noop() {
        let table = PendingLookupTable::new();
        assert!(!table.complete_and_remove("missing", "x".to_string()));
    }

    #[tokio::test]
    async fn test_pending_second_response_is_noop() {
        let table = PendingLookupTable::new();
        let registration = table.register("key");

        assert!(table.complete_and_remove("key", "first".to_string()));
        assert!(!table.complete_and_remove("key", "second".to_string()));

        assert_eq!(registration.receiver.await.unwrap(), "first");
    }

    #[test]
    fn test_pending_response_after_withdrawal_is_noop() {
        let table = PendingLookupTable::new();
        let registration = table.register("key");

        let sender = table.remove_waiter("key", registration.waiter);
        assert!(sender.is_some());
        assert!(table.is_empty());

        // The late response finds nothing to complete
        assert!(!table.complete_and_remove("key", "late".to_string()));
        // And withdrawing twice is harmless
        assert!(table.remove_waiter("key", registration.waiter).is_none());
    }

    #[tokio::test]
    async fn test_pending_withdraw_after_completion_returns_none() {
        let table = PendingLookupTable::new();
        let mut registration = table.register("key");

        table.complete_and_remove("key", "v".to_string());

        assert!(table.remove_waiter("key", registration.waiter).is_none());
        assert_eq!(registration.receiver.try_recv().unwrap(), "v");
    }

    #[tokio::test]
    async fn test_pending_concurrent_waiters_share_entry() {
        let table = PendingLookupTable::new();
        let first = table.register("key");
        let second = table.register("key");

        assert!(first.first);
        assert!(!second.first);
        assert_eq!(table.len(), 1);

        assert!(table.complete_and_remove("key", "shared".to_string()));
        assert_eq!(first.receiver.await.unwrap(), "shared");
        assert_eq!(second.receiver.await.unwrap(), "shared");
    }

    #[tokio::test]
    async fn test_pending_withdrawing_one_waiter_keeps_others() {
        let table = PendingLookupTable::new();
        let first = table.register("key");
        let second = table.register("key");

        assert!(table.remove_waiter("key", first.waiter).is_some());
        assert!(table.is_pending("key"));

        assert!(table.complete_and_remove("key", "v".to_string()));
        assert_eq!(second.receiver.await.unwrap(), "v");
    }
}
