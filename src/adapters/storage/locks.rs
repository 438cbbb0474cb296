//! Per-conversation mutual exclusion.
//!
//! Conversation persistence is a read-modify-write over the whole conversation
//! object, so concurrent mutations of the same conversation id would race and
//! lose appends. `ConversationLocks` hands out one async mutex per conversation
//! id; unrelated conversations never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::ConversationId;

/// Registry of per-conversation-id async mutexes.
///
/// Holding the returned guard guarantees at-most-one in-flight mutation for
/// that conversation id. Entries are pruned once no task holds or awaits them.
#[derive(Debug, Default)]
pub struct ConversationLocks {
    locks: Mutex<HashMap<ConversationId, Arc<AsyncMutex<()>>>>,
}

impl ConversationLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the mutex for the given conversation id, waiting if another
    /// task holds it.
    pub async fn acquire(&self, id: ConversationId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().expect("conversation lock registry poisoned");
            // Prune entries nobody holds or awaits anymore.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(
                locks
                    .entry(id)
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };
        lock.lock_owned().await
    }

    /// Number of live lock entries (for tests and diagnostics).
    pub fn len(&self) -> usize {
        self.locks.lock().expect("conversation lock registry poisoned").len()
    }

    /// Returns true when no lock entries are live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn same_id_serializes_critical_sections() {
        let locks = Arc::new(ConversationLocks::new());
        let id = ConversationId::new();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let overlaps = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let in_flight = Arc::clone(&in_flight);
            let overlaps = Arc::clone(&overlaps);
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(id).await;
                if in_flight.fetch_add(1, Ordering::SeqCst) > 0 {
                    overlaps.fetch_add(1, Ordering::SeqCst);
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn different_ids_do_not_block_each_other() {
        let locks = ConversationLocks::new();
        let guard_a = locks.acquire(ConversationId::new()).await;
        // Acquiring a different id must succeed while the first guard is held.
        let guard_b = locks.acquire(ConversationId::new()).await;
        drop(guard_a);
        drop(guard_b);
    }

    #[tokio::test]
    async fn released_entries_are_pruned() {
        let locks = ConversationLocks::new();
        let id = ConversationId::new();

        let guard = locks.acquire(id).await;
        assert_eq!(locks.len(), 1);
        drop(guard);

        // The next acquire prunes the stale entry before inserting its own.
        let _other = locks.acquire(ConversationId::new()).await;
        assert_eq!(locks.len(), 1);
    }
}
