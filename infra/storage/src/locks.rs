use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

/// Opt-in per-name serialization of mutations.
///
/// When disabled, [`NameLocks::acquire`] hands out nothing and same-name mutations
/// race between their existence check and their write.
#[derive(Debug, Default)]
pub(crate) struct NameLocks {
    enabled: bool,
    slots: Mutex<FxHashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

/// Held for the duration of one mutation; releases its map slot on drop once unused.
#[derive(Debug)]
pub(crate) struct NameGuard<'a> {
    locks: &'a NameLocks,
    name: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl NameLocks {
    pub(crate) fn new(enabled: bool) -> Self {
        Self { enabled, slots: Mutex::default() }
    }

    pub(crate) async fn acquire(&self, name: &str) -> Option<NameGuard<'_>> {
        if !self.enabled {
            return None;
        }

        let slot = Arc::clone(self.slots.lock().entry(name.to_owned()).or_default());
        let guard = slot.lock_owned().await;

        Some(NameGuard { locks: self, name: name.to_owned(), guard: Some(guard) })
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots.lock().len()
    }
}

impl Drop for NameGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut slots = self.locks.slots.lock();
        // Only the map itself still references the mutex: nobody is waiting.
        if slots.get(&self.name).is_some_and(|slot| Arc::strong_count(slot) == 1) {
            slots.remove(&self.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn disabled_locks_hand_out_nothing() {
        let locks = NameLocks::new(false);
        assert!(locks.acquire("foo").await.is_none());
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn slots_are_released_after_use() {
        let locks = NameLocks::new(true);
        {
            let _a = locks.acquire("foo").await;
            let _b = locks.acquire("bar").await;
            assert_eq!(locks.len(), 2);
        }
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn same_name_is_exclusive() {
        let locks = Arc::new(NameLocks::new(true));
        let first = locks.acquire("foo").await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire("foo").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!contender.is_finished());

        drop(first);
        contender.await.unwrap();
        assert_eq!(locks.len(), 0);
    }
}
