use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, trace};
use voucher_core::store::Result;
use voucher_core::{Admission, DedupKey, DedupStore};

/// A dedup store backed by a Moka future cache.
///
/// The cache is built without a capacity bound or expiry: evicting a key
/// would let the same code be accepted twice.
#[derive(Debug, Clone)]
pub struct MokaDedupStore {
    cache: Cache<String, ()>,
}

impl MokaDedupStore {
    pub fn new() -> Self {
        Self {
            cache: Cache::builder().build(),
        }
    }

    /// Creates a store whose internal tables are pre-sized for `capacity` keys.
    pub fn with_initial_capacity(capacity: usize) -> Self {
        Self {
            cache: Cache::builder().initial_capacity(capacity).build(),
        }
    }
}

impl Default for MokaDedupStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DedupStore for MokaDedupStore {
    async fn check_and_insert(&self, key: &DedupKey) -> Result<Admission> {
        trace!(key = %key, "Check-and-insert in Moka cache");

        // The entry API coalesces concurrent inserts for the same key; only
        // the caller whose value was stored sees a fresh entry.
        let entry = self
            .cache
            .entry(key.as_str().to_owned())
            .or_insert(())
            .await;

        if entry.is_fresh() {
            debug!(key = %key, "Recorded new key in Moka");
            Ok(Admission::Accepted)
        } else {
            trace!(key = %key, "Key already present in Moka");
            Ok(Admission::Duplicate)
        }
    }

    async fn contains(&self, key: &DedupKey) -> Result<bool> {
        Ok(self.cache.contains_key(key.as_str()))
    }

    async fn len(&self) -> Result<usize> {
        // Pending writes are applied before the count is read.
        self.cache.run_pending_tasks().await;
        Ok(self.cache.entry_count() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use voucher_core::Code;

    fn key(s: &str) -> DedupKey {
        Code::new_unchecked(s).key("prefix")
    }

    #[tokio::test]
    async fn insert_then_duplicate() {
        let store = MokaDedupStore::new();

        assert_eq!(
            store.check_and_insert(&key("ABC")).await.unwrap(),
            Admission::Accepted
        );
        assert_eq!(
            store.check_and_insert(&key("ABC")).await.unwrap(),
            Admission::Duplicate
        );
        assert!(store.contains(&key("ABC")).await.unwrap());
        assert!(!store.contains(&key("XYZ")).await.unwrap());
    }

    #[tokio::test]
    async fn len_reflects_distinct_keys() {
        let store = MokaDedupStore::with_initial_capacity(8);

        for code in ["A", "B", "C", "A"] {
            store.check_and_insert(&key(code)).await.unwrap();
        }

        assert_eq!(store.len().await.unwrap(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_of_same_key_accept_once() {
        let store = Arc::new(MokaDedupStore::new());
        let mut handles = vec![];

        for _ in 0..64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.check_and_insert(&key("RACE")).await.unwrap()
            }));
        }

        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap().is_accepted() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, 1);
    }
}
