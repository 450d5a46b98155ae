use async_trait::async_trait;
use dashmap::DashSet;
use tracing::trace;
use voucher_core::store::Result;
use voucher_core::{Admission, DedupKey, DedupStore};

/// In-memory implementation of the DedupStore trait using DashSet.
///
/// DashSet shards its keys across independently locked buckets, so workers
/// probing different keys rarely contend. The check and the insert happen
/// under the same shard write lock, which makes `check_and_insert` atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDedupStore {
    keys: DashSet<String>,
}

impl InMemoryDedupStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self {
            keys: DashSet::new(),
        }
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: DashSet::with_capacity(capacity),
        }
    }
}

#[async_trait]
impl DedupStore for InMemoryDedupStore {
    async fn check_and_insert(&self, key: &DedupKey) -> Result<Admission> {
        // `insert` reports whether the key was newly added.
        let admission = if self.keys.insert(key.as_str().to_owned()) {
            Admission::Accepted
        } else {
            Admission::Duplicate
        };
        trace!(key = %key, ?admission, "check-and-insert");
        Ok(admission)
    }

    async fn contains(&self, key: &DedupKey) -> Result<bool> {
        Ok(self.keys.contains(key.as_str()))
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.keys.len())
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
    async fn first_insert_is_accepted() {
        let store = InMemoryDedupStore::new();

        let admission = store.check_and_insert(&key("ABC123")).await.unwrap();

        assert_eq!(admission, Admission::Accepted);
        assert!(store.contains(&key("ABC123")).await.unwrap());
    }

    #[tokio::test]
    async fn second_insert_is_duplicate() {
        let store = InMemoryDedupStore::new();

        store.check_and_insert(&key("ABC123")).await.unwrap();
        let admission = store.check_and_insert(&key("ABC123")).await.unwrap();

        assert_eq!(admission, Admission::Duplicate);
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn contains_nonexistent() {
        let store = InMemoryDedupStore::with_capacity(16);

        assert!(!store.contains(&key("nope")).await.unwrap());
        assert_eq!(store.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn namespaces_are_independent() {
        let store = InMemoryDedupStore::new();
        let code = Code::new_unchecked("SAME");

        assert!(store
            .check_and_insert(&code.key("a"))
            .await
            .unwrap()
            .is_accepted());
        assert!(store
            .check_and_insert(&code.key("b"))
            .await
            .unwrap()
            .is_accepted());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_of_same_key_accept_once() {
        let store = Arc::new(InMemoryDedupStore::new());
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
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn seed_prepopulates_keys() {
        let store = InMemoryDedupStore::new();

        let inserted = store
            .seed(vec![key("AA"), key("AB"), key("AA")])
            .await
            .unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(
            store.check_and_insert(&key("AB")).await.unwrap(),
            Admission::Duplicate
        );
    }
}
