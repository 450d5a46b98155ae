use crate::code::DedupKey;
use crate::error::StoreError;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Result of a check-and-insert against a [`DedupStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The key was absent and has now been recorded.
    Accepted,
    /// The key was already present; the store is unchanged.
    Duplicate,
}

impl Admission {
    pub fn is_accepted(self) -> bool {
        matches!(self, Admission::Accepted)
    }
}

/// An existence-check store for generated codes.
///
/// This is the stand-in for a distributed cache: the only thing the
/// generation pipeline needs from it is an atomic check-and-insert.
#[async_trait]
pub trait DedupStore: Send + Sync + 'static {
    /// Atomically records `key` if it is absent.
    ///
    /// Implementations must be linearizable: two concurrent calls with the
    /// same key never both return [`Admission::Accepted`].
    async fn check_and_insert(&self, key: &DedupKey) -> Result<Admission>;

    /// Checks whether `key` has already been recorded.
    async fn contains(&self, key: &DedupKey) -> Result<bool>;

    /// Number of keys currently recorded.
    async fn len(&self) -> Result<usize>;

    /// Records every key in `keys`, returning how many were new.
    async fn seed(&self, keys: Vec<DedupKey>) -> Result<usize> {
        let mut inserted = 0;
        for key in &keys {
            if self.check_and_insert(key).await?.is_accepted() {
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Code;
    use std::collections::HashSet;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct TestStore {
        keys: Mutex<HashSet<String>>,
    }

    #[async_trait]
    impl DedupStore for TestStore {
        async fn check_and_insert(&self, key: &DedupKey) -> Result<Admission> {
            let mut keys = self.keys.lock().await;
            if keys.insert(key.as_str().to_string()) {
                Ok(Admission::Accepted)
            } else {
                Ok(Admission::Duplicate)
            }
        }

        async fn contains(&self, key: &DedupKey) -> Result<bool> {
            Ok(self.keys.lock().await.contains(key.as_str()))
        }

        async fn len(&self) -> Result<usize> {
            Ok(self.keys.lock().await.len())
        }
    }

    fn key(code: &str) -> DedupKey {
        Code::new_unchecked(code).key("test")
    }

    #[tokio::test]
    async fn seed_counts_only_new_keys() {
        let store = TestStore::default();
        store.check_and_insert(&key("AA")).await.unwrap();

        let inserted = store
            .seed(vec![key("AA"), key("AB"), key("AB"), key("BA")])
            .await
            .unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(store.len().await.unwrap(), 3);
        assert!(store.contains(&key("BA")).await.unwrap());
    }

    #[test]
    fn admission_is_accepted() {
        assert!(Admission::Accepted.is_accepted());
        assert!(!Admission::Duplicate.is_accepted());
    }
}
