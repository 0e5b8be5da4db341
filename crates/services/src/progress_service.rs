use std::sync::Arc;

use storage::repository::{KeyValueStore, StorageError};
use tarot_core::Arcana;
use tarot_core::model::{CardName, CompletionSet, ProgressSummary};

/// Storage key holding the JSON array of completed card names.
pub const PROGRESS_KEY: &str = "tarotProgress";

/// What `ProgressStore::load_with_outcome` found in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressLoad {
    Restored { count: usize },
    Missing,
    Corrupt { detail: String },
    Unavailable { detail: String },
}

/// Persists the learner's completed cards.
///
/// Storage problems never reach the caller: reads fall back to an empty set
/// and failed writes leave the in-memory set authoritative for the session.
#[derive(Clone)]
pub struct ProgressStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl ProgressStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(kv, PROGRESS_KEY)
    }

    #[must_use]
    pub fn with_key(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    /// Load completed cards, or an empty set if storage is missing or unreadable.
    pub async fn load(&self) -> CompletionSet {
        self.load_with_outcome().await.0
    }

    /// Like [`ProgressStore::load`], also reporting what happened.
    pub async fn load_with_outcome(&self) -> (CompletionSet, ProgressLoad) {
        let raw = match self.kv.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no stored progress; starting empty");
                return (CompletionSet::new(), ProgressLoad::Missing);
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "progress storage unavailable; starting empty");
                return (
                    CompletionSet::new(),
                    ProgressLoad::Unavailable {
                        detail: err.to_string(),
                    },
                );
            }
        };

        match serde_json::from_str::<CompletionSet>(&raw) {
            Ok(set) => {
                let count = set.len();
                (set, ProgressLoad::Restored { count })
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "stored progress is corrupt; starting empty");
                (
                    CompletionSet::new(),
                    ProgressLoad::Corrupt {
                        detail: err.to_string(),
                    },
                )
            }
        }
    }

    /// Returns `set` plus `card`, persisting the result before returning.
    ///
    /// Adding a card that is already present yields an equal set.
    pub async fn mark_complete(&self, set: &CompletionSet, card: &CardName) -> CompletionSet {
        let next = set.with(card);
        if let Err(err) = self.save(&next).await {
            tracing::warn!(card = %card, error = %err, "failed to persist progress; keeping it for this session");
        }
        next
    }

    /// Write `set` to storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the set cannot be encoded or stored.
    pub async fn save(&self, set: &CompletionSet) -> Result<(), StorageError> {
        let encoded =
            serde_json::to_string(set).map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.kv.set(&self.key, &encoded).await
    }

    #[must_use]
    pub fn is_complete(set: &CompletionSet, card: &CardName) -> bool {
        set.contains(card.as_str())
    }

    #[must_use]
    pub fn summary(set: &CompletionSet, arcana: Arcana) -> ProgressSummary {
        set.summary(arcana)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use storage::repository::InMemoryStore;

    /// Store whose reads and writes always fail.
    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Connection("disk gone".into()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk gone".into()))
        }
    }

    fn mago() -> CardName {
        CardName::from("El Mago")
    }

    #[tokio::test]
    async fn missing_key_loads_empty() {
        let store = ProgressStore::new(Arc::new(InMemoryStore::new()));
        let (set, outcome) = store.load_with_outcome().await;
        assert!(set.is_empty());
        assert_eq!(outcome, ProgressLoad::Missing);
    }

    #[tokio::test]
    async fn corrupt_data_loads_empty() {
        let kv = Arc::new(InMemoryStore::new());
        for garbage in ["not json", "{\"a\": 1}", "[1, 2, 3]", ""] {
            kv.set(PROGRESS_KEY, garbage).await.unwrap();
            let store = ProgressStore::new(kv.clone());
            let (set, outcome) = store.load_with_outcome().await;
            assert!(set.is_empty(), "{garbage:?}");
            assert!(
                matches!(outcome, ProgressLoad::Corrupt { .. }),
                "{garbage:?}"
            );
        }
    }

    #[tokio::test]
    async fn unavailable_storage_loads_empty() {
        let store = ProgressStore::new(Arc::new(BrokenStore));
        let (set, outcome) = store.load_with_outcome().await;
        assert!(set.is_empty());
        assert!(matches!(outcome, ProgressLoad::Unavailable { .. }));
    }

    #[tokio::test]
    async fn mark_complete_persists_and_round_trips() {
        let kv = Arc::new(InMemoryStore::new());
        let store = ProgressStore::new(kv.clone());
        let set = store.mark_complete(&CompletionSet::new(), &mago()).await;
        assert!(ProgressStore::is_complete(&set, &mago()));

        let raw = kv.get(PROGRESS_KEY).await.unwrap();
        assert_eq!(raw.as_deref(), Some(r#"["El Mago"]"#));

        let reloaded = ProgressStore::new(kv).load_with_outcome().await;
        assert_eq!(reloaded, (set, ProgressLoad::Restored { count: 1 }));
    }

    #[tokio::test]
    async fn mark_complete_is_idempotent() {
        let store = ProgressStore::new(Arc::new(InMemoryStore::new()));
        let once = store.mark_complete(&CompletionSet::new(), &mago()).await;
        let twice = store.mark_complete(&once, &mago()).await;
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn failed_write_keeps_in_memory_state() {
        let store = ProgressStore::new(Arc::new(BrokenStore));
        let set = store.mark_complete(&CompletionSet::new(), &mago()).await;
        assert!(ProgressStore::is_complete(&set, &mago()));
        assert!(store.save(&set).await.is_err());
    }

    #[tokio::test]
    async fn custom_key_is_isolated() {
        let kv = Arc::new(InMemoryStore::new());
        let a = ProgressStore::with_key(kv.clone(), "learner-a");
        let b = ProgressStore::with_key(kv, "learner-b");
        a.mark_complete(&CompletionSet::new(), &mago()).await;
        assert!(b.load().await.is_empty());
        assert_eq!(a.load().await.len(), 1);
        assert_eq!(
            ProgressStore::summary(&a.load().await, Arcana::Major).completed,
            1
        );
    }
}
