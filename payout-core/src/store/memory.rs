use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::factory::{SlotStoreFactory, StorageConfig};
use super::slots::{SlotStore, StorageError};

#[derive(Debug, Default)]
struct Inner {
    slots: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

/// In-process slot storage.
///
/// Clones share the same slots, so a test can hand one clone to an
/// [`EntryStore`](super::EntryStore) and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySlotStore {
    inner: Arc<Inner>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given slots. Seeding does not count as
    /// a write.
    pub fn with_slots<I, K, V>(slots: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        store
            .lock()
            .extend(slots.into_iter().map(|(k, v)| (k.into(), v.into())));
        store
    }

    /// Number of successful `write_slot` calls so far.
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Current raw value of a slot.
    pub fn get(
        &self,
        key: &str,
    ) -> Option<String> {
        self.lock().get(key).cloned()
    }

    /// Sets a slot directly without counting a write.
    pub fn set(
        &self,
        key: &str,
        value: &str,
    ) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.inner
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn read_slot(
        &self,
        key: &str,
    ) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    async fn write_slot(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        self.set(key, value);
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Registers the `"memory"` backend. Each `create` call returns a fresh,
/// empty store; the connection string is ignored.
pub struct MemorySlotStoreFactory;

#[async_trait]
impl SlotStoreFactory for MemorySlotStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &StorageConfig,
    ) -> Result<Box<dyn SlotStore>, StorageError> {
        Ok(Box::new(MemorySlotStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn absent_slot_reads_none() {
        let store = MemorySlotStore::new();

        assert_eq!(store.read_slot("amounts").await, Ok(None));
    }

    #[tokio::test]
    async fn write_overwrites_and_counts() {
        let store = MemorySlotStore::new();

        store.write_slot("amounts", "[\"1\"]").await.unwrap();
        store.write_slot("amounts", "[\"2\"]").await.unwrap();

        assert_eq!(store.read_slot("amounts").await, Ok(Some("[\"2\"]".to_string())));
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn clones_share_slots() {
        let store = MemorySlotStore::new();
        let handle = store.clone();

        store.write_slot("results", "[]").await.unwrap();

        assert_eq!(handle.get("results"), Some("[]".to_string()));
        assert_eq!(handle.write_count(), 1);
    }

    #[test]
    fn seeded_slots_are_not_counted_as_writes() {
        let store = MemorySlotStore::with_slots([("amounts", "[]")]);

        assert_eq!(store.get("amounts"), Some("[]".to_string()));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn factory_creates_empty_store() {
        let store = MemorySlotStoreFactory
            .create(&StorageConfig::default())
            .await
            .unwrap();

        assert_eq!(store.read_slot("amounts").await, Ok(None));
    }
}
