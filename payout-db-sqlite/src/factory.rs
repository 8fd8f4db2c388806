use async_trait::async_trait;

use payout_core::store::{SlotStoreFactory, StorageConfig};
use payout_core::{SlotStore, StorageError};

use crate::repository::SqliteSlotStore;

/// [`SlotStoreFactory`] for SQLite.
///
/// Register this with a [`payout_core::store::SlotStoreRegistry`] to make
/// the `"sqlite"` backend available:
///
/// ```rust,no_run
/// use payout_core::store::SlotStoreRegistry;
/// use payout_db_sqlite::SqliteSlotStoreFactory;
///
/// let mut registry = SlotStoreRegistry::new();
/// registry.register(Box::new(SqliteSlotStoreFactory));
/// ```
pub struct SqliteSlotStoreFactory;

#[async_trait]
impl SlotStoreFactory for SqliteSlotStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens `config.connection_string` (a file path or `:memory:`) and
    /// runs migrations.
    async fn create(
        &self,
        config: &StorageConfig,
    ) -> Result<Box<dyn SlotStore>, StorageError> {
        let store = SqliteSlotStore::new(&config.connection_string)
            .await
            .map_err(|e| StorageError::Connection(format!("{e:#}")))?;
        store
            .run_migrations()
            .await
            .map_err(|e| StorageError::Backend(format!("{e:#}")))?;
        Ok(Box::new(store))
    }
}
