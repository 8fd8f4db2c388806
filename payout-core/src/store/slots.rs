use async_trait::async_trait;
use thiserror::Error;

/// Slot holding the JSON array of raw amount strings.
pub const AMOUNTS_SLOT: &str = "amounts";
/// Slot holding the JSON array of breakdown records, index-aligned with
/// [`AMOUNTS_SLOT`].
pub const RESULTS_SLOT: &str = "results";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// String-keyed, string-valued slot storage.
///
/// Every write replaces the whole value of a slot. Reading a slot that was
/// never written returns `None`.
#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn read_slot(
        &self,
        key: &str,
    ) -> Result<Option<String>, StorageError>;

    async fn write_slot(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError>;
}
