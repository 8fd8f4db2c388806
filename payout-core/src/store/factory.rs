use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::slots::{SlotStore, StorageError};

/// Backend-agnostic storage configuration.
///
/// `backend` must match the [`SlotStoreFactory::backend_name`] of a
/// registered factory. `connection_string` is passed through to that
/// factory unchanged.
///
/// | backend    | connection_string examples          |
/// |------------|-------------------------------------|
/// | `sqlite`   | `payouts.db`, `:memory:`            |
/// | `memory`   | ignored                             |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: "payouts.db".to_string(),
        }
    }
}

/// One implementation per storage backend, registered with a
/// [`SlotStoreRegistry`] at startup.
#[async_trait]
pub trait SlotStoreFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Open (or create) the storage and return a ready-to-use slot store.
    async fn create(
        &self,
        config: &StorageConfig,
    ) -> Result<Box<dyn SlotStore>, StorageError>;
}

/// Registry of [`SlotStoreFactory`] instances, keyed by backend name.
pub struct SlotStoreRegistry {
    factories: HashMap<&'static str, Box<dyn SlotStoreFactory>>,
}

impl SlotStoreRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend factory, replacing any factory with the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn SlotStoreFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory matching `config.backend`.
    ///
    /// # Errors
    /// * [`StorageError::Configuration`] when no factory is registered for
    ///   the requested backend.
    /// * Any error the chosen factory returns.
    pub async fn create(
        &self,
        config: &StorageConfig,
    ) -> Result<Box<dyn SlotStore>, StorageError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                StorageError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        tracing::debug!(backend = %config.backend, "creating slot store");
        factory.create(config).await
    }
}

impl Default for SlotStoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}
