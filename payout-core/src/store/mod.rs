pub mod entry_store;
pub mod factory;
pub mod memory;
pub mod slots;

pub use entry_store::{EntryStore, StoreError};
pub use factory::{SlotStoreFactory, SlotStoreRegistry, StorageConfig};
pub use memory::{MemorySlotStore, MemorySlotStoreFactory};
pub use slots::{AMOUNTS_SLOT, RESULTS_SLOT, SlotStore, StorageError};
