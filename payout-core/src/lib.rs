pub mod calculations;
pub mod models;
pub mod store;
pub mod utils;

pub use calculations::{ReductionPolicy, Tier, TierCalculator, TierSchedule};
pub use models::*;
pub use store::{EntryStore, SlotStore, StorageError, StoreError};
