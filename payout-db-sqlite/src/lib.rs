pub mod factory;
pub mod repository;

pub use factory::SqliteSlotStoreFactory;
pub use repository::SqliteSlotStore;
