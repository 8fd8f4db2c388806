mod breakdown;
mod entry;
mod entry_row;

pub use breakdown::Breakdown;
pub use entry::Entry;
pub use entry_row::EntryRow;
