use std::io::Write;

use anyhow::{Context, Result};
use payout_core::store::{MemorySlotStoreFactory, SlotStoreRegistry};
use payout_core::utils::parse_amount;
use payout_core::{Entry, EntryRow, EntryStore, TierCalculator};
use payout_db_sqlite::SqliteSlotStoreFactory;
use tracing::{debug, info};

use crate::cli::Command;
use crate::config::Settings;
use crate::{csv_loader, table};

/// Registry with every backend this binary knows about.
pub fn build_registry() -> SlotStoreRegistry {
    let mut registry = SlotStoreRegistry::new();
    registry.register(Box::new(SqliteSlotStoreFactory));
    registry.register(Box::new(MemorySlotStoreFactory));
    registry
}

/// Opens the configured storage and loads the ledger from it.
pub async fn open_store(settings: &Settings) -> Result<EntryStore> {
    let registry = build_registry();
    let slots = registry
        .create(&settings.storage)
        .await
        .with_context(|| {
            format!(
                "failed to open {} storage '{}'",
                settings.storage.backend, settings.storage.connection_string
            )
        })?;

    let store = EntryStore::new(slots);
    let count = if settings.load.reset_on_corrupt {
        store.load_or_reset().await?
    } else {
        store
            .load()
            .await
            .context("failed to load entries (set load.reset_on_corrupt = true to start over)")?
    };

    info!(count, backend = %settings.storage.backend, "opened ledger");
    Ok(store)
}

/// Runs one ledger command, writing its human-readable output to `out`.
///
/// `Quote` does not touch the store; see [`quote`].
pub async fn execute<W: Write>(
    store: &EntryStore,
    command: &Command,
    out: &mut W,
) -> Result<()> {
    debug!(?command, "executing");
    match command {
        Command::Add { amount } => match store.append(amount).await? {
            Some(breakdown) => {
                let index = store.len().await - 1;
                writeln!(out, "Added #{index}")?;
                writeln!(out, "{}", EntryRow::from_entry(&Entry::new(amount, breakdown)))?;
            }
            None => writeln!(out, "Nothing added: the amount is empty.")?,
        },
        Command::Remove { index } => {
            let removed = store.remove_at(*index).await?;
            writeln!(out, "Removed #{index} ({})", removed.amount)?;
        }
        Command::List => {
            write!(out, "{}", table::render(&store.snapshot().await))?;
        }
        Command::Quote { amount } => quote(store.calculator(), amount, out)?,
        Command::Import { file } => {
            let amounts = csv_loader::read_amounts_from_file(file)
                .with_context(|| format!("failed to import '{}'", file.display()))?;
            let mut added = 0;
            let mut skipped = 0;
            for amount in &amounts {
                match store.append(amount).await? {
                    Some(_) => added += 1,
                    None => skipped += 1,
                }
            }
            writeln!(out, "Imported {added} entries ({skipped} empty rows skipped).")?;
        }
        Command::Export { file } => {
            let entries = store.snapshot().await;
            csv_loader::write_entries_to_file(file, &entries)
                .with_context(|| format!("failed to export to '{}'", file.display()))?;
            writeln!(out, "Exported {} entries to {}.", entries.len(), file.display())?;
        }
    }
    Ok(())
}

/// Prints the breakdown for `amount` without storing anything.
pub fn quote<W: Write>(
    calculator: &TierCalculator,
    amount: &str,
    out: &mut W,
) -> Result<()> {
    let value = parse_amount(amount)?.context("no amount given")?;
    let entry = Entry::new(amount, calculator.compute(value));
    writeln!(out, "{}", EntryRow::from_entry(&entry))?;
    Ok(())
}
