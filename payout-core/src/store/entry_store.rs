//! The persisted, ordered list of payout entries.
//!
//! Entries live in memory as one `Vec<Entry>` and are mirrored to two slots
//! of a [`SlotStore`]: [`AMOUNTS_SLOT`] holds the raw amount strings and
//! [`RESULTS_SLOT`] the breakdowns, index-aligned. Every mutation rewrites
//! both slots in full before it returns, and the mutation plus its writes
//! run under one lock.

use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::slots::{AMOUNTS_SLOT, RESULTS_SLOT, SlotStore, StorageError};
use crate::calculations::TierCalculator;
use crate::models::{Breakdown, Entry};
use crate::utils::{ParseAmountError, parse_amount};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    InvalidAmount(#[from] ParseAmountError),

    #[error("index {index} is out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("slot '{slot}' holds malformed data: {source}")]
    Corrupt {
        slot: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode slot '{slot}': {source}")]
    Encode {
        slot: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct EntryStore {
    slots: Box<dyn SlotStore>,
    calculator: TierCalculator,
    entries: Mutex<Vec<Entry>>,
}

impl EntryStore {
    /// Empty store over `slots`. Nothing is read until [`EntryStore::load`].
    pub fn new(slots: Box<dyn SlotStore>) -> Self {
        Self::with_calculator(slots, TierCalculator::standard())
    }

    pub fn with_calculator(
        slots: Box<dyn SlotStore>,
        calculator: TierCalculator,
    ) -> Self {
        Self {
            slots,
            calculator,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Creates the store and loads whatever the slots hold.
    pub async fn open(slots: Box<dyn SlotStore>) -> Result<Self, StoreError> {
        let store = Self::new(slots);
        store.load().await?;
        Ok(store)
    }

    pub fn calculator(&self) -> &TierCalculator {
        &self.calculator
    }

    /// Replaces the in-memory entries with the persisted ones and returns
    /// how many were loaded.
    ///
    /// An absent or empty slot counts as an empty list. If the two slots
    /// disagree in length both are cut to the shorter one.
    ///
    /// # Errors
    /// * [`StoreError::Corrupt`] when a slot does not decode.
    /// * [`StoreError::Storage`] when the backend read fails.
    pub async fn load(&self) -> Result<usize, StoreError> {
        let mut entries = self.entries.lock().await;

        let amounts: Vec<String> = self.read_sequence(AMOUNTS_SLOT).await?;
        let results: Vec<Breakdown> = self.read_sequence(RESULTS_SLOT).await?;

        if amounts.len() != results.len() {
            warn!(
                amounts = amounts.len(),
                results = results.len(),
                "persisted slots disagree in length; truncating to the shorter"
            );
        }

        *entries = amounts
            .into_iter()
            .zip(results)
            .map(|(amount, breakdown)| Entry::new(amount, breakdown))
            .collect();

        debug!(count = entries.len(), "loaded entries");
        Ok(entries.len())
    }

    /// Like [`EntryStore::load`], but a corrupt slot leaves the store empty
    /// instead of failing. The slots themselves are left untouched until
    /// the next mutation overwrites them.
    pub async fn load_or_reset(&self) -> Result<usize, StoreError> {
        match self.load().await {
            Err(StoreError::Corrupt { slot, source }) => {
                warn!(slot, error = %source, "discarding corrupt persisted data");
                self.entries.lock().await.clear();
                Ok(0)
            }
            other => other,
        }
    }

    /// Computes and appends an entry for `raw_amount`, then persists.
    ///
    /// Returns `Ok(None)` without touching storage when the text is empty or
    /// whitespace. The amount text is stored exactly as given.
    ///
    /// # Errors
    /// * [`StoreError::InvalidAmount`] when the text is not a number; nothing
    ///   is appended or written.
    /// * A storage or encoding error from persisting; the append is undone
    ///   in memory and the amounts slot is rewritten to match.
    pub async fn append(
        &self,
        raw_amount: &str,
    ) -> Result<Option<Breakdown>, StoreError> {
        let Some(amount) = parse_amount(raw_amount)? else {
            debug!("empty amount; nothing appended");
            return Ok(None);
        };
        let breakdown = self.calculator.compute(amount);

        let mut entries = self.entries.lock().await;
        entries.push(Entry::new(raw_amount, breakdown.clone()));

        if let Err(e) = self.persist(&entries).await {
            entries.pop();
            self.restore_amounts(&entries).await;
            return Err(e);
        }

        info!(
            index = entries.len() - 1,
            amount = raw_amount,
            percentage = breakdown.percentage,
            "appended entry"
        );
        Ok(Some(breakdown))
    }

    /// Removes the entry at `index`, shifting later entries left, then
    /// persists. Returns the removed entry.
    ///
    /// # Errors
    /// * [`StoreError::IndexOutOfRange`]; nothing is removed or written.
    /// * A storage or encoding error from persisting; the removal is undone
    ///   in memory and the amounts slot is rewritten to match.
    pub async fn remove_at(
        &self,
        index: usize,
    ) -> Result<Entry, StoreError> {
        let mut entries = self.entries.lock().await;
        let len = entries.len();
        if index >= len {
            return Err(StoreError::IndexOutOfRange { index, len });
        }

        let removed = entries.remove(index);

        if let Err(e) = self.persist(&entries).await {
            entries.insert(index, removed);
            self.restore_amounts(&entries).await;
            return Err(e);
        }

        info!(index, amount = %removed.amount, "removed entry");
        Ok(removed)
    }

    /// Copy of the current entries in display order.
    pub async fn snapshot(&self) -> Vec<Entry> {
        self.entries.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    async fn read_sequence<T: DeserializeOwned>(
        &self,
        slot: &'static str,
    ) -> Result<Vec<T>, StoreError> {
        let raw = match self.slots.read_slot(slot).await? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(Vec::new()),
        };

        let decoded: Option<Vec<T>> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt { slot, source })?;
        Ok(decoded.unwrap_or_default())
    }

    async fn persist(
        &self,
        entries: &[Entry],
    ) -> Result<(), StoreError> {
        let amounts = encode_amounts(entries)?;
        let results: Vec<&Breakdown> = entries.iter().map(|e| &e.breakdown).collect();
        let results = serde_json::to_string(&results).map_err(|source| StoreError::Encode {
            slot: RESULTS_SLOT,
            source,
        })?;

        self.slots.write_slot(AMOUNTS_SLOT, &amounts).await?;
        self.slots.write_slot(RESULTS_SLOT, &results).await?;

        debug!(count = entries.len(), "persisted entries");
        Ok(())
    }

    /// Puts the amounts slot back to `entries` after a failed persist.
    ///
    /// The amounts slot is written first, so a failure on the results slot
    /// leaves it one mutation ahead. For a removal that shift would pair
    /// amounts with their neighbours' breakdowns on the next load. If this
    /// rewrite also fails, the error is logged and the original one is
    /// what the caller sees.
    async fn restore_amounts(
        &self,
        entries: &[Entry],
    ) {
        let restored = match encode_amounts(entries) {
            Ok(amounts) => self
                .slots
                .write_slot(AMOUNTS_SLOT, &amounts)
                .await
                .map_err(StoreError::from),
            Err(e) => Err(e),
        };
        if let Err(e) = restored {
            warn!(error = %e, "could not restore the amounts slot after a failed write");
        }
    }
}

fn encode_amounts(entries: &[Entry]) -> Result<String, StoreError> {
    let amounts: Vec<&str> = entries.iter().map(|e| e.amount.as_str()).collect();
    serde_json::to_string(&amounts).map_err(|source| StoreError::Encode {
        slot: AMOUNTS_SLOT,
        source,
    })
}
