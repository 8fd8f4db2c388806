use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Payout calculator with a persisted ledger.
///
/// Each entered gross amount gets a tier percentage, the driver's share,
/// the fixed fuel reduction and the final profit. Entries are kept in the
/// configured storage until removed.
#[derive(Debug, Parser)]
#[command(name = "payouts", version)]
pub struct Cli {
    /// TOML settings file. Defaults to `payouts.toml` when it exists.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage backend (`sqlite` or `memory`).
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Storage connection string.
    /// For SQLite this is a file path (e.g. `payouts.db`) or `:memory:`.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Log filter, e.g. `debug` or `payout_core=trace`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Append log output to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Compute a breakdown for AMOUNT and append it to the ledger.
    Add {
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Remove the entry at INDEX (as shown by `list`).
    Remove { index: usize },
    /// Show every entry.
    List,
    /// Compute a breakdown for AMOUNT without storing it.
    Quote {
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Append every `amount` from a CSV file.
    Import { file: PathBuf },
    /// Write the ledger to a CSV file.
    Export { file: PathBuf },
}
