use std::io;

use clap::Parser;
use tracing::debug;

use payout_cli::app;
use payout_cli::cli::{Cli, Command};
use payout_cli::config::Settings;
use payout_cli::logging;
use payout_core::TierCalculator;

// ─── settings ────────────────────────────────────────────────────────────────

/// Settings file first, then any flags given on the command line.
fn resolve_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = Settings::discover(cli.config.as_deref())?;

    if let Some(backend) = &cli.backend {
        settings.storage.backend = backend.clone();
    }
    if let Some(db) = &cli.db {
        settings.storage.connection_string = db.clone();
    }
    if let Some(level) = &cli.log_level {
        settings.logging.level = level.clone();
    }
    if let Some(file) = &cli.log_file {
        settings.logging.file = Some(file.clone());
    }
    Ok(settings)
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;
    logging::init_logging(&settings.logging)?;
    debug!(?settings, "resolved settings");

    let mut stdout = io::stdout().lock();
    if let Command::Quote { amount } = &cli.command {
        return app::quote(&TierCalculator::standard(), amount, &mut stdout);
    }

    let store = app::open_store(&settings).await?;
    app::execute(&store, &cli.command, &mut stdout).await
}
