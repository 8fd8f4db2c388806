use std::io::Write;
use std::path::PathBuf;

use payout_cli::app;
use payout_cli::cli::Command;
use payout_core::EntryStore;
use payout_core::store::MemorySlotStore;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tempfile::{NamedTempFile, TempDir};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

async fn run(
    store: &EntryStore,
    command: Command,
) -> String {
    let mut out = Vec::new();
    app::execute(store, &command, &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn import_appends_each_amount_and_skips_blanks() {
    let slots = MemorySlotStore::new();
    let store = EntryStore::new(Box::new(slots.clone()));

    let output = run(
        &store,
        Command::Import {
            file: fixture("amounts.csv"),
        },
    )
    .await;

    assert_eq!(output, "Imported 4 entries (1 empty rows skipped).\n");
    let entries = store.snapshot().await;
    let amounts: Vec<&str> = entries.iter().map(|e| e.amount.as_str()).collect();
    assert_eq!(amounts, vec!["5000", "3000", "2000", "4321.5"]);
    assert_eq!(entries[0].breakdown.final_profit, dec!(2000));
    assert_eq!(entries[1].breakdown.final_profit, dec!(1100));
    assert_eq!(entries[2].breakdown.final_profit, dec!(600));
    assert_eq!(entries[3].breakdown.percentage, 35);

    // Reloading from the same slots gives the same ledger.
    let reopened = EntryStore::open(Box::new(slots)).await.unwrap();
    assert_eq!(reopened.snapshot().await, entries);
}

#[tokio::test]
async fn export_writes_every_entry() {
    let store = EntryStore::new(Box::new(MemorySlotStore::new()));
    for amount in ["5000", "3000"] {
        store.append(amount).await.unwrap();
    }
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("export.csv");

    let output = run(&store, Command::Export { file: path.clone() }).await;

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(output, format!("Exported 2 entries to {}.\n", path.display()));
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines,
        vec![
            "index,amount,percentage,percentage_amount,reduced_amount,daily_reductions,days,final_profit",
            "0,5000,40%,2000.00,3000,1000,1,2000.00",
            "1,3000,30%,900.00,2100,1000,1,1100.00",
        ]
    );
}

#[tokio::test]
async fn import_with_a_bad_row_adds_nothing() {
    let mut csv = NamedTempFile::new().unwrap();
    write!(csv, "amount\n5000\nplenty\n").unwrap();
    let store = EntryStore::new(Box::new(MemorySlotStore::new()));

    let mut out = Vec::new();
    let file = csv.path().to_path_buf();
    let result = app::execute(&store, &Command::Import { file }, &mut out).await;

    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("plenty"));
    assert!(store.is_empty().await);
}
