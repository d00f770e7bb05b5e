// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal_macros::dec;
use tillbook::cli;
use tillbook::commands::exporter;
use tillbook::db::{Database, NewTransaction};
use tillbook::models::{Account, Currency, EntryKind};
use tillbook::store::MemoryStore;

fn seeded_db() -> Database {
    let db = Database::new(Box::new(MemoryStore::new()));
    let account = Account {
        id: "cash".to_string(),
        name: "CASH".to_string(),
    };
    for (day, kind, amount) in [
        ("2025-06-02", EntryKind::Expense, dec!(40)),
        ("2025-06-01", EntryKind::Income, dec!(100)),
    ] {
        db.add_transaction(NewTransaction {
            kind,
            date: day.parse().unwrap(),
            description: "seed".to_string(),
            currency: Currency::Try,
            amount,
            account: &account,
            exchange_rate: None,
        })
        .unwrap();
    }
    db
}

#[test]
fn csv_export_writes_oldest_first() {
    let db = seeded_db();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("ledger.csv");

    let matches = cli::build_cli().get_matches_from([
        "tillbook",
        "export",
        "transactions",
        "--format",
        "csv",
        "--out",
        out.to_str().unwrap(),
    ]);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(&db, export_m).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("date,kind,description"));
    assert!(lines[1].starts_with("2025-06-01,income"));
    assert!(lines[2].starts_with("2025-06-02,expense"));
}

#[test]
fn kind_filter_narrows_the_export() {
    let db = seeded_db();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("income.csv");

    let matches = cli::build_cli().get_matches_from([
        "tillbook",
        "export",
        "transactions",
        "--kind",
        "income",
        "--out",
        out.to_str().unwrap(),
    ]);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(&db, export_m).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("income"));
    assert!(!text.contains("expense"));
}

#[test]
fn json_export_is_an_array_of_entries() {
    let db = seeded_db();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("ledger.json");

    let matches = cli::build_cli().get_matches_from([
        "tillbook",
        "export",
        "transactions",
        "--format",
        "json",
        "--out",
        out.to_str().unwrap(),
    ]);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(&db, export_m).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let entries = parsed.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["account"], "cash");
}
