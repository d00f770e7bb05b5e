// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::mpsc::channel;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tillbook::db::{Database, NewTransaction};
use tillbook::error::Error;
use tillbook::ledger::{net_balance, AccountRegistry, Ledger};
use tillbook::models::{Account, Currency, DeleteMode, EntryKind};
use tillbook::store::MemoryStore;

fn account(id: &str, name: &str) -> Account {
    Account {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn seed(db: &Database, acct: &Account, kind: EntryKind, day: &str, amount: &str) -> i64 {
    db.add_transaction(NewTransaction {
        kind,
        date: date(day),
        description: format!("{kind} on {day}"),
        currency: Currency::Try,
        amount: amount.parse().unwrap(),
        account: acct,
        exchange_rate: None,
    })
    .unwrap()
    .id
}

#[test]
fn load_keeps_only_the_ledgers_own_account() {
    let db = Database::new(Box::new(MemoryStore::new()));
    let cash = account("cash", "CASH");
    let volkan = account("volkan", "Volkan Amount");
    seed(&db, &cash, EntryKind::Income, "2025-06-01", "100");
    seed(&db, &volkan, EntryKind::Income, "2025-06-01", "999");
    seed(&db, &cash, EntryKind::Expense, "2025-06-02", "40");

    let (tx, _rx) = channel();
    let ledger = Ledger::new(cash, tx);
    let rows = ledger.load(&db, None, None).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|t| t.account == "cash"));
    // Newest first.
    assert_eq!(rows[0].date, date("2025-06-02"));
}

#[test]
fn load_respects_range_and_kind_filters() {
    let db = Database::new(Box::new(MemoryStore::new()));
    let cash = account("cash", "CASH");
    seed(&db, &cash, EntryKind::Income, "2025-05-01", "10");
    seed(&db, &cash, EntryKind::Income, "2025-06-05", "20");
    seed(&db, &cash, EntryKind::Expense, "2025-06-06", "30");

    let (tx, _rx) = channel();
    let ledger = Ledger::new(cash, tx);

    let june = ledger
        .load(&db, Some((date("2025-06-01"), date("2025-06-30"))), None)
        .unwrap();
    assert_eq!(june.len(), 2);

    let expenses = ledger
        .load(&db, None, Some(EntryKind::Expense))
        .unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].base_amount, dec!(30));
}

#[test]
fn balance_announces_on_the_channel() {
    let db = Database::new(Box::new(MemoryStore::new()));
    let cash = account("cash", "CASH");
    seed(&db, &cash, EntryKind::Income, "2025-06-01", "100");
    seed(&db, &cash, EntryKind::Expense, "2025-06-02", "30");

    let (tx, rx) = channel();
    let ledger = Ledger::new(cash, tx);
    let rows = ledger.load(&db, None, None).unwrap();
    let net = ledger.balance(&rows);
    assert_eq!(net, dec!(70));

    let event = rx.try_recv().unwrap();
    assert_eq!(event.account, "cash");
    assert_eq!(event.balance, dec!(70));
}

#[test]
fn soft_deleted_rows_never_reach_the_view() {
    let db = Database::new(Box::new(MemoryStore::new()));
    let cash = account("cash", "CASH");
    let keep = seed(&db, &cash, EntryKind::Income, "2025-06-01", "100");
    let gone = seed(&db, &cash, EntryKind::Income, "2025-06-02", "50");
    db.delete_transaction(gone, DeleteMode::Soft).unwrap();

    let (tx, _rx) = channel();
    let ledger = Ledger::new(cash, tx);
    let rows = ledger.load(&db, None, None).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, keep);
    assert_eq!(net_balance(&rows), dec!(100));
}

#[test]
fn delete_through_the_view_reloads_and_reannounces() {
    let db = Database::new(Box::new(MemoryStore::new()));
    let cash = account("cash", "CASH");
    seed(&db, &cash, EntryKind::Income, "2025-06-01", "100");
    let victim = seed(&db, &cash, EntryKind::Income, "2025-06-02", "50");

    let (tx, rx) = channel();
    let ledger = Ledger::new(cash, tx);
    let (rows, net) = ledger
        .delete(&db, victim, DeleteMode::Hard, None, None)
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(net, dec!(100));
    assert_eq!(rx.try_recv().unwrap().balance, dec!(100));
}

#[test]
fn deleting_a_missing_id_is_not_silent() {
    let db = Database::new(Box::new(MemoryStore::new()));
    let cash = account("cash", "CASH");
    let (tx, _rx) = channel();
    let ledger = Ledger::new(cash, tx);
    let err = ledger
        .delete(&db, 404, DeleteMode::Hard, None, None)
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn registry_resolution_guards_the_partition_key() {
    let registry = AccountRegistry::new(vec![
        account("cash", "CASH"),
        account("volkan", "Volkan Amount"),
    ]);
    assert_eq!(registry.resolve("volkan").unwrap().name, "Volkan Amount");
    assert!(matches!(
        registry.resolve("Volkan Amount"),
        Err(Error::Validation(_))
    ));
}
