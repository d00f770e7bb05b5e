// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal_macros::dec;
use tillbook::db::{Database, NewTransaction};
use tillbook::ledger::{AccountRegistry, BalanceAggregator, BalanceEvent, Ledger};
use tillbook::models::{Account, Currency, EntryKind};
use tillbook::store::MemoryStore;

fn registry() -> AccountRegistry {
    AccountRegistry::new(
        [("a", "Account A"), ("b", "Account B"), ("c", "Account C")]
            .into_iter()
            .map(|(id, name)| Account {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect(),
    )
}

fn event(account: &str, balance: rust_decimal::Decimal) -> BalanceEvent {
    BalanceEvent {
        account: account.to_string(),
        balance,
    }
}

#[test]
fn grand_total_follows_announcements() {
    let registry = registry();
    let mut agg = BalanceAggregator::new(&registry);
    assert_eq!(agg.grand_total(), dec!(0));

    agg.apply(event("a", dec!(100)));
    agg.apply(event("b", dec!(-50)));
    agg.apply(event("c", dec!(0)));
    assert_eq!(agg.grand_total(), dec!(50));

    // A late announcement replaces, never accumulates.
    agg.apply(event("a", dec!(150)));
    assert_eq!(agg.grand_total(), dec!(100));
}

#[test]
fn unreported_accounts_contribute_zero_but_are_named() {
    let registry = registry();
    let mut agg = BalanceAggregator::new(&registry);
    agg.apply(event("a", dec!(100)));
    assert_eq!(agg.grand_total(), dec!(100));
    assert_eq!(agg.never_loaded(), vec!["b", "c"]);
    assert_eq!(agg.balance("b"), Some(dec!(0)));

    agg.apply(event("b", dec!(0)));
    assert_eq!(agg.never_loaded(), vec!["c"]);
}

#[test]
fn drain_consumes_pending_events_in_order() {
    let registry = registry();
    let mut agg = BalanceAggregator::new(&registry);
    let sender = agg.sender();
    sender.send(event("a", dec!(10))).unwrap();
    sender.send(event("a", dec!(25))).unwrap();
    sender.send(event("b", dec!(5))).unwrap();
    agg.drain();
    assert_eq!(agg.balance("a"), Some(dec!(25)));
    assert_eq!(agg.grand_total(), dec!(30));
}

#[test]
fn ledgers_feed_the_dashboard_total() {
    let db = Database::new(Box::new(MemoryStore::new()));
    let registry = registry();
    let mut agg = BalanceAggregator::new(&registry);

    for (account_id, kind, amount) in [
        ("a", EntryKind::Income, "300"),
        ("a", EntryKind::Expense, "120"),
        ("b", EntryKind::Expense, "80"),
    ] {
        let account = registry.resolve(account_id).unwrap();
        db.add_transaction(NewTransaction {
            kind,
            date: "2025-06-01".parse().unwrap(),
            description: "seed".to_string(),
            currency: Currency::Try,
            amount: amount.parse().unwrap(),
            account,
            exchange_rate: None,
        })
        .unwrap();
    }

    for account in registry.iter() {
        let ledger = Ledger::new(account.clone(), agg.sender());
        let rows = ledger.load(&db, None, None).unwrap();
        ledger.balance(&rows);
    }
    agg.drain();

    assert_eq!(agg.balance("a"), Some(dec!(180)));
    assert_eq!(agg.balance("b"), Some(dec!(-80)));
    assert_eq!(agg.balance("c"), Some(dec!(0)));
    assert_eq!(agg.grand_total(), dec!(100));
    assert!(agg.never_loaded().is_empty());
}
