// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-account ledger views and the dashboard balance aggregator.
//!
//! Transactions live in one shared table partitioned by account id. Each
//! account page is a `Ledger`: it loads the type/date slice from the store,
//! keeps only its own account's rows, and computes a net balance. Every
//! computed balance is announced on a channel; the `BalanceAggregator`
//! folds those announcements into the dashboard grand total.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::mpsc::{channel, Receiver, Sender};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Account, DeleteMode, EntryKind, Transaction};

/// The configured set of accounts. Transactions may only reference a
/// registered account id, so a typo cannot open an invisible ledger.
pub struct AccountRegistry {
    accounts: Vec<Account>,
}

impl AccountRegistry {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    pub fn resolve(&self, id: &str) -> Result<&Account> {
        self.accounts.iter().find(|a| a.id == id).ok_or_else(|| {
            let known: Vec<&str> = self.accounts.iter().map(|a| a.id.as_str()).collect();
            Error::Validation(format!(
                "unknown account '{id}' (registered: {})",
                known.join(", ")
            ))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }
}

/// Net position of a transaction set: income minus expense, in the base
/// currency. Pure; the result does not depend on input order.
pub fn net_balance(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .fold(Decimal::ZERO, |acc, t| match t.kind {
            EntryKind::Income => acc + t.base_amount,
            EntryKind::Expense => acc - t.base_amount,
        })
}

#[derive(Debug, Clone)]
pub struct BalanceEvent {
    pub account: String,
    pub balance: Decimal,
}

/// One account's projection of the transaction table.
pub struct Ledger {
    account: Account,
    notify: Sender<BalanceEvent>,
}

impl Ledger {
    pub fn new(account: Account, notify: Sender<BalanceEvent>) -> Self {
        Self { account, notify }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Active transactions for this account, newest first. The store
    /// partitions by type and date; the account cut happens here.
    pub fn load(
        &self,
        db: &Database,
        range: Option<(NaiveDate, NaiveDate)>,
        kind: Option<EntryKind>,
    ) -> Result<Vec<Transaction>> {
        let kinds: &[EntryKind] = match kind {
            Some(EntryKind::Income) => &[EntryKind::Income],
            Some(EntryKind::Expense) => &[EntryKind::Expense],
            None => &[EntryKind::Income, EntryKind::Expense],
        };
        let mut rows = Vec::new();
        for k in kinds {
            rows.extend(
                db.list_transactions(*k, true, range)?
                    .into_iter()
                    .filter(|t| t.account == self.account.id),
            );
        }
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    /// Net balance of a loaded set. Announces the new balance so the
    /// aggregator can fold it into the dashboard total.
    pub fn balance(&self, transactions: &[Transaction]) -> Decimal {
        let balance = net_balance(transactions);
        self.notify
            .send(BalanceEvent {
                account: self.account.id.clone(),
                balance,
            })
            .ok();
        balance
    }

    /// Deletes through the view, then reloads and recomputes. A missing id
    /// is reported, never silently ignored.
    pub fn delete(
        &self,
        db: &Database,
        id: i64,
        mode: DeleteMode,
        range: Option<(NaiveDate, NaiveDate)>,
        kind: Option<EntryKind>,
    ) -> Result<(Vec<Transaction>, Decimal)> {
        if !db.delete_transaction(id, mode)? {
            return Err(Error::NotFound(format!("transaction {id}")));
        }
        let rows = self.load(db, range, kind)?;
        let balance = self.balance(&rows);
        Ok((rows, balance))
    }
}

/// Folds per-account balance announcements into a grand total.
///
/// Every registered account starts at zero, so the total is compatible
/// with the inherited dashboard behavior before all pages have loaded;
/// `never_loaded` names the accounts whose zero is still a placeholder.
pub struct BalanceAggregator {
    balances: BTreeMap<String, Decimal>,
    reported: BTreeSet<String>,
    tx: Sender<BalanceEvent>,
    rx: Receiver<BalanceEvent>,
}

impl BalanceAggregator {
    pub fn new(registry: &AccountRegistry) -> Self {
        let (tx, rx) = channel();
        let balances = registry
            .iter()
            .map(|a| (a.id.clone(), Decimal::ZERO))
            .collect();
        Self {
            balances,
            reported: BTreeSet::new(),
            tx,
            rx,
        }
    }

    /// A sender for ledgers (or anything else) to announce balances on.
    pub fn sender(&self) -> Sender<BalanceEvent> {
        self.tx.clone()
    }

    /// Applies one announcement: replaces that account's entry, leaving
    /// every other account at its last-known value.
    pub fn apply(&mut self, event: BalanceEvent) {
        self.reported.insert(event.account.clone());
        self.balances.insert(event.account, event.balance);
    }

    /// Consumes all pending announcements in arrival order.
    pub fn drain(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.apply(event);
        }
    }

    pub fn grand_total(&self) -> Decimal {
        self.balances.values().copied().sum()
    }

    pub fn balance(&self, account: &str) -> Option<Decimal> {
        self.balances.get(account).copied()
    }

    /// Registered accounts that have never announced a balance; their
    /// contribution to the grand total is still the initial zero.
    pub fn never_loaded(&self) -> Vec<&str> {
        self.balances
            .keys()
            .filter(|k| !self.reported.contains(*k))
            .map(|k| k.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Currency;
    use rust_decimal_macros::dec;

    fn tx(kind: EntryKind, base_amount: Decimal) -> Transaction {
        Transaction {
            id: 0,
            kind,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            description: "t".to_string(),
            currency: Currency::Try,
            amount: base_amount,
            account: "cash".to_string(),
            exchange_rate: None,
            base_amount,
            active: true,
        }
    }

    #[test]
    fn net_balance_is_order_invariant() {
        let mut set = vec![
            tx(EntryKind::Income, dec!(100)),
            tx(EntryKind::Expense, dec!(30)),
            tx(EntryKind::Income, dec!(5.50)),
        ];
        let forward = net_balance(&set);
        set.reverse();
        assert_eq!(forward, net_balance(&set));
        assert_eq!(forward, dec!(75.50));
    }

    #[test]
    fn registry_rejects_unknown_tags() {
        let reg = AccountRegistry::new(vec![Account {
            id: "cash".into(),
            name: "CASH".into(),
        }]);
        assert!(reg.resolve("cash").is_ok());
        assert!(matches!(
            reg.resolve("csah"),
            Err(Error::Validation(_))
        ));
    }
}
