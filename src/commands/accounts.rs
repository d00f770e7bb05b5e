// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;
use tracing::warn;

use crate::db::Database;
use crate::ledger::{AccountRegistry, BalanceAggregator, Ledger};
use crate::models::{DeleteMode, EntryKind, Transaction};
use crate::utils::{fmt_money, maybe_print_json, parse_range, pretty_table};

pub fn handle(db: &Database, registry: &AccountRegistry, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", _)) => list(registry),
        Some(("show", sub)) => show(db, registry, sub)?,
        Some(("rm", sub)) => rm(db, registry, sub)?,
        Some(("dashboard", _)) => dashboard(db, registry)?,
        _ => {}
    }
    Ok(())
}

fn list(registry: &AccountRegistry) {
    let data = registry
        .iter()
        .map(|a| vec![a.id.clone(), a.name.clone()])
        .collect();
    println!("{}", pretty_table(&["Id", "Name"], data));
}

fn arg_kind(sub: &clap::ArgMatches) -> Result<Option<EntryKind>> {
    Ok(sub
        .get_one::<String>("kind")
        .map(|s| s.parse())
        .transpose()?)
}

/// One account page: its slice of the ledger plus the summary the page
/// footer shows (income, expense, net).
fn show(db: &Database, registry: &AccountRegistry, sub: &clap::ArgMatches) -> Result<()> {
    let account = registry.resolve(sub.get_one::<String>("account").unwrap())?;
    let range = parse_range(sub)?;
    let kind = arg_kind(sub)?;

    let (sender, _keepalive) = std::sync::mpsc::channel();
    let ledger = Ledger::new(account.clone(), sender);
    let rows = ledger.load(db, range, kind)?;
    let net = ledger.balance(&rows);

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let data = rows
            .iter()
            .map(|t: &Transaction| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.kind.to_string(),
                    t.description.clone(),
                    t.currency.code().to_string(),
                    fmt_money(&t.amount),
                    fmt_money(&t.base_amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Kind", "Description", "CCY", "Amount", "TRY"],
                data,
            )
        );
        let income: Decimal = rows
            .iter()
            .filter(|t| t.kind == EntryKind::Income)
            .map(|t| t.base_amount)
            .sum();
        let expense: Decimal = rows
            .iter()
            .filter(|t| t.kind == EntryKind::Expense)
            .map(|t| t.base_amount)
            .sum();
        println!(
            "{}: income {} TRY, expense {} TRY, net {} TRY",
            account.name,
            fmt_money(&income),
            fmt_money(&expense),
            fmt_money(&net),
        );
    }
    Ok(())
}

/// Account pages delete permanently unless asked to keep the audit row.
fn rm(db: &Database, registry: &AccountRegistry, sub: &clap::ArgMatches) -> Result<()> {
    let account = registry.resolve(sub.get_one::<String>("account").unwrap())?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let mode = if sub.get_flag("soft") {
        DeleteMode::Soft
    } else {
        DeleteMode::Hard
    };

    let (sender, _keepalive) = std::sync::mpsc::channel();
    let ledger = Ledger::new(account.clone(), sender);
    let (rows, net) = ledger.delete(db, id, mode, None, None)?;
    println!(
        "Deleted transaction {id}; {} now holds {} entries, net {} TRY",
        account.name,
        rows.len(),
        fmt_money(&net),
    );
    Ok(())
}

/// Loads every registered ledger, feeds the aggregator, and prints the
/// dashboard: one balance per account and the grand total. An account
/// whose load fails stays at its placeholder zero and is marked pending.
fn dashboard(db: &Database, registry: &AccountRegistry) -> Result<()> {
    let mut aggregator = BalanceAggregator::new(registry);
    for account in registry.iter() {
        let ledger = Ledger::new(account.clone(), aggregator.sender());
        match ledger.load(db, None, None) {
            Ok(rows) => {
                ledger.balance(&rows);
            }
            Err(e) => warn!(account = %account.id, error = %e, "ledger load failed"),
        }
    }
    aggregator.drain();

    let pending = aggregator.never_loaded();
    let data = registry
        .iter()
        .map(|a| {
            let balance = aggregator.balance(&a.id).unwrap_or_default();
            let note = if pending.contains(&a.id.as_str()) {
                "pending".to_string()
            } else {
                String::new()
            };
            vec![a.name.clone(), fmt_money(&balance), note]
        })
        .collect();
    println!("{}", pretty_table(&["Account", "Balance (TRY)", ""], data));
    println!("Total: {} TRY", fmt_money(&aggregator.grand_total()));
    Ok(())
}
