// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::config::FxConfig;
use crate::db::{Database, NewTransaction, TransactionPatch};
use crate::fx;
use crate::ledger::AccountRegistry;
use crate::models::{Currency, DeleteMode, EntryKind, Transaction};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, parse_range, pretty_table};

pub fn handle(
    db: &Database,
    registry: &AccountRegistry,
    fx_cfg: &FxConfig,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(db, registry, fx_cfg, sub)?,
        Some(("list", sub)) => list(db, sub)?,
        Some(("search", sub)) => search(db, sub)?,
        Some(("edit", sub)) => edit(db, sub)?,
        Some(("rm", sub)) => rm(db, sub)?,
        _ => {}
    }
    Ok(())
}

fn arg_kind(sub: &clap::ArgMatches) -> Result<EntryKind> {
    Ok(sub.get_one::<String>("kind").unwrap().parse()?)
}

fn add(
    db: &Database,
    registry: &AccountRegistry,
    fx_cfg: &FxConfig,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let kind = arg_kind(sub)?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Utc::now().date_naive(),
    };
    let description = sub.get_one::<String>("description").unwrap().clone();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let currency: Currency = sub.get_one::<String>("currency").unwrap().parse()?;
    let account = registry.resolve(sub.get_one::<String>("account").unwrap())?;

    // A user-entered rate wins; otherwise foreign entries snapshot the
    // current fetched rate.
    let exchange_rate = match sub.get_one::<String>("rate") {
        Some(s) => Some(parse_decimal(s)?),
        None if currency.is_base() => None,
        None => Some(fx::current_rate(fx_cfg)),
    };

    let tx = db.add_transaction(NewTransaction {
        kind,
        date,
        description,
        currency,
        amount,
        account,
        exchange_rate,
    })?;
    println!(
        "Recorded {} #{}: {} {} on {} ({} TRY, account {})",
        tx.kind,
        tx.id,
        fmt_money(&tx.amount),
        tx.currency.code(),
        tx.date,
        fmt_money(&tx.base_amount),
        tx.account,
    );
    Ok(())
}

pub fn query_rows(db: &Database, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let kind = arg_kind(sub)?;
    let active_only = !sub.get_flag("all");
    let range = parse_range(sub)?;
    let mut rows = db.list_transactions(kind, active_only, range)?;
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows)
}

fn print_rows(rows: &[Transaction]) {
    let data = rows
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.date.to_string(),
                t.kind.to_string(),
                t.description.clone(),
                t.currency.code().to_string(),
                fmt_money(&t.amount),
                t.exchange_rate.map(|r| r.to_string()).unwrap_or_default(),
                fmt_money(&t.base_amount),
                t.account.clone(),
                if t.active { String::new() } else { "deleted".into() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Kind", "Description", "CCY", "Amount", "Rate", "TRY", "Account", ""],
            data,
        )
    );
}

fn list(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let rows = query_rows(db, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        print_rows(&rows);
    }
    Ok(())
}

fn search(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let kind = arg_kind(sub)?;
    let term = sub.get_one::<String>("term").unwrap();
    let rows = db.search_transactions(kind, term)?;
    print_rows(&rows);
    Ok(())
}

fn edit(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let patch = TransactionPatch {
        date: sub
            .get_one::<String>("date")
            .map(|s| parse_date(s))
            .transpose()?,
        description: sub.get_one::<String>("description").cloned(),
        currency: sub
            .get_one::<String>("currency")
            .map(|s| s.parse())
            .transpose()?,
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        exchange_rate: sub
            .get_one::<String>("rate")
            .map(|s| parse_decimal(s))
            .transpose()?,
    };
    if db.update_transaction(id, patch)? {
        println!("Updated transaction {id}");
    } else {
        println!("Transaction {id} not found (or nothing to change)");
    }
    Ok(())
}

fn rm(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mode = if sub.get_flag("purge") {
        DeleteMode::Hard
    } else {
        DeleteMode::Soft
    };
    if db.delete_transaction(id, mode)? {
        match mode {
            DeleteMode::Soft => println!("Transaction {id} marked deleted (kept for audit)"),
            DeleteMode::Hard => println!("Transaction {id} removed permanently"),
        }
    } else {
        println!("Transaction {id} not found");
    }
    Ok(())
}
