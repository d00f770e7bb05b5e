// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde_json::json;

use crate::db::Database;
use crate::models::{EntryKind, Transaction};
use crate::utils::parse_range;

pub fn handle(db: &Database, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(db, sub),
        _ => Ok(()),
    }
}

pub fn collect_rows(db: &Database, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let range = parse_range(sub)?;
    let kinds: Vec<EntryKind> = match sub.get_one::<String>("kind") {
        Some(k) => vec![k.parse()?],
        None => vec![EntryKind::Income, EntryKind::Expense],
    };
    let mut rows = Vec::new();
    for kind in kinds {
        rows.extend(db.list_transactions(kind, true, range)?);
    }
    // Oldest first, the way spreadsheets want it.
    rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    Ok(rows)
}

fn export_transactions(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let rows = collect_rows(db, sub)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "kind",
                "description",
                "currency",
                "amount",
                "exchange_rate",
                "base_amount",
                "account",
            ])?;
            for t in &rows {
                wtr.write_record([
                    t.date.to_string(),
                    t.kind.to_string(),
                    t.description.clone(),
                    t.currency.code().to_string(),
                    t.amount.to_string(),
                    t.exchange_rate.map(|r| r.to_string()).unwrap_or_default(),
                    t.base_amount.to_string(),
                    t.account.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .iter()
                .map(|t| {
                    json!({
                        "date": t.date,
                        "kind": t.kind,
                        "description": t.description,
                        "currency": t.currency,
                        "amount": t.amount,
                        "exchange_rate": t.exchange_rate,
                        "base_amount": t.base_amount,
                        "account": t.account,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
