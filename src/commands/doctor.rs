// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::db::Database;
use crate::ledger::AccountRegistry;
use crate::models::EntryKind;
use crate::utils::pretty_table;

/// Connectivity check plus the consistency lints that bit the previous
/// generation of this tool: entries tagged with unregistered accounts and
/// foreign entries missing their snapshot rate.
pub fn handle(db: &Database, registry: &AccountRegistry) -> Result<()> {
    db.ping()?;
    println!("Backend reachable.");

    let mut rows = Vec::new();
    for kind in [EntryKind::Income, EntryKind::Expense] {
        for t in db.list_transactions(kind, false, None)? {
            if registry.resolve(&t.account).is_err() {
                rows.push(vec![
                    "unregistered_account".to_string(),
                    format!("transaction {} tagged '{}'", t.id, t.account),
                ]);
            }
            if !t.currency.is_base() && t.exchange_rate.is_none() {
                rows.push(vec![
                    "missing_rate".to_string(),
                    format!("transaction {} ({} {})", t.id, t.amount, t.currency.code()),
                ]);
            }
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
