// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::db::{Database, ImportPatch};
use crate::models::ImportShipment;
use crate::utils::{maybe_print_json, parse_date, pretty_table};

pub fn handle(db: &Database, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(db, sub)?,
        Some(("list", sub)) => list(db, sub)?,
        Some(("edit", sub)) => edit(db, sub)?,
        Some(("rm", sub)) => rm(db, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Utc::now().date_naive(),
    };
    let s = db.add_import(
        sub.get_one::<String>("product").unwrap(),
        *sub.get_one::<i64>("quantity").unwrap(),
        date,
        sub.get_one::<String>("status").unwrap(),
        sub.get_one::<String>("sub-status").unwrap(),
        sub.get_one::<String>("notes").unwrap(),
    )?;
    println!("Tracking shipment #{}: {} x {}", s.id, s.quantity, s.product_name);
    Ok(())
}

fn list(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let shipments = db.list_imports()?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &shipments)? {
        print_shipments(&shipments);
    }
    Ok(())
}

fn edit(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let patch = ImportPatch {
        product_name: sub.get_one::<String>("product").cloned(),
        quantity: sub.get_one::<i64>("quantity").copied(),
        date: sub
            .get_one::<String>("date")
            .map(|s| parse_date(s))
            .transpose()?,
        status: sub.get_one::<String>("status").cloned(),
        sub_status: sub.get_one::<String>("sub-status").cloned(),
        notes: sub.get_one::<String>("notes").cloned(),
    };
    if db.update_import(id, patch)? {
        println!("Updated shipment {id}");
    } else {
        println!("Shipment {id} not found (or nothing to change)");
    }
    Ok(())
}

fn rm(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if db.delete_import(id)? {
        println!("Removed shipment {id}");
    } else {
        println!("Shipment {id} not found");
    }
    Ok(())
}

fn print_shipments(shipments: &[ImportShipment]) {
    let data = shipments
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.date.to_string(),
                s.product_name.clone(),
                s.quantity.to_string(),
                s.status.clone(),
                s.sub_status.clone(),
                s.notes.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Product", "Qty", "Status", "Sub-status", "Notes"],
            data,
        )
    );
}
