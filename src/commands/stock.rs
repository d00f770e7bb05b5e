// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::db::{Database, StockPatch};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};

pub fn handle(db: &Database, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(db, sub)?,
        Some(("list", sub)) => list(db, sub)?,
        Some(("edit", sub)) => edit(db, sub)?,
        Some(("rm", sub)) => rm(db, sub)?,
        Some(("stats", _)) => stats(db)?,
        _ => {}
    }
    Ok(())
}

fn add(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let code = sub.get_one::<String>("code").unwrap();
    let name = sub.get_one::<String>("name").unwrap();
    let quantity = *sub.get_one::<i64>("quantity").unwrap();
    let price = parse_decimal(sub.get_one::<String>("price").unwrap())?;
    let real_stock = sub.get_one::<i64>("real-stock").copied();
    let item = db.add_stock_item(code, name, quantity, price, real_stock)?;
    println!(
        "Added stock item '{}' ({}): {} on hand, {} physical",
        item.product_name, item.product_code, item.quantity, item.real_stock
    );
    Ok(())
}

fn list(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let items = db.list_stock_items()?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
        let data = items
            .iter()
            .map(|i| {
                vec![
                    i.id.to_string(),
                    i.product_code.clone(),
                    i.product_name.clone(),
                    i.quantity.to_string(),
                    i.real_stock.to_string(),
                    fmt_money(&i.unit_price),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Code", "Name", "Quantity", "Physical", "Unit price"],
                data,
            )
        );
    }
    Ok(())
}

fn edit(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let patch = StockPatch {
        product_name: sub.get_one::<String>("name").cloned(),
        quantity: sub.get_one::<i64>("quantity").copied(),
        real_stock: sub.get_one::<i64>("real-stock").copied(),
        unit_price: sub
            .get_one::<String>("price")
            .map(|s| parse_decimal(s))
            .transpose()?,
    };
    if db.update_stock_item(id, patch)? {
        println!("Updated stock item {id}");
    } else {
        println!("Stock item {id} not found (or nothing to change)");
    }
    Ok(())
}

fn rm(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if db.delete_stock_item(id)? {
        println!("Removed stock item {id}");
    } else {
        println!("Stock item {id} not found");
    }
    Ok(())
}

fn stats(db: &Database) -> Result<()> {
    let (count, value) = db.stock_statistics()?;
    println!("{} items, total value {} TRY", count, fmt_money(&value));
    Ok(())
}
