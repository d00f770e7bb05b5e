// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::db::{Database, NewOrder, OrderPatch};
use crate::models::DailyOrder;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(db: &Database, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(db, sub)?,
        Some(("list", sub)) => list(db, sub)?,
        Some(("search", sub)) => search(db, sub)?,
        Some(("edit", sub)) => edit(db, sub)?,
        Some(("rm", sub)) => rm(db, sub)?,
        Some(("summary", sub)) => summary(db, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let order_date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Utc::now().date_naive(),
    };
    let order = db.add_daily_order(NewOrder {
        product_code: sub.get_one::<String>("code").unwrap().clone(),
        customer_name: sub.get_one::<String>("customer").unwrap().clone(),
        product_name: sub.get_one::<String>("product").unwrap().clone(),
        quantity: *sub.get_one::<i64>("quantity").unwrap(),
        unit_price: parse_decimal(sub.get_one::<String>("price").unwrap())?,
        order_date,
        is_real_order: !sub.get_flag("not-real"),
        allow_shortage: sub.get_flag("allow-shortage"),
    })?;
    println!(
        "Order #{} for {}: {} x {} = {} TRY",
        order.id,
        order.customer_name,
        order.quantity,
        order.product_name,
        fmt_money(&order.total_amount),
    );
    Ok(())
}

fn print_orders(orders: &[DailyOrder]) {
    let data = orders
        .iter()
        .map(|o| {
            vec![
                o.id.to_string(),
                o.order_date.to_string(),
                o.customer_name.clone(),
                o.product_code.clone(),
                o.product_name.clone(),
                o.quantity.to_string(),
                fmt_money(&o.unit_price),
                fmt_money(&o.total_amount),
                if o.is_real_order { String::new() } else { "reserved".into() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Customer", "Code", "Product", "Qty", "Unit", "Total", ""],
            data,
        )
    );
}

fn arg_date(sub: &clap::ArgMatches) -> Result<Option<chrono::NaiveDate>> {
    if sub.try_get_one::<bool>("today").ok().flatten() == Some(&true) {
        return Ok(Some(chrono::Utc::now().date_naive()));
    }
    sub.get_one::<String>("date")
        .map(|s| parse_date(s))
        .transpose()
}

fn list(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let orders = db.list_daily_orders(arg_date(sub)?)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &orders)? {
        print_orders(&orders);
    }
    Ok(())
}

fn search(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let term = sub.get_one::<String>("term").unwrap();
    let orders = db.search_daily_orders(term, arg_date(sub)?)?;
    print_orders(&orders);
    Ok(())
}

fn edit(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let patch = OrderPatch {
        customer_name: sub.get_one::<String>("customer").cloned(),
        product_name: sub.get_one::<String>("product").cloned(),
        quantity: sub.get_one::<i64>("quantity").copied(),
        unit_price: sub
            .get_one::<String>("price")
            .map(|s| parse_decimal(s))
            .transpose()?,
        order_date: sub
            .get_one::<String>("date")
            .map(|s| parse_date(s))
            .transpose()?,
    };
    if db.update_daily_order(id, patch)? {
        println!("Updated order {id}");
    } else {
        println!("Order {id} not found (or nothing to change)");
    }
    Ok(())
}

fn rm(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if db.delete_daily_order(id)? {
        println!("Removed order {id}");
    } else {
        println!("Order {id} not found");
    }
    Ok(())
}

fn summary(db: &Database, sub: &clap::ArgMatches) -> Result<()> {
    let date = sub
        .get_one::<String>("date")
        .map(|s| parse_date(s))
        .transpose()?;
    let s = db.daily_orders_summary(date)?;
    println!(
        "{} orders, {} TRY total",
        s.total_orders,
        fmt_money(&s.total_amount)
    );
    Ok(())
}
