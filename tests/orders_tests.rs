// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tillbook::db::{Database, NewOrder, OrderPatch};
use tillbook::error::Error;
use tillbook::store::MemoryStore;

fn setup() -> Database {
    let db = Database::new(Box::new(MemoryStore::new()));
    db.add_stock_item("P1", "Copper Fitting", 10, dec!(25), None)
        .unwrap();
    db
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn order(quantity: i64) -> NewOrder {
    NewOrder {
        product_code: "P1".to_string(),
        customer_name: "Acme".to_string(),
        product_name: "Copper Fitting".to_string(),
        quantity,
        unit_price: dec!(25),
        order_date: date("2025-06-01"),
        is_real_order: true,
        allow_shortage: false,
    }
}

#[test]
fn real_order_consumes_both_counters() {
    let db = setup();
    let o = db.add_daily_order(order(5)).unwrap();
    assert_eq!(o.total_amount, dec!(125));

    let stock = db.stock_item_by_code("P1").unwrap().unwrap();
    assert_eq!(stock.quantity, 5);
    assert_eq!(stock.real_stock, 5);
}

#[test]
fn reservation_leaves_physical_stock_alone() {
    let db = setup();
    db.add_daily_order(NewOrder {
        is_real_order: false,
        ..order(5)
    })
    .unwrap();
    let stock = db.stock_item_by_code("P1").unwrap().unwrap();
    assert_eq!(stock.quantity, 5);
    assert_eq!(stock.real_stock, 10);
}

#[test]
fn shortage_is_rejected_without_the_override() {
    let db = setup();
    let err = db.add_daily_order(order(12)).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // Nothing moved and nothing was recorded.
    let stock = db.stock_item_by_code("P1").unwrap().unwrap();
    assert_eq!(stock.quantity, 10);
    assert_eq!(stock.real_stock, 10);
    assert!(db.list_daily_orders(None).unwrap().is_empty());
}

#[test]
fn shortage_override_clamps_counters_at_zero() {
    let db = setup();
    let o = db
        .add_daily_order(NewOrder {
            allow_shortage: true,
            ..order(12)
        })
        .unwrap();
    assert_eq!(o.quantity, 12);
    let stock = db.stock_item_by_code("P1").unwrap().unwrap();
    assert_eq!(stock.quantity, 0);
    assert_eq!(stock.real_stock, 0);
}

#[test]
fn unknown_product_is_not_found() {
    let db = setup();
    let err = db
        .add_daily_order(NewOrder {
            product_code: "NOPE".to_string(),
            ..order(1)
        })
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn edit_recomputes_the_total() {
    let db = setup();
    let o = db.add_daily_order(order(5)).unwrap();
    db.update_daily_order(
        o.id,
        OrderPatch {
            quantity: Some(4),
            unit_price: Some(dec!(30)),
            ..Default::default()
        },
    )
    .unwrap();
    let orders = db.list_daily_orders(None).unwrap();
    assert_eq!(orders[0].total_amount, dec!(120));

    // A name-only edit leaves the total untouched.
    db.update_daily_order(
        o.id,
        OrderPatch {
            customer_name: Some("Acme Ltd".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    let orders = db.list_daily_orders(None).unwrap();
    assert_eq!(orders[0].total_amount, dec!(120));
    assert_eq!(orders[0].customer_name, "Acme Ltd");
}

#[test]
fn summary_counts_and_sums_by_date() {
    let db = setup();
    db.add_daily_order(order(2)).unwrap();
    db.add_daily_order(NewOrder {
        order_date: date("2025-06-02"),
        ..order(3)
    })
    .unwrap();

    let all = db.daily_orders_summary(None).unwrap();
    assert_eq!(all.total_orders, 2);
    assert_eq!(all.total_amount, dec!(125));

    let first_day = db.daily_orders_summary(Some(date("2025-06-01"))).unwrap();
    assert_eq!(first_day.total_orders, 1);
    assert_eq!(first_day.total_amount, dec!(50));
}

#[test]
fn search_spans_customer_product_and_code() {
    let db = setup();
    db.add_daily_order(order(1)).unwrap();
    db.add_daily_order(NewOrder {
        customer_name: "Bolt & Sons".to_string(),
        ..order(1)
    })
    .unwrap();

    assert_eq!(db.search_daily_orders("acme", None).unwrap().len(), 1);
    assert_eq!(db.search_daily_orders("copper", None).unwrap().len(), 2);
    assert_eq!(db.search_daily_orders("p1", None).unwrap().len(), 2);
}
