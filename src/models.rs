// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl std::str::FromStr for EntryKind {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(EntryKind::Income),
            "expense" => Ok(EntryKind::Expense),
            other => Err(crate::error::Error::Validation(format!(
                "unknown entry kind '{other}' (income or expense)"
            ))),
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Income => write!(f, "income"),
            EntryKind::Expense => write!(f, "expense"),
        }
    }
}

/// TRY is the base currency of every ledger; USD is the single supported
/// foreign currency and always carries a snapshot exchange rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "TRY")]
    Try,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn is_base(self) -> bool {
        matches!(self, Currency::Try)
    }

    pub fn code(self) -> &'static str {
        match self {
            Currency::Try => "TRY",
            Currency::Usd => "USD",
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRY" | "TL" => Ok(Currency::Try),
            "USD" => Ok(Currency::Usd),
            other => Err(crate::error::Error::Validation(format!(
                "unsupported currency '{other}' (expected TRY or USD)"
            ))),
        }
    }
}

/// One ledger entry. `base_amount` is derived once at insert time from the
/// snapshot `exchange_rate` and is never recomputed when rates move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub date: NaiveDate,
    pub description: String,
    pub currency: Currency,
    pub amount: Decimal,
    pub account: String,
    #[serde(default)]
    pub exchange_rate: Option<Decimal>,
    pub base_amount: Decimal,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// A registered cash account. The `id` is the stable partition tag stored
/// on every transaction; the `name` is what pages display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
}

/// How a deletion should behave at a given call site: soft keeps the row
/// for audit with `active = false`, hard removes it permanently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    Soft,
    Hard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockItem {
    pub id: i64,
    pub product_code: String,
    pub product_name: String,
    pub quantity: i64,
    pub real_stock: i64,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyOrder {
    pub id: i64,
    pub product_code: String,
    pub customer_name: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub order_date: NaiveDate,
    pub is_real_order: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordEntry {
    pub id: i64,
    pub platform: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportShipment {
    pub id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub date: NaiveDate,
    pub status: String,
    #[serde(default)]
    pub sub_status: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: crate::auth::Role,
}
