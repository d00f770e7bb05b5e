// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed access to every tillbook table.
//!
//! `Database` wraps a `TableStore` and exposes the operations the pages
//! need. Validation happens here, before anything is sent to the store;
//! persistence failures abort the call with the prior state untouched.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::auth::{self, Role};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fx;
use crate::models::{
    Account, Contact, Currency, DailyOrder, DeleteMode, EntryKind, ImportShipment, PasswordEntry,
    StockItem, Transaction, User,
};
use crate::rest::RestStore;
use crate::store::{Filter, Row, Select, TableStore};

pub const TRANSACTIONS: &str = "transactions";
pub const STOCK: &str = "stock_table";
pub const DAILY_ORDERS: &str = "daily_orders";
pub const CONTACTS: &str = "contacts";
pub const PASSWORDS: &str = "passwords";
pub const USERS: &str = "users";
pub const IMPORTS: &str = "imports";

pub struct Database {
    store: Box<dyn TableStore>,
}

fn to_row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

fn from_row<T: DeserializeOwned>(row: Row) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

fn from_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>> {
    rows.into_iter().map(from_row).collect()
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_positive_amount(field: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(Error::Validation(format!("{field} must be positive")));
    }
    Ok(())
}

fn require_positive_count(field: &str, value: i64) -> Result<()> {
    if value <= 0 {
        return Err(Error::Validation(format!("{field} must be positive")));
    }
    Ok(())
}

/// Input for a new ledger entry. The account is a resolved registry entry,
/// so only registered ids ever reach the table.
#[derive(Debug, Clone)]
pub struct NewTransaction<'a> {
    pub kind: EntryKind,
    pub date: NaiveDate,
    pub description: String,
    pub currency: Currency,
    pub amount: Decimal,
    pub account: &'a Account,
    pub exchange_rate: Option<Decimal>,
}

/// Partial in-place update of a ledger entry.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub currency: Option<Currency>,
    pub amount: Option<Decimal>,
    pub exchange_rate: Option<Decimal>,
}

#[derive(Debug, Clone, Default)]
pub struct StockPatch {
    pub product_name: Option<String>,
    pub quantity: Option<i64>,
    pub real_stock: Option<i64>,
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub product_code: String,
    pub customer_name: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub order_date: NaiveDate,
    pub is_real_order: bool,
    /// Permit the order even when quantity exceeds the tracked stock;
    /// counters clamp at zero instead of failing.
    pub allow_shortage: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub customer_name: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price: Option<Decimal>,
    pub order_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportPatch {
    pub product_name: Option<String>,
    pub quantity: Option<i64>,
    pub date: Option<NaiveDate>,
    pub status: Option<String>,
    pub sub_status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdersSummary {
    pub total_orders: usize,
    pub total_amount: Decimal,
}

impl Database {
    pub fn new(store: Box<dyn TableStore>) -> Self {
        Self { store }
    }

    /// Connects to the hosted backend named in the config.
    pub fn open(cfg: &Config) -> Result<Self> {
        let store = RestStore::new(&cfg.store.url, &cfg.store.key)?;
        Ok(Self::new(Box::new(store)))
    }

    /// One cheap select to prove the backend is reachable.
    pub fn ping(&self) -> Result<()> {
        self.store
            .select(TRANSACTIONS, &Select::new().limit(1))
            .map(|_| ())
    }

    // ---- transactions ----

    pub fn add_transaction(&self, new: NewTransaction<'_>) -> Result<Transaction> {
        require("description", &new.description)?;
        require_positive_amount("amount", new.amount)?;
        let base_amount = fx::normalize(new.amount, new.currency, new.exchange_rate)?;
        let rate = if new.currency.is_base() {
            None
        } else {
            new.exchange_rate
        };
        let row = to_row(json!({
            "type": new.kind,
            "date": new.date,
            "description": new.description.trim(),
            "currency": new.currency,
            "amount": new.amount,
            "account": new.account.id,
            "exchange_rate": rate,
            "base_amount": base_amount,
            "active": true,
        }));
        debug!(kind = %new.kind, account = %new.account.id, "add transaction");
        from_row(self.store.insert(TRANSACTIONS, row)?)
    }

    pub fn list_transactions(
        &self,
        kind: EntryKind,
        active_only: bool,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<Transaction>> {
        let mut q = Select::new()
            .filter(Filter::eq("type", json!(kind)))
            .order("date", true);
        if active_only {
            q = q.filter(Filter::eq("active", true));
        }
        if let Some((start, end)) = range {
            q = q
                .filter(Filter::gte("date", start.to_string()))
                .filter(Filter::lte("date", end.to_string()));
        }
        from_rows(self.store.select(TRANSACTIONS, &q)?)
    }

    pub fn search_transactions(&self, kind: EntryKind, term: &str) -> Result<Vec<Transaction>> {
        let q = Select::new()
            .filter(Filter::eq("type", json!(kind)))
            .filter(Filter::eq("active", true))
            .filter(Filter::ilike("description", &format!("%{term}%")))
            .order("date", true);
        from_rows(self.store.select(TRANSACTIONS, &q)?)
    }

    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let rows = self
            .store
            .select(TRANSACTIONS, &Select::new().filter(Filter::eq("id", id)))?;
        rows.into_iter().next().map(from_row).transpose()
    }

    /// One deletion API for every call site; the mode is the caller's
    /// explicit choice. `Ok(false)` when the id does not exist.
    pub fn delete_transaction(&self, id: i64, mode: DeleteMode) -> Result<bool> {
        let filters = [Filter::eq("id", id)];
        let affected = match mode {
            DeleteMode::Soft => self
                .store
                .update(TRANSACTIONS, &filters, to_row(json!({ "active": false })))?,
            DeleteMode::Hard => self.store.delete(TRANSACTIONS, &filters)?,
        };
        Ok(!affected.is_empty())
    }

    /// True in-place update preserving the id. `base_amount` is re-derived
    /// only when the patch touches `amount`, `currency` or `exchange_rate`,
    /// and always from the merged stored values, never a fresh rate.
    pub fn update_transaction(&self, id: i64, patch: TransactionPatch) -> Result<bool> {
        if let Some(d) = &patch.description {
            require("description", d)?;
        }
        if let Some(a) = patch.amount {
            require_positive_amount("amount", a)?;
        }

        let mut row = Row::new();
        if let Some(date) = patch.date {
            row.insert("date".into(), json!(date));
        }
        if let Some(description) = &patch.description {
            row.insert("description".into(), json!(description.trim()));
        }

        let money_touched =
            patch.amount.is_some() || patch.currency.is_some() || patch.exchange_rate.is_some();
        if money_touched {
            let Some(current) = self.get_transaction(id)? else {
                return Ok(false);
            };
            let currency = patch.currency.unwrap_or(current.currency);
            let amount = patch.amount.unwrap_or(current.amount);
            let rate = patch.exchange_rate.or(current.exchange_rate);
            let base_amount = fx::normalize(amount, currency, rate)?;
            row.insert("currency".into(), json!(currency));
            row.insert("amount".into(), json!(amount));
            row.insert(
                "exchange_rate".into(),
                json!(if currency.is_base() { None } else { rate }),
            );
            row.insert("base_amount".into(), json!(base_amount));
        }

        if row.is_empty() {
            return Ok(false);
        }
        let affected = self
            .store
            .update(TRANSACTIONS, &[Filter::eq("id", id)], row)?;
        Ok(!affected.is_empty())
    }

    // ---- stock ----

    pub fn add_stock_item(
        &self,
        product_code: &str,
        product_name: &str,
        quantity: i64,
        unit_price: Decimal,
        real_stock: Option<i64>,
    ) -> Result<StockItem> {
        require("product code", product_code)?;
        require("product name", product_name)?;
        require_positive_count("quantity", quantity)?;
        require_positive_amount("unit price", unit_price)?;
        if self.stock_item_by_code(product_code)?.is_some() {
            return Err(Error::Validation(format!(
                "product code '{product_code}' already exists"
            )));
        }
        let row = to_row(json!({
            "product_code": product_code,
            "product_name": product_name,
            "quantity": quantity,
            "real_stock": real_stock.unwrap_or(quantity),
            "unit_price": unit_price,
        }));
        from_row(self.store.insert(STOCK, row)?)
    }

    pub fn list_stock_items(&self) -> Result<Vec<StockItem>> {
        from_rows(
            self.store
                .select(STOCK, &Select::new().order("product_name", false))?,
        )
    }

    pub fn stock_item_by_code(&self, product_code: &str) -> Result<Option<StockItem>> {
        let rows = self.store.select(
            STOCK,
            &Select::new().filter(Filter::eq("product_code", product_code)),
        )?;
        rows.into_iter().next().map(from_row).transpose()
    }

    /// Overwrites the tracked counters for one product, clamped at zero.
    pub fn set_stock_quantities(
        &self,
        product_code: &str,
        quantity: i64,
        real_stock: Option<i64>,
    ) -> Result<bool> {
        let mut row = to_row(json!({ "quantity": quantity.max(0) }));
        if let Some(real) = real_stock {
            row.insert("real_stock".into(), json!(real.max(0)));
        }
        let affected = self
            .store
            .update(STOCK, &[Filter::eq("product_code", product_code)], row)?;
        Ok(!affected.is_empty())
    }

    pub fn update_stock_item(&self, id: i64, patch: StockPatch) -> Result<bool> {
        let mut row = Row::new();
        if let Some(name) = &patch.product_name {
            require("product name", name)?;
            row.insert("product_name".into(), json!(name));
        }
        if let Some(q) = patch.quantity {
            require_positive_count("quantity", q)?;
            row.insert("quantity".into(), json!(q));
        }
        if let Some(r) = patch.real_stock {
            row.insert("real_stock".into(), json!(r.max(0)));
        }
        if let Some(p) = patch.unit_price {
            require_positive_amount("unit price", p)?;
            row.insert("unit_price".into(), json!(p));
        }
        if row.is_empty() {
            return Ok(false);
        }
        let affected = self.store.update(STOCK, &[Filter::eq("id", id)], row)?;
        Ok(!affected.is_empty())
    }

    pub fn delete_stock_item(&self, id: i64) -> Result<bool> {
        Ok(!self.store.delete(STOCK, &[Filter::eq("id", id)])?.is_empty())
    }

    /// Item count and total inventory value (quantity x unit price).
    pub fn stock_statistics(&self) -> Result<(usize, Decimal)> {
        let items = self.list_stock_items()?;
        let value = items
            .iter()
            .map(|i| Decimal::from(i.quantity) * i.unit_price)
            .sum();
        Ok((items.len(), value))
    }

    // ---- daily orders ----

    /// Records an order and walks the linked stock item down by the ordered
    /// quantity; a real order also consumes physical stock. Both counters
    /// clamp at zero. Without `allow_shortage`, ordering more than the
    /// tracked quantity is rejected.
    pub fn add_daily_order(&self, new: NewOrder) -> Result<DailyOrder> {
        require("product code", &new.product_code)?;
        require("customer name", &new.customer_name)?;
        require("product name", &new.product_name)?;
        require_positive_count("quantity", new.quantity)?;
        require_positive_amount("unit price", new.unit_price)?;

        let stock = self
            .stock_item_by_code(&new.product_code)?
            .ok_or_else(|| Error::NotFound(format!("product '{}' in stock", new.product_code)))?;

        if new.quantity > stock.quantity && !new.allow_shortage {
            return Err(Error::Validation(format!(
                "insufficient stock for '{}': {} available, {} ordered",
                new.product_code, stock.quantity, new.quantity
            )));
        }

        let remaining = stock.quantity - new.quantity;
        let remaining_real = if new.is_real_order {
            Some(stock.real_stock - new.quantity)
        } else {
            None
        };
        self.set_stock_quantities(&new.product_code, remaining, remaining_real)?;

        let total_amount = Decimal::from(new.quantity) * new.unit_price;
        let row = to_row(json!({
            "product_code": new.product_code,
            "customer_name": new.customer_name,
            "product_name": new.product_name,
            "quantity": new.quantity,
            "unit_price": new.unit_price,
            "total_amount": total_amount,
            "order_date": new.order_date,
            "is_real_order": new.is_real_order,
        }));
        debug!(product = %new.product_code, quantity = new.quantity, "add daily order");
        from_row(self.store.insert(DAILY_ORDERS, row)?)
    }

    pub fn list_daily_orders(&self, order_date: Option<NaiveDate>) -> Result<Vec<DailyOrder>> {
        let mut q = Select::new().order("order_date", true);
        if let Some(date) = order_date {
            q = q.filter(Filter::eq("order_date", date.to_string()));
        }
        from_rows(self.store.select(DAILY_ORDERS, &q)?)
    }

    pub fn search_daily_orders(
        &self,
        term: &str,
        order_date: Option<NaiveDate>,
    ) -> Result<Vec<DailyOrder>> {
        let pattern = format!("%{term}%");
        let mut q = Select::new().any_of(vec![
            Filter::ilike("customer_name", &pattern),
            Filter::ilike("product_name", &pattern),
            Filter::ilike("product_code", &pattern),
        ]);
        if let Some(date) = order_date {
            q = q.filter(Filter::eq("order_date", date.to_string()));
        }
        from_rows(self.store.select(DAILY_ORDERS, &q)?)
    }

    /// Updates an order in place; `total_amount` follows whenever quantity
    /// or unit price changes.
    pub fn update_daily_order(&self, id: i64, patch: OrderPatch) -> Result<bool> {
        let mut row = Row::new();
        if let Some(c) = &patch.customer_name {
            require("customer name", c)?;
            row.insert("customer_name".into(), json!(c));
        }
        if let Some(p) = &patch.product_name {
            require("product name", p)?;
            row.insert("product_name".into(), json!(p));
        }
        if let Some(d) = patch.order_date {
            row.insert("order_date".into(), json!(d));
        }
        if patch.quantity.is_some() || patch.unit_price.is_some() {
            let current: Option<DailyOrder> = self
                .store
                .select(DAILY_ORDERS, &Select::new().filter(Filter::eq("id", id)))?
                .into_iter()
                .next()
                .map(from_row)
                .transpose()?;
            let Some(current) = current else {
                return Ok(false);
            };
            let quantity = patch.quantity.unwrap_or(current.quantity);
            let unit_price = patch.unit_price.unwrap_or(current.unit_price);
            require_positive_count("quantity", quantity)?;
            require_positive_amount("unit price", unit_price)?;
            row.insert("quantity".into(), json!(quantity));
            row.insert("unit_price".into(), json!(unit_price));
            row.insert(
                "total_amount".into(),
                json!(Decimal::from(quantity) * unit_price),
            );
        }
        if row.is_empty() {
            return Ok(false);
        }
        let affected = self
            .store
            .update(DAILY_ORDERS, &[Filter::eq("id", id)], row)?;
        Ok(!affected.is_empty())
    }

    pub fn delete_daily_order(&self, id: i64) -> Result<bool> {
        Ok(!self
            .store
            .delete(DAILY_ORDERS, &[Filter::eq("id", id)])?
            .is_empty())
    }

    pub fn daily_orders_summary(&self, order_date: Option<NaiveDate>) -> Result<OrdersSummary> {
        let orders = self.list_daily_orders(order_date)?;
        Ok(OrdersSummary {
            total_orders: orders.len(),
            total_amount: orders.iter().map(|o| o.total_amount).sum(),
        })
    }

    // ---- contacts ----

    pub fn add_contact(&self, name: &str, phone: &str, description: &str) -> Result<Contact> {
        require("name", name)?;
        crate::utils::validate_phone(phone)?;
        let row = to_row(json!({
            "name": name,
            "phone": phone,
            "description": description,
        }));
        from_row(self.store.insert(CONTACTS, row)?)
    }

    pub fn list_contacts(&self) -> Result<Vec<Contact>> {
        from_rows(self.store.select(CONTACTS, &Select::new().order("id", true))?)
    }

    pub fn search_contacts(&self, term: &str) -> Result<Vec<Contact>> {
        let pattern = format!("%{term}%");
        let q = Select::new()
            .any_of(vec![
                Filter::ilike("name", &pattern),
                Filter::ilike("phone", &pattern),
                Filter::ilike("description", &pattern),
            ])
            .order("name", false);
        from_rows(self.store.select(CONTACTS, &q)?)
    }

    pub fn update_contact(
        &self,
        id: i64,
        name: &str,
        phone: &str,
        description: &str,
    ) -> Result<bool> {
        require("name", name)?;
        crate::utils::validate_phone(phone)?;
        let row = to_row(json!({
            "name": name,
            "phone": phone,
            "description": description,
        }));
        let affected = self.store.update(CONTACTS, &[Filter::eq("id", id)], row)?;
        Ok(!affected.is_empty())
    }

    pub fn delete_contact(&self, id: i64) -> Result<bool> {
        Ok(!self
            .store
            .delete(CONTACTS, &[Filter::eq("id", id)])?
            .is_empty())
    }

    // ---- passwords ----

    pub fn add_password(
        &self,
        platform: &str,
        username: &str,
        password: &str,
        description: &str,
    ) -> Result<PasswordEntry> {
        require("platform", platform)?;
        require("username", username)?;
        require("password", password)?;
        let row = to_row(json!({
            "platform": platform,
            "username": username,
            "password": password,
            "description": description,
        }));
        from_row(self.store.insert(PASSWORDS, row)?)
    }

    pub fn list_passwords(&self) -> Result<Vec<PasswordEntry>> {
        from_rows(self.store.select(PASSWORDS, &Select::new())?)
    }

    pub fn search_passwords(&self, term: &str) -> Result<Vec<PasswordEntry>> {
        let pattern = format!("%{term}%");
        let q = Select::new().any_of(vec![
            Filter::ilike("platform", &pattern),
            Filter::ilike("username", &pattern),
            Filter::ilike("description", &pattern),
        ]);
        from_rows(self.store.select(PASSWORDS, &q)?)
    }

    pub fn update_password(
        &self,
        id: i64,
        platform: &str,
        username: &str,
        password: &str,
        description: &str,
    ) -> Result<bool> {
        require("platform", platform)?;
        require("username", username)?;
        require("password", password)?;
        let row = to_row(json!({
            "platform": platform,
            "username": username,
            "password": password,
            "description": description,
        }));
        let affected = self.store.update(PASSWORDS, &[Filter::eq("id", id)], row)?;
        Ok(!affected.is_empty())
    }

    pub fn delete_password(&self, id: i64) -> Result<bool> {
        Ok(!self
            .store
            .delete(PASSWORDS, &[Filter::eq("id", id)])?
            .is_empty())
    }

    pub fn delete_all_passwords(&self) -> Result<usize> {
        Ok(self
            .store
            .delete(PASSWORDS, &[Filter::neq("id", 0)])?
            .len())
    }

    // ---- users ----

    pub fn add_user(&self, username: &str, password: &str, role: Role) -> Result<User> {
        require("username", username)?;
        require("password", password)?;
        if self.user_by_username(username)?.is_some() {
            return Err(Error::Validation(format!(
                "username '{username}' already exists"
            )));
        }
        let row = to_row(json!({
            "username": username,
            "password_hash": auth::hash_password(password)?,
            "role": role,
        }));
        from_row(self.store.insert(USERS, row)?)
    }

    pub fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        let rows = self.store.select(
            USERS,
            &Select::new().filter(Filter::eq("username", username)),
        )?;
        rows.into_iter().next().map(from_row).transpose()
    }

    /// `Ok(None)` on unknown user or wrong password; an error only when the
    /// store or the stored hash is broken.
    pub fn verify_user(&self, username: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.user_by_username(username)? else {
            return Ok(None);
        };
        if auth::verify_password(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    // ---- import shipments ----

    pub fn add_import(
        &self,
        product_name: &str,
        quantity: i64,
        date: NaiveDate,
        status: &str,
        sub_status: &str,
        notes: &str,
    ) -> Result<ImportShipment> {
        require("product name", product_name)?;
        require("status", status)?;
        require_positive_count("quantity", quantity)?;
        let row = to_row(json!({
            "product_name": product_name,
            "quantity": quantity,
            "date": date,
            "status": status,
            "sub_status": sub_status,
            "notes": notes,
        }));
        from_row(self.store.insert(IMPORTS, row)?)
    }

    pub fn list_imports(&self) -> Result<Vec<ImportShipment>> {
        from_rows(self.store.select(IMPORTS, &Select::new().order("date", true))?)
    }

    pub fn update_import(&self, id: i64, patch: ImportPatch) -> Result<bool> {
        let mut row = Row::new();
        if let Some(p) = &patch.product_name {
            require("product name", p)?;
            row.insert("product_name".into(), json!(p));
        }
        if let Some(q) = patch.quantity {
            require_positive_count("quantity", q)?;
            row.insert("quantity".into(), json!(q));
        }
        if let Some(d) = patch.date {
            row.insert("date".into(), json!(d));
        }
        if let Some(s) = &patch.status {
            require("status", s)?;
            row.insert("status".into(), json!(s));
        }
        if let Some(s) = &patch.sub_status {
            row.insert("sub_status".into(), json!(s));
        }
        if let Some(n) = &patch.notes {
            row.insert("notes".into(), json!(n));
        }
        if row.is_empty() {
            return Ok(false);
        }
        let affected = self.store.update(IMPORTS, &[Filter::eq("id", id)], row)?;
        Ok(!affected.is_empty())
    }

    pub fn delete_import(&self, id: i64) -> Result<bool> {
        Ok(!self
            .store
            .delete(IMPORTS, &[Filter::eq("id", id)])?
            .is_empty())
    }
}
