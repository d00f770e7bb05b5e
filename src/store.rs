// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Abstraction over the hosted table store.
//!
//! Every entity in tillbook lives in a named remote table with
//! auto-increment ids. The trait below captures the operations the hosted
//! API exposes (filtered select, insert, filtered update/delete returning
//! the affected rows); `MemoryStore` is a faithful in-process stand-in used
//! by the test suite.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::error::{Error, Result};

/// A single row as it travels over the wire: a JSON object keyed by column.
pub type Row = serde_json::Map<String, Value>;

#[derive(Debug, Clone)]
pub enum Filter {
    Eq(String, Value),
    Neq(String, Value),
    Gte(String, Value),
    Lte(String, Value),
    /// Case-insensitive pattern match, `%` wildcards at either end.
    Ilike(String, String),
}

impl Filter {
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Filter::Eq(column.to_string(), value.into())
    }

    pub fn neq(column: &str, value: impl Into<Value>) -> Self {
        Filter::Neq(column.to_string(), value.into())
    }

    pub fn gte(column: &str, value: impl Into<Value>) -> Self {
        Filter::Gte(column.to_string(), value.into())
    }

    pub fn lte(column: &str, value: impl Into<Value>) -> Self {
        Filter::Lte(column.to_string(), value.into())
    }

    pub fn ilike(column: &str, pattern: &str) -> Self {
        Filter::Ilike(column.to_string(), pattern.to_string())
    }
}

/// A select over one table: conjunctive `filters`, an optional disjunctive
/// `any` group (row matches if any filter in the group holds), ordering and
/// a row limit.
#[derive(Debug, Clone, Default)]
pub struct Select {
    pub filters: Vec<Filter>,
    pub any: Vec<Filter>,
    pub order_by: Option<(String, bool)>,
    pub limit: Option<usize>,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, f: Filter) -> Self {
        self.filters.push(f);
        self
    }

    pub fn any_of(mut self, group: Vec<Filter>) -> Self {
        self.any = group;
        self
    }

    /// Order by `column`, descending when `desc` is set.
    pub fn order(mut self, column: &str, desc: bool) -> Self {
        self.order_by = Some((column.to_string(), desc));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

pub trait TableStore: Send + Sync {
    /// Matching rows; an empty vec when nothing matches, never an error.
    fn select(&self, table: &str, query: &Select) -> Result<Vec<Row>>;

    /// Inserts one row and returns it as stored (id assigned by the store).
    fn insert(&self, table: &str, row: Row) -> Result<Row>;

    /// Applies `patch` to every row matching `filters`; returns the rows
    /// after the update.
    fn update(&self, table: &str, filters: &[Filter], patch: Row) -> Result<Vec<Row>>;

    /// Removes every row matching `filters`; returns the removed rows.
    fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Row>>;
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare(a: &Value, b: &Value) -> std::cmp::Ordering {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal);
    }
    value_text(a).cmp(&value_text(b))
}

fn ilike_match(pattern: &str, value: &str) -> bool {
    let p = pattern.to_lowercase();
    let v = value.to_lowercase();
    let anchored_start = !p.starts_with('%');
    let anchored_end = !p.ends_with('%');
    let needle = p.trim_matches('%');
    match (anchored_start, anchored_end) {
        (true, true) => v == needle,
        (true, false) => v.starts_with(needle),
        (false, true) => v.ends_with(needle),
        (false, false) => v.contains(needle),
    }
}

fn filter_match(f: &Filter, row: &Row) -> bool {
    let lookup = |col: &str| row.get(col).unwrap_or(&Value::Null);
    match f {
        Filter::Eq(col, v) => lookup(col) == v,
        Filter::Neq(col, v) => lookup(col) != v,
        Filter::Gte(col, v) => compare(lookup(col), v) != std::cmp::Ordering::Less,
        Filter::Lte(col, v) => compare(lookup(col), v) != std::cmp::Ordering::Greater,
        Filter::Ilike(col, pat) => ilike_match(pat, &value_text(lookup(col))),
    }
}

fn select_match(q: &Select, row: &Row) -> bool {
    q.filters.iter().all(|f| filter_match(f, row))
        && (q.any.is_empty() || q.any.iter().any(|f| filter_match(f, row)))
}

/// In-memory `TableStore`. Tables materialize on first touch and ids are
/// assigned from a per-table counter, mirroring the hosted backend.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, MemoryTable>>,
}

#[derive(Default)]
struct MemoryTable {
    next_id: i64,
    rows: Vec<Row>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TableStore for MemoryStore {
    fn select(&self, table: &str, query: &Select) -> Result<Vec<Row>> {
        let tables = self
            .tables
            .lock()
            .map_err(|_| Error::Persistence("store lock poisoned".into()))?;
        let mut rows: Vec<Row> = tables
            .get(table)
            .map(|t| {
                t.rows
                    .iter()
                    .filter(|r| select_match(query, r))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if let Some((col, desc)) = &query.order_by {
            rows.sort_by(|a, b| {
                let ord = compare(
                    a.get(col).unwrap_or(&Value::Null),
                    b.get(col).unwrap_or(&Value::Null),
                );
                if *desc { ord.reverse() } else { ord }
            });
        }
        if let Some(n) = query.limit {
            rows.truncate(n);
        }
        Ok(rows)
    }

    fn insert(&self, table: &str, mut row: Row) -> Result<Row> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| Error::Persistence("store lock poisoned".into()))?;
        let t = tables.entry(table.to_string()).or_default();
        if !row.contains_key("id") {
            t.next_id += 1;
            row.insert("id".to_string(), Value::from(t.next_id));
        }
        t.rows.push(row.clone());
        Ok(row)
    }

    fn update(&self, table: &str, filters: &[Filter], patch: Row) -> Result<Vec<Row>> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| Error::Persistence("store lock poisoned".into()))?;
        let Some(t) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };
        let mut touched = Vec::new();
        for row in t
            .rows
            .iter_mut()
            .filter(|r| filters.iter().all(|f| filter_match(f, r)))
        {
            for (k, v) in &patch {
                row.insert(k.clone(), v.clone());
            }
            touched.push(row.clone());
        }
        Ok(touched)
    }

    fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Row>> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| Error::Persistence("store lock poisoned".into()))?;
        let Some(t) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };
        let (gone, kept): (Vec<Row>, Vec<Row>) = t
            .rows
            .drain(..)
            .partition(|r| filters.iter().all(|f| filter_match(f, r)));
        t.rows = kept;
        Ok(gone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ilike_wildcards() {
        assert!(ilike_match("%rent%", "June RENT payment"));
        assert!(ilike_match("rent%", "Rent for June"));
        assert!(!ilike_match("rent%", "June rent"));
        assert!(ilike_match("%rent", "june rent"));
        assert!(ilike_match("rent", "RENT"));
        assert!(!ilike_match("rent", "rents"));
    }

    #[test]
    fn select_any_group_is_disjunctive() {
        let store = MemoryStore::new();
        for (name, phone) in [("Ali", "5551112233"), ("Veli", "5340001122")] {
            let mut row = Row::new();
            row.insert("name".into(), Value::from(name));
            row.insert("phone".into(), Value::from(phone));
            store.insert("contacts", row).unwrap();
        }
        let q = Select::new().any_of(vec![
            Filter::ilike("name", "%ali%"),
            Filter::ilike("phone", "%ali%"),
        ]);
        let rows = store.select("contacts", &q).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], Value::from("Ali"));
    }
}
