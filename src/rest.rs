// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! `TableStore` over the hosted REST backend.
//!
//! The backend speaks the PostgREST dialect: one resource per table,
//! filters as `column=op.value` query parameters, JSON array bodies, and
//! `Prefer: return=representation` so that writes echo the affected rows.

use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::store::{Filter, Row, Select, TableStore};

/// Store calls fail after this many seconds; there is no retry.
pub const STORE_TIMEOUT_SECS: u64 = 10;

pub struct RestStore {
    base_url: String,
    api_key: String,
    client: Client,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = crate::utils::http_client(STORE_TIMEOUT_SECS)
            .map_err(|e| Error::Persistence(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authed(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=representation")
    }

    fn run(&self, rb: RequestBuilder) -> Result<Vec<Row>> {
        let resp = rb.send()?.error_for_status()?;
        Ok(resp.json()?)
    }
}

fn literal(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn filter_param(f: &Filter) -> (String, String) {
    match f {
        Filter::Eq(col, v) => (col.clone(), format!("eq.{}", literal(v))),
        Filter::Neq(col, v) => (col.clone(), format!("neq.{}", literal(v))),
        Filter::Gte(col, v) => (col.clone(), format!("gte.{}", literal(v))),
        Filter::Lte(col, v) => (col.clone(), format!("lte.{}", literal(v))),
        // The REST dialect spells the ilike wildcard as '*'.
        Filter::Ilike(col, pat) => (col.clone(), format!("ilike.{}", pat.replace('%', "*"))),
    }
}

fn or_param(group: &[Filter]) -> (String, String) {
    let parts: Vec<String> = group
        .iter()
        .map(|f| {
            let (col, op) = filter_param(f);
            format!("{col}.{op}")
        })
        .collect();
    ("or".to_string(), format!("({})", parts.join(",")))
}

fn query_params(q: &Select) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = q.filters.iter().map(filter_param).collect();
    if !q.any.is_empty() {
        params.push(or_param(&q.any));
    }
    if let Some((col, desc)) = &q.order_by {
        let dir = if *desc { "desc" } else { "asc" };
        params.push(("order".to_string(), format!("{col}.{dir}")));
    }
    if let Some(n) = q.limit {
        params.push(("limit".to_string(), n.to_string()));
    }
    params
}

impl TableStore for RestStore {
    fn select(&self, table: &str, query: &Select) -> Result<Vec<Row>> {
        debug!(table, "select");
        let rb = self
            .authed(self.client.get(self.endpoint(table)))
            .query(&query_params(query));
        self.run(rb)
    }

    fn insert(&self, table: &str, row: Row) -> Result<Row> {
        debug!(table, "insert");
        let rb = self.authed(self.client.post(self.endpoint(table))).json(&row);
        let mut rows = self.run(rb)?;
        rows.pop()
            .ok_or_else(|| Error::Persistence(format!("insert into '{table}' returned no row")))
    }

    fn update(&self, table: &str, filters: &[Filter], patch: Row) -> Result<Vec<Row>> {
        debug!(table, "update");
        let params: Vec<(String, String)> = filters.iter().map(filter_param).collect();
        let rb = self
            .authed(self.client.patch(self.endpoint(table)))
            .query(&params)
            .json(&patch);
        self.run(rb)
    }

    fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Row>> {
        debug!(table, "delete");
        let params: Vec<(String, String)> = filters.iter().map(filter_param).collect();
        let rb = self
            .authed(self.client.delete(self.endpoint(table)))
            .query(&params);
        self.run(rb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_encode_in_rest_dialect() {
        let q = Select::new()
            .filter(Filter::eq("type", "income"))
            .filter(Filter::gte("date", "2025-01-01"))
            .order("date", true)
            .limit(50);
        let params = query_params(&q);
        assert!(params.contains(&("type".into(), "eq.income".into())));
        assert!(params.contains(&("date".into(), "gte.2025-01-01".into())));
        assert!(params.contains(&("order".into(), "date.desc".into())));
        assert!(params.contains(&("limit".into(), "50".into())));
    }

    #[test]
    fn or_group_encodes_with_star_wildcards() {
        let (key, val) = or_param(&[
            Filter::ilike("customer_name", "%acme%"),
            Filter::ilike("product_code", "%acme%"),
        ]);
        assert_eq!(key, "or");
        assert_eq!(val, "(customer_name.ilike.*acme*,product_code.ilike.*acme*)");
    }
}
