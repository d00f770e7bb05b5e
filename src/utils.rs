// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

const UA: &str = concat!(
    "tillbook/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/tillbook/tillbook)"
);

pub fn http_client(timeout_secs: u64) -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    // Pages historically accepted both the local dd.mm.yyyy form and ISO.
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d.%m.%Y"))
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD or DD.MM.YYYY", s))
}

/// Reads the `--from`/`--to` pair into an inclusive date range. A missing
/// `--from` floors at the epoch, a missing `--to` caps at today; neither
/// flag means no range filter at all.
pub fn parse_range(sub: &clap::ArgMatches) -> Result<Option<(NaiveDate, NaiveDate)>> {
    match (sub.get_one::<String>("from"), sub.get_one::<String>("to")) {
        (Some(f), Some(t)) => Ok(Some((parse_date(f)?, parse_date(t)?))),
        (Some(f), None) => Ok(Some((parse_date(f)?, chrono::Utc::now().date_naive()))),
        (None, Some(t)) => Ok(Some((NaiveDate::default(), parse_date(t)?))),
        (None, None) => Ok(None),
    }
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.replace(',', ".")
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10,}$").unwrap());

/// Phone numbers must be at least ten digits once separators are removed.
pub fn validate_phone(phone: &str) -> crate::error::Result<()> {
    let cleaned: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    if PHONE.is_match(&cleaned) {
        Ok(())
    } else {
        Err(crate::error::Error::Validation(format!(
            "invalid phone number '{phone}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_parse_in_both_forms() {
        let iso = parse_date("2025-06-01").unwrap();
        let local = parse_date("01.06.2025").unwrap();
        assert_eq!(iso, local);
        assert!(parse_date("06/01/2025").is_err());
    }

    #[test]
    fn decimals_accept_comma_separator() {
        assert_eq!(parse_decimal("39,89").unwrap(), Decimal::new(3989, 2));
    }

    #[test]
    fn phone_validation_strips_separators() {
        assert!(validate_phone("(555) 111-22-33").is_ok());
        assert!(validate_phone("555 111 22 33").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("555-111-22-3x").is_err());
    }
}
