// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Exchange-rate fetch and snapshot currency normalization.
//!
//! A transaction converts its foreign amount to the base currency exactly
//! once, with whatever rate is current (or user-supplied) at insert time.
//! The stored `base_amount` is an audit snapshot; later rate movements
//! never touch it.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use crate::config::FxConfig;
use crate::error::{Error, Result};
use crate::models::Currency;

/// Rate lookups are quick or not at all; after this many seconds the
/// caller falls back to the configured default rate.
pub const RATE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Deserialize)]
struct RateResponse {
    rates: HashMap<String, f64>,
}

/// Current USD/TRY rate from the configured endpoint, or the configured
/// fallback when the endpoint is unreachable, slow, or malformed.
pub fn current_rate(cfg: &FxConfig) -> Decimal {
    match fetch_rate(&cfg.url) {
        Ok(rate) => rate,
        Err(e) => {
            warn!(error = %e, fallback = %cfg.fallback_rate, "rate fetch failed, using fallback");
            cfg.fallback_rate
        }
    }
}

fn fetch_rate(url: &str) -> Result<Decimal> {
    let client =
        crate::utils::http_client(RATE_TIMEOUT_SECS).map_err(|e| Error::Persistence(e.to_string()))?;
    let resp = client.get(url).send()?.error_for_status()?;
    let body: RateResponse = resp.json()?;
    let rate = body
        .rates
        .get(Currency::Try.code())
        .copied()
        .ok_or_else(|| Error::InvalidRate("no TRY rate in response".to_string()))?;
    Decimal::try_from(rate).map_err(|e| Error::InvalidRate(format!("rate {rate}: {e}")))
}

/// Converts `amount` to the base currency. Base-currency amounts pass
/// through unchanged; foreign amounts require a positive rate.
pub fn normalize(amount: Decimal, currency: Currency, rate: Option<Decimal>) -> Result<Decimal> {
    if currency.is_base() {
        return Ok(amount);
    }
    match rate {
        Some(r) if r > Decimal::ZERO => Ok(amount * r),
        Some(r) => Err(Error::InvalidRate(format!(
            "rate must be positive for {} amounts, got {r}",
            currency.code()
        ))),
        None => Err(Error::InvalidRate(format!(
            "{} amounts need an exchange rate",
            currency.code()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn base_currency_passes_through() {
        let got = normalize(dec!(150.75), Currency::Try, None).unwrap();
        assert_eq!(got, dec!(150.75));
        // A stray rate on a base-currency amount is ignored, not applied.
        let got = normalize(dec!(20), Currency::Try, Some(dec!(40))).unwrap();
        assert_eq!(got, dec!(20));
    }

    #[test]
    fn foreign_amount_multiplies_by_rate() {
        let got = normalize(dec!(100), Currency::Usd, Some(dec!(40))).unwrap();
        assert_eq!(got, dec!(4000));
    }

    #[test]
    fn foreign_amount_without_rate_is_rejected() {
        assert!(matches!(
            normalize(dec!(10), Currency::Usd, None),
            Err(Error::InvalidRate(_))
        ));
        assert!(matches!(
            normalize(dec!(10), Currency::Usd, Some(dec!(0))),
            Err(Error::InvalidRate(_))
        ));
        assert!(matches!(
            normalize(dec!(10), Currency::Usd, Some(dec!(-1))),
            Err(Error::InvalidRate(_))
        ));
    }
}
