// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Account;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.tillbook", "Tillbook", "tillbook"));

/// `TILLBOOK_STORE_URL` / `TILLBOOK_STORE_KEY` override the config file, so
/// a `.env` next to the binary is enough to point at another backend.
pub const ENV_STORE_URL: &str = "TILLBOOK_STORE_URL";
pub const ENV_STORE_KEY: &str = "TILLBOOK_STORE_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub fx: FxConfig,
    #[serde(default = "default_accounts")]
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxConfig {
    #[serde(default = "default_fx_url")]
    pub url: String,
    #[serde(default = "default_fallback_rate")]
    pub fallback_rate: Decimal,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            url: default_fx_url(),
            fallback_rate: default_fallback_rate(),
        }
    }
}

fn default_fx_url() -> String {
    "https://api.exchangerate-api.com/v4/latest/USD".to_string()
}

fn default_fallback_rate() -> Decimal {
    Decimal::new(3989, 2)
}

fn default_accounts() -> Vec<Account> {
    vec![Account {
        id: "cash".to_string(),
        name: "CASH".to_string(),
    }]
}

pub fn config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .ok_or_else(|| Error::Config("could not determine platform config dir".to_string()))?;
    Ok(proj.config_dir().join("config.toml"))
}

/// Reads the config file when present, then applies environment overrides.
/// A usable store URL and key must come from one of the two.
pub fn load() -> Result<Config> {
    let path = config_path()?;
    load_from(&path)
}

pub fn load_from(path: &std::path::Path) -> Result<Config> {
    let mut cfg: Config = if path.exists() {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {}: {e}", path.display())))?;
        toml::from_str(&text).map_err(|e| Error::Config(format!("parse {}: {e}", path.display())))?
    } else {
        Config {
            store: StoreConfig::default(),
            fx: FxConfig::default(),
            accounts: default_accounts(),
        }
    };

    if let Ok(url) = std::env::var(ENV_STORE_URL) {
        cfg.store.url = url;
    }
    if let Ok(key) = std::env::var(ENV_STORE_KEY) {
        cfg.store.key = key;
    }

    if cfg.store.url.is_empty() || cfg.store.key.is_empty() {
        return Err(Error::Config(format!(
            "store url/key not configured; set them in {} or via {ENV_STORE_URL}/{ENV_STORE_KEY}",
            path.display()
        )));
    }
    if cfg.accounts.is_empty() {
        cfg.accounts = default_accounts();
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_accounts_and_fx_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"
[store]
url = "https://example.supabase.co"
key = "secret"

[[accounts]]
id = "cash"
name = "CASH"

[[accounts]]
id = "ziraat-main"
name = "Ziraat Main"
"#
        )
        .unwrap();
        let cfg = load_from(f.path()).unwrap();
        assert_eq!(cfg.accounts.len(), 2);
        assert_eq!(cfg.accounts[1].id, "ziraat-main");
        assert_eq!(cfg.fx.fallback_rate, Decimal::new(3989, 2));
        assert!(cfg.fx.url.contains("exchangerate"));
    }

    #[test]
    fn missing_store_section_is_a_config_error() {
        let f = tempfile::NamedTempFile::new().unwrap();
        // Empty file, no env overrides set for these keys in tests.
        let err = load_from(f.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
