// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures surfaced by the tillbook core. Callers match on the kind; no
/// failure is reported through panics or catch-all exceptions.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad user input: empty required field, non-positive amount or
    /// quantity, unregistered account tag.
    #[error("validation: {0}")]
    Validation(String),

    /// The hosted store rejected the call or was unreachable. The in-flight
    /// operation is aborted; prior state is untouched.
    #[error("persistence: {0}")]
    Persistence(String),

    /// A foreign-currency transaction without a usable exchange rate.
    #[error("invalid exchange rate: {0}")]
    InvalidRate(String),

    /// The operation referenced an id or code that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Startup configuration could not be loaded or parsed.
    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Persistence(format!("malformed row payload: {e}"))
    }
}
