// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::config::FxConfig;
use crate::fx;

pub fn handle(cfg: &FxConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("rate", _)) => {
            let rate = fx::current_rate(cfg);
            println!("USD/TRY: {rate}");
        }
        _ => {}
    }
    Ok(())
}
