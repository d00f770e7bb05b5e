// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use tillbook::{cli, commands, config, db::Database, ledger::AccountRegistry};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let cfg = config::load()?;
    let registry = AccountRegistry::new(cfg.accounts.clone());
    let db = Database::open(&cfg)?;

    match matches.subcommand() {
        Some(("tx", sub)) => commands::transactions::handle(&db, &registry, &cfg.fx, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&db, &registry, sub)?,
        Some(("stock", sub)) => commands::stock::handle(&db, sub)?,
        Some(("order", sub)) => commands::orders::handle(&db, sub)?,
        Some(("contact", sub)) => commands::contacts::handle(&db, sub)?,
        Some(("password", sub)) => commands::passwords::handle(&db, sub)?,
        Some(("import", sub)) => commands::imports::handle(&db, sub)?,
        Some(("user", sub)) => commands::users::handle(&db, sub)?,
        Some(("fx", sub)) => commands::fx::handle(&cfg.fx, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&db, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&db, &registry)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
