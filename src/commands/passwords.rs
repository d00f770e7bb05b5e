// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::db::Database;
use crate::models::PasswordEntry;
use crate::utils::pretty_table;

pub fn handle(db: &Database, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let p = db.add_password(
                sub.get_one::<String>("platform").unwrap(),
                sub.get_one::<String>("username").unwrap(),
                sub.get_one::<String>("password").unwrap(),
                sub.get_one::<String>("description").unwrap(),
            )?;
            println!("Stored credentials for '{}' (#{})", p.platform, p.id);
        }
        Some(("list", _)) => print_entries(&db.list_passwords()?),
        Some(("search", sub)) => {
            print_entries(&db.search_passwords(sub.get_one::<String>("term").unwrap())?)
        }
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let updated = db.update_password(
                id,
                sub.get_one::<String>("platform").unwrap(),
                sub.get_one::<String>("username").unwrap(),
                sub.get_one::<String>("password").unwrap(),
                sub.get_one::<String>("description").unwrap(),
            )?;
            if updated {
                println!("Updated entry {id}");
            } else {
                println!("Entry {id} not found");
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if db.delete_password(id)? {
                println!("Removed entry {id}");
            } else {
                println!("Entry {id} not found");
            }
        }
        Some(("clear", _)) => {
            let n = db.delete_all_passwords()?;
            println!("Removed {n} stored credentials");
        }
        _ => {}
    }
    Ok(())
}

fn print_entries(entries: &[PasswordEntry]) {
    let data = entries
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.platform.clone(),
                p.username.clone(),
                p.password.clone(),
                p.description.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Platform", "Username", "Password", "Description"], data)
    );
}
