// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::auth::Role;
use crate::db::Database;

pub fn handle(db: &Database, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let role: Role = sub.get_one::<String>("role").unwrap().parse()?;
            let user = db.add_user(
                sub.get_one::<String>("username").unwrap(),
                sub.get_one::<String>("password").unwrap(),
                role,
            )?;
            println!("Created user '{}' with role {}", user.username, user.role);
        }
        Some(("login", sub)) => {
            let username = sub.get_one::<String>("username").unwrap();
            let password = sub.get_one::<String>("password").unwrap();
            match db.verify_user(username, password)? {
                Some(user) => {
                    println!("Welcome, {} ({})", user.username, user.role);
                    if user.role.can_write() {
                        println!("  write access: ledgers, stock, orders, contacts, imports");
                    } else {
                        println!("  read-only access");
                    }
                    if user.role.can_manage_users() {
                        println!("  user management enabled");
                    }
                }
                None => println!("Invalid username or password"),
            }
        }
        _ => {}
    }
    Ok(())
}
