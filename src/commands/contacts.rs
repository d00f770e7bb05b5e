// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::db::Database;
use crate::models::Contact;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(db: &Database, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let c = db.add_contact(
                sub.get_one::<String>("name").unwrap(),
                sub.get_one::<String>("phone").unwrap(),
                sub.get_one::<String>("description").unwrap(),
            )?;
            println!("Added contact '{}' (#{})", c.name, c.id);
        }
        Some(("list", sub)) => {
            let contacts = db.list_contacts()?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &contacts)? {
                print_contacts(&contacts);
            }
        }
        Some(("search", sub)) => {
            let contacts = db.search_contacts(sub.get_one::<String>("term").unwrap())?;
            print_contacts(&contacts);
        }
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let updated = db.update_contact(
                id,
                sub.get_one::<String>("name").unwrap(),
                sub.get_one::<String>("phone").unwrap(),
                sub.get_one::<String>("description").unwrap(),
            )?;
            if updated {
                println!("Updated contact {id}");
            } else {
                println!("Contact {id} not found");
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if db.delete_contact(id)? {
                println!("Removed contact {id}");
            } else {
                println!("Contact {id} not found");
            }
        }
        _ => {}
    }
    Ok(())
}

fn print_contacts(contacts: &[Contact]) {
    let data = contacts
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.name.clone(),
                c.phone.clone(),
                c.description.clone(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["ID", "Name", "Phone", "Description"], data));
}
