// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{create_user, list_users};
use crate::reports::current_balance;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let username = sub.get_one::<String>("username").unwrap();
            let email = sub.get_one::<String>("email").unwrap();
            let user = create_user(conn, username, email)?;
            println!("Added user '{}' <{}>", user.username, user.email);
        }
        Some(("list", sub)) => {
            let users = list_users(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &users)? {
                let mut rows = Vec::new();
                for u in users {
                    let bal = current_balance(conn, u.id)?;
                    rows.push(vec![
                        u.username,
                        u.email,
                        format!("{:.2}", bal),
                        u.created_at.format("%Y-%m-%d").to_string(),
                    ]);
                }
                println!(
                    "{}",
                    pretty_table(&["User", "Email", "Balance", "Joined"], rows)
                );
            }
        }
        _ => {}
    }
    Ok(())
}
