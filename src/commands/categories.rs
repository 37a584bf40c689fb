// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{polarity_of, resolve_user};
use crate::ledger::{create_category, delete_category, find_category, list_categories, update_category};
use crate::models::Polarity;
use crate::reports::{category_balance, category_transactions};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Serialize)]
pub struct CategoryRow {
    pub id: i64,
    pub title: String,
    pub polarity: Polarity,
    pub amount: String,
}

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let user = resolve_user(conn, sub)?;
            let title = sub.get_one::<String>("title").unwrap();
            let polarity = polarity_of(sub)?.unwrap_or_default();
            let cat = create_category(conn, user.id, title, polarity)?;
            println!("Added category {} (id {})", cat, cat.id);
        }
        Some(("list", sub)) => {
            let user = resolve_user(conn, sub)?;
            let data = query_rows(conn, user.id, polarity_of(sub)?)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .into_iter()
                    .map(|r| {
                        vec![
                            r.id.to_string(),
                            r.title,
                            r.polarity.to_string(),
                            r.amount,
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Category", "Type", "Amount"], rows)
                );
            }
        }
        Some(("edit", sub)) => {
            let user = resolve_user(conn, sub)?;
            let cat = find_category(conn, user.id, sub.get_one::<String>("category").unwrap())?;
            let title = sub.get_one::<String>("title").map(|s| s.as_str());
            let cat = update_category(conn, cat.id, user.id, title, polarity_of(sub)?)?;
            println!("Updated category {}", cat);
        }
        Some(("rm", sub)) => {
            let user = resolve_user(conn, sub)?;
            let cat = find_category(conn, user.id, sub.get_one::<String>("category").unwrap())?;
            let removed = delete_category(conn, cat.id, user.id)?;
            println!(
                "Removed category {} and {} transaction(s)",
                cat, removed
            );
        }
        Some(("show", sub)) => {
            let user = resolve_user(conn, sub)?;
            let cat = find_category(conn, user.id, sub.get_one::<String>("category").unwrap())?;
            let items = category_transactions(conn, user.id, cat.id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
                println!("{}  total {:.2}", cat, category_balance(conn, cat.id)?);
                let rows = items
                    .into_iter()
                    .map(|t| {
                        vec![
                            t.id.to_string(),
                            t.created_at.format("%Y-%m-%d %H:%M").to_string(),
                            t.text,
                            format!("{:.2}", t.amount),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Created", "Text", "Amount"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Categories of a user in title order with their running totals.
pub fn query_rows(
    conn: &Connection,
    user_id: i64,
    polarity: Option<Polarity>,
) -> Result<Vec<CategoryRow>> {
    let mut data = Vec::new();
    for cat in list_categories(conn, user_id, polarity)? {
        let amount = category_balance(conn, cat.id)?;
        data.push(CategoryRow {
            id: cat.id,
            title: cat.title,
            polarity: cat.polarity,
            amount: format!("{:.2}", amount),
        });
    }
    Ok(data)
}
