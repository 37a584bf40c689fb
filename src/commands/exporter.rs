// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::resolve_user;
use crate::reports::list_transactions;
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    let user = resolve_user(conn, sub)?;

    let mut title_stmt = conn.prepare("SELECT title FROM categories WHERE id=?1")?;
    let mut rows = Vec::new();
    // Oldest first, the order the balance was built in
    for t in list_transactions(conn, user.id, None)?.into_iter().rev() {
        let category = match t.category_id {
            Some(id) => Some(title_stmt.query_row(params![id], |r| r.get::<_, String>(0))?),
            None => None,
        };
        rows.push((t, category));
    }

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(["id", "created", "text", "amount", "type", "category"])?;
        for (t, cat) in rows {
            wtr.write_record([
                t.id.to_string(),
                t.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                t.text,
                t.amount.to_string(),
                t.polarity.to_string(),
                cat.unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
    } else {
        let items: Vec<_> = rows
            .into_iter()
            .map(|(t, cat)| {
                json!({
                    "id": t.id,
                    "created": t.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    "text": t.text,
                    "amount": t.amount.to_string(),
                    "type": t.polarity,
                    "category": cat,
                })
            })
            .collect();
        std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    }
    tracing::info!(user_id = user.id, %out, format = %fmt, "transactions exported");
    println!("Exported transactions to {}", out);
    Ok(())
}
