// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::resolve_user;
use crate::config::Settings;
use crate::ledger::{create_transaction, delete_transaction, find_category, get_balance};
use crate::models::{NewTransaction, Page};
use crate::reports::paged_transactions;
use crate::utils::{fmt_money, maybe_print_json, parse_datetime, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let user = resolve_user(conn, sub)?;
            let id = *sub.get_one::<i64>("id").unwrap();
            delete_transaction(conn, id, user.id)?;
            println!(
                "Your transaction is removed. Balance: {}",
                fmt_money(&get_balance(conn, user.id)?)
            );
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let text = sub.get_one::<String>("text").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let mut new = NewTransaction::new(text.as_str(), amount);
    if let Some(key) = sub.get_one::<String>("category") {
        new = new.with_category(find_category(conn, user.id, key)?.id);
    }
    if let Some(d) = sub.get_one::<String>("date") {
        new = new.at(parse_datetime(d)?);
    }

    let t = create_transaction(conn, user.id, &new)?;
    println!(
        "Your transaction has been recorded: {} {} (id {}). Balance: {}",
        t.text,
        t.amount,
        t.id,
        fmt_money(&get_balance(conn, user.id)?)
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let page = *sub.get_one::<usize>("page").unwrap_or(&1);
    let size = match sub.get_one::<usize>("page-size") {
        Some(s) => *s,
        None => Settings::load(conn)?.page_size,
    };
    let data = query_rows(conn, user.id, page, size)?;
    let Some(data) = data else {
        println!("End of transactions.");
        return Ok(());
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.created.clone(),
                    r.text.clone(),
                    r.amount.clone(),
                    r.polarity.clone(),
                    r.category.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Created", "Text", "Amount", "Type", "Category"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub created: String,
    pub text: String,
    pub amount: String,
    pub polarity: String,
    pub category: String,
}

/// One page of display rows, or `None` past the last page.
pub fn query_rows(
    conn: &Connection,
    user_id: i64,
    page: usize,
    page_size: usize,
) -> Result<Option<Vec<TransactionRow>>> {
    let items = match paged_transactions(conn, user_id, page, page_size)? {
        Page::Items(items) => items,
        Page::EndOfData => return Ok(None),
    };
    let mut title_stmt = conn.prepare("SELECT title FROM categories WHERE id=?1")?;
    let mut data = Vec::with_capacity(items.len());
    for t in items {
        let category = match t.category_id {
            Some(id) => title_stmt.query_row(params![id], |r| r.get::<_, String>(0))?,
            None => String::new(),
        };
        data.push(TransactionRow {
            id: t.id,
            created: t.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            text: t.text,
            amount: t.amount.to_string(),
            polarity: t.polarity.to_string(),
            category,
        });
    }
    Ok(Some(data))
}
