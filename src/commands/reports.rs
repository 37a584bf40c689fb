// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{polarity_of, resolve_user};
use crate::config::Settings;
use crate::reports::{
    current_balance, get_report_by_day, report_by_category, total_expense, total_income,
    transaction_count,
};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("daily", sub)) => daily(conn, sub)?,
        Some(("by-category", sub)) => by_category(conn, sub)?,
        Some(("totals", sub)) => totals(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn balance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let bal = current_balance(conn, user.id)?;
    if !maybe_print_json(
        sub.get_flag("json"),
        sub.get_flag("jsonl"),
        &json!({ "balance": bal }),
    )? {
        println!("{}", fmt_money(&bal));
    }
    Ok(())
}

fn daily(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let polarity = polarity_of(sub)?.unwrap_or_default();
    let days = match sub.get_one::<i64>("days") {
        Some(d) => *d,
        None => Settings::load(conn)?.report_days,
    };
    let report = get_report_by_day(conn, user.id, polarity, days)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        let rows = report
            .dates
            .iter()
            .zip(&report.amounts)
            .map(|(d, a)| vec![d.to_string(), format!("{:.2}", a)])
            .collect();
        let total = format!("Total {}", polarity);
        println!("{}", pretty_table(&["Date", total.as_str()], rows));
    }
    Ok(())
}

fn by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let polarity = polarity_of(sub)?.unwrap_or_default();
    let report = report_by_category(conn, user.id, polarity)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        let rows = report
            .titles
            .iter()
            .zip(&report.amounts)
            .map(|(t, a)| vec![t.clone(), format!("{:.2}", a)])
            .collect();
        println!("{}", pretty_table(&["Category", "Amount"], rows));
    }
    Ok(())
}

fn totals(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let income = total_income(conn, user.id)?;
    let expense = total_expense(conn, user.id)?;
    let count = transaction_count(conn, user.id)?;
    let bal = current_balance(conn, user.id)?;
    let v = json!({
        "income": income,
        "expense": expense,
        "transactions": count,
        "balance": bal,
    });
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &v)? {
        println!(
            "{}",
            pretty_table(
                &["Income", "Expense", "Transactions", "Balance"],
                vec![vec![
                    format!("{:.2}", income),
                    format!("{:.2}", expense),
                    count.to_string(),
                    format!("{:.2}", bal),
                ]],
            )
        );
    }
    Ok(())
}
