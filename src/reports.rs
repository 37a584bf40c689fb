// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only views over committed ledger data.

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{self, get_category, list_categories, read_transaction};
use crate::models::{CategoryReport, DayReport, Page, Polarity, Transaction};
use crate::utils::{from_db_amount, from_db_ts, to_db_ts};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

const TX_COLUMNS: &str = "id, text, amount, polarity, category_id, user_id, created_at";

fn sum_amounts(conn: &Connection, sql: &str, p: impl rusqlite::Params) -> LedgerResult<Decimal> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(p)?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let s: String = r.get(0)?;
        total = total
            .checked_add(from_db_amount(&s)?)
            .ok_or_else(ledger::out_of_range)?;
    }
    Ok(total)
}

fn collect(conn: &Connection, sql: &str, p: impl rusqlite::Params) -> LedgerResult<Vec<Transaction>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(p)?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(read_transaction(r)?);
    }
    Ok(out)
}

/// Same value as [`ledger::get_balance`]: the stored running total.
pub fn current_balance(conn: &Connection, user_id: i64) -> LedgerResult<Decimal> {
    ledger::get_balance(conn, user_id)
}

/// Sums per calendar day (UTC) of a user's entries of one polarity created in
/// `from..=to`. Days are ascending; days without entries are left out.
pub fn report_by_day(
    conn: &Connection,
    user_id: i64,
    polarity: Polarity,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> LedgerResult<DayReport> {
    let mut stmt = conn.prepare(
        "SELECT created_at, amount FROM transactions
         WHERE user_id=?1 AND polarity=?2 AND created_at>=?3 AND created_at<=?4
         ORDER BY created_at",
    )?;
    let mut rows = stmt.query(params![user_id, polarity, to_db_ts(from), to_db_ts(to)])?;
    let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    while let Some(r) = rows.next()? {
        let created: String = r.get(0)?;
        let amount: String = r.get(1)?;
        let day = from_db_ts(&created)?.date_naive();
        let slot = by_day.entry(day).or_insert(Decimal::ZERO);
        *slot = slot
            .checked_add(from_db_amount(&amount)?)
            .ok_or_else(ledger::out_of_range)?;
    }
    let (dates, amounts): (Vec<_>, Vec<_>) = by_day.into_iter().unzip();
    Ok(DayReport { dates, amounts })
}

/// [`report_by_day`] over the last `days` days ending now.
pub fn get_report_by_day(
    conn: &Connection,
    user_id: i64,
    polarity: Polarity,
    days: i64,
) -> LedgerResult<DayReport> {
    if days <= 0 {
        return Err(LedgerError::Validation("days must be positive".into()));
    }
    let now = Utc::now();
    let from = Duration::try_days(days)
        .and_then(|d| now.checked_sub_signed(d))
        .ok_or_else(|| LedgerError::Validation(format!("{} days is out of range", days)))?;
    report_by_day(conn, user_id, polarity, from, now)
}

/// Sum of every entry filed under a category.
pub fn category_balance(conn: &Connection, category_id: i64) -> LedgerResult<Decimal> {
    sum_amounts(
        conn,
        "SELECT t.amount FROM transactions t JOIN categories c ON t.category_id=c.id
         WHERE c.id=?1 AND t.user_id=c.user_id",
        params![category_id],
    )
}

/// Per-category totals for every category of the given polarity, in title
/// order. Categories without entries report zero.
pub fn report_by_category(
    conn: &Connection,
    user_id: i64,
    polarity: Polarity,
) -> LedgerResult<CategoryReport> {
    let mut report = CategoryReport::default();
    for cat in list_categories(conn, user_id, Some(polarity))? {
        report.amounts.push(category_balance(conn, cat.id)?);
        report.titles.push(cat.title);
    }
    Ok(report)
}

/// The `page`-th (1-based) slice of a user's entries, newest first.
pub fn paged_transactions(
    conn: &Connection,
    user_id: i64,
    page: usize,
    page_size: usize,
) -> LedgerResult<Page> {
    if page == 0 || page_size == 0 {
        return Err(LedgerError::Validation(
            "page and page size start at 1".into(),
        ));
    }
    // Past any reachable row: nothing to read
    let Some(offset) = (page - 1)
        .checked_mul(page_size)
        .and_then(|o| i64::try_from(o).ok())
    else {
        return Ok(Page::EndOfData);
    };
    let limit = i64::try_from(page_size).unwrap_or(i64::MAX);
    let items = collect(
        conn,
        &format!(
            "SELECT {} FROM transactions WHERE user_id=?1
             ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3",
            TX_COLUMNS
        ),
        params![user_id, limit, offset],
    )?;
    tracing::debug!(user_id, page, page_size, found = items.len(), "page read");
    if items.is_empty() {
        Ok(Page::EndOfData)
    } else {
        Ok(Page::Items(items))
    }
}

/// Every entry of a user, newest first, optionally capped.
pub fn list_transactions(
    conn: &Connection,
    user_id: i64,
    limit: Option<usize>,
) -> LedgerResult<Vec<Transaction>> {
    let cap = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
    collect(
        conn,
        &format!(
            "SELECT {} FROM transactions WHERE user_id=?1
             ORDER BY created_at DESC, id DESC LIMIT ?2",
            TX_COLUMNS
        ),
        params![user_id, cap],
    )
}

/// Entries filed under one of the user's categories, newest first.
pub fn category_transactions(
    conn: &Connection,
    user_id: i64,
    category_id: i64,
) -> LedgerResult<Vec<Transaction>> {
    let cat = get_category(conn, category_id)?;
    if cat.user_id != user_id {
        return Err(LedgerError::NotAuthorized);
    }
    collect(
        conn,
        &format!(
            "SELECT {} FROM transactions WHERE user_id=?1 AND category_id=?2
             ORDER BY created_at DESC, id DESC",
            TX_COLUMNS
        ),
        params![user_id, category_id],
    )
}

fn total_for(conn: &Connection, user_id: i64, polarity: Polarity) -> LedgerResult<Decimal> {
    sum_amounts(
        conn,
        "SELECT amount FROM transactions WHERE user_id=?1 AND polarity=?2",
        params![user_id, polarity],
    )
}

pub fn total_income(conn: &Connection, user_id: i64) -> LedgerResult<Decimal> {
    total_for(conn, user_id, Polarity::Income)
}

/// Negative or zero.
pub fn total_expense(conn: &Connection, user_id: i64) -> LedgerResult<Decimal> {
    total_for(conn, user_id, Polarity::Expense)
}

pub fn transaction_count(conn: &Connection, user_id: i64) -> LedgerResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE user_id=?1",
        params![user_id],
        |r| r.get(0),
    )?)
}
