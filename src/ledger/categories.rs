// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::transactions::{read_transaction, remove_entry};
use super::{begin, get_user};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, Polarity};
use crate::utils::{clean_text, from_db_ts, to_db_ts};
use chrono::{SubsecRound, Utc};
use rusqlite::{Connection, Row, params};

const COLUMNS: &str = "id, title, polarity, user_id, created_at";

fn read_category(r: &Row<'_>) -> LedgerResult<Category> {
    let created: String = r.get(4)?;
    Ok(Category {
        id: r.get(0)?,
        title: r.get(1)?,
        polarity: r.get(2)?,
        user_id: r.get(3)?,
        created_at: from_db_ts(&created)?,
    })
}

fn collect(conn: &Connection, sql: &str, p: impl rusqlite::Params) -> LedgerResult<Vec<Category>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(p)?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(read_category(r)?);
    }
    Ok(out)
}

pub fn create_category(
    conn: &Connection,
    user_id: i64,
    title: &str,
    polarity: Polarity,
) -> LedgerResult<Category> {
    let title = clean_text(title, "Title", 128)?;
    get_user(conn, user_id)?;
    let now = Utc::now().trunc_subsecs(6);
    conn.execute(
        "INSERT INTO categories(title, polarity, user_id, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![title, polarity, user_id, to_db_ts(now)],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(category_id = id, user_id, %title, %polarity, "category created");
    Ok(Category {
        id,
        title,
        polarity,
        user_id,
        created_at: now,
    })
}

pub fn get_category(conn: &Connection, id: i64) -> LedgerResult<Category> {
    collect(
        conn,
        &format!("SELECT {} FROM categories WHERE id=?1", COLUMNS),
        params![id],
    )?
    .into_iter()
    .next()
    .ok_or(LedgerError::NotFound("Category"))
}

/// Categories of a user ordered by title, optionally restricted to one polarity.
pub fn list_categories(
    conn: &Connection,
    user_id: i64,
    polarity: Option<Polarity>,
) -> LedgerResult<Vec<Category>> {
    match polarity {
        Some(p) => collect(
            conn,
            &format!(
                "SELECT {} FROM categories WHERE user_id=?1 AND polarity=?2 ORDER BY title, id",
                COLUMNS
            ),
            params![user_id, p],
        ),
        None => collect(
            conn,
            &format!(
                "SELECT {} FROM categories WHERE user_id=?1 ORDER BY title, id",
                COLUMNS
            ),
            params![user_id],
        ),
    }
}

/// Resolve a user's category by numeric id or by title.
///
/// A numeric key that is not one of the user's category ids is retried as a
/// title; when that finds nothing too, the id lookup's error is returned.
pub fn find_category(conn: &Connection, user_id: i64, key: &str) -> LedgerResult<Category> {
    let key = key.trim();
    let mut by_id = None;
    if let Ok(id) = key.parse::<i64>() {
        match get_category(conn, id) {
            Ok(cat) if cat.user_id == user_id => return Ok(cat),
            Ok(_) => by_id = Some(LedgerError::NotAuthorized),
            Err(e @ LedgerError::NotFound(_)) => by_id = Some(e),
            Err(e) => return Err(e),
        }
    }
    let mut found = collect(
        conn,
        &format!(
            "SELECT {} FROM categories WHERE user_id=?1 AND title=?2 ORDER BY id",
            COLUMNS
        ),
        params![user_id, key],
    )?;
    match found.len() {
        0 => Err(by_id.unwrap_or(LedgerError::NotFound("Category"))),
        1 => Ok(found.remove(0)),
        n => Err(LedgerError::Validation(format!(
            "{} categories are titled '{}', use the id instead",
            n, key
        ))),
    }
}

/// Rename a category or flip its polarity.
///
/// Existing entries keep the sign they were stored with, so a polarity change
/// is refused once any transaction references the category.
pub fn update_category(
    conn: &mut Connection,
    id: i64,
    requesting_user: i64,
    title: Option<&str>,
    polarity: Option<Polarity>,
) -> LedgerResult<Category> {
    let tx = begin(conn)?;
    let mut cat = get_category(&tx, id)?;
    if cat.user_id != requesting_user {
        return Err(LedgerError::NotAuthorized);
    }
    if let Some(t) = title {
        cat.title = clean_text(t, "Title", 128)?;
    }
    if let Some(p) = polarity.filter(|p| *p != cat.polarity) {
        let used: i64 = tx.query_row(
            "SELECT COUNT(*) FROM transactions WHERE category_id=?1",
            params![id],
            |r| r.get(0),
        )?;
        if used > 0 {
            return Err(LedgerError::Validation(format!(
                "Category '{}' is used by {} transaction(s); its type can no longer change",
                cat.title, used
            )));
        }
        cat.polarity = p;
    }
    tx.execute(
        "UPDATE categories SET title=?1, polarity=?2 WHERE id=?3",
        params![cat.title, cat.polarity, id],
    )?;
    tx.commit()?;
    tracing::info!(category_id = id, title = %cat.title, polarity = %cat.polarity, "category updated");
    Ok(cat)
}

/// Delete a category and every transaction filed under it.
///
/// Each transaction goes through the same balance check as a single delete,
/// inside one SQLite transaction: if any of them would drive the balance
/// negative, nothing is removed. Returns the number of cascaded transactions.
pub fn delete_category(
    conn: &mut Connection,
    id: i64,
    requesting_user: i64,
) -> LedgerResult<usize> {
    let tx = begin(conn)?;
    let cat = get_category(&tx, id)?;
    if cat.user_id != requesting_user {
        tracing::warn!(category_id = id, requesting_user, "category delete refused: not owner");
        return Err(LedgerError::NotAuthorized);
    }

    let dependents = {
        let mut stmt = tx.prepare(
            "SELECT id, text, amount, polarity, category_id, user_id, created_at
             FROM transactions WHERE category_id=?1 ORDER BY created_at, id",
        )?;
        let mut rows = stmt.query(params![id])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            out.push(read_transaction(r)?);
        }
        out
    };
    for t in &dependents {
        if let Err(e) = remove_entry(&tx, t) {
            tracing::warn!(category_id = id, transaction_id = t.id, error = %e, "category delete rolled back");
            return Err(e);
        }
    }
    tx.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    tx.commit()?;
    tracing::info!(
        category_id = id,
        cascaded = dependents.len(),
        "category deleted"
    );
    Ok(dependents.len())
}
