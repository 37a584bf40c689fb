// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::begin;
use crate::error::{LedgerError, LedgerResult};
use crate::models::User;
use crate::utils::{clean_text, from_db_ts, is_valid_email, to_db_ts};
use chrono::{SubsecRound, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Register a user together with its zero balance.
pub fn create_user(conn: &mut Connection, username: &str, email: &str) -> LedgerResult<User> {
    let username = clean_text(username, "Username", 150)?;
    if username.chars().any(char::is_whitespace) {
        return Err(LedgerError::Validation(
            "Username must not contain spaces".into(),
        ));
    }
    let email = email.trim().to_string();
    if !is_valid_email(&email) {
        return Err(LedgerError::Validation(format!(
            "Invalid email address '{}'",
            email
        )));
    }
    let now = Utc::now().trunc_subsecs(6);

    let tx = begin(conn)?;
    let taken = |sql: &str, v: &str| -> LedgerResult<bool> {
        Ok(tx
            .query_row(sql, params![v], |_| Ok(()))
            .optional()?
            .is_some())
    };
    if taken("SELECT 1 FROM users WHERE username=?1", &username)? {
        return Err(LedgerError::Duplicate("Username already taken.".into()));
    }
    if taken("SELECT 1 FROM users WHERE email=?1 COLLATE NOCASE", &email)? {
        return Err(LedgerError::Duplicate("Email already taken.".into()));
    }
    tx.execute(
        "INSERT INTO users(username, email, created_at) VALUES (?1, ?2, ?3)",
        params![username, email, to_db_ts(now)],
    )?;
    let id = tx.last_insert_rowid();
    tx.execute(
        "INSERT INTO balances(user_id, amount, created_at, updated_at) VALUES (?1, '0', ?2, ?2)",
        params![id, to_db_ts(now)],
    )?;
    tx.commit()?;
    tracing::info!(user_id = id, %username, "user created");
    Ok(User {
        id,
        username,
        email,
        created_at: now,
    })
}

fn read_user(r: &Row<'_>) -> LedgerResult<User> {
    let created: String = r.get(3)?;
    Ok(User {
        id: r.get(0)?,
        username: r.get(1)?,
        email: r.get(2)?,
        created_at: from_db_ts(&created)?,
    })
}

pub fn get_user(conn: &Connection, id: i64) -> LedgerResult<User> {
    let mut stmt =
        conn.prepare("SELECT id, username, email, created_at FROM users WHERE id=?1")?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(r) => read_user(r),
        None => Err(LedgerError::NotFound("User")),
    }
}

pub fn find_user(conn: &Connection, username: &str) -> LedgerResult<User> {
    let mut stmt =
        conn.prepare("SELECT id, username, email, created_at FROM users WHERE username=?1")?;
    let mut rows = stmt.query(params![username.trim()])?;
    match rows.next()? {
        Some(r) => read_user(r),
        None => Err(LedgerError::NotFound("User")),
    }
}

pub fn list_users(conn: &Connection) -> LedgerResult<Vec<User>> {
    let mut stmt =
        conn.prepare("SELECT id, username, email, created_at FROM users ORDER BY username")?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(read_user(r)?);
    }
    Ok(out)
}
