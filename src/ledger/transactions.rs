// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{begin, check_credit, check_debit, get_category, load_balance, normalize, store_balance};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{NewTransaction, Transaction};
use crate::utils::{clean_text, from_db_amount, from_db_ts, to_db_ts};
use chrono::{SubsecRound, Utc};
use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;

pub(crate) fn read_transaction(r: &Row<'_>) -> LedgerResult<Transaction> {
    let amount: String = r.get(2)?;
    let created: String = r.get(6)?;
    Ok(Transaction {
        id: r.get(0)?,
        text: r.get(1)?,
        amount: from_db_amount(&amount)?,
        polarity: r.get(3)?,
        category_id: r.get(4)?,
        user_id: r.get(5)?,
        created_at: from_db_ts(&created)?,
    })
}

pub fn get_transaction(conn: &Connection, id: i64) -> LedgerResult<Transaction> {
    let mut stmt = conn.prepare(
        "SELECT id, text, amount, polarity, category_id, user_id, created_at
         FROM transactions WHERE id=?1",
    )?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(r) => read_transaction(r),
        None => Err(LedgerError::NotFound("Transaction")),
    }
}

/// Record an entry for `user_id` and move the balance with it.
///
/// The amount's sign is normalized against the linked category first. The
/// entry is refused when the amount is zero, when the resulting balance would
/// be exactly zero ([`LedgerError::ZeroBalance`]) or below zero
/// ([`LedgerError::InsufficientBalance`]); in every refusal neither the
/// balance nor the ledger changes.
pub fn create_transaction(
    conn: &mut Connection,
    user_id: i64,
    new: &NewTransaction,
) -> LedgerResult<Transaction> {
    if new.amount.is_zero() {
        tracing::warn!(user_id, "transaction refused: zero amount");
        return Err(LedgerError::ZeroBalance);
    }
    let text = clean_text(&new.text, "Description", 255)?;
    let created_at = new.created_at.unwrap_or_else(Utc::now).trunc_subsecs(6);

    let tx = begin(conn)?;
    let category = match new.category_id {
        Some(id) => {
            let cat = get_category(&tx, id)?;
            if cat.user_id != user_id {
                return Err(LedgerError::NotAuthorized);
            }
            Some(cat)
        }
        None => None,
    };
    let (amount, polarity) = normalize(new.amount, new.polarity, category.map(|c| c.polarity));

    let current = load_balance(&tx, user_id)?;
    let next = match check_credit(current, amount) {
        Ok(next) => next,
        Err(e) => {
            tracing::warn!(user_id, %amount, %current, error = %e, "transaction refused");
            return Err(e);
        }
    };
    store_balance(&tx, user_id, next, Utc::now())?;
    tx.execute(
        "INSERT INTO transactions(text, amount, polarity, category_id, user_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            text,
            amount.to_string(),
            polarity,
            new.category_id,
            user_id,
            to_db_ts(created_at)
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    tracing::info!(transaction_id = id, user_id, %amount, balance = %next, "transaction recorded");

    Ok(Transaction {
        id,
        text,
        amount,
        polarity,
        category_id: new.category_id,
        user_id,
        created_at,
    })
}

/// Remove an entry owned by `requesting_user`, taking its amount back out of
/// the balance. Refused with [`LedgerError::InsufficientBalance`] when that
/// would leave the balance negative.
pub fn delete_transaction(
    conn: &mut Connection,
    transaction_id: i64,
    requesting_user: i64,
) -> LedgerResult<()> {
    let tx = begin(conn)?;
    let t = get_transaction(&tx, transaction_id)?;
    if t.user_id != requesting_user {
        tracing::warn!(transaction_id, requesting_user, "transaction delete refused: not owner");
        return Err(LedgerError::NotAuthorized);
    }
    let next = match remove_entry(&tx, &t) {
        Ok(next) => next,
        Err(e) => {
            tracing::warn!(transaction_id, error = %e, "transaction delete refused");
            return Err(e);
        }
    };
    tx.commit()?;
    tracing::info!(transaction_id, user_id = t.user_id, balance = %next, "transaction removed");
    Ok(())
}

/// Single-entry delete step shared by transaction and category removal.
/// Runs inside the caller's SQLite transaction and does not commit.
pub(crate) fn remove_entry(conn: &Connection, t: &Transaction) -> LedgerResult<Decimal> {
    let current = load_balance(conn, t.user_id)?;
    let next = check_debit(current, t.amount)?;
    store_balance(conn, t.user_id, next, Utc::now())?;
    conn.execute("DELETE FROM transactions WHERE id=?1", params![t.id])?;
    Ok(next)
}
