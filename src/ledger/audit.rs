// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{load_balance, out_of_range};
use crate::error::LedgerResult;
use crate::models::Polarity;
use crate::utils::from_db_amount;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditIssue {
    pub kind: &'static str,
    pub detail: String,
}

/// Recompute every user's balance from the ledger and look for entries whose
/// sign disagrees with their own polarity or their category's. Read-only.
pub fn audit(conn: &Connection) -> LedgerResult<Vec<AuditIssue>> {
    let mut issues = Vec::new();

    let mut users = conn.prepare("SELECT id, username FROM users ORDER BY id")?;
    let mut cur = users.query([])?;
    while let Some(r) = cur.next()? {
        let user_id: i64 = r.get(0)?;
        let username: String = r.get(1)?;
        let stored = load_balance(conn, user_id)?;

        let mut sum = Decimal::ZERO;
        let mut amounts = conn.prepare("SELECT amount FROM transactions WHERE user_id=?1")?;
        let mut rows = amounts.query([user_id])?;
        while let Some(a) = rows.next()? {
            let s: String = a.get(0)?;
            sum = sum
                .checked_add(from_db_amount(&s)?)
                .ok_or_else(out_of_range)?;
        }
        if sum != stored {
            issues.push(AuditIssue {
                kind: "balance_drift",
                detail: format!("{}: stored {} but ledger sums to {}", username, stored, sum),
            });
        }
        if stored < Decimal::ZERO {
            issues.push(AuditIssue {
                kind: "negative_balance",
                detail: format!("{}: {}", username, stored),
            });
        }
    }

    let mut stmt = conn.prepare(
        "SELECT t.id, t.amount, t.polarity, c.polarity
         FROM transactions t LEFT JOIN categories c ON t.category_id=c.id
         ORDER BY t.id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let amount_s: String = r.get(1)?;
        let polarity: Polarity = r.get(2)?;
        let category: Option<Polarity> = r.get(3)?;
        let amount = from_db_amount(&amount_s)?;
        if !polarity.agrees_with(amount) {
            issues.push(AuditIssue {
                kind: "sign_mismatch",
                detail: format!("transaction {}: {} marked {}", id, amount, polarity),
            });
        }
        if let Some(cp) = category.filter(|cp| *cp != polarity) {
            issues.push(AuditIssue {
                kind: "category_mismatch",
                detail: format!("transaction {}: {} under a {} category", id, polarity, cp),
            });
        }
    }

    if issues.is_empty() {
        tracing::debug!("audit clean");
    } else {
        tracing::warn!(count = issues.len(), "audit found issues");
    }
    Ok(issues)
}
