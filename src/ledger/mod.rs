// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The balance-keeping core.
//!
//! Every user owns exactly one row in `balances`. That row is only ever written
//! from this module, inside the same SQLite transaction that inserts or deletes
//! the ledger entry, so `balance == SUM(amount)` holds after every commit.
//! Mutations open the transaction with [`TransactionBehavior::Immediate`] so a
//! second writer waits for the lock instead of reading a stale balance.

mod audit;
mod categories;
mod transactions;
mod users;

pub use audit::{AuditIssue, audit};
pub use categories::{
    create_category, delete_category, find_category, get_category, list_categories,
    update_category,
};
pub use transactions::{create_transaction, delete_transaction, get_transaction};
pub(crate) use transactions::read_transaction;
pub use users::{create_user, find_user, get_user, list_users};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Balance, Polarity};
use crate::utils::{from_db_amount, from_db_ts, to_db_ts};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use rust_decimal::Decimal;

/// Force an amount's sign to agree with its category, or derive the polarity
/// from the sign when there is no category.
///
/// A zero amount without a category keeps `fallback`; such an entry never
/// reaches storage.
pub fn normalize(
    amount: Decimal,
    fallback: Polarity,
    category: Option<Polarity>,
) -> (Decimal, Polarity) {
    match category {
        Some(Polarity::Income) => (amount.abs(), Polarity::Income),
        Some(Polarity::Expense) => (-amount.abs(), Polarity::Expense),
        None => (amount, Polarity::of_amount(amount).unwrap_or(fallback)),
    }
}

/// The stored running balance. No recomputation.
pub fn get_balance(conn: &Connection, user_id: i64) -> LedgerResult<Decimal> {
    load_balance(conn, user_id)
}

pub fn balance_record(conn: &Connection, user_id: i64) -> LedgerResult<Balance> {
    let row: Option<(String, String, String)> = conn
        .query_row(
            "SELECT amount, created_at, updated_at FROM balances WHERE user_id=?1",
            params![user_id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?;
    let (amount, created, updated) = row.ok_or(LedgerError::NotFound("User"))?;
    Ok(Balance {
        user_id,
        amount: from_db_amount(&amount)?,
        created_at: from_db_ts(&created)?,
        updated_at: from_db_ts(&updated)?,
    })
}

pub(crate) fn begin(conn: &mut Connection) -> LedgerResult<rusqlite::Transaction<'_>> {
    Ok(conn.transaction_with_behavior(TransactionBehavior::Immediate)?)
}

fn load_balance(conn: &Connection, user_id: i64) -> LedgerResult<Decimal> {
    let amount: Option<String> = conn
        .query_row(
            "SELECT amount FROM balances WHERE user_id=?1",
            params![user_id],
            |r| r.get(0),
        )
        .optional()?;
    from_db_amount(&amount.ok_or(LedgerError::NotFound("User"))?)
}

fn store_balance(
    conn: &Connection,
    user_id: i64,
    amount: Decimal,
    now: DateTime<Utc>,
) -> LedgerResult<()> {
    conn.execute(
        "UPDATE balances SET amount=?1, updated_at=?2 WHERE user_id=?3",
        params![amount.to_string(), to_db_ts(now), user_id],
    )?;
    Ok(())
}

pub(crate) fn out_of_range() -> LedgerError {
    LedgerError::Validation("amount out of range".into())
}

/// Check that the balance after adding `amount` is strictly positive.
fn check_credit(current: Decimal, amount: Decimal) -> LedgerResult<Decimal> {
    let next = current.checked_add(amount).ok_or_else(out_of_range)?;
    if next.is_zero() {
        return Err(LedgerError::ZeroBalance);
    }
    if next < Decimal::ZERO {
        return Err(LedgerError::InsufficientBalance);
    }
    Ok(next)
}

/// Check that the balance after removing `amount` is not negative.
fn check_debit(current: Decimal, amount: Decimal) -> LedgerResult<Decimal> {
    let next = current.checked_sub(amount).ok_or_else(out_of_range)?;
    if next < Decimal::ZERO {
        return Err(LedgerError::InsufficientBalance);
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn income_category_forces_positive() {
        let (amt, pol) = normalize(dec!(-200), Polarity::Expense, Some(Polarity::Income));
        assert_eq!(amt, dec!(200));
        assert_eq!(pol, Polarity::Income);
    }

    #[test]
    fn expense_category_forces_negative() {
        let (amt, pol) = normalize(dec!(100), Polarity::Income, Some(Polarity::Expense));
        assert_eq!(amt, dec!(-100));
        assert_eq!(pol, Polarity::Expense);
        let (amt, _) = normalize(dec!(-100), Polarity::Income, Some(Polarity::Expense));
        assert_eq!(amt, dec!(-100));
    }

    #[test]
    fn sign_decides_without_category() {
        assert_eq!(
            normalize(dec!(5), Polarity::Expense, None),
            (dec!(5), Polarity::Income)
        );
        assert_eq!(
            normalize(dec!(-5), Polarity::Income, None),
            (dec!(-5), Polarity::Expense)
        );
        assert_eq!(
            normalize(Decimal::ZERO, Polarity::Expense, None),
            (Decimal::ZERO, Polarity::Expense)
        );
    }

    #[test]
    fn credit_rules() {
        assert_eq!(check_credit(dec!(0), dec!(500)).unwrap(), dec!(500));
        assert!(matches!(
            check_credit(dec!(300), dec!(-300)),
            Err(LedgerError::ZeroBalance)
        ));
        assert!(matches!(
            check_credit(dec!(0), dec!(-200)),
            Err(LedgerError::InsufficientBalance)
        ));
    }

    #[test]
    fn debit_allows_reaching_zero() {
        assert_eq!(check_debit(dec!(500), dec!(500)).unwrap(), Decimal::ZERO);
        assert!(matches!(
            check_debit(dec!(300), dec!(500)),
            Err(LedgerError::InsufficientBalance)
        ));
        assert_eq!(check_debit(dec!(300), dec!(-200)).unwrap(), dec!(500));
    }

    #[test]
    fn overflow_is_refused() {
        assert!(matches!(
            check_credit(Decimal::MAX, Decimal::ONE),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            check_debit(Decimal::MAX, -Decimal::ONE),
            Err(LedgerError::Validation(_))
        ));
    }
}
