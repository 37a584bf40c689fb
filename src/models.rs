// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether an entry adds money (income) or takes it away (expense).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    #[default]
    Income,
    Expense,
}

impl Polarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn sign(&self) -> &'static str {
        match self {
            Self::Income => "+",
            Self::Expense => "-",
        }
    }

    /// Polarity implied by the sign of an amount; `None` for zero.
    pub fn of_amount(amount: Decimal) -> Option<Self> {
        if amount > Decimal::ZERO {
            Some(Self::Income)
        } else if amount < Decimal::ZERO {
            Some(Self::Expense)
        } else {
            None
        }
    }

    pub fn agrees_with(&self, amount: Decimal) -> bool {
        Self::of_amount(amount) == Some(*self)
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Polarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "in" | "+" => Ok(Self::Income),
            "expense" | "out" | "-" => Ok(Self::Expense),
            other => Err(format!(
                "Unknown polarity '{}', expected income|expense",
                other
            )),
        }
    }
}

impl ToSql for Polarity {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Polarity {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub polarity: Polarity,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.polarity.sign(), self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub text: String,
    pub amount: Decimal,
    pub polarity: Polarity,
    pub category_id: Option<i64>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    pub user_id: i64,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for [`crate::ledger::create_transaction`].
#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub text: String,
    pub amount: Decimal,
    /// Used only when no category is linked and the amount is zero.
    pub polarity: Polarity,
    pub category_id: Option<i64>,
    /// Defaults to the current time.
    pub created_at: Option<DateTime<Utc>>,
}

impl NewTransaction {
    pub fn new(text: impl Into<String>, amount: Decimal) -> Self {
        Self {
            text: text.into(),
            amount,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Per-day sums, index aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayReport {
    pub dates: Vec<NaiveDate>,
    pub amounts: Vec<Decimal>,
}

/// Per-category sums, index aligned and ordered by title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub titles: Vec<String>,
    pub amounts: Vec<Decimal>,
}

/// One page of transactions, newest first.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Items(Vec<Transaction>),
    EndOfData,
}

impl Page {
    pub fn items(&self) -> &[Transaction] {
        match self {
            Page::Items(items) => items,
            Page::EndOfData => &[],
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Page::EndOfData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn polarity_from_amount_sign() {
        assert_eq!(Polarity::of_amount(dec!(0.01)), Some(Polarity::Income));
        assert_eq!(Polarity::of_amount(dec!(-3)), Some(Polarity::Expense));
        assert_eq!(Polarity::of_amount(Decimal::ZERO), None);
    }

    #[test]
    fn polarity_parses_aliases() {
        assert_eq!("Expense".parse::<Polarity>().unwrap(), Polarity::Expense);
        assert_eq!("in".parse::<Polarity>().unwrap(), Polarity::Income);
        assert!("transfer".parse::<Polarity>().is_err());
    }

    #[test]
    fn category_display_carries_sign() {
        let cat = Category {
            id: 1,
            title: "Utilities".into(),
            polarity: Polarity::Expense,
            user_id: 1,
            created_at: Utc::now(),
        };
        assert_eq!(cat.to_string(), "(-) Utilities");
    }
}
