// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures surfaced by the ledger and report functions.
///
/// Every variant except [`LedgerError::Storage`] and [`LedgerError::Corrupt`] is a
/// validation failure: the operation was refused and nothing was written.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("The amount should be different from 0.")]
    ZeroBalance,
    #[error("Your balance is insufficient.")]
    InsufficientBalance,
    #[error("You are not authorized.")]
    NotAuthorized,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Duplicate(String),
    #[error("Corrupt ledger data: {0}")]
    Corrupt(String),
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl LedgerError {
    /// Short machine-readable tag.
    pub fn tag(&self) -> &'static str {
        match self {
            LedgerError::ZeroBalance => "zero_balance",
            LedgerError::InsufficientBalance => "insufficient_balance",
            LedgerError::NotAuthorized => "not_authorized",
            LedgerError::NotFound(_) => "not_found",
            LedgerError::Validation(_) => "validation",
            LedgerError::Duplicate(_) => "duplicate",
            LedgerError::Corrupt(_) => "corrupt",
            LedgerError::Storage(_) => "storage",
        }
    }

    /// True when the operation was refused without touching storage.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, LedgerError::Storage(_) | LedgerError::Corrupt(_))
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
