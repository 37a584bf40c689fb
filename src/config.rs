// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, LedgerResult};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const DEFAULT_REPORT_DAYS: i64 = 7;
pub const MAX_PAGE_SIZE: i64 = 1_000;
pub const MAX_REPORT_DAYS: i64 = 36_500;

/// Keys accepted by `config set`.
pub const KEYS: &[&str] = &["default_user", "page_size", "report_days"];

/// Runtime settings kept in the `settings` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub default_user: Option<String>,
    pub page_size: usize,
    pub report_days: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_user: None,
            page_size: DEFAULT_PAGE_SIZE,
            report_days: DEFAULT_REPORT_DAYS,
        }
    }
}

impl Settings {
    pub fn load(conn: &Connection) -> LedgerResult<Self> {
        let mut s = Settings::default();
        if let Some(v) = get(conn, "default_user")? {
            s.default_user = Some(v);
        }
        if let Some(v) = get(conn, "page_size")? {
            s.page_size = parse_positive(&v, "page_size")? as usize;
        }
        if let Some(v) = get(conn, "report_days")? {
            s.report_days = parse_positive(&v, "report_days")?;
        }
        Ok(s)
    }
}

fn parse_positive(v: &str, key: &str) -> LedgerResult<i64> {
    let max = if key == "page_size" {
        MAX_PAGE_SIZE
    } else {
        MAX_REPORT_DAYS
    };
    match v.trim().parse::<i64>() {
        Ok(n) if n > 0 && n <= max => Ok(n),
        _ => Err(LedgerError::Validation(format!(
            "Setting '{}' must be an integer from 1 to {}, got '{}'",
            key, max, v
        ))),
    }
}

pub fn get(conn: &Connection, key: &str) -> LedgerResult<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

/// Store a setting after checking the key and value.
pub fn set(conn: &Connection, key: &str, value: &str) -> LedgerResult<()> {
    if !KEYS.contains(&key) {
        return Err(LedgerError::Validation(format!(
            "Unknown setting '{}', expected one of: {}",
            key,
            KEYS.join(", ")
        )));
    }
    if key != "default_user" {
        parse_positive(value, key)?;
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value.trim()],
    )?;
    tracing::info!(key, value, "setting updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn defaults_when_empty() {
        let conn = db::open_in_memory().unwrap();
        assert_eq!(Settings::load(&conn).unwrap(), Settings::default());
    }

    #[test]
    fn set_then_load() {
        let conn = db::open_in_memory().unwrap();
        set(&conn, "page_size", "10").unwrap();
        set(&conn, "default_user", "blue").unwrap();
        let s = Settings::load(&conn).unwrap();
        assert_eq!(s.page_size, 10);
        assert_eq!(s.default_user.as_deref(), Some("blue"));
        assert_eq!(s.report_days, DEFAULT_REPORT_DAYS);
    }

    #[test]
    fn rejects_bad_values() {
        let conn = db::open_in_memory().unwrap();
        assert!(matches!(
            set(&conn, "page_size", "0"),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            set(&conn, "report_days", "1000000000"),
            Err(LedgerError::Validation(_))
        ));
        set(&conn, "report_days", "36500").unwrap();
        assert!(matches!(
            set(&conn, "currency", "USD"),
            Err(LedgerError::Validation(_))
        ));
    }
}
