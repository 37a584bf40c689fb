// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, LedgerResult};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::Once;

const DB_TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "CASHTRACK_LOG";

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber. Logs go to stderr so `--json`
/// output on stdout stays parseable.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new("cashtrack=warn"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or `YYYY-MM-DD HH:MM[:SS]`.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(n) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(n.and_utc());
        }
    }
    let d = parse_date(s)?;
    Ok(d.and_time(NaiveTime::MIN).and_utc())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("$ {}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

// Storage encodings. Timestamps are fixed width so text order is time order.

pub fn to_db_ts(dt: DateTime<Utc>) -> String {
    dt.format(DB_TS_FORMAT).to_string()
}

pub fn from_db_ts(s: &str) -> LedgerResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .map(|n| n.and_utc())
        .map_err(|e| LedgerError::Corrupt(format!("timestamp '{}': {}", s, e)))
}

pub fn from_db_amount(s: &str) -> LedgerResult<Decimal> {
    s.parse::<Decimal>()
        .map_err(|e| LedgerError::Corrupt(format!("amount '{}': {}", s, e)))
}

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$")
        .expect("email pattern compiles")
});

pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// Trim `s` and check it is non-empty and at most `max` characters.
pub fn clean_text(s: &str, field: &str, max: usize) -> LedgerResult<String> {
    let t = s.trim();
    if t.is_empty() {
        return Err(LedgerError::Validation(format!("{} must not be empty", field)));
    }
    if t.chars().count() > max {
        return Err(LedgerError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(t.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn db_timestamps_sort_as_text() {
        let a = Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap();
        let b = a + chrono::Duration::microseconds(1);
        assert!(to_db_ts(a) < to_db_ts(b));
        assert_eq!(from_db_ts(&to_db_ts(b)).unwrap(), b);
    }

    #[test]
    fn datetime_accepts_plain_date() {
        let d = parse_datetime("2025-03-04").unwrap();
        assert_eq!(d, Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap());
        let d = parse_datetime("2025-03-04 18:30").unwrap();
        assert_eq!(d, Utc.with_ymd_and_hms(2025, 3, 4, 18, 30, 0).unwrap());
        assert!(parse_datetime("04/03/2025").is_err());
    }

    #[test]
    fn email_check() {
        assert!(is_valid_email("truong.phan@outlook.com"));
        assert!(!is_valid_email("blue"));
        assert!(!is_valid_email("a@b"));
    }

    #[test]
    fn clean_text_limits() {
        assert_eq!(clean_text("  rent ", "Description", 10).unwrap(), "rent");
        assert!(clean_text("   ", "Description", 10).is_err());
        assert!(clean_text("abcdefghijk", "Description", 10).is_err());
    }
}
