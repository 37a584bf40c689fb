// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod doctor;
pub mod exporter;
pub mod reports;
pub mod settings;
pub mod transactions;
pub mod users;

use crate::config::Settings;
use crate::ledger;
use crate::models::{Polarity, User};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;

/// The user named by `--user`, or the `default_user` setting.
pub fn resolve_user(conn: &Connection, m: &clap::ArgMatches) -> Result<User> {
    let name = match m.try_get_one::<String>("user").ok().flatten() {
        Some(n) => n.clone(),
        None => Settings::load(conn)?
            .default_user
            .ok_or_else(|| anyhow!("No user given: pass --user or run `config set default_user <name>`"))?,
    };
    ledger::find_user(conn, &name).with_context(|| format!("User '{}'", name))
}

pub(crate) fn polarity_of(m: &clap::ArgMatches) -> Result<Option<Polarity>> {
    m.get_one::<String>("polarity")
        .map(|s| s.parse::<Polarity>().map_err(|e| anyhow!(e)))
        .transpose()
}
