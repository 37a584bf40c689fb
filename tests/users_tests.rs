// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashtrack::ledger::{audit, create_transaction, create_user, find_user, list_users};
use cashtrack::models::NewTransaction;
use cashtrack::{LedgerError, db};
use rust_decimal_macros::dec;

#[test]
fn duplicate_username_and_email() {
    let mut conn = db::open_in_memory().unwrap();
    create_user(&mut conn, "blue", "truong.phan@outlook.com").unwrap();

    let err = create_user(&mut conn, "blue", "other@abc.xyz").unwrap_err();
    assert!(matches!(err, LedgerError::Duplicate(_)));
    assert_eq!(err.to_string(), "Username already taken.");

    let err = create_user(&mut conn, "albert", "TRUONG.PHAN@outlook.com").unwrap_err();
    assert_eq!(err.to_string(), "Email already taken.");

    assert_eq!(list_users(&conn).unwrap().len(), 1);
}

#[test]
fn invalid_identity_rejected() {
    let mut conn = db::open_in_memory().unwrap();
    assert!(matches!(
        create_user(&mut conn, "blue", "not-an-email"),
        Err(LedgerError::Validation(_))
    ));
    assert!(matches!(
        create_user(&mut conn, "two words", "a@b.co"),
        Err(LedgerError::Validation(_))
    ));
    assert!(matches!(
        find_user(&conn, "ghost"),
        Err(LedgerError::NotFound("User"))
    ));
}

#[test]
fn audit_detects_out_of_band_balance_edit() {
    let mut conn = db::open_in_memory().unwrap();
    let user = create_user(&mut conn, "blue", "blue@example.com").unwrap();
    create_transaction(&mut conn, user.id, &NewTransaction::new("salary", dec!(500))).unwrap();
    assert!(audit(&conn).unwrap().is_empty());

    conn.execute(
        "UPDATE balances SET amount='999' WHERE user_id=?1",
        [user.id],
    )
    .unwrap();
    let issues = audit(&conn).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, "balance_drift");
}

#[test]
fn audit_detects_sign_mismatch() {
    let mut conn = db::open_in_memory().unwrap();
    let user = create_user(&mut conn, "blue", "blue@example.com").unwrap();
    let t = create_transaction(&mut conn, user.id, &NewTransaction::new("salary", dec!(500)))
        .unwrap();
    conn.execute(
        "UPDATE transactions SET polarity='expense' WHERE id=?1",
        [t.id],
    )
    .unwrap();
    let kinds: Vec<&str> = audit(&conn).unwrap().iter().map(|i| i.kind).collect();
    assert_eq!(kinds, ["sign_mismatch"]);
}
