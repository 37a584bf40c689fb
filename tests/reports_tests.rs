// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashtrack::ledger::{create_category, create_transaction, create_user};
use cashtrack::models::{NewTransaction, Page, Polarity, User};
use cashtrack::reports::{
    category_balance, category_transactions, current_balance, get_report_by_day,
    paged_transactions, report_by_category, report_by_day, total_expense, total_income,
    transaction_count,
};
use cashtrack::{LedgerError, db};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn setup() -> (Connection, User) {
    let mut conn = db::open_in_memory().unwrap();
    let user = create_user(&mut conn, "blue", "truong.phan@outlook.com").unwrap();
    (conn, user)
}

#[test]
fn category_report_for_utilities() {
    let (mut conn, user) = setup();
    let utilities = create_category(&conn, user.id, "Utilities", Polarity::Expense).unwrap();
    create_transaction(&mut conn, user.id, &NewTransaction::new("salary", dec!(1000))).unwrap();
    let t = create_transaction(
        &mut conn,
        user.id,
        &NewTransaction::new("power bill", dec!(200)).with_category(utilities.id),
    )
    .unwrap();
    assert_eq!(t.amount, dec!(-200));

    let report = report_by_category(&conn, user.id, Polarity::Expense).unwrap();
    assert_eq!(report.titles, ["Utilities"]);
    assert_eq!(report.amounts, [dec!(-200)]);
}

#[test]
fn category_report_includes_empty_categories_in_title_order() {
    let (mut conn, user) = setup();
    let water = create_category(&conn, user.id, "Water", Polarity::Expense).unwrap();
    create_category(&conn, user.id, "Books", Polarity::Expense).unwrap();
    let salary = create_category(&conn, user.id, "Salary", Polarity::Income).unwrap();
    create_transaction(
        &mut conn,
        user.id,
        &NewTransaction::new("jan", dec!(900)).with_category(salary.id),
    )
    .unwrap();
    for amount in [dec!(10), dec!(15.5)] {
        create_transaction(
            &mut conn,
            user.id,
            &NewTransaction::new("water", amount).with_category(water.id),
        )
        .unwrap();
    }

    let expense = report_by_category(&conn, user.id, Polarity::Expense).unwrap();
    assert_eq!(expense.titles, ["Books", "Water"]);
    assert_eq!(expense.amounts, [Decimal::ZERO, dec!(-25.5)]);

    let income = report_by_category(&conn, user.id, Polarity::Income).unwrap();
    assert_eq!(income.titles, ["Salary"]);
    assert_eq!(income.amounts, [dec!(900)]);
    assert_eq!(category_balance(&conn, water.id).unwrap(), dec!(-25.5));
}

#[test]
fn daily_report_groups_by_date() {
    let (mut conn, user) = setup();
    let day = |d: u32, h: u32| Utc.with_ymd_and_hms(2025, 3, d, h, 0, 0).unwrap();
    create_transaction(
        &mut conn,
        user.id,
        &NewTransaction::new("salary", dec!(1000)).at(day(1, 9)),
    )
    .unwrap();
    for (amount, at) in [
        (dec!(-10), day(2, 8)),
        (dec!(-5.5), day(2, 20)),
        (dec!(-30), day(5, 12)),
        (dec!(-1), day(9, 12)),
    ] {
        create_transaction(&mut conn, user.id, &NewTransaction::new("spend", amount).at(at))
            .unwrap();
    }

    let report =
        report_by_day(&conn, user.id, Polarity::Expense, day(1, 0), day(6, 0)).unwrap();
    assert_eq!(
        report.dates,
        [
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
        ]
    );
    assert_eq!(report.amounts, [dec!(-15.5), dec!(-30)]);

    let income = report_by_day(&conn, user.id, Polarity::Income, day(1, 0), day(9, 23)).unwrap();
    assert_eq!(income.amounts, [dec!(1000)]);

    let nothing = report_by_day(&conn, user.id, Polarity::Expense, day(10, 0), day(20, 0)).unwrap();
    assert!(nothing.dates.is_empty() && nothing.amounts.is_empty());
}

#[test]
fn recent_report_window() {
    let (mut conn, user) = setup();
    let now = Utc::now();
    create_transaction(
        &mut conn,
        user.id,
        &NewTransaction::new("salary", dec!(100)).at(now - Duration::days(30)),
    )
    .unwrap();
    create_transaction(
        &mut conn,
        user.id,
        &NewTransaction::new("lunch", dec!(-12)).at(now - Duration::days(20)),
    )
    .unwrap();
    create_transaction(
        &mut conn,
        user.id,
        &NewTransaction::new("snack", dec!(-3)).at(now - Duration::hours(1)),
    )
    .unwrap();

    let week = get_report_by_day(&conn, user.id, Polarity::Expense, 7).unwrap();
    assert_eq!(week.amounts, [dec!(-3)]);
    assert!(matches!(
        get_report_by_day(&conn, user.id, Polarity::Expense, 0),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn out_of_range_window_is_refused() {
    let (mut conn, user) = setup();
    create_transaction(&mut conn, user.id, &NewTransaction::new("salary", dec!(10))).unwrap();
    for days in [1_000_000_000, i64::MAX] {
        assert!(matches!(
            get_report_by_day(&conn, user.id, Polarity::Income, days),
            Err(LedgerError::Validation(_))
        ));
    }
    let century = get_report_by_day(&conn, user.id, Polarity::Income, 36_500).unwrap();
    assert_eq!(century.amounts, [dec!(10)]);
}

#[test]
fn eleven_entries_paginate_into_three_pages() {
    let (mut conn, user) = setup();
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    for i in 0..11 {
        create_transaction(
            &mut conn,
            user.id,
            &NewTransaction::new(format!("t{}", i), dec!(1)).at(start + Duration::minutes(i)),
        )
        .unwrap();
    }

    let first = paged_transactions(&conn, user.id, 1, 5).unwrap();
    let texts: Vec<&str> = first.items().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["t10", "t9", "t8", "t7", "t6"]);

    let third = paged_transactions(&conn, user.id, 3, 5).unwrap();
    assert_eq!(third.items().len(), 1);
    assert_eq!(third.items()[0].text, "t0");

    assert_eq!(paged_transactions(&conn, user.id, 4, 5).unwrap(), Page::EndOfData);
    assert!(matches!(
        paged_transactions(&conn, user.id, 0, 5),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn huge_page_numbers_are_end_of_data() {
    let (mut conn, user) = setup();
    for i in 0..3 {
        create_transaction(&mut conn, user.id, &NewTransaction::new(format!("t{}", i), dec!(1)))
            .unwrap();
    }
    assert_eq!(paged_transactions(&conn, user.id, usize::MAX, 5).unwrap(), Page::EndOfData);
    assert_eq!(
        paged_transactions(&conn, user.id, 2, usize::MAX).unwrap(),
        Page::EndOfData
    );
    assert_eq!(
        paged_transactions(&conn, user.id, 1, usize::MAX)
            .unwrap()
            .items()
            .len(),
        3
    );
}

#[test]
fn empty_ledger_is_end_of_data() {
    let (conn, user) = setup();
    assert!(paged_transactions(&conn, user.id, 1, 5).unwrap().is_end());
}

#[test]
fn totals_and_counts() {
    let (mut conn, user) = setup();
    for amount in [dec!(500), dec!(500), dec!(-100), dec!(-200)] {
        create_transaction(&mut conn, user.id, &NewTransaction::new("entry", amount)).unwrap();
    }
    assert_eq!(total_income(&conn, user.id).unwrap(), dec!(1000));
    assert_eq!(total_expense(&conn, user.id).unwrap(), dec!(-300));
    assert_eq!(transaction_count(&conn, user.id).unwrap(), 4);
    assert_eq!(current_balance(&conn, user.id).unwrap(), dec!(700));
}

#[test]
fn totals_are_zero_without_entries() {
    let (conn, user) = setup();
    assert_eq!(total_income(&conn, user.id).unwrap(), Decimal::ZERO);
    assert_eq!(total_expense(&conn, user.id).unwrap(), Decimal::ZERO);
    assert_eq!(transaction_count(&conn, user.id).unwrap(), 0);
}

#[test]
fn category_detail_is_owner_only() {
    let (mut conn, alice) = setup();
    let bob = create_user(&mut conn, "bob", "bob@example.com").unwrap();
    let cat = create_category(&conn, alice.id, "Interest", Polarity::Income).unwrap();
    create_transaction(
        &mut conn,
        alice.id,
        &NewTransaction::new("bank", dec!(3)).with_category(cat.id),
    )
    .unwrap();
    create_transaction(&mut conn, alice.id, &NewTransaction::new("other", dec!(4))).unwrap();

    let items = category_transactions(&conn, alice.id, cat.id).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].text, "bank");
    assert!(matches!(
        category_transactions(&conn, bob.id, cat.id),
        Err(LedgerError::NotAuthorized)
    ));
}
