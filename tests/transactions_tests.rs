// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketpulse::commands::transactions;
use pocketpulse::engagement::store::{EngagementStore, SqliteEngagementStore};
use pocketpulse::models::{Necessity, TransactionKind, TransactionType};
use pocketpulse::store;
use pocketpulse::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    store::add_category(&conn, "Rent", "home", "#333", true, false).unwrap();
    store::add_category(&conn, "Games", "gamepad", "#909", false, false).unwrap();
    store::add_category(&conn, "Salary", "briefcase", "#090", false, true).unwrap();
    conn
}

fn add(conn: &Connection, args: &[&str], today: NaiveDate) -> anyhow::Result<transactions::Recorded> {
    let mut argv = vec!["pocketpulse", "tx", "add"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("add", add_m)) = tx_m.subcommand() {
            return transactions::record(conn, add_m, today);
        }
    }
    panic!("tx add not parsed");
}

#[test]
fn add_defaults_necessity_from_category() {
    let conn = setup();
    let today = d("2024-06-10");
    add(&conn, &["--amount", " 900 ", "--category", " Rent "], today).unwrap();
    add(&conn, &["--amount", "60", "--category", "Games"], today).unwrap();
    add(
        &conn,
        &["--amount", "15", "--category", "Games", "--necessity", "debatable"],
        today,
    )
    .unwrap();

    let rows = store::fetch_transactions(&conn, &Default::default()).unwrap();
    assert_eq!(rows.len(), 3);
    let necessities: Vec<Option<Necessity>> = rows.iter().map(|t| t.kind.necessity()).collect();
    assert!(necessities.contains(&Some(Necessity::Necessary)));
    assert!(necessities.contains(&Some(Necessity::Unnecessary)));
    assert!(necessities.contains(&Some(Necessity::Debatable)));
    assert!(rows.iter().all(|t| t.transaction_date == today));
}

#[test]
fn add_advances_streak_and_usage() {
    let conn = setup();
    let first = add(&conn, &["--amount", "10", "--category", "Games"], d("2024-06-10")).unwrap();
    assert_eq!(first.streak.state.current_streak, 1);
    assert!(first.streak.is_first_today);

    let second = add(&conn, &["--amount", "5", "--category", "Games"], d("2024-06-10")).unwrap();
    assert_eq!(second.streak.state.current_streak, 1);
    assert!(!second.streak.is_first_today);

    add(&conn, &["--amount", "5", "--category", "Rent"], d("2024-06-11")).unwrap();
    let third = add(&conn, &["--amount", "5", "--category", "Rent"], d("2024-06-12")).unwrap();
    assert_eq!(third.streak.state.current_streak, 3);
    assert_eq!(third.streak.new_milestone, Some(3));

    let engagement = SqliteEngagementStore::new(&conn);
    let state = engagement.load_streak().unwrap();
    assert_eq!(state, third.streak.state);
    assert_eq!(state.total_transactions, 4);

    let usage = engagement.load_usage().unwrap();
    let games = store::category_by_name(&conn, "Games").unwrap();
    let rent = store::category_by_name(&conn, "Rent").unwrap();
    assert_eq!(usage.usage[&games.id].count, 2);
    assert_eq!(usage.usage[&rent.id].count, 2);
    assert_eq!(usage.last_category(TransactionType::Expense), Some(rent.id));
}

#[test]
fn income_ignores_necessity() {
    let conn = setup();
    add(
        &conn,
        &[
            "--kind",
            "income",
            "--amount",
            "3000",
            "--category",
            "Salary",
            "--necessity",
            "necessary",
        ],
        d("2024-06-10"),
    )
    .unwrap();
    let rows = store::fetch_transactions(&conn, &Default::default()).unwrap();
    assert_eq!(rows[0].kind, TransactionKind::Income);
    assert_eq!(rows[0].amount, Decimal::from(3000));
}

#[test]
fn rejects_category_of_the_wrong_type() {
    let conn = setup();
    let err = add(&conn, &["--amount", "10", "--category", "Salary"], d("2024-06-10"))
        .unwrap_err();
    assert!(err.to_string().contains("income transactions"));
    assert!(store::fetch_transactions(&conn, &Default::default()).unwrap().is_empty());
    // nothing saved, so nothing logged
    let state = SqliteEngagementStore::new(&conn).load_streak().unwrap();
    assert_eq!(state.total_transactions, 0);
}

#[test]
fn rejects_subcategory_of_another_category() {
    let conn = setup();
    let rent = store::category_by_name(&conn, "Rent").unwrap();
    let games = store::category_by_name(&conn, "Games").unwrap();
    let deposit = store::add_subcategory(&conn, rent.id, "Deposit").unwrap();
    let err = store::insert_transaction(
        &conn,
        &store::NewTransaction {
            kind: TransactionKind::Expense { necessity: Necessity::Necessary },
            amount: Decimal::from(10),
            category_id: games.id,
            subcategory_id: Some(deposit),
            transaction_date: d("2024-06-10"),
            note: None,
            event_id: None,
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("does not belong"));
}

#[test]
fn list_filters_and_limits() {
    let conn = setup();
    for day in ["2024-06-01", "2024-06-02", "2024-06-03"] {
        add(
            &conn,
            &["--amount", "10", "--category", "Games", "--date", day],
            d("2024-06-03"),
        )
        .unwrap();
    }
    let matches = cli::build_cli().get_matches_from([
        "pocketpulse",
        "tx",
        "list",
        "--from",
        "2024-06-02",
        "--limit",
        "5",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].transaction_date, d("2024-06-03"));
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn failed_engagement_flush_rolls_back_the_save() {
    let conn = setup();
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('engagement.category_usage', '{broken')",
        [],
    )
    .unwrap();

    let err = add(&conn, &["--amount", "10", "--category", "Games"], d("2024-06-10"))
        .unwrap_err();
    assert!(err.to_string().contains("engagement.category_usage"));
    assert!(store::fetch_transactions(&conn, &Default::default()).unwrap().is_empty());
    let state = SqliteEngagementStore::new(&conn).load_streak().unwrap();
    assert_eq!(state.total_transactions, 0);

    // once the blob is repaired the same entry saves exactly once
    conn.execute(
        "DELETE FROM settings WHERE key='engagement.category_usage'",
        [],
    )
    .unwrap();
    add(&conn, &["--amount", "10", "--category", "Games"], d("2024-06-10")).unwrap();
    assert_eq!(store::fetch_transactions(&conn, &Default::default()).unwrap().len(), 1);
    let state = SqliteEngagementStore::new(&conn).load_streak().unwrap();
    assert_eq!(state.total_transactions, 1);
}

#[test]
fn rejects_amount_above_ceiling() {
    let conn = setup();
    let err = add(
        &conn,
        &["--amount", "1000000000000000000000000000", "--category", "Games"],
        d("2024-06-10"),
    )
    .unwrap_err();
    assert!(err.to_string().contains("exceeds the limit"));
    assert!(store::fetch_transactions(&conn, &Default::default()).unwrap().is_empty());

    let limit = store::MAX_TRANSACTION_AMOUNT.to_string();
    add(&conn, &["--amount", &limit, "--category", "Games"], d("2024-06-10")).unwrap();
}
