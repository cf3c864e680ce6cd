// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shwebudget::db::{MemoryStore, Store};
use shwebudget::errors::FinanceError;
use shwebudget::models::{AppState, Currency, Transaction, TransactionType};
use shwebudget::{cli, commands::transactions};

fn setup() -> AppState {
    let mut state = AppState::default();
    let rows = [
        ("a", (2024, 1, 3), TransactionType::Expense),
        ("b", (2024, 2, 1), TransactionType::Income),
        ("c", (2024, 1, 3), TransactionType::Expense),
        ("d", (2024, 1, 1), TransactionType::Saving),
    ];
    for (id, (y, m, day), r#type) in rows {
        state.transactions.push(Transaction {
            id: id.into(),
            date: NaiveDate::from_ymd_opt(y, m, day).unwrap(),
            description: format!("P{}", id),
            amount: Decimal::from(10),
            r#type,
            category: "Cat1".into(),
            currency: Currency::USD,
        });
    }
    state
}

fn tx_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["shwebudget", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", tx_m)) => tx_m.clone(),
        _ => panic!("no tx subcommand"),
    }
}

fn list_rows(state: &AppState, args: &[&str]) -> Vec<transactions::TransactionRow> {
    let mut full = vec!["list"];
    full.extend_from_slice(args);
    let tx_m = tx_matches(&full);
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    transactions::query_rows(state, list_m).unwrap()
}

#[test]
fn list_limit_respected() {
    let rows = list_rows(&setup(), &["--limit", "2"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2024-02-01");
}

#[test]
fn list_is_newest_first_and_stable_within_a_day() {
    let rows = list_rows(&setup(), &[]);
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c", "d"]);
}

#[test]
fn list_filters_by_type_and_month() {
    let income = list_rows(&setup(), &["--type", "income"]);
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].r#type, "INCOME");

    let january = list_rows(&setup(), &["--month", "2024-01"]);
    assert_eq!(january.len(), 3);

    let none = list_rows(&setup(), &["--type", "SAVING", "--month", "2024-02"]);
    assert!(none.is_empty());
}

#[test]
fn add_records_a_transaction() {
    let store = MemoryStore::default();
    let m = tx_matches(&[
        "add", "--date", "2024-05-01", "--desc", "Dinner", "--amount", "12.5", "--currency",
        "thb", "--category", "Food",
    ]);
    transactions::handle(&store, &m).unwrap();

    let saved = store.snapshot();
    assert_eq!(saved.transactions.len(), 1);
    let t = &saved.transactions[0];
    assert_eq!(t.description, "Dinner");
    assert_eq!(t.amount, Decimal::new(125, 1));
    assert_eq!(t.r#type, TransactionType::Expense);
    assert_eq!(t.currency, Currency::THB);
    assert!(!t.id.is_empty());
}

#[test]
fn add_rejects_non_positive_amount() {
    let store = MemoryStore::default();
    let m = tx_matches(&["add", "--desc", "Nothing", "--amount", "0"]);
    assert!(transactions::handle(&store, &m).is_err());
    assert!(store.snapshot().transactions.is_empty());
}

#[test]
fn remove_deletes_by_id() {
    let store = MemoryStore::new(setup());
    transactions::handle(&store, &tx_matches(&["rm", "--id", "c"])).unwrap();
    let ids: Vec<String> = store
        .load()
        .unwrap()
        .transactions
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec!["a", "b", "d"]);

    let err = transactions::handle(&store, &tx_matches(&["rm", "--id", "zzz"])).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FinanceError>(),
        Some(FinanceError::NotFound(_))
    ));
}
