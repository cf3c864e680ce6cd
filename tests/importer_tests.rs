// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shwebudget::cli;
use shwebudget::commands::importer::{self, parse_backup, parse_csv, restore_backup};
use shwebudget::db::MemoryStore;
use shwebudget::errors::FinanceError;
use shwebudget::models::{
    AppState, Budget, CalculatorData, Currency, MarketRates, Transaction, TransactionType,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

const HEADER: &str = "Date,Description,Type,Amount,Currency,Category\n";

#[test]
fn csv_rows_are_parsed_leniently() {
    let data = format!(
        "{}{}",
        HEADER,
        "2024-01-05,\"Lunch, with team\",EXPENSE,1500,MMK,Food\n\
         2024-01-06,Salary,income,1000,usd,Work\n\
         2024-01-07,Gold bar,Monthly Savings,abc,MMK,Invest\n\
         short,row\n\
         ,,,50,,\n"
    );
    let today = d(2024, 9, 9);
    let txs = parse_csv(data.as_bytes(), today).unwrap();
    assert_eq!(txs.len(), 4);

    assert_eq!(txs[0].date, d(2024, 1, 5));
    assert_eq!(txs[0].description, "Lunch, with team");
    assert_eq!(txs[0].r#type, TransactionType::Expense);
    assert_eq!(txs[0].amount, Decimal::from(1500));
    assert_eq!(txs[0].category, "Food");

    assert_eq!(txs[1].r#type, TransactionType::Income);
    assert_eq!(txs[1].currency, Currency::USD);

    assert_eq!(txs[2].r#type, TransactionType::Saving);
    assert_eq!(txs[2].amount, Decimal::ZERO);

    assert_eq!(txs[3].date, today);
    assert_eq!(txs[3].description, "Imported Transaction");
    assert_eq!(txs[3].r#type, TransactionType::Expense);
    assert_eq!(txs[3].amount, Decimal::from(50));
    assert_eq!(txs[3].currency, Currency::MMK);
    assert_eq!(txs[3].category, "General");

    // Fresh ids for every row
    assert_ne!(txs[0].id, txs[1].id);
}

#[test]
fn four_column_rows_default_the_rest() {
    let data = format!("{}2024-02-01,Tea,EXPENSE,800\n", HEADER);
    let txs = parse_csv(data.as_bytes(), d(2024, 9, 9)).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].currency, Currency::MMK);
    assert_eq!(txs[0].category, "General");
}

#[test]
fn header_only_file_imports_nothing() {
    let txs = parse_csv(HEADER.as_bytes(), d(2024, 9, 9)).unwrap();
    assert!(txs.is_empty());
}

#[test]
fn bad_date_aborts_the_whole_import() {
    let data = format!(
        "{}2024-01-05,Ok,EXPENSE,1,MMK,Food\n05/01/2024,Bad,EXPENSE,1,MMK,Food\n",
        HEADER
    );
    let err = parse_csv(data.as_bytes(), d(2024, 9, 9)).unwrap_err();
    assert!(matches!(err, FinanceError::MalformedImport { .. }));
}

#[test]
fn unknown_currency_aborts_the_whole_import() {
    let data = format!("{}2024-01-05,Trip,EXPENSE,1,EUR,Travel\n", HEADER);
    let err = parse_csv(data.as_bytes(), d(2024, 9, 9)).unwrap_err();
    assert!(matches!(err, FinanceError::MalformedImport { .. }));
}

#[test]
fn csv_import_appends_to_existing_transactions() {
    let mut state = AppState::default();
    state.transactions.push(Transaction {
        id: "keep".into(),
        date: d(2024, 1, 1),
        description: "Existing".into(),
        amount: Decimal::from(10),
        r#type: TransactionType::Income,
        category: "Work".into(),
        currency: Currency::MMK,
    });
    let store = MemoryStore::new(state);

    let mut f = NamedTempFile::new().unwrap();
    writeln!(f, "{}2024-03-01,Taxi,EXPENSE,3000,MMK,Transport", HEADER).unwrap();
    let path = f.path().to_str().unwrap().to_string();

    let matches =
        cli::build_cli().get_matches_from(["shwebudget", "import", "csv", "--path", &path]);
    let Some(("import", import_m)) = matches.subcommand() else {
        panic!("no import subcommand");
    };
    importer::handle(&store, import_m).unwrap();

    let saved = store.snapshot();
    assert_eq!(saved.transactions.len(), 2);
    assert_eq!(saved.transactions[0].id, "keep");
    assert_eq!(saved.transactions[1].description, "Taxi");
}

#[test]
fn backup_without_transactions_is_rejected() {
    assert!(matches!(
        parse_backup(r#"{"version":"2.1","transactions":[]}"#).unwrap_err(),
        FinanceError::EmptyBackup
    ));
    assert!(matches!(
        parse_backup(r#"{"version":"2.1"}"#).unwrap_err(),
        FinanceError::EmptyBackup
    ));
    assert!(matches!(
        parse_backup("not json").unwrap_err(),
        FinanceError::MalformedImport { .. }
    ));
}

const LEGACY_BACKUP: &str = r#"{
    "profile": {"id": "u1", "name": "Aung", "createdAt": "2024-01-01T00:00:00.000Z"},
    "transactions": [
        {"id": "t1", "date": "2024-02-01", "description": "Tea", "amount": 1500,
         "type": "EXPENSE", "category": "Food", "currency": "MMK"},
        {"date": "2024-02-02", "description": "Pay", "amount": 12.5,
         "type": "INCOME", "category": "Work", "currency": "USD"}
    ],
    "rates": {"THB": 120, "USD": 4400, "SGD": 3200, "Gold": 6000000},
    "version": "2.0"
}"#;

#[test]
fn restore_replaces_data_and_fills_gaps() {
    let mut state = AppState::default();
    state.transactions.push(Transaction {
        id: "old".into(),
        date: d(2023, 1, 1),
        description: "Old".into(),
        amount: Decimal::ONE,
        r#type: TransactionType::Expense,
        category: "Misc".into(),
        currency: Currency::MMK,
    });
    state.budgets.push(Budget {
        category: "Misc".into(),
        limit: Decimal::from(5),
    });
    state.calculator.loan_rate = Decimal::from(12);

    let backup = parse_backup(LEGACY_BACKUP).unwrap();
    restore_backup(&mut state, backup);

    assert_eq!(state.transactions.len(), 2);
    assert_eq!(state.transactions[0].id, "t1");
    assert_eq!(state.transactions[1].amount, Decimal::new(125, 1));
    assert_eq!(state.transactions[1].currency, Currency::USD);
    assert!(!state.transactions[1].id.is_empty());

    assert_eq!(state.profile.name, "Aung");
    assert_eq!(
        state.rates,
        MarketRates {
            thb: Decimal::from(120),
            usd: Decimal::from(4400),
            sgd: Decimal::from(3200),
            gold: Decimal::from(6_000_000),
        }
    );
    // Missing sections: calculator kept, lists cleared
    assert_eq!(state.calculator.loan_rate, Decimal::from(12));
    assert_ne!(state.calculator, CalculatorData::default());
    assert!(state.budgets.is_empty());
    assert!(state.recurring.is_empty());
}

#[test]
fn padded_columns_are_trimmed_but_descriptions_kept() {
    let data = format!(
        "{} 2024-01-05 ,\"  Tea with  \", EXPENSE , 100 , usd , Food \n",
        HEADER
    );
    let txs = parse_csv(data.as_bytes(), d(2024, 9, 9)).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].date, d(2024, 1, 5));
    assert_eq!(txs[0].description, "  Tea with  ");
    assert_eq!(txs[0].amount, Decimal::from(100));
    assert_eq!(txs[0].currency, Currency::USD);
    assert_eq!(txs[0].category, "Food");
}
