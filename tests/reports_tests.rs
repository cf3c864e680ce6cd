// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shwebudget::cli;
use shwebudget::commands::reports::{
    self, Bucketing, aggregate, available_years, category_totals, summarize, summary_view,
};
use shwebudget::db::MemoryStore;
use shwebudget::errors::FinanceError;
use shwebudget::models::{AppState, Currency, MarketRates, Transaction, TransactionType};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn tx(
    date: NaiveDate,
    r#type: TransactionType,
    amount: i64,
    currency: Currency,
    category: &str,
) -> Transaction {
    Transaction {
        id: format!("{}-{}-{}", date, category, amount),
        date,
        description: category.to_string(),
        amount: Decimal::from(amount),
        r#type,
        category: category.to_string(),
        currency,
    }
}

fn sample() -> Vec<Transaction> {
    vec![
        tx(d(2024, 2, 3), TransactionType::Saving, 100, Currency::THB, "Gold"),
        tx(d(2024, 1, 5), TransactionType::Income, 1000, Currency::MMK, "Salary"),
        tx(d(2024, 1, 9), TransactionType::Expense, 10, Currency::USD, "Food"),
        tx(d(2023, 12, 31), TransactionType::Expense, 500, Currency::MMK, "Rent"),
    ]
}

#[test]
fn monthly_buckets_are_scoped_to_year_and_sorted() {
    let buckets = aggregate(&sample(), &MarketRates::default(), Bucketing::Monthly, 2024).unwrap();
    assert_eq!(buckets.len(), 2);

    assert_eq!(buckets[0].key, "2024-01");
    assert_eq!(buckets[0].label, "Jan");
    assert_eq!(buckets[0].income, Decimal::from(1000));
    assert_eq!(buckets[0].expense, Decimal::from(45_000));
    assert_eq!(buckets[0].net, Decimal::from(-44_000));

    assert_eq!(buckets[1].key, "2024-02");
    assert_eq!(buckets[1].saving, Decimal::from(12_400));
    // Saving does not move net
    assert_eq!(buckets[1].net, Decimal::ZERO);
}

#[test]
fn yearly_buckets_span_every_year() {
    let buckets = aggregate(&sample(), &MarketRates::default(), Bucketing::Yearly, 1999).unwrap();
    let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(keys, vec!["2023", "2024"]);
    assert_eq!(buckets[0].expense, Decimal::from(500));
}

#[test]
fn daily_buckets_use_day_labels() {
    let buckets = aggregate(&sample(), &MarketRates::default(), Bucketing::Daily, 2024).unwrap();
    assert_eq!(buckets.len(), 3);
    assert_eq!(buckets[0].key, "2024-01-05");
    assert_eq!(buckets[0].label, "Jan 5");
}

#[test]
fn empty_input_gives_no_buckets() {
    let buckets = aggregate(&[], &MarketRates::default(), Bucketing::Monthly, 2024).unwrap();
    assert!(buckets.is_empty());
}

#[test]
fn category_totals_keep_first_seen_order() {
    let mut txs = sample();
    txs.push(tx(d(2024, 3, 1), TransactionType::Expense, 200, Currency::MMK, "Transport"));
    txs.push(tx(d(2024, 3, 2), TransactionType::Expense, 1, Currency::USD, "Food"));
    let totals =
        category_totals(&txs, &MarketRates::default(), Bucketing::Monthly, 2024).unwrap();
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].category, "Food");
    assert_eq!(totals[0].total, Decimal::from(49_500));
    assert_eq!(totals[1].category, "Transport");
    assert_eq!(totals[1].total, Decimal::from(200));
}

#[test]
fn summary_balance_excludes_saving() {
    let s = summarize(&sample(), &MarketRates::default()).unwrap();
    assert_eq!(s.income, Decimal::from(1000));
    assert_eq!(s.expense, Decimal::from(45_500));
    assert_eq!(s.saving, Decimal::from(12_400));
    assert_eq!(s.balance, Decimal::from(-44_500));
}

#[test]
fn broken_rate_fails_the_whole_aggregation() {
    let rates = MarketRates {
        usd: Decimal::ZERO,
        ..MarketRates::default()
    };
    let err = aggregate(&sample(), &rates, Bucketing::Monthly, 2024).unwrap_err();
    assert!(matches!(err, FinanceError::InvalidRate { .. }));
}

#[test]
fn available_years_are_newest_first_and_include_today() {
    let years = available_years(&sample(), d(2026, 6, 1));
    assert_eq!(years, vec![2026, 2024, 2023]);
    assert_eq!(available_years(&[], d(2025, 1, 1)), vec![2025]);
}

#[test]
fn bucketing_parses_case_insensitively() {
    assert_eq!("Daily".parse::<Bucketing>().unwrap(), Bucketing::Daily);
    assert_eq!("yearly".parse::<Bucketing>().unwrap(), Bucketing::Yearly);
    assert!("weekly".parse::<Bucketing>().is_err());
}

#[test]
fn net_matches_normalized_income_minus_expense_for_every_bucketing() {
    let txs = sample();
    let rates = MarketRates::default();
    for bucketing in [Bucketing::Daily, Bucketing::Monthly, Bucketing::Yearly] {
        let buckets = aggregate(&txs, &rates, bucketing, 2024).unwrap();
        let income: Decimal = buckets.iter().map(|b| b.income).sum();
        let expense: Decimal = buckets.iter().map(|b| b.expense).sum();
        let net: Decimal = buckets.iter().map(|b| b.net).sum();
        assert_eq!(income - expense, net);
    }
}

#[test]
fn monthly_keys_are_zero_padded() {
    let txs = vec![tx(d(2024, 3, 9), TransactionType::Income, 1, Currency::MMK, "X")];
    let buckets = aggregate(&txs, &MarketRates::default(), Bucketing::Monthly, 2024).unwrap();
    assert_eq!(buckets[0].key, "2024-03");
}

#[test]
fn food_spending_in_two_currencies_adds_up() {
    let txs = vec![
        tx(d(2024, 3, 1), TransactionType::Expense, 100, Currency::THB, "Food"),
        tx(d(2024, 3, 2), TransactionType::Expense, 50, Currency::MMK, "Food"),
    ];
    let totals =
        category_totals(&txs, &MarketRates::default(), Bucketing::Monthly, 2024).unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].total, Decimal::from(100 * 124 + 50));
}

fn huge(r#type: TransactionType, currency: Currency) -> Transaction {
    let mut t = tx(d(2024, 3, 1), r#type, 1, currency, "Huge");
    t.amount = Decimal::MAX;
    t
}

#[test]
fn oversized_amounts_fail_instead_of_panicking() {
    let rates = MarketRates::default();

    let usd = [huge(TransactionType::Expense, Currency::USD)];
    assert!(matches!(
        aggregate(&usd, &rates, Bucketing::Monthly, 2024),
        Err(FinanceError::Overflow(_))
    ));

    let incomes = [
        huge(TransactionType::Income, Currency::MMK),
        huge(TransactionType::Income, Currency::MMK),
    ];
    assert!(matches!(
        summarize(&incomes, &rates),
        Err(FinanceError::Overflow(_))
    ));
    assert!(matches!(
        aggregate(&incomes, &rates, Bucketing::Yearly, 2024),
        Err(FinanceError::Overflow(_))
    ));

    let expenses = [
        huge(TransactionType::Expense, Currency::MMK),
        huge(TransactionType::Expense, Currency::MMK),
    ];
    assert!(matches!(
        category_totals(&expenses, &rates, Bucketing::Monthly, 2024),
        Err(FinanceError::Overflow(_))
    ));
}

#[test]
fn summary_lists_years_with_data() {
    let view = summary_view(&sample(), &MarketRates::default(), d(2026, 6, 1)).unwrap();
    assert_eq!(view.totals.balance, Decimal::from(-44_500));
    assert_eq!(view.years, vec![2026, 2024, 2023]);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["years"][1], 2024);
    assert!(json["totals"].get("income").is_some());
}

#[test]
fn summary_command_runs_against_the_store() {
    let mut state = AppState::default();
    state.transactions = sample();
    let store = MemoryStore::new(state);
    let matches = cli::build_cli().get_matches_from(["shwebudget", "report", "summary", "--json"]);
    let Some(("report", report_m)) = matches.subcommand() else {
        panic!("no report subcommand");
    };
    reports::handle(&store, report_m).unwrap();
}
