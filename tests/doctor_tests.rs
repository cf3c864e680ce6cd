// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shwebudget::cli;
use shwebudget::commands::{doctor, settings};
use shwebudget::db::MemoryStore;
use shwebudget::models::{
    AppState, Currency, RecurringRule, Theme, Transaction, TransactionType,
};

#[test]
fn clean_state_has_no_issues() {
    assert!(doctor::diagnose(&AppState::default()).is_empty());
}

#[test]
fn doctor_flags_each_problem() {
    let mut state = AppState::default();
    state.rates.sgd = Decimal::ZERO;
    state.transactions.push(Transaction {
        id: "t1".into(),
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        description: "Refund".into(),
        amount: Decimal::from(-5),
        r#type: TransactionType::Expense,
        category: "Food".into(),
        currency: Currency::MMK,
    });
    state.recurring.push(RecurringRule {
        id: "r1".into(),
        description: "Rent".into(),
        amount: Decimal::from(100),
        r#type: TransactionType::Expense,
        category: "Housing".into(),
        currency: Currency::MMK,
        day_of_month: 30,
        last_processed_date: None,
    });
    state.set_budget("Food", Decimal::from(100));
    state.set_budget("Travel", Decimal::from(100));

    let codes: Vec<&str> = doctor::diagnose(&state).iter().map(|i| i.code).collect();
    assert_eq!(
        codes,
        vec![
            "non_positive_rate",
            "non_positive_amount",
            "recurring_day_skips_months",
            "budget_without_expenses",
        ]
    );
}

#[test]
fn guest_mode_is_chosen_once() {
    let store = MemoryStore::default();
    assert!(settings::choose_guest_mode(&store).unwrap());
    assert!(!settings::choose_guest_mode(&store).unwrap());
    assert!(store.snapshot().preferences.mode_chosen);
}

#[test]
fn settings_update_theme_and_profile() {
    let store = MemoryStore::default();
    for argv in [
        vec!["shwebudget", "settings", "theme", "dark"],
        vec!["shwebudget", "settings", "profile", "--name", "Thida"],
    ] {
        let matches = cli::build_cli().get_matches_from(argv);
        let Some(("settings", settings_m)) = matches.subcommand() else {
            panic!("no settings subcommand");
        };
        settings::handle(&store, settings_m).unwrap();
    }
    let state = store.snapshot();
    assert_eq!(state.preferences.theme, Theme::Dark);
    assert_eq!(state.profile.name, "Thida");
    assert_eq!(state.profile.id, "guest");
}
