// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::Store;
use crate::models::{AppState, TransactionType};
use crate::utils::pretty_table;
use anyhow::Result;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// One finding: a machine-friendly code plus detail text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub code: &'static str,
    pub detail: String,
}

fn issue(code: &'static str, detail: String) -> Issue {
    Issue { code, detail }
}

pub fn diagnose(state: &AppState) -> Vec<Issue> {
    let mut out = Vec::new();

    // 1) Rates that would break normalization
    for (name, rate) in [
        ("THB", state.rates.thb),
        ("USD", state.rates.usd),
        ("SGD", state.rates.sgd),
        ("Gold", state.rates.gold),
    ] {
        if rate <= Decimal::ZERO {
            out.push(issue("non_positive_rate", format!("{} = {}", name, rate)));
        }
    }

    // 2) Amounts should be positive; the type carries the direction
    for t in &state.transactions {
        if t.amount <= Decimal::ZERO {
            out.push(issue(
                "non_positive_amount",
                format!("{} {} '{}' ({})", t.date, t.amount, t.description, t.id),
            ));
        }
    }

    // 3) Rules that some months never reach
    for r in &state.recurring {
        if r.day_of_month > 28 {
            out.push(issue(
                "recurring_day_skips_months",
                format!("'{}' runs on day {}", r.description, r.day_of_month),
            ));
        }
    }

    // 4) Budgets nothing is ever charged against
    let spent: HashSet<&str> = state
        .transactions
        .iter()
        .filter(|t| t.r#type == TransactionType::Expense)
        .map(|t| t.category.as_str())
        .collect();
    for b in &state.budgets {
        if !spent.contains(b.category.as_str()) {
            out.push(issue("budget_without_expenses", b.category.clone()));
        }
    }

    out
}

pub fn handle(store: &dyn Store) -> Result<()> {
    let state = store.load()?;
    let issues = diagnose(&state);
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = issues
            .into_iter()
            .map(|i| vec![i.code.to_string(), i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
