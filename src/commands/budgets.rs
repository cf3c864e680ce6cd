// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::Store;
use crate::errors::FinanceError;
use crate::models::{Budget, MarketRates, Transaction, TransactionType};
use crate::utils::{
    add_amount, maybe_print_json, month_key, parse_decimal, parse_month, pretty_table, to_base,
};
use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BudgetHealth {
    Unbudgeted,
    OnTrack,
    /// Above 80% of the limit.
    Warning,
    Over,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
    pub percent: Decimal,
    pub health: BudgetHealth,
}

fn health(limit: Decimal, percent: Decimal) -> BudgetHealth {
    if limit <= Decimal::ZERO {
        BudgetHealth::Unbudgeted
    } else if percent > Decimal::ONE_HUNDRED {
        BudgetHealth::Over
    } else if percent > Decimal::from(80) {
        BudgetHealth::Warning
    } else {
        BudgetHealth::OnTrack
    }
}

/// Spent vs limit for the calendar month containing `month`.
///
/// Budgeted categories come first in budget order, then categories that only
/// have spending, in order of first appearance.
pub fn budget_status(
    transactions: &[Transaction],
    rates: &MarketRates,
    budgets: &[Budget],
    month: NaiveDate,
) -> Result<Vec<BudgetStatus>, FinanceError> {
    let key = month_key(month);
    let mut spent: Vec<(String, Decimal)> = Vec::new();
    for t in transactions
        .iter()
        .filter(|t| t.r#type == TransactionType::Expense && month_key(t.date) == key)
    {
        let amount = to_base(t.amount, t.currency, rates)?;
        match spent.iter_mut().find(|(c, _)| *c == t.category) {
            Some((_, total)) => *total = add_amount(*total, amount, "totalling budget spend")?,
            None => spent.push((t.category.clone(), amount)),
        }
    }

    let spent_for = |category: &str| {
        spent
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, v)| *v)
            .unwrap_or(Decimal::ZERO)
    };
    let status = |category: &str, limit: Decimal| -> Result<BudgetStatus, FinanceError> {
        let s = spent_for(category);
        let percent = if limit > Decimal::ZERO {
            s.checked_div(limit)
                .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or(FinanceError::Overflow("computing budget usage"))?
        } else {
            Decimal::ZERO
        };
        Ok(BudgetStatus {
            category: category.to_string(),
            limit,
            spent: s,
            percent,
            health: health(limit, percent),
        })
    };

    let mut out = budgets
        .iter()
        .map(|b| status(&b.category, b.limit))
        .collect::<Result<Vec<_>, _>>()?;
    for (category, _) in &spent {
        if !budgets.iter().any(|b| &b.category == category) {
            out.push(status(category, Decimal::ZERO)?);
        }
    }
    Ok(out)
}

/// True when at least one budget exists and none is exceeded this month.
pub fn within_budgets(
    transactions: &[Transaction],
    rates: &MarketRates,
    budgets: &[Budget],
    today: NaiveDate,
) -> Result<bool, FinanceError> {
    if budgets.iter().all(|b| b.limit <= Decimal::ZERO) {
        return Ok(false);
    }
    let status = budget_status(transactions, rates, budgets, today)?;
    Ok(status.iter().all(|s| s.health != BudgetHealth::Over))
}

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("report", sub)) => report(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let cat = sub.get_one::<String>("category").unwrap().trim().to_string();
    let limit = parse_decimal(sub.get_one::<String>("limit").unwrap())?;
    if cat.is_empty() {
        return Err(anyhow!("Category must not be empty"));
    }
    if limit < Decimal::ZERO {
        return Err(anyhow!("Budget limit must not be negative, got {}", limit));
    }
    let mut state = store.load()?;
    state.set_budget(&cat, limit);
    store.save(&state)?;
    println!("Budget set for {} = {} MMK", cat, limit);
    Ok(())
}

fn list(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let state = store.load()?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &state.budgets)? {
        let data = state
            .budgets
            .iter()
            .map(|b| vec![b.category.clone(), b.limit.to_string()])
            .collect();
        println!("{}", pretty_table(&["Category", "Limit (MMK)"], data));
    }
    Ok(())
}

fn report(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let month = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => Local::now().date_naive(),
    };
    let state = store.load()?;
    let data = budget_status(&state.transactions, &state.rates, &state.budgets, month)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|s| {
                vec![
                    s.category.clone(),
                    format!("{:.2}", s.limit),
                    format!("{:.2}", s.spent),
                    format!("{:.0}%", s.percent),
                    format!("{:?}", s.health),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Category", "Limit (MMK)", "Spent (MMK)", "Used", "Status"],
                rows
            )
        );
    }
    Ok(())
}
