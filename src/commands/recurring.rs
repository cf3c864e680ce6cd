// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::Store;
use crate::errors::FinanceError;
use crate::models::{AppState, Currency, RecurringRule, Transaction, TransactionType, new_id};
use crate::utils::{maybe_print_json, month_key, parse_date, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use chrono::{Datelike, Local, NaiveDate};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleState {
    /// Due day not reached yet this month.
    Pending,
    Due,
    /// Already fired this calendar month.
    Processed,
}

impl RecurringRule {
    pub fn state_on(&self, today: NaiveDate) -> RuleState {
        let current = month_key(today);
        if self.last_processed_date.map(month_key).as_deref() == Some(current.as_str()) {
            RuleState::Processed
        } else if today.day() >= self.day_of_month {
            RuleState::Due
        } else {
            RuleState::Pending
        }
    }

    fn emit(&self, today: NaiveDate) -> Transaction {
        Transaction {
            id: new_id(),
            date: today,
            description: format!("Recurring: {}", self.description),
            amount: self.amount,
            r#type: self.r#type,
            category: self.category.clone(),
            currency: self.currency,
        }
    }
}

/// Result of one evaluation pass. Apply `created` and `rules` together.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringOutcome {
    pub created: Vec<Transaction>,
    pub rules: Vec<RecurringRule>,
}

impl RecurringOutcome {
    pub fn count(&self) -> usize {
        self.created.len()
    }
}

/// Fire every due rule once for today's calendar month.
pub fn process_recurring(rules: &[RecurringRule], today: NaiveDate) -> RecurringOutcome {
    let mut created = Vec::new();
    let mut updated = Vec::with_capacity(rules.len());
    for rule in rules {
        if rule.state_on(today) == RuleState::Due {
            debug!(rule = %rule.id, day = rule.day_of_month, "recurring rule fired");
            created.push(rule.emit(today));
            updated.push(RecurringRule {
                last_processed_date: Some(today),
                ..rule.clone()
            });
        } else {
            updated.push(rule.clone());
        }
    }
    RecurringOutcome {
        created,
        rules: updated,
    }
}

/// Run the pass against `state` in place; returns how many transactions were added.
pub fn apply_recurring(state: &mut AppState, today: NaiveDate) -> usize {
    let outcome = process_recurring(&state.recurring, today);
    let n = outcome.count();
    if n > 0 {
        state.transactions.extend(outcome.created);
        state.recurring = outcome.rules;
        info!(count = n, %today, "recurring transactions processed");
    }
    n
}

/// Startup hook: evaluate rules once onboarding is done and persist any firings.
pub fn run_on_load(store: &dyn Store, today: NaiveDate) -> Result<usize> {
    let mut state = store.load()?;
    if !state.preferences.mode_chosen {
        return Ok(0);
    }
    let n = apply_recurring(&mut state, today);
    if n > 0 {
        store.save(&state)?;
    }
    Ok(n)
}

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        Some(("run", sub)) => run(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let description = sub.get_one::<String>("desc").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if description.is_empty() || amount <= rust_decimal::Decimal::ZERO {
        return Err(anyhow!("A recurring rule needs a description and a positive amount"));
    }
    let r#type: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
    let currency: Currency = sub.get_one::<String>("currency").unwrap().parse()?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let day_of_month = *sub.get_one::<u32>("day").unwrap();

    let mut state = store.load()?;
    let rule = RecurringRule {
        id: new_id(),
        description,
        amount,
        r#type,
        category,
        currency,
        day_of_month,
        last_processed_date: None,
    };
    println!(
        "Added recurring rule {}: {} {} {} on day {}",
        rule.id, rule.description, rule.amount, rule.currency, rule.day_of_month
    );
    state.recurring.push(rule);
    store.save(&state)?;
    Ok(())
}

fn remove(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let mut state = store.load()?;
    let before = state.recurring.len();
    state.recurring.retain(|r| r.id != id);
    if state.recurring.len() == before {
        return Err(FinanceError::NotFound(format!("Recurring rule '{}'", id)).into());
    }
    store.save(&state)?;
    println!("Removed recurring rule {}", id);
    Ok(())
}

fn list(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let state = store.load()?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &state.recurring)? {
        return Ok(());
    }
    let today = Local::now().date_naive();
    let data = state
        .recurring
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.description.clone(),
                r.r#type.to_string(),
                format!("{} {}", r.amount, r.currency),
                r.category.clone(),
                r.day_of_month.to_string(),
                r.last_processed_date
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                format!("{:?}", r.state_on(today)),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Description", "Type", "Amount", "Category", "Day", "Last run", "State"],
            data
        )
    );
    Ok(())
}

fn run(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let today = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Local::now().date_naive(),
    };
    let mut state = store.load()?;
    let n = apply_recurring(&mut state, today);
    if n > 0 {
        store.save(&state)?;
    }
    println!("Processed {} recurring transactions", n);
    Ok(())
}
