// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::Store;
use crate::errors::FinanceError;
use crate::models::{AppState, Currency, Transaction, TransactionType, new_id};
use crate::utils::{maybe_print_json, month_key, parse_date, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use chrono::Local;
use serde::Serialize;
use tracing::debug;

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Local::now().date_naive(),
    };
    let description = sub.get_one::<String>("desc").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount <= rust_decimal::Decimal::ZERO {
        return Err(anyhow!("Amount must be positive, got {}", amount));
    }
    let r#type: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
    let currency: Currency = sub.get_one::<String>("currency").unwrap().parse()?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    if description.is_empty() {
        return Err(anyhow!("Description must not be empty"));
    }

    let mut state = store.load()?;
    let t = Transaction {
        id: new_id(),
        date,
        description,
        amount,
        r#type,
        category,
        currency,
    };
    println!(
        "Recorded {} {} {} on {} ({})",
        t.r#type, t.amount, t.currency, t.date, t.description
    );
    debug!(id = %t.id, "transaction added");
    state.transactions.push(t);
    store.save(&state)?;
    Ok(())
}

fn remove(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let mut state = store.load()?;
    let before = state.transactions.len();
    state.transactions.retain(|t| t.id != id);
    if state.transactions.len() == before {
        return Err(FinanceError::NotFound(format!("Transaction '{}'", id)).into());
    }
    store.save(&state)?;
    println!("Removed transaction {}", id);
    Ok(())
}

fn list(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let state = store.load()?;
    let data = query_rows(&state, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.date.clone(),
                    r.description.clone(),
                    r.r#type.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.category.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Description", "Type", "Amount", "CCY", "Category"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub description: String,
    #[serde(rename = "type")]
    pub r#type: String,
    pub amount: String,
    pub currency: String,
    pub category: String,
}

/// Filtered view of the transaction list, newest first.
pub fn query_rows(state: &AppState, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let type_filter = match sub.get_one::<String>("type") {
        Some(t) => Some(t.parse::<TransactionType>()?),
        None => None,
    };
    let month = sub.get_one::<String>("month").map(|m| m.trim().to_string());

    let mut selected: Vec<&Transaction> = state
        .transactions
        .iter()
        .filter(|t| type_filter.is_none_or(|ty| t.r#type == ty))
        .filter(|t| month.as_deref().is_none_or(|m| month_key(t.date) == m))
        .collect();
    // Stable sort keeps insertion order within a day.
    selected.sort_by(|a, b| b.date.cmp(&a.date));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        selected.truncate(*limit);
    }

    Ok(selected
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date.to_string(),
            description: t.description.clone(),
            r#type: t.r#type.to_string(),
            amount: t.amount.to_string(),
            currency: t.currency.to_string(),
            category: t.category.clone(),
        })
        .collect())
}
