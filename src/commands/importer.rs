// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::Store;
use crate::errors::FinanceError;
use crate::models::{
    AppState, Budget, CalculatorData, Currency, MarketRates, RecurringRule, Transaction,
    TransactionType, UserProfile, new_id,
};
use crate::utils::parse_lenient_decimal;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use tracing::{info, warn};

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("csv", sub)) => import_csv(store, sub),
        Some(("backup", sub)) => import_backup(store, sub),
        _ => Ok(()),
    }
}

/// Loose type matching: anything not INCOME or SAVING is an expense.
fn type_from_label(raw: &str) -> TransactionType {
    let upper = raw.to_uppercase();
    if upper.contains("SAVING") {
        TransactionType::Saving
    } else if upper.contains("INCOME") {
        TransactionType::Income
    } else {
        TransactionType::Expense
    }
}

/// Parse `date,description,type,amount,currency,category` rows.
///
/// The header row is skipped, as are rows with fewer than four columns. Nothing
/// is returned unless every kept row parses. Description whitespace is preserved.
pub fn parse_csv<R: Read>(reader: R, today: NaiveDate) -> Result<Vec<Transaction>, FinanceError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let mut out = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let rec = result.map_err(|e| FinanceError::MalformedImport {
            line: e.position().map(|p| p.line() as usize).unwrap_or(idx + 2),
            reason: e.to_string(),
        })?;
        let line = rec.position().map(|p| p.line() as usize).unwrap_or(idx + 2);
        if rec.len() < 4 {
            continue;
        }
        // Descriptions are kept verbatim; every other column is trimmed.
        let raw_field = |i: usize| rec.get(i).unwrap_or("");
        let field = |i: usize| raw_field(i).trim();
        let malformed = |reason: String| FinanceError::MalformedImport { line, reason };

        let date = match field(0) {
            "" => today,
            raw => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| malformed(format!("invalid date '{}'", raw)))?,
        };
        let description = match raw_field(1) {
            d if d.trim().is_empty() => "Imported Transaction".to_string(),
            d => d.to_string(),
        };
        let r#type = type_from_label(field(2));
        let amount = parse_lenient_decimal("amount", field(3));
        let currency = match field(4) {
            "" => Currency::MMK,
            raw => raw
                .parse::<Currency>()
                .map_err(|e| malformed(e.to_string()))?,
        };
        let category = match field(5) {
            "" => "General".to_string(),
            c => c.to_string(),
        };
        out.push(Transaction {
            id: new_id(),
            date,
            description,
            amount,
            r#type,
            category,
            currency,
        });
    }
    Ok(out)
}

fn import_csv(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let file = File::open(path).with_context(|| format!("Open CSV {}", path))?;
    let imported = parse_csv(file, Local::now().date_naive())
        .with_context(|| format!("Import aborted, nothing was changed ({})", path))?;

    let mut state = store.load()?;
    let n = imported.len();
    state.transactions.extend(imported);
    store.save(&state)?;
    info!(count = n, path, "csv imported");
    println!("Imported {} transactions from {}", n, path);
    Ok(())
}

/// Backup as found on disk; everything but `transactions` may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BackupImport {
    pub profile: Option<UserProfile>,
    pub transactions: Option<Vec<Transaction>>,
    pub rates: Option<MarketRates>,
    pub calculator: Option<CalculatorData>,
    pub budgets: Option<Vec<Budget>>,
    pub recurring: Option<Vec<RecurringRule>>,
    pub version: Option<String>,
}

pub fn parse_backup(json: &str) -> Result<BackupImport, FinanceError> {
    let backup: BackupImport =
        serde_json::from_str(json).map_err(|e| FinanceError::MalformedImport {
            line: e.line(),
            reason: e.to_string(),
        })?;
    match &backup.transactions {
        Some(t) if !t.is_empty() => Ok(backup),
        _ => Err(FinanceError::EmptyBackup),
    }
}

/// Replace local data with the backup's contents.
pub fn restore_backup(state: &mut AppState, backup: BackupImport) {
    if let Some(version) = &backup.version {
        if version != crate::models::BACKUP_VERSION {
            warn!(%version, "restoring backup from a different version");
        }
    }
    state.transactions = backup.transactions.unwrap_or_default();
    if let Some(rates) = backup.rates {
        state.rates = rates;
    }
    if let Some(calculator) = backup.calculator {
        state.calculator = calculator;
    }
    if let Some(profile) = backup.profile {
        state.profile = profile;
    }
    state.budgets = backup.budgets.unwrap_or_default();
    state.recurring = backup.recurring.unwrap_or_default();
}

fn import_backup(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let raw = std::fs::read_to_string(path).with_context(|| format!("Read backup {}", path))?;
    let backup = parse_backup(&raw).with_context(|| format!("Error parsing file {}", path))?;

    let mut state = store.load()?;
    restore_backup(&mut state, backup);
    store.save(&state)?;
    info!(transactions = state.transactions.len(), path, "backup restored");
    println!(
        "Data restored successfully: {} transactions, {} budgets, {} recurring rules",
        state.transactions.len(),
        state.budgets.len(),
        state.recurring.len()
    );
    Ok(())
}
