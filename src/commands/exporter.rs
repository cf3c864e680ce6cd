// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::Store;
use crate::models::{AppState, BACKUP_VERSION, BackupData, Transaction};
use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use std::fs::File;
use std::io::{BufWriter, Write};

pub const CSV_HEADER: &str = "Date,Description,Type,Amount,Currency,Category";

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("csv", sub)) => export_csv(store, sub),
        Some(("backup", sub)) => export_backup(store, sub),
        _ => Ok(()),
    }
}

/// Header row is plain; every data field is quoted with inner quotes doubled.
pub fn write_csv<W: Write>(mut w: W, transactions: &[Transaction]) -> Result<()> {
    writeln!(w, "{}", CSV_HEADER)?;
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(w);
    for t in transactions {
        wtr.write_record([
            t.date.to_string(),
            t.description.clone(),
            t.r#type.to_string(),
            t.amount.to_string(),
            t.currency.to_string(),
            t.category.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn build_backup(state: &AppState) -> BackupData {
    BackupData {
        profile: state.profile.clone(),
        transactions: state.transactions.clone(),
        rates: state.rates.clone(),
        calculator: state.calculator.clone(),
        budgets: state.budgets.clone(),
        recurring: state.recurring.clone(),
        version: BACKUP_VERSION.to_string(),
    }
}

fn export_csv(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let out = sub.get_one::<String>("out").unwrap().trim();
    let state = store.load()?;
    let file = File::create(out).with_context(|| format!("Create {}", out))?;
    write_csv(BufWriter::new(file), &state.transactions)?;
    println!("Exported {} transactions to {}", state.transactions.len(), out);
    Ok(())
}

fn export_backup(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let out = sub.get_one::<String>("out").unwrap().trim();
    let state = store.load()?;
    let backup = build_backup(&state);
    std::fs::write(out, serde_json::to_string_pretty(&backup)?)
        .with_context(|| format!("Write backup {}", out))?;
    println!("Exported backup to {}", out);
    Ok(())
}
