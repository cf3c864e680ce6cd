// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::Result;
use chrono::Local;

use shwebudget::{cli, commands, db, log};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    log::init_logging(matches.get_flag("verbose"));

    let db_override = matches.get_one::<String>("db").map(Path::new);
    let store = db::open_or_init(db_override)?;

    if let Some(("init", _)) = matches.subcommand() {
        if commands::settings::choose_guest_mode(&store)? {
            println!("Store initialized, welcome!");
        } else {
            println!("Store already initialized");
        }
        return Ok(());
    }

    let processed = commands::recurring::run_on_load(&store, Local::now().date_naive())?;
    if processed > 0 {
        println!("Processed {} recurring transactions", processed);
    }

    match matches.subcommand() {
        Some(("tx", sub)) => commands::transactions::handle(&store, sub)?,
        Some(("recurring", sub)) => commands::recurring::handle(&store, sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&store, sub)?,
        Some(("insights", sub)) => commands::insights::handle(&store, sub)?,
        Some(("calc", sub)) => commands::calculators::handle(&store, sub)?,
        Some(("fx", sub)) => commands::fx::handle(&store, sub)?,
        Some(("import", sub)) => commands::importer::handle(&store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&store, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&store)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
