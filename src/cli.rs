// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

const TX_TYPES: [&str; 3] = ["INCOME", "EXPENSE", "SAVING"];
const CURRENCIES: [&str; 4] = ["MMK", "THB", "USD", "SGD"];
const BUCKETS: [&str; 3] = ["daily", "monthly", "yearly"];

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn window_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("by")
            .long("by")
            .default_value("monthly")
            .value_parser(BUCKETS)
            .help("Bucketing: daily|monthly|yearly"),
    )
    .arg(
        Arg::new("year")
            .long("year")
            .value_parser(value_parser!(i32))
            .help("Year to analyse (ignored for yearly; defaults to this year)"),
    )
}

fn entry_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("desc").long("desc").required(true))
        .arg(Arg::new("amount").long("amount").required(true))
        .arg(
            Arg::new("type")
                .long("type")
                .default_value("EXPENSE")
                .value_parser(TX_TYPES)
                .ignore_case(true),
        )
        .arg(Arg::new("category").long("category").default_value("General"))
        .arg(
            Arg::new("currency")
                .long("currency")
                .default_value("MMK")
                .value_parser(CURRENCIES)
                .ignore_case(true),
        )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and browse transactions")
        .subcommand(entry_args(
            Command::new("add")
                .about("Add a transaction")
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD (default: today)")),
        ))
        .subcommand(json_flags(
            Command::new("list")
                .about("List transactions, newest first")
                .arg(Arg::new("type").long("type").value_parser(TX_TYPES).ignore_case(true))
                .arg(Arg::new("month").long("month").help("YYYY-MM"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction")
                .arg(Arg::new("id").long("id").required(true)),
        )
}

fn recurring_cmd() -> Command {
    Command::new("recurring")
        .about("Monthly recurring bills and income")
        .subcommand(entry_args(
            Command::new("add").about("Add a recurring rule").arg(
                Arg::new("day")
                    .long("day")
                    .required(true)
                    .value_parser(value_parser!(u32).range(1..=31))
                    .help("Day of month the rule becomes due (1-31)"),
            ),
        ))
        .subcommand(json_flags(Command::new("list").about("List recurring rules")))
        .subcommand(
            Command::new("rm")
                .about("Delete a recurring rule")
                .arg(Arg::new("id").long("id").required(true)),
        )
        .subcommand(
            Command::new("run")
                .about("Emit due recurring transactions")
                .arg(Arg::new("date").long("date").help("Evaluate as of YYYY-MM-DD")),
        )
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Aggregated analytics in MMK")
        .subcommand(json_flags(Command::new("summary").about("All-time totals")))
        .subcommand(json_flags(window_args(
            Command::new("cashflow").about("Income, expense, saving and net per bucket"),
        )))
        .subcommand(json_flags(window_args(
            Command::new("categories").about("Expense totals per category"),
        )))
}

fn budget_cmd() -> Command {
    Command::new("budget")
        .about("Per-category spending limits (MMK)")
        .subcommand(
            Command::new("set")
                .about("Set or overwrite a category budget")
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("limit").long("limit").required(true)),
        )
        .subcommand(json_flags(Command::new("list").about("List budgets")))
        .subcommand(json_flags(
            Command::new("report")
                .about("Spent vs limit for a month")
                .arg(Arg::new("month").long("month").help("YYYY-MM (default: this month)")),
        ))
}

fn insights_cmd() -> Command {
    json_flags(window_args(
        Command::new("insights")
            .about("Badges and spending insights")
            .arg(Arg::new("date").long("date").help("Evaluate as of YYYY-MM-DD")),
    ))
}

fn calc_cmd() -> Command {
    Command::new("calc")
        .about("Financial calculators; given inputs are remembered")
        .subcommand(Command::new("show").about("Show saved calculator inputs"))
        .subcommand(
            Command::new("target")
                .about("Monthly deposit needed to reach a savings target")
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("years").long("years"))
                .arg(Arg::new("rate").long("rate").help("Annual interest %")),
        )
        .subcommand(
            Command::new("fv")
                .about("Future value of monthly deposits")
                .arg(Arg::new("deposit").long("deposit"))
                .arg(Arg::new("years").long("years"))
                .arg(Arg::new("rate").long("rate").help("Annual interest %")),
        )
        .subcommand(
            Command::new("loan")
                .about("Loan instalment (EMI) and total interest")
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("years").long("years"))
                .arg(Arg::new("rate").long("rate").help("Annual interest %")),
        )
        .subcommand(
            Command::new("emergency")
                .about("Emergency fund size")
                .arg(Arg::new("expense").long("expense"))
                .arg(Arg::new("months").long("months")),
        )
}

fn fx_cmd() -> Command {
    Command::new("fx")
        .about("Market rates (1 unit = N MMK) and gold")
        .subcommand(Command::new("show").about("Show current rates"))
        .subcommand(
            Command::new("set")
                .about("Update rates")
                .arg(Arg::new("thb").long("thb"))
                .arg(Arg::new("usd").long("usd"))
                .arg(Arg::new("sgd").long("sgd"))
                .arg(Arg::new("gold").long("gold").help("Price of one kyat-thar")),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between currencies")
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("from")
                        .long("from")
                        .required(true)
                        .value_parser(CURRENCIES)
                        .ignore_case(true),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .default_value("MMK")
                        .value_parser(CURRENCIES)
                        .ignore_case(true),
                ),
        )
        .subcommand(
            Command::new("gold")
                .about("Value a gold weight in kyat-thar / pae / yway")
                .arg(Arg::new("kyat").long("kyat").default_value("0"))
                .arg(Arg::new("pae").long("pae").default_value("0"))
                .arg(Arg::new("yway").long("yway").default_value("0"))
                .arg(Arg::new("price").long("price").help("Override the stored gold price")),
        )
}

fn import_cmd() -> Command {
    Command::new("import")
        .about("Import data")
        .subcommand(
            Command::new("csv")
                .about("Append transactions from CSV")
                .arg(Arg::new("path").long("path").required(true)),
        )
        .subcommand(
            Command::new("backup")
                .about("Restore a JSON backup")
                .arg(Arg::new("path").long("path").required(true)),
        )
}

fn export_cmd() -> Command {
    Command::new("export")
        .about("Export data")
        .subcommand(
            Command::new("csv")
                .about("Write transactions as CSV")
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("backup")
                .about("Write a full JSON backup")
                .arg(Arg::new("out").long("out").required(true)),
        )
}

fn settings_cmd() -> Command {
    Command::new("settings")
        .about("Profile and preferences")
        .subcommand(Command::new("show").about("Show profile and preferences"))
        .subcommand(
            Command::new("theme")
                .about("Set the theme")
                .arg(Arg::new("theme").required(true).value_parser(["light", "dark"])),
        )
        .subcommand(
            Command::new("profile")
                .about("Rename the local profile")
                .arg(Arg::new("name").long("name").required(true)),
        )
}

pub fn build_cli() -> Command {
    Command::new("shwebudget")
        .version(crate_version!())
        .about("Multi-currency personal finance tracker (MMK base)")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .help("Store file (default: platform data dir or $SHWEBUDGET_DB)"),
        )
        .subcommand(Command::new("init").about("Create the store and finish onboarding"))
        .subcommand(tx_cmd())
        .subcommand(recurring_cmd())
        .subcommand(report_cmd())
        .subcommand(budget_cmd())
        .subcommand(insights_cmd())
        .subcommand(calc_cmd())
        .subcommand(fx_cmd())
        .subcommand(import_cmd())
        .subcommand(export_cmd())
        .subcommand(settings_cmd())
        .subcommand(Command::new("doctor").about("Check data for problems"))
}
