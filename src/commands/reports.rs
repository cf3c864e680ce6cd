// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;

use crate::db::Store;
use crate::errors::FinanceError;
use crate::models::{MarketRates, Transaction, TransactionType};
use crate::utils::{add_amount, maybe_print_json, month_key, pretty_table, sub_amount, to_base};
use anyhow::{Result, anyhow};
use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucketing {
    Daily,
    Monthly,
    Yearly,
}

impl Bucketing {
    fn key(&self, date: NaiveDate) -> String {
        match self {
            Bucketing::Daily => date.format("%Y-%m-%d").to_string(),
            Bucketing::Monthly => month_key(date),
            Bucketing::Yearly => date.year().to_string(),
        }
    }

    fn label(&self, date: NaiveDate) -> String {
        match self {
            Bucketing::Daily => date.format("%b %-d").to_string(),
            Bucketing::Monthly => date.format("%b").to_string(),
            Bucketing::Yearly => date.year().to_string(),
        }
    }

    /// Yearly views span every year; the others are scoped to one.
    pub fn includes(&self, date: NaiveDate, year: i32) -> bool {
        *self == Bucketing::Yearly || date.year() == year
    }
}

impl FromStr for Bucketing {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Bucketing::Daily),
            "monthly" => Ok(Bucketing::Monthly),
            "yearly" => Ok(Bucketing::Yearly),
            other => Err(anyhow!("Unknown bucketing '{}', expected daily|monthly|yearly", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub key: String,
    pub label: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub saving: Decimal,
    pub net: Decimal,
}

impl Bucket {
    fn new(key: String, label: String) -> Self {
        Bucket {
            key,
            label,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
            saving: Decimal::ZERO,
            net: Decimal::ZERO,
        }
    }

    fn add(&mut self, r#type: TransactionType, amount: Decimal) -> Result<(), FinanceError> {
        const WHAT: &str = "aggregating buckets";
        match r#type {
            TransactionType::Income => {
                self.income = add_amount(self.income, amount, WHAT)?;
                self.net = add_amount(self.net, amount, WHAT)?;
            }
            TransactionType::Expense => {
                self.expense = add_amount(self.expense, amount, WHAT)?;
                self.net = sub_amount(self.net, amount, WHAT)?;
            }
            TransactionType::Saving => self.saving = add_amount(self.saving, amount, WHAT)?,
        }
        Ok(())
    }
}

/// Group normalized amounts into time buckets, ascending by key.
pub fn aggregate(
    transactions: &[Transaction],
    rates: &MarketRates,
    bucketing: Bucketing,
    year: i32,
) -> Result<Vec<Bucket>, FinanceError> {
    let mut map: BTreeMap<String, Bucket> = BTreeMap::new();
    for t in transactions
        .iter()
        .filter(|t| bucketing.includes(t.date, year))
    {
        let amount = to_base(t.amount, t.currency, rates)?;
        let key = bucketing.key(t.date);
        map.entry(key.clone())
            .or_insert_with(|| Bucket::new(key, bucketing.label(t.date)))
            .add(t.r#type, amount)?;
    }
    Ok(map.into_values().collect())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

/// Normalized expense per category, in order of first appearance.
pub fn category_totals(
    transactions: &[Transaction],
    rates: &MarketRates,
    bucketing: Bucketing,
    year: i32,
) -> Result<Vec<CategoryTotal>, FinanceError> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<CategoryTotal> = Vec::new();
    for t in transactions
        .iter()
        .filter(|t| t.r#type == TransactionType::Expense)
        .filter(|t| bucketing.includes(t.date, year))
    {
        let amount = to_base(t.amount, t.currency, rates)?;
        match index.get(t.category.as_str()) {
            Some(&i) => {
                out[i].total = add_amount(out[i].total, amount, "totalling categories")?
            }
            None => {
                index.insert(t.category.as_str(), out.len());
                out.push(CategoryTotal {
                    category: t.category.clone(),
                    total: amount,
                });
            }
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub income: Decimal,
    pub expense: Decimal,
    pub saving: Decimal,
    pub balance: Decimal,
}

/// All-time totals in MMK.
pub fn summarize(
    transactions: &[Transaction],
    rates: &MarketRates,
) -> Result<Summary, FinanceError> {
    const WHAT: &str = "summarizing totals";
    let mut s = Summary::default();
    for t in transactions {
        let amount = to_base(t.amount, t.currency, rates)?;
        let total = match t.r#type {
            TransactionType::Income => &mut s.income,
            TransactionType::Expense => &mut s.expense,
            TransactionType::Saving => &mut s.saving,
        };
        *total = add_amount(*total, amount, WHAT)?;
    }
    s.balance = sub_amount(s.income, s.expense, WHAT)?;
    Ok(s)
}

/// Years with data, newest first; the current year is always offered.
pub fn available_years(transactions: &[Transaction], today: NaiveDate) -> Vec<i32> {
    let mut years: BTreeSet<i32> = transactions.iter().map(|t| t.date.year()).collect();
    years.insert(today.year());
    years.into_iter().rev().collect()
}

pub(crate) fn window_from(sub: &clap::ArgMatches, today: NaiveDate) -> Result<(Bucketing, i32)> {
    let bucketing = match sub.get_one::<String>("by") {
        Some(b) => b.parse()?,
        None => Bucketing::Monthly,
    };
    let year = sub.get_one::<i32>("year").copied().unwrap_or(today.year());
    Ok((bucketing, year))
}

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, sub)?,
        Some(("cashflow", sub)) => cashflow(store, sub)?,
        Some(("categories", sub)) => categories(store, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub totals: Summary,
    pub years: Vec<i32>,
}

/// All-time totals plus the years a report can be scoped to.
pub fn summary_view(
    transactions: &[Transaction],
    rates: &MarketRates,
    today: NaiveDate,
) -> Result<SummaryView, FinanceError> {
    Ok(SummaryView {
        totals: summarize(transactions, rates)?,
        years: available_years(transactions, today),
    })
}

fn summary(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let state = store.load()?;
    let view = summary_view(&state.transactions, &state.rates, Local::now().date_naive())?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        let s = &view.totals;
        let years = view
            .years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let data = vec![
            vec!["Income".to_string(), format!("{:.2}", s.income)],
            vec!["Expense".to_string(), format!("{:.2}", s.expense)],
            vec!["Saving".to_string(), format!("{:.2}", s.saving)],
            vec!["Net balance".to_string(), format!("{:.2}", s.balance)],
            vec!["Years with data".to_string(), years],
        ];
        println!("{}", pretty_table(&["Total", "MMK"], data));
    }
    Ok(())
}

fn cashflow(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let state = store.load()?;
    let (bucketing, year) = window_from(sub, Local::now().date_naive())?;
    let buckets = aggregate(&state.transactions, &state.rates, bucketing, year)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &buckets)? {
        let data = buckets
            .iter()
            .map(|b| {
                vec![
                    b.key.clone(),
                    b.label.clone(),
                    format!("{:.2}", b.income),
                    format!("{:.2}", b.expense),
                    format!("{:.2}", b.saving),
                    format!("{:.2}", b.net),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Bucket", "Label", "Income", "Expense", "Saving", "Net"],
                data
            )
        );
    }
    Ok(())
}

fn categories(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let state = store.load()?;
    let (bucketing, year) = window_from(sub, Local::now().date_naive())?;
    let mut items = category_totals(&state.transactions, &state.rates, bucketing, year)?;
    items.sort_by(|a, b| b.total.cmp(&a.total));
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
        let data = items
            .into_iter()
            .map(|c| vec![c.category, format!("{:.2}", c.total)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent (MMK)"], data));
    }
    Ok(())
}
