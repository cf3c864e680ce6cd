// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::budgets::within_budgets;
use crate::commands::reports::{Bucketing, aggregate, category_totals, summarize, window_from};
use crate::db::Store;
use crate::errors::FinanceError;
use crate::models::{AppState, Transaction, TransactionType};
use crate::utils::{add_amount, maybe_print_json, month_key, parse_date, pretty_table, sub_amount};
use anyhow::Result;
use chrono::{Local, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

pub const GOLD_MEMBER_THRESHOLD: i64 = 1_000_000;
pub const WEALTH_TIP_THRESHOLD: i64 = 500_000;
pub const GATHERING_DATA: &str = "Gathering more data for insights...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Badge {
    FirstStep,
    SmartSaver,
    GoldMember,
    Disciplined,
}

/// Facts the badge predicates look at.
#[derive(Debug, Clone)]
pub struct BadgeContext {
    pub transaction_count: usize,
    pub net: Decimal,
    pub within_budgets: bool,
}

impl Badge {
    pub const ALL: [Badge; 4] = [
        Badge::FirstStep,
        Badge::SmartSaver,
        Badge::GoldMember,
        Badge::Disciplined,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Badge::FirstStep => "First Step",
            Badge::SmartSaver => "Smart Saver",
            Badge::GoldMember => "Gold Member",
            Badge::Disciplined => "Disciplined",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Badge::FirstStep => "Add your first transaction",
            Badge::SmartSaver => "Have positive net worth",
            Badge::GoldMember => "Reach 1M MMK Net Worth",
            Badge::Disciplined => "No Budget Overflows",
        }
    }

    pub fn unlocked(&self, ctx: &BadgeContext) -> bool {
        match self {
            Badge::FirstStep => ctx.transaction_count > 0,
            Badge::SmartSaver => ctx.net > Decimal::ZERO,
            Badge::GoldMember => ctx.net > Decimal::from(GOLD_MEMBER_THRESHOLD),
            Badge::Disciplined => ctx.within_budgets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeStatus {
    pub badge: Badge,
    pub name: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

pub fn evaluate_badges(ctx: &BadgeContext) -> Vec<BadgeStatus> {
    Badge::ALL
        .iter()
        .map(|b| BadgeStatus {
            badge: *b,
            name: b.name(),
            description: b.description(),
            unlocked: b.unlocked(ctx),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InsightKind {
    Warning,
    Success,
    Danger,
    Info,
    Tip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, message: impl Into<String>) -> Self {
        Insight {
            kind,
            message: message.into(),
        }
    }
}

// Raw amounts: currencies are summed without conversion here. None on overflow.
fn raw_expense_in_month(transactions: &[Transaction], month: &str) -> Option<Decimal> {
    transactions
        .iter()
        .filter(|t| t.r#type == TransactionType::Expense && month_key(t.date) == month)
        .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t.amount))
}

/// Month-over-month expense comparison; silent unless last month had spending.
pub fn spending_trend(transactions: &[Transaction], today: NaiveDate) -> Option<Insight> {
    let previous = today.checked_sub_months(Months::new(1))?;
    let (Some(current_total), Some(previous_total)) = (
        raw_expense_in_month(transactions, &month_key(today)),
        raw_expense_in_month(transactions, &month_key(previous)),
    ) else {
        debug!("monthly expense totals out of range; trend skipped");
        return None;
    };
    if previous_total <= Decimal::ZERO {
        return None;
    }
    let upper = previous_total.checked_mul(Decimal::new(12, 1));
    if upper.is_some_and(|u| current_total > u) {
        Some(Insight::new(
            InsightKind::Warning,
            "Spending Alert: You have spent 20% more than last month already.",
        ))
    } else if current_total < previous_total * Decimal::new(8, 1) {
        Some(Insight::new(
            InsightKind::Success,
            "Great job! Your spending is 20% lower than last month.",
        ))
    } else {
        None
    }
}

pub fn wealth_tip(net: Decimal) -> Option<Insight> {
    (net > Decimal::from(WEALTH_TIP_THRESHOLD)).then(|| {
        Insight::new(
            InsightKind::Tip,
            "Wealth Tip: Consider investing your surplus 500k+ in Gold or High Interest savings.",
        )
    })
}

/// Dashboard insights, with a placeholder when nothing applies.
pub fn dashboard_insights(
    transactions: &[Transaction],
    net: Decimal,
    today: NaiveDate,
) -> Vec<Insight> {
    let mut out: Vec<Insight> = spending_trend(transactions, today)
        .into_iter()
        .chain(wealth_tip(net))
        .collect();
    if out.is_empty() {
        out.push(Insight::new(InsightKind::Info, GATHERING_DATA));
    }
    out
}

/// Insights for an analytics window.
pub fn period_insights(
    state: &AppState,
    bucketing: Bucketing,
    year: i32,
) -> Result<Vec<Insight>, FinanceError> {
    const WHAT: &str = "totalling the period";
    let buckets = aggregate(&state.transactions, &state.rates, bucketing, year)?;
    let income = buckets
        .iter()
        .try_fold(Decimal::ZERO, |acc, b| add_amount(acc, b.income, WHAT))?;
    let expense = buckets
        .iter()
        .try_fold(Decimal::ZERO, |acc, b| add_amount(acc, b.expense, WHAT))?;

    let mut out = Vec::new();
    if expense > income && income > Decimal::ZERO {
        out.push(Insight::new(
            InsightKind::Danger,
            "You are spending more than you earn this period.",
        ));
    }
    if income > Decimal::ZERO
        && sub_amount(income, expense, WHAT)?
            .checked_div(income)
            .ok_or(FinanceError::Overflow(WHAT))?
            > Decimal::new(2, 1)
    {
        out.push(Insight::new(
            InsightKind::Success,
            "Great! You are saving more than 20% of your income.",
        ));
    }

    let categories = category_totals(&state.transactions, &state.rates, bucketing, year)?;
    let mut highest = categories.iter();
    if let Some(first) = highest.next() {
        // Ties keep the category seen first.
        let top = highest.fold(first, |best, c| if c.total > best.total { c } else { best });
        out.push(Insight::new(
            InsightKind::Info,
            format!(
                "Your highest spending is on {} ({:.0} MMK).",
                top.category, top.total
            ),
        ));
    }
    Ok(out)
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightReport {
    pub badges: Vec<BadgeStatus>,
    pub dashboard: Vec<Insight>,
    pub period: Vec<Insight>,
}

pub fn build_report(
    state: &AppState,
    bucketing: Bucketing,
    year: i32,
    today: NaiveDate,
) -> Result<InsightReport, FinanceError> {
    let summary = summarize(&state.transactions, &state.rates)?;
    let ctx = BadgeContext {
        transaction_count: state.transactions.len(),
        net: summary.balance,
        within_budgets: within_budgets(&state.transactions, &state.rates, &state.budgets, today)?,
    };
    Ok(InsightReport {
        badges: evaluate_badges(&ctx),
        dashboard: dashboard_insights(&state.transactions, summary.balance, today),
        period: period_insights(state, bucketing, year)?,
    })
}

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    let today = match m.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Local::now().date_naive(),
    };
    let (bucketing, year) = window_from(m, today)?;
    let state = store.load()?;
    let report = build_report(&state, bucketing, year, today)?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &report)? {
        return Ok(());
    }

    let badges = report
        .badges
        .iter()
        .map(|b| {
            vec![
                b.name.to_string(),
                b.description.to_string(),
                if b.unlocked { "unlocked" } else { "locked" }.to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Badge", "Goal", "Status"], badges));

    let insights = report
        .dashboard
        .iter()
        .chain(report.period.iter())
        .map(|i| vec![format!("{:?}", i.kind), i.message.clone()])
        .collect();
    println!("{}", pretty_table(&["Kind", "Insight"], insights));
    Ok(())
}
