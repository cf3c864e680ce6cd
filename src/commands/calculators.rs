// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::Store;
use crate::models::{CalculatorData, Currency, MarketRates};
use crate::utils::{fmt_money, from_base, parse_lenient_decimal, pretty_table};
use anyhow::Result;
use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;
use tracing::debug;

pub const PROJECTION_MONTHS: [u32; 5] = [6, 12, 36, 60, 120];

/// Monthly rate from an annual percentage.
fn monthly_rate(annual_pct: Decimal) -> Option<Decimal> {
    annual_pct
        .checked_div(Decimal::ONE_HUNDRED)?
        .checked_div(Decimal::from(12))
}

fn growth(i: Decimal, months: Decimal) -> Option<Decimal> {
    Decimal::ONE.checked_add(i)?.checked_powd(months)
}

// Degenerate inputs (no term, overflow) show as zero rather than failing.
fn or_zero(v: Option<Decimal>, what: &str) -> Decimal {
    v.unwrap_or_else(|| {
        debug!(calculator = what, "degenerate input, result is 0");
        Decimal::ZERO
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavingsTarget {
    pub target: Decimal,
    pub years: Decimal,
    pub annual_rate: Decimal,
}

pub fn required_monthly_deposit(p: &SavingsTarget) -> Decimal {
    let calc = || -> Option<Decimal> {
        let m = p.years.checked_mul(Decimal::from(12))?;
        if m <= Decimal::ZERO {
            return None;
        }
        let i = monthly_rate(p.annual_rate)?;
        if i.is_zero() {
            return p.target.checked_div(m);
        }
        let denom = growth(i, m)?.checked_sub(Decimal::ONE)?;
        p.target.checked_mul(i)?.checked_div(denom)
    };
    or_zero(calc(), "savings-target")
}

#[derive(Debug, Clone, PartialEq)]
pub struct FutureValue {
    pub deposit: Decimal,
    pub years: Decimal,
    pub annual_rate: Decimal,
}

fn fv_over(deposit: Decimal, annual_rate: Decimal, m: Decimal) -> Option<Decimal> {
    if m <= Decimal::ZERO {
        return None;
    }
    let i = monthly_rate(annual_rate)?;
    if i.is_zero() {
        return deposit.checked_mul(m);
    }
    let g = growth(i, m)?;
    deposit.checked_mul(g.checked_sub(Decimal::ONE)?.checked_div(i)?)
}

pub fn future_value(p: &FutureValue) -> Decimal {
    let m = p.years.checked_mul(Decimal::from(12));
    or_zero(m.and_then(|m| fv_over(p.deposit, p.annual_rate, m)), "future-value")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FvBreakdown {
    pub future_value: Decimal,
    pub contributions: Decimal,
    pub interest: Decimal,
}

/// Future value split into money paid in and interest earned.
pub fn fv_breakdown(p: &FutureValue) -> FvBreakdown {
    let fv = future_value(p);
    let contributions = or_zero(
        p.deposit
            .checked_mul(p.years)
            .and_then(|v| v.checked_mul(Decimal::from(12))),
        "future-value",
    );
    FvBreakdown {
        future_value: fv,
        contributions,
        interest: or_zero(fv.checked_sub(contributions), "future-value"),
    }
}

/// Balance after `months` of deposits at the same rate.
pub fn projection(deposit: Decimal, annual_rate: Decimal, months: u32) -> Decimal {
    or_zero(
        fv_over(deposit, annual_rate, Decimal::from(months)),
        "projection",
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoanParams {
    pub principal: Decimal,
    pub years: Decimal,
    pub annual_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanQuote {
    pub monthly_payment: Decimal,
    pub total_payment: Decimal,
    pub total_interest: Decimal,
}

pub fn loan_payment(p: &LoanParams) -> LoanQuote {
    let m = p.years.checked_mul(Decimal::from(12)).unwrap_or(Decimal::ZERO);
    let calc = || -> Option<Decimal> {
        if m <= Decimal::ZERO {
            return None;
        }
        let i = monthly_rate(p.annual_rate)?;
        if i.is_zero() {
            return p.principal.checked_div(m);
        }
        let g = growth(i, m)?;
        p.principal
            .checked_mul(i)?
            .checked_mul(g)?
            .checked_div(g.checked_sub(Decimal::ONE)?)
    };
    let emi = or_zero(calc(), "loan");
    let total = emi.checked_mul(m).unwrap_or(Decimal::ZERO);
    LoanQuote {
        monthly_payment: emi,
        total_payment: total,
        total_interest: if total.is_zero() {
            Decimal::ZERO
        } else {
            or_zero(total.checked_sub(p.principal), "loan")
        },
    }
}

pub fn emergency_fund(monthly_expense: Decimal, months: Decimal) -> Decimal {
    or_zero(monthly_expense.checked_mul(months), "emergency")
}

impl From<&CalculatorData> for SavingsTarget {
    fn from(d: &CalculatorData) -> Self {
        SavingsTarget {
            target: d.target_amount,
            years: d.years,
            annual_rate: d.interest_rate,
        }
    }
}

impl From<&CalculatorData> for FutureValue {
    fn from(d: &CalculatorData) -> Self {
        FutureValue {
            deposit: d.monthly_deposit,
            years: d.fv_years,
            annual_rate: d.fv_rate,
        }
    }
}

impl From<&CalculatorData> for LoanParams {
    fn from(d: &CalculatorData) -> Self {
        LoanParams {
            principal: d.loan_amount,
            years: d.loan_term_years,
            annual_rate: d.loan_rate,
        }
    }
}

/// Savings-target deposit quoted in each foreign currency.
pub fn deposit_equivalents(monthly: Decimal, rates: &MarketRates) -> Vec<(Currency, Decimal)> {
    [Currency::THB, Currency::USD, Currency::SGD]
        .into_iter()
        .filter_map(|c| from_base(monthly, c, rates).ok().map(|v| (c, v)))
        .collect()
}

fn update(field: &mut Decimal, sub: &clap::ArgMatches, arg: &str) -> bool {
    match sub.get_one::<String>(arg) {
        Some(raw) => {
            *field = parse_lenient_decimal(arg, raw);
            true
        }
        None => false,
    }
}

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    let mut state = store.load()?;
    let mut changed = false;
    match m.subcommand() {
        Some(("show", _)) => show(&state.calculator),
        Some(("target", sub)) => {
            let d = &mut state.calculator;
            changed |= update(&mut d.target_amount, sub, "amount");
            changed |= update(&mut d.years, sub, "years");
            changed |= update(&mut d.interest_rate, sub, "rate");
            let monthly = required_monthly_deposit(&SavingsTarget::from(&*d));
            let mut rows = vec![vec!["MMK".to_string(), format!("{:.0}", monthly)]];
            for (c, v) in deposit_equivalents(monthly, &state.rates) {
                rows.push(vec![c.to_string(), format!("{:.2}", v)]);
            }
            println!(
                "Save monthly to reach {} in {} years at {}%:",
                fmt_money(&state.calculator.target_amount, "MMK"),
                state.calculator.years,
                state.calculator.interest_rate
            );
            println!("{}", pretty_table(&["Currency", "Monthly deposit"], rows));
        }
        Some(("fv", sub)) => {
            let d = &mut state.calculator;
            changed |= update(&mut d.monthly_deposit, sub, "deposit");
            changed |= update(&mut d.fv_years, sub, "years");
            changed |= update(&mut d.fv_rate, sub, "rate");
            let params = FutureValue::from(&*d);
            let b = fv_breakdown(&params);
            let mut rows = vec![
                vec!["Future value".to_string(), format!("{:.0}", b.future_value)],
                vec!["Contributions".to_string(), format!("{:.0}", b.contributions)],
                vec!["Interest earned".to_string(), format!("{:.0}", b.interest)],
            ];
            for months in PROJECTION_MONTHS {
                rows.push(vec![
                    format!("After {} months", months),
                    format!("{:.0}", projection(params.deposit, params.annual_rate, months)),
                ]);
            }
            println!("{}", pretty_table(&["Future value", "MMK"], rows));
        }
        Some(("loan", sub)) => {
            let d = &mut state.calculator;
            changed |= update(&mut d.loan_amount, sub, "amount");
            changed |= update(&mut d.loan_term_years, sub, "years");
            changed |= update(&mut d.loan_rate, sub, "rate");
            let q = loan_payment(&LoanParams::from(&*d));
            let rows = vec![
                vec!["Monthly payment".to_string(), format!("{:.0}", q.monthly_payment)],
                vec!["Total payment".to_string(), format!("{:.0}", q.total_payment)],
                vec!["Total interest".to_string(), format!("{:.0}", q.total_interest)],
            ];
            println!("{}", pretty_table(&["Loan", "MMK"], rows));
        }
        Some(("emergency", sub)) => {
            let d = &mut state.calculator;
            changed |= update(&mut d.monthly_expense, sub, "expense");
            changed |= update(&mut d.fund_months, sub, "months");
            let total = emergency_fund(d.monthly_expense, d.fund_months);
            println!(
                "Emergency fund for {} months: {}",
                d.fund_months,
                fmt_money(&total, "MMK")
            );
        }
        _ => {}
    }
    if changed {
        store.save(&state)?;
    }
    Ok(())
}

fn show(d: &CalculatorData) {
    let rows = vec![
        vec!["Target amount".into(), d.target_amount.to_string()],
        vec!["Target years".into(), d.years.to_string()],
        vec!["Target rate %".into(), d.interest_rate.to_string()],
        vec!["Monthly deposit".into(), d.monthly_deposit.to_string()],
        vec!["FV years".into(), d.fv_years.to_string()],
        vec!["FV rate %".into(), d.fv_rate.to_string()],
        vec!["Loan amount".into(), d.loan_amount.to_string()],
        vec!["Loan term years".into(), d.loan_term_years.to_string()],
        vec!["Loan rate %".into(), d.loan_rate.to_string()],
        vec!["Monthly expense".into(), d.monthly_expense.to_string()],
        vec!["Fund months".into(), d.fund_months.to_string()],
    ];
    println!("{}", pretty_table(&["Input", "Value"], rows));
}
