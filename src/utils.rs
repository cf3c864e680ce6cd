// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use tracing::warn;

use crate::errors::FinanceError;
use crate::models::{Currency, MarketRates};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Parse `YYYY-MM` into the first day of that month.
pub fn parse_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Numeric form input: anything unparsable counts as zero.
pub fn parse_lenient_decimal(field: &str, s: &str) -> Decimal {
    match s.trim().parse::<Decimal>() {
        Ok(d) => d,
        Err(_) => {
            warn!(field, value = s, "non-numeric input treated as 0");
            Decimal::ZERO
        }
    }
}

pub fn month_key(date: NaiveDate) -> String {
    format!("{}-{:02}", date.year(), date.month())
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {}", d.round_dp(2), ccy)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Running total that reports overflow instead of panicking.
pub fn add_amount(
    total: Decimal,
    amount: Decimal,
    what: &'static str,
) -> Result<Decimal, FinanceError> {
    total
        .checked_add(amount)
        .ok_or(FinanceError::Overflow(what))
}

pub fn sub_amount(
    total: Decimal,
    amount: Decimal,
    what: &'static str,
) -> Result<Decimal, FinanceError> {
    total
        .checked_sub(amount)
        .ok_or(FinanceError::Overflow(what))
}

fn checked_rate(currency: Currency, rates: &MarketRates) -> Result<Option<Decimal>, FinanceError> {
    match rates.rate_for(currency) {
        Some(rate) if rate <= Decimal::ZERO => Err(FinanceError::InvalidRate { currency, rate }),
        other => Ok(other),
    }
}

/// Normalize an amount into MMK using the rate table.
pub fn to_base(
    amount: Decimal,
    currency: Currency,
    rates: &MarketRates,
) -> Result<Decimal, FinanceError> {
    match checked_rate(currency, rates)? {
        None => Ok(amount),
        Some(rate) => amount
            .checked_mul(rate)
            .ok_or(FinanceError::Overflow("converting to MMK")),
    }
}

/// Express an MMK amount in `currency`.
pub fn from_base(
    amount: Decimal,
    currency: Currency,
    rates: &MarketRates,
) -> Result<Decimal, FinanceError> {
    match checked_rate(currency, rates)? {
        None => Ok(amount),
        Some(rate) => amount
            .checked_div(rate)
            .ok_or(FinanceError::Overflow("converting from MMK")),
    }
}

/// Convert between two transaction currencies through the MMK hub.
pub fn fx_convert(
    amount: Decimal,
    from: Currency,
    to: Currency,
    rates: &MarketRates,
) -> Result<Decimal, FinanceError> {
    if from == to {
        return Ok(amount);
    }
    let base = to_base(amount, from, rates)?;
    from_base(base, to, rates)
}

/// Kyat-thar weight of `kyat` + `pae` + `yway` (1 kyat-thar = 16 pae = 128 yway).
pub fn gold_weight(
    kyat: Decimal,
    pae: Decimal,
    yway: Decimal,
) -> Result<Decimal, FinanceError> {
    kyat.checked_add(pae / Decimal::from(16))
        .and_then(|w| w.checked_add(yway / Decimal::from(128)))
        .ok_or(FinanceError::Overflow("adding gold weights"))
}

pub fn gold_value(
    kyat: Decimal,
    pae: Decimal,
    yway: Decimal,
    price: Decimal,
) -> Result<Decimal, FinanceError> {
    gold_weight(kyat, pae, yway)?
        .checked_mul(price)
        .ok_or(FinanceError::Overflow("valuing gold"))
}
