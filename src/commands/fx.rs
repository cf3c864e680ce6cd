// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::Store;
use crate::models::{Currency, MarketRates};
use crate::utils::{
    fx_convert, gold_value, gold_weight, parse_decimal, parse_lenient_decimal, pretty_table,
};
use anyhow::Result;
use rust_decimal::Decimal;
use tracing::warn;

/// Fractions of a kyat-thar quoted alongside the gold price.
pub const GOLD_FRACTIONS: [(&str, u32); 4] = [
    ("1/2 kyat-thar", 2),
    ("1/4 kyat-thar", 4),
    ("1/8 kyat-thar", 8),
    ("1 pae (1/16)", 16),
];

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(store)?,
        Some(("set", sub)) => set(store, sub)?,
        Some(("convert", sub)) => convert(store, sub)?,
        Some(("gold", sub)) => gold(store, sub)?,
        _ => {}
    }
    Ok(())
}

/// Replace the rate table with any provided values; the rest are kept.
pub fn edited_rates(current: &MarketRates, sub: &clap::ArgMatches) -> MarketRates {
    let pick = |arg: &str, old: Decimal| match sub.get_one::<String>(arg) {
        Some(raw) => parse_lenient_decimal(arg, raw),
        None => old,
    };
    MarketRates {
        thb: pick("thb", current.thb),
        usd: pick("usd", current.usd),
        sgd: pick("sgd", current.sgd),
        gold: pick("gold", current.gold),
    }
}

fn set(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let mut state = store.load()?;
    state.rates = edited_rates(&state.rates, sub);
    for (name, rate) in [
        ("THB", state.rates.thb),
        ("USD", state.rates.usd),
        ("SGD", state.rates.sgd),
        ("Gold", state.rates.gold),
    ] {
        if rate <= Decimal::ZERO {
            warn!(currency = name, %rate, "non-positive rate stored");
            eprintln!("warning: {} rate is {}; conversions using it will fail", name, rate);
        }
    }
    store.save(&state)?;
    println!("Rates updated");
    print_rates(&state.rates);
    Ok(())
}

fn show(store: &dyn Store) -> Result<()> {
    let state = store.load()?;
    print_rates(&state.rates);
    Ok(())
}

fn print_rates(rates: &MarketRates) {
    let mut data = vec![
        vec!["1 THB".to_string(), rates.thb.to_string()],
        vec!["1 USD".to_string(), rates.usd.to_string()],
        vec!["1 SGD".to_string(), rates.sgd.to_string()],
        vec!["1 kyat-thar gold".to_string(), rates.gold.to_string()],
    ];
    for (label, div) in GOLD_FRACTIONS {
        data.push(vec![
            label.to_string(),
            format!("{:.0}", rates.gold / Decimal::from(div)),
        ]);
    }
    println!("{}", pretty_table(&["Unit", "MMK"], data));
}

fn convert(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let from: Currency = sub.get_one::<String>("from").unwrap().parse()?;
    let to: Currency = sub.get_one::<String>("to").unwrap().parse()?;
    let state = store.load()?;
    let res = fx_convert(amount, from, to, &state.rates)?;
    println!("{} {} -> {:.4} {}", amount, from, res, to);
    Ok(())
}

fn gold(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let kyat = parse_lenient_decimal("kyat", sub.get_one::<String>("kyat").unwrap());
    let pae = parse_lenient_decimal("pae", sub.get_one::<String>("pae").unwrap());
    let yway = parse_lenient_decimal("yway", sub.get_one::<String>("yway").unwrap());
    let state = store.load()?;
    let price = match sub.get_one::<String>("price") {
        Some(p) => parse_lenient_decimal("price", p),
        None => state.rates.gold,
    };
    let weight = gold_weight(kyat, pae, yway)?;
    let value = gold_value(kyat, pae, yway, price)?;
    println!(
        "{} kyat-thar x {} = {:.0} MMK",
        weight.round_dp(4),
        price,
        value
    );
    Ok(())
}
