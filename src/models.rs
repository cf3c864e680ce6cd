// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::FinanceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
    Saving,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
            TransactionType::Saving => "SAVING",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            "SAVING" => Ok(TransactionType::Saving),
            other => Err(FinanceError::UnknownTransactionType(other.to_string())),
        }
    }
}

/// Currencies a transaction may be recorded in. MMK is the base unit.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    MMK,
    THB,
    USD,
    SGD,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::MMK => "MMK",
            Currency::THB => "THB",
            Currency::USD => "USD",
            Currency::SGD => "SGD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MMK" => Ok(Currency::MMK),
            "THB" => Ok(Currency::THB),
            "USD" => Ok(Currency::USD),
            "SGD" => Ok(Currency::SGD),
            other => Err(FinanceError::UnknownCurrency(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default = "new_id")]
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub r#type: TransactionType,
    pub category: String,
    pub currency: Currency,
}

/// 1 unit of each field = N MMK. `gold` prices one kyat-thar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRates {
    #[serde(rename = "THB")]
    pub thb: Decimal,
    #[serde(rename = "USD")]
    pub usd: Decimal,
    #[serde(rename = "SGD")]
    pub sgd: Decimal,
    #[serde(rename = "Gold")]
    pub gold: Decimal,
}

impl Default for MarketRates {
    fn default() -> Self {
        MarketRates {
            thb: Decimal::from(124),
            usd: Decimal::from(4500),
            sgd: Decimal::from(3300),
            gold: Decimal::from(6_500_000),
        }
    }
}

impl MarketRates {
    /// Rate for a transaction currency; `None` for the base currency.
    pub fn rate_for(&self, currency: Currency) -> Option<Decimal> {
        match currency {
            Currency::MMK => None,
            Currency::THB => Some(self.thb),
            Currency::USD => Some(self.usd),
            Currency::SGD => Some(self.sgd),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringRule {
    #[serde(default = "new_id")]
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub r#type: TransactionType,
    pub category: String,
    pub currency: Currency,
    pub day_of_month: u32,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    pub last_processed_date: Option<NaiveDate>,
}

// Older backups carry a full ISO timestamp here; only the calendar date matters.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => {
            let day = s.get(..10).unwrap_or(s);
            NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("invalid date '{}': {}", s, e)))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub category: String,
    pub limit: Decimal, // base currency
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorData {
    pub target_amount: Decimal,
    pub years: Decimal,
    pub interest_rate: Decimal,
    pub monthly_deposit: Decimal,
    pub fv_years: Decimal,
    pub fv_rate: Decimal,
    pub loan_amount: Decimal,
    pub loan_term_years: Decimal,
    pub loan_rate: Decimal,
    pub monthly_expense: Decimal,
    pub fund_months: Decimal,
}

impl Default for CalculatorData {
    fn default() -> Self {
        CalculatorData {
            target_amount: Decimal::from(100_000_000),
            years: Decimal::from(4),
            interest_rate: Decimal::from(8),
            monthly_deposit: Decimal::from(500_000),
            fv_years: Decimal::from(3),
            fv_rate: Decimal::from(8),
            loan_amount: Decimal::from(30_000_000),
            loan_term_years: Decimal::from(5),
            loan_rate: Decimal::from(10),
            monthly_expense: Decimal::from(500_000),
            fund_months: Decimal::from(6),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

impl UserProfile {
    pub fn guest() -> Self {
        UserProfile {
            id: "guest".into(),
            name: "Guest".into(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(anyhow::anyhow!("Unknown theme '{}', expected light|dark", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: Theme,
    pub mode_chosen: bool,
}

/// Everything a profile owns. Loaded from and saved to a `Store` as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub profile: UserProfile,
    pub preferences: Preferences,
    pub transactions: Vec<Transaction>,
    pub rates: MarketRates,
    pub calculator: CalculatorData,
    pub budgets: Vec<Budget>,
    pub recurring: Vec<RecurringRule>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            profile: UserProfile::guest(),
            preferences: Preferences::default(),
            transactions: Vec::new(),
            rates: MarketRates::default(),
            calculator: CalculatorData::default(),
            budgets: Vec::new(),
            recurring: Vec::new(),
        }
    }
}

impl AppState {
    /// Insert or overwrite the budget for `category`.
    pub fn set_budget(&mut self, category: &str, limit: Decimal) {
        match self.budgets.iter_mut().find(|b| b.category == category) {
            Some(b) => b.limit = limit,
            None => self.budgets.push(Budget {
                category: category.to_string(),
                limit,
            }),
        }
    }
}

/// Full-state backup file. `version` is a free-form tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupData {
    pub profile: UserProfile,
    pub transactions: Vec<Transaction>,
    pub rates: MarketRates,
    pub calculator: CalculatorData,
    pub budgets: Vec<Budget>,
    pub recurring: Vec<RecurringRule>,
    pub version: String,
}

pub const BACKUP_VERSION: &str = "2.1";

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
