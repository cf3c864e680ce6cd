// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

use crate::models::Currency;

/// Failures raised by the finance core. Command handlers wrap these in `anyhow`.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("Invalid rate {rate} for {currency}: rates must be positive")]
    InvalidRate {
        currency: Currency,
        rate: rust_decimal::Decimal,
    },
    #[error("Unknown currency '{0}', expected MMK|THB|USD|SGD")]
    UnknownCurrency(String),
    #[error("Unknown transaction type '{0}', expected INCOME|EXPENSE|SAVING")]
    UnknownTransactionType(String),
    #[error("Malformed import at line {line}: {reason}")]
    MalformedImport { line: usize, reason: String },
    #[error("Backup contains no transactions")]
    EmptyBackup,
    #[error("{0} not found")]
    NotFound(String),
    #[error("Amount out of range while {0}")]
    Overflow(&'static str),
}
