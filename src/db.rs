// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::AppState;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.shwebudget", "ShweBudget", "shwebudget"));

pub const DB_ENV: &str = "SHWEBUDGET_DB";

pub const KEY_THEME: &str = "theme";
pub const KEY_MODE_CHOSEN: &str = "mode_chosen";
pub const KEY_PROFILE: &str = "profile";
pub const KEY_TRANSACTIONS: &str = "transactions";
pub const KEY_RATES: &str = "rates";
pub const KEY_CALCULATOR: &str = "calculator";
pub const KEY_BUDGETS: &str = "budgets";
pub const KEY_RECURRING: &str = "recurring";

/// Persistence seam: the whole profile state is read and written at once.
pub trait Store {
    fn load(&self) -> Result<AppState>;
    fn save(&self, state: &AppState) -> Result<()>;
}

pub fn db_path() -> Result<PathBuf> {
    if let Ok(p) = std::env::var(DB_ENV) {
        if !p.trim().is_empty() {
            return Ok(PathBuf::from(p.trim()));
        }
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("shwebudget.sqlite"))
}

pub fn open_or_init(path_override: Option<&Path>) -> Result<SqliteStore> {
    let path = match path_override {
        Some(p) => p.to_path_buf(),
        None => db_path()?,
    };
    SqliteStore::open(&path)
}

/// Key/value store: one row per state entry, each value a JSON document.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn =
            Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
        init_schema(&conn)?;
        debug!(path = %path.display(), "store opened");
        Ok(SqliteStore { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(SqliteStore { conn })
    }

    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let v: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM entries WHERE key=?1",
                params![key],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v)
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_raw(key)? {
            Some(s) => {
                let v = serde_json::from_str(&s)
                    .with_context(|| format!("Corrupt store entry '{}'", key))?;
                Ok(Some(v))
            }
            None => Ok(None),
        }
    }
}

fn put<T: Serialize + ?Sized>(conn: &Connection, key: &str, value: &T) -> Result<()> {
    conn.execute(
        "INSERT INTO entries(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
        params![key, serde_json::to_string(value)?],
    )?;
    Ok(())
}

impl Store for SqliteStore {
    fn load(&self) -> Result<AppState> {
        let defaults = AppState::default();
        let mut state = AppState {
            profile: self.get(KEY_PROFILE)?.unwrap_or(defaults.profile),
            preferences: defaults.preferences,
            transactions: self.get(KEY_TRANSACTIONS)?.unwrap_or_default(),
            rates: self.get(KEY_RATES)?.unwrap_or(defaults.rates),
            calculator: self.get(KEY_CALCULATOR)?.unwrap_or(defaults.calculator),
            budgets: self.get(KEY_BUDGETS)?.unwrap_or_default(),
            recurring: self.get(KEY_RECURRING)?.unwrap_or_default(),
        };
        if let Some(theme) = self.get(KEY_THEME)? {
            state.preferences.theme = theme;
        }
        if let Some(chosen) = self.get(KEY_MODE_CHOSEN)? {
            state.preferences.mode_chosen = chosen;
        }
        debug!(
            transactions = state.transactions.len(),
            recurring = state.recurring.len(),
            "state loaded"
        );
        Ok(state)
    }

    fn save(&self, state: &AppState) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        put(&tx, KEY_THEME, &state.preferences.theme)?;
        put(&tx, KEY_MODE_CHOSEN, &state.preferences.mode_chosen)?;
        put(&tx, KEY_PROFILE, &state.profile)?;
        put(&tx, KEY_TRANSACTIONS, &state.transactions)?;
        put(&tx, KEY_RATES, &state.rates)?;
        put(&tx, KEY_CALCULATOR, &state.calculator)?;
        put(&tx, KEY_BUDGETS, &state.budgets)?;
        put(&tx, KEY_RECURRING, &state.recurring)?;
        tx.commit()?;
        debug!(transactions = state.transactions.len(), "state saved");
        Ok(())
    }
}

/// In-process store used by tests and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    state: RefCell<AppState>,
}

impl MemoryStore {
    pub fn new(state: AppState) -> Self {
        MemoryStore {
            state: RefCell::new(state),
        }
    }

    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<AppState> {
        Ok(self.state.borrow().clone())
    }

    fn save(&self, state: &AppState) -> Result<()> {
        *self.state.borrow_mut() = state.clone();
        Ok(())
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS entries(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}
