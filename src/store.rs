// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite-backed rows for the aggregators: transactions, categories and settings.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::EngineError;
use crate::models::{
    BudgetMode, Category, Event, InitialBalance, Necessity, Settings, Subcategory, Transaction,
    TransactionKind, TransactionType,
};

pub const INITIAL_BALANCE_KEY: &str = "initial_balance";
pub const BUDGET_MODE_KEY: &str = "budget_mode";

/// Largest amount a single transaction may carry, in currency units. Keeps
/// all-time sums far from the `Decimal` range.
pub const MAX_TRANSACTION_AMOUNT: i64 = 1_000_000_000_000_000;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub category_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category_id: i64,
    pub subcategory_id: Option<i64>,
    pub transaction_date: NaiveDate,
    pub note: Option<String>,
    pub event_id: Option<i64>,
}

fn transaction_from_row(r: &Row<'_>) -> Result<Transaction> {
    let id: i64 = r.get(0)?;
    let kind_s: String = r.get(1)?;
    let amount_s: String = r.get(2)?;
    let necessity_s: Option<String> = r.get(5)?;
    let date_s: String = r.get(6)?;
    let created_s: String = r.get(9)?;

    let kind = match kind_s.parse::<TransactionType>()? {
        TransactionType::Income => TransactionKind::Income,
        TransactionType::Expense => {
            let necessity = necessity_s
                .with_context(|| format!("Expense {} has no necessity", id))?
                .parse::<Necessity>()?;
            TransactionKind::Expense { necessity }
        }
    };
    let amount = amount_s
        .parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}' in transaction {}", amount_s, id))?;
    let transaction_date = NaiveDate::parse_from_str(&date_s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' in transaction {}", date_s, id))?;
    let created_at = DateTime::parse_from_rfc3339(&created_s)
        .with_context(|| format!("Invalid created_at '{}' in transaction {}", created_s, id))?
        .with_timezone(&Utc);

    Ok(Transaction {
        id,
        kind,
        amount,
        category_id: r.get(3)?,
        subcategory_id: r.get(4)?,
        transaction_date,
        note: r.get(7)?,
        event_id: r.get(8)?,
        created_at,
    })
}

/// Rows matching every filter that is set, newest first.
pub fn fetch_transactions(conn: &Connection, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
    let mut sql = String::from(
        "SELECT id, type, amount, category_id, subcategory_id, necessity, transaction_date, note, event_id, created_at
         FROM transactions WHERE 1=1",
    );
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(kind) = filter.kind {
        sql.push_str(" AND type=?");
        params_vec.push(Box::new(kind.as_str()));
    }
    if let Some(cat) = filter.category_id {
        sql.push_str(" AND category_id=?");
        params_vec.push(Box::new(cat));
    }
    if let Some(from) = filter.date_from {
        sql.push_str(" AND transaction_date>=?");
        params_vec.push(Box::new(from.to_string()));
    }
    if let Some(to) = filter.date_to {
        sql.push_str(" AND transaction_date<=?");
        params_vec.push(Box::new(to.to_string()));
    }
    sql.push_str(" ORDER BY transaction_date DESC, created_at DESC, id DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ?");
        params_vec.push(Box::new(limit as i64));
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(transaction_from_row(r)?);
    }
    tracing::debug!(rows = data.len(), ?filter, "fetched transactions");
    Ok(data)
}

/// Validates the category/subcategory pairing and inserts the row.
pub fn insert_transaction(conn: &Connection, tx: &NewTransaction) -> Result<i64> {
    if tx.amount.is_sign_negative() {
        return Err(EngineError::InvalidTransaction(format!(
            "amount must be non-negative, got {}",
            tx.amount
        ))
        .into());
    }
    if tx.amount > Decimal::from(MAX_TRANSACTION_AMOUNT) {
        return Err(EngineError::InvalidTransaction(format!(
            "amount {} exceeds the limit of {}",
            tx.amount, MAX_TRANSACTION_AMOUNT
        ))
        .into());
    }
    let category = category_by_id(conn, tx.category_id)?
        .ok_or_else(|| EngineError::UnknownCategory(tx.category_id.to_string()))?;
    if category.transaction_type() != tx.kind.transaction_type() {
        return Err(EngineError::InvalidTransaction(format!(
            "category '{}' is for {} transactions",
            category.name,
            category.transaction_type()
        ))
        .into());
    }
    if let Some(sub_id) = tx.subcategory_id {
        let owner: Option<i64> = conn
            .query_row(
                "SELECT category_id FROM subcategories WHERE id=?1",
                params![sub_id],
                |r| r.get(0),
            )
            .optional()?;
        if owner != Some(tx.category_id) {
            return Err(EngineError::SubcategoryMismatch {
                subcategory: sub_id,
                category: tx.category_id,
            }
            .into());
        }
    }

    conn.execute(
        "INSERT INTO transactions(type, amount, category_id, subcategory_id, necessity, transaction_date, note, event_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            tx.kind.transaction_type().as_str(),
            tx.amount.to_string(),
            tx.category_id,
            tx.subcategory_id,
            tx.kind.necessity().map(|n| n.as_str()),
            tx.transaction_date.to_string(),
            tx.note,
            tx.event_id,
            Utc::now().to_rfc3339(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, date = %tx.transaction_date, kind = %tx.kind.transaction_type(), "transaction saved");
    Ok(id)
}

fn category_from_row(r: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        name: r.get(1)?,
        icon: r.get(2)?,
        color: r.get(3)?,
        is_essential: r.get(4)?,
        is_income: r.get(5)?,
    })
}

const CATEGORY_COLUMNS: &str = "SELECT id, name, icon, color, is_essential, is_income FROM categories";

/// Categories ordered by name, optionally restricted to one transaction type.
pub fn list_categories(conn: &Connection, kind: Option<TransactionType>) -> Result<Vec<Category>> {
    let mut data = Vec::new();
    match kind {
        Some(k) => {
            let mut stmt =
                conn.prepare(&format!("{} WHERE is_income=?1 ORDER BY name", CATEGORY_COLUMNS))?;
            let rows = stmt.query_map(params![k == TransactionType::Income], category_from_row)?;
            for row in rows {
                data.push(row?);
            }
        }
        None => {
            let mut stmt = conn.prepare(&format!("{} ORDER BY name", CATEGORY_COLUMNS))?;
            let rows = stmt.query_map([], category_from_row)?;
            for row in rows {
                data.push(row?);
            }
        }
    }
    Ok(data)
}

pub fn category_by_id(conn: &Connection, id: i64) -> Result<Option<Category>> {
    let mut stmt = conn.prepare(&format!("{} WHERE id=?1", CATEGORY_COLUMNS))?;
    Ok(stmt.query_row(params![id], category_from_row).optional()?)
}

pub fn category_by_name(conn: &Connection, name: &str) -> Result<Category> {
    let mut stmt = conn.prepare(&format!("{} WHERE name=?1", CATEGORY_COLUMNS))?;
    let cat = stmt
        .query_row(params![name], category_from_row)
        .optional()?
        .ok_or_else(|| EngineError::UnknownCategory(name.to_string()))?;
    Ok(cat)
}

pub fn add_category(
    conn: &Connection,
    name: &str,
    icon: &str,
    color: &str,
    is_essential: bool,
    is_income: bool,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO categories(name, icon, color, is_essential, is_income) VALUES (?1,?2,?3,?4,?5)",
        params![name, icon, color, is_essential, is_income],
    )
    .with_context(|| format!("Add category '{}'", name))?;
    Ok(conn.last_insert_rowid())
}

pub fn remove_category(conn: &Connection, name: &str) -> Result<usize> {
    Ok(conn.execute("DELETE FROM categories WHERE name=?1", params![name])?)
}

pub fn list_subcategories(conn: &Connection, category_id: i64) -> Result<Vec<Subcategory>> {
    let mut stmt = conn.prepare(
        "SELECT id, category_id, name FROM subcategories WHERE category_id=?1 ORDER BY name",
    )?;
    let rows = stmt.query_map(params![category_id], |r| {
        Ok(Subcategory {
            id: r.get(0)?,
            category_id: r.get(1)?,
            name: r.get(2)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

pub fn add_subcategory(conn: &Connection, category_id: i64, name: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO subcategories(category_id, name) VALUES (?1,?2)",
        params![category_id, name],
    )
    .with_context(|| format!("Add subcategory '{}'", name))?;
    Ok(conn.last_insert_rowid())
}

pub fn subcategory_by_name(conn: &Connection, category_id: i64, name: &str) -> Result<i64> {
    let id: i64 = conn
        .query_row(
            "SELECT id FROM subcategories WHERE category_id=?1 AND name=?2",
            params![category_id, name],
            |r| r.get(0),
        )
        .with_context(|| format!("Subcategory '{}' not found", name))?;
    Ok(id)
}

pub fn add_event(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute("INSERT INTO events(name) VALUES (?1)", params![name])
        .with_context(|| format!("Add event '{}'", name))?;
    Ok(conn.last_insert_rowid())
}

pub fn event_by_name(conn: &Connection, name: &str) -> Result<i64> {
    let id: i64 = conn
        .query_row("SELECT id FROM events WHERE name=?1", params![name], |r| {
            r.get(0)
        })
        .with_context(|| format!("Event '{}' not found", name))?;
    Ok(id)
}

pub fn list_events(conn: &Connection) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare("SELECT id, name FROM events ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok(Event {
            id: r.get(0)?,
            name: r.get(1)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

pub fn get_json<T: DeserializeOwned>(conn: &Connection, key: &str) -> Result<Option<T>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    match v {
        Some(s) => {
            let parsed = serde_json::from_str(&s).map_err(|e| EngineError::InvalidSetting {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

pub fn put_json<T: Serialize>(conn: &Connection, key: &str, value: &T) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, serde_json::to_string(value)?],
    )?;
    Ok(())
}

pub fn delete_key(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
    Ok(())
}

/// Reads both settings the aggregators use, defaulting whatever is absent.
pub fn get_settings(conn: &Connection) -> Result<Settings> {
    let defaults = Settings::default();
    let initial_balance = match get_json::<InitialBalance>(conn, INITIAL_BALANCE_KEY)? {
        Some(b) => b.amount,
        None => {
            tracing::debug!("initial_balance not set, using default");
            defaults.initial_balance
        }
    };
    let budget_mode = match get_json::<BudgetMode>(conn, BUDGET_MODE_KEY)? {
        Some(b) => b,
        None => {
            tracing::debug!("budget_mode not set, using default");
            defaults.budget_mode
        }
    };
    Ok(Settings {
        initial_balance,
        budget_mode,
    })
}

pub fn set_initial_balance(conn: &Connection, amount: Decimal) -> Result<()> {
    put_json(conn, INITIAL_BALANCE_KEY, &InitialBalance { amount })
}

pub fn set_budget_mode(conn: &Connection, mode: &BudgetMode) -> Result<()> {
    if mode.daily_limit.is_sign_negative() {
        return Err(EngineError::InvalidSetting {
            key: BUDGET_MODE_KEY.to_string(),
            reason: format!("daily_limit must be non-negative, got {}", mode.daily_limit),
        }
        .into());
    }
    put_json(conn, BUDGET_MODE_KEY, mode)
}
