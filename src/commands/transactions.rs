// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engagement::record_transaction;
use crate::engagement::store::SqliteEngagementStore;
use crate::engagement::streak::StreakUpdate;
use crate::models::{Necessity, Transaction, TransactionKind, TransactionType};
use crate::store::{self, NewTransaction, TransactionFilter};
use crate::utils::{
    fmt_money, maybe_print_json, optional, parse_date, parse_decimal, pretty_table, required,
    today,
};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct Recorded {
    pub id: i64,
    pub streak: StreakUpdate,
}

/// Saves the transaction and advances the streak and usage counters in one
/// SQLite transaction.
pub fn record(conn: &Connection, sub: &clap::ArgMatches, today: NaiveDate) -> Result<Recorded> {
    let kind_t = required(sub, "kind")?.parse::<TransactionType>()?;
    let amount = parse_decimal(required(sub, "amount")?)?;
    let category = store::category_by_name(conn, required(sub, "category")?)?;
    let subcategory_id = optional(sub, "subcategory")
        .map(|s| store::subcategory_by_name(conn, category.id, s))
        .transpose()?;
    let event_id = optional(sub, "event")
        .map(|e| store::event_by_name(conn, e))
        .transpose()?;
    let transaction_date = match optional(sub, "date") {
        Some(d) => parse_date(d)?,
        None => today,
    };
    let kind = match kind_t {
        TransactionType::Income => {
            if optional(sub, "necessity").is_some() {
                tracing::warn!("--necessity ignored for income");
            }
            TransactionKind::Income
        }
        TransactionType::Expense => {
            let necessity = match optional(sub, "necessity") {
                Some(n) => n.parse::<Necessity>()?,
                None => Necessity::suggested_for(&category),
            };
            TransactionKind::Expense { necessity }
        }
    };

    // row and both engagement blobs commit together or not at all
    let tx = conn.unchecked_transaction()?;
    let id = store::insert_transaction(
        &tx,
        &NewTransaction {
            kind,
            amount,
            category_id: category.id,
            subcategory_id,
            transaction_date,
            note: optional(sub, "note").map(str::to_string),
            event_id,
        },
    )?;

    let streak = record_transaction(
        &SqliteEngagementStore::new(&tx),
        category.id,
        kind_t,
        transaction_date,
        today,
        Utc::now(),
    )?;
    tx.commit()?;
    Ok(Recorded { id, streak })
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let recorded = record(conn, sub, today())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &recorded)? {
        return Ok(());
    }
    println!("Recorded transaction #{}", recorded.id);
    let s = &recorded.streak;
    if let Some(m) = s.new_milestone {
        println!("Milestone reached: {} day streak!", m);
    } else if s.is_first_today {
        println!(
            "First entry today. Streak: {} day(s)",
            s.state.current_streak
        );
    }
    Ok(())
}

fn filter_from(conn: &Connection, sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    Ok(TransactionFilter {
        kind: optional(sub, "kind")
            .map(|k| k.parse::<TransactionType>())
            .transpose()?,
        category_id: optional(sub, "category")
            .map(|c| store::category_by_name(conn, c).map(|c| c.id))
            .transpose()?,
        date_from: optional(sub, "from").map(parse_date).transpose()?,
        date_to: optional(sub, "to").map(parse_date).transpose()?,
        limit: sub.get_one::<usize>("limit").copied(),
    })
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    store::fetch_transactions(conn, &filter_from(conn, sub)?)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let names: std::collections::HashMap<i64, String> = store::list_categories(conn, None)?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.transaction_date.to_string(),
                    t.kind.transaction_type().to_string(),
                    fmt_money(&t.amount),
                    t.category_id
                        .and_then(|id| names.get(&id).cloned())
                        .unwrap_or_default(),
                    t.kind.necessity().map(|n| n.to_string()).unwrap_or_default(),
                    t.note.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Amount", "Category", "Necessity", "Note"],
                rows,
            )
        );
    }
    Ok(())
}
