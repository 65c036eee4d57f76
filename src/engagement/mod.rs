// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Logging streaks and category usage, updated once per saved transaction.

pub mod store;
pub mod streak;
pub mod usage;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

use crate::models::TransactionType;
use store::EngagementStore;
use streak::{StreakUpdate, advance};

/// Applies both engagement updates for a transaction that was just saved and
/// flushes the blobs. Assumes a single writer per store.
pub fn record_transaction<S: EngagementStore>(
    store: &S,
    category_id: i64,
    kind: TransactionType,
    transaction_date: NaiveDate,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<StreakUpdate> {
    let update = advance(&store.load_streak()?, transaction_date, today);
    store.save_streak(&update.state)?;

    let mut usage = store.load_usage()?;
    usage.record_usage(category_id, kind, now);
    store.save_usage(&usage)?;

    if let Some(m) = update.new_milestone {
        tracing::info!(milestone = m, streak = update.state.current_streak, "milestone reached");
    }
    Ok(update)
}
