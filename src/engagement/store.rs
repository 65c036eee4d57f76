// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::engagement::streak::StreakState;
use crate::engagement::usage::CategoryUsage;
use crate::store::{delete_key, get_json, put_json};

pub const STREAK_KEY: &str = "engagement.streak";
pub const USAGE_KEY: &str = "engagement.category_usage";

/// Where the two engagement blobs live between sessions.
pub trait EngagementStore {
    fn load_streak(&self) -> Result<StreakState>;
    fn save_streak(&self, state: &StreakState) -> Result<()>;
    fn load_usage(&self) -> Result<CategoryUsage>;
    fn save_usage(&self, usage: &CategoryUsage) -> Result<()>;
    /// Explicit data reset; both blobs go back to the zero state.
    fn reset(&self) -> Result<()>;
}

/// Keeps each blob as a JSON document in the `settings` table.
pub struct SqliteEngagementStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteEngagementStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        SqliteEngagementStore { conn }
    }
}

impl EngagementStore for SqliteEngagementStore<'_> {
    fn load_streak(&self) -> Result<StreakState> {
        Ok(get_json(self.conn, STREAK_KEY)?.unwrap_or_default())
    }

    fn save_streak(&self, state: &StreakState) -> Result<()> {
        put_json(self.conn, STREAK_KEY, state)?;
        tracing::debug!(current = state.current_streak, "streak flushed");
        Ok(())
    }

    fn load_usage(&self) -> Result<CategoryUsage> {
        Ok(get_json(self.conn, USAGE_KEY)?.unwrap_or_default())
    }

    fn save_usage(&self, usage: &CategoryUsage) -> Result<()> {
        put_json(self.conn, USAGE_KEY, usage)?;
        tracing::debug!(tracked = usage.usage.len(), "category usage flushed");
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        delete_key(&tx, STREAK_KEY)?;
        delete_key(&tx, USAGE_KEY)?;
        tx.commit()?;
        tracing::info!("engagement data reset");
        Ok(())
    }
}
