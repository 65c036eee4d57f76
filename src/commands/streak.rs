// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engagement::store::{EngagementStore, SqliteEngagementStore};
use crate::engagement::streak::{effective_streak, next_milestone};
use crate::utils::{maybe_print_json, pretty_table, today};
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let store = SqliteEngagementStore::new(conn);
    match m.subcommand() {
        Some(("show", sub)) => {
            let state = store.load_streak()?;
            let current = effective_streak(&state, today());
            let next = next_milestone(&state);
            let out = json!({
                "state": state,
                "effectiveStreak": current,
                "nextMilestone": next,
            });
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
                let achieved: Vec<String> = state
                    .milestones_achieved
                    .iter()
                    .map(|m| m.to_string())
                    .collect();
                let rows = vec![
                    vec!["Current streak".into(), current.to_string()],
                    vec!["Longest streak".into(), state.longest_streak.to_string()],
                    vec![
                        "Last log".into(),
                        state.last_log_date.map(|d| d.to_string()).unwrap_or_default(),
                    ],
                    vec!["Transactions logged".into(), state.total_transactions.to_string()],
                    vec!["Milestones".into(), achieved.join(", ")],
                    vec![
                        "Next milestone".into(),
                        next.map(|n| n.to_string()).unwrap_or_else(|| "-".into()),
                    ],
                ];
                println!("{}", pretty_table(&["Streak", "Value"], rows));
            }
        }
        Some(("reset", sub)) => {
            if !sub.get_flag("yes") {
                bail!("Refusing to reset engagement data without --yes");
            }
            store.reset()?;
            println!("Streak and category usage reset");
        }
        _ => {}
    }
    Ok(())
}
