// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Daily logging streak.
//!
//! The state is a plain value: callers load it, pass it through [`advance`]
//! together with the transaction date and today's date, and persist what comes
//! back. Applying `advance` is order dependent, so a shared store must run it
//! under a single writer.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Streak lengths that trigger a one-time celebration, ascending.
pub const MILESTONES: [u32; 7] = [3, 7, 14, 30, 60, 100, 365];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_log_date: Option<NaiveDate>,
    pub total_transactions: u64,
    pub milestones_achieved: BTreeSet<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakUpdate {
    pub state: StreakState,
    pub new_milestone: Option<u32>,
    pub is_first_today: bool,
}

/// Applies one successful transaction save dated `transaction_date`, as seen on `today`.
///
/// At most one milestone is reported per call: the lowest one reached and not
/// yet achieved. Entries back-dated before yesterday leave the streak alone.
pub fn advance(state: &StreakState, transaction_date: NaiveDate, today: NaiveDate) -> StreakUpdate {
    let yesterday = today.pred_opt().unwrap_or(today);
    let last = state.last_log_date;
    let is_first_today = last != Some(today);

    let new_streak = if transaction_date == today {
        if last == Some(today) {
            state.current_streak
        } else if last == Some(yesterday) {
            state.current_streak + 1
        } else {
            1
        }
    } else if transaction_date == yesterday && last != Some(today) && last != Some(yesterday) {
        state.current_streak + 1
    } else {
        state.current_streak
    };

    let new_milestone = MILESTONES
        .iter()
        .copied()
        .find(|m| new_streak >= *m && !state.milestones_achieved.contains(m));

    let mut milestones_achieved = state.milestones_achieved.clone();
    if let Some(m) = new_milestone {
        milestones_achieved.insert(m);
    }

    let last_log_date = match last {
        Some(prev) if transaction_date <= prev => Some(prev),
        _ => Some(transaction_date),
    };

    StreakUpdate {
        state: StreakState {
            current_streak: new_streak,
            longest_streak: state.longest_streak.max(new_streak),
            last_log_date,
            total_transactions: state.total_transactions + 1,
            milestones_achieved,
        },
        new_milestone,
        is_first_today,
    }
}

/// The streak as it should be shown on `today`: a streak whose last log is
/// older than yesterday has lapsed and reads as 0.
pub fn effective_streak(state: &StreakState, today: NaiveDate) -> u32 {
    let yesterday = today.pred_opt().unwrap_or(today);
    match state.last_log_date {
        Some(d) if d == today || d == yesterday => state.current_streak,
        _ => 0,
    }
}

/// Lowest milestone above the current streak that has not been celebrated yet.
pub fn next_milestone(state: &StreakState) -> Option<u32> {
    MILESTONES
        .iter()
        .copied()
        .find(|m| *m > state.current_streak && !state.milestones_achieved.contains(m))
}
