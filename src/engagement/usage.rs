// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Category, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEntry {
    pub count: u64,
    pub last_used_timestamp: DateTime<Utc>,
}

/// Per-category usage counters plus the last category picked for each
/// transaction type. Persisted as one blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUsage {
    pub usage: BTreeMap<i64, UsageEntry>,
    pub last_category_by_type: BTreeMap<TransactionType, i64>,
}

impl CategoryUsage {
    pub fn record_usage(&mut self, category_id: i64, kind: TransactionType, now: DateTime<Utc>) {
        let entry = self.usage.entry(category_id).or_insert(UsageEntry {
            count: 0,
            last_used_timestamp: now,
        });
        entry.count += 1;
        entry.last_used_timestamp = now;
        self.last_category_by_type.insert(kind, category_id);
    }

    pub fn last_category(&self, kind: TransactionType) -> Option<i64> {
        self.last_category_by_type.get(&kind).copied()
    }

    /// Tracked categories ranked by count, then most recent use.
    fn ranked(&self) -> Vec<(i64, &UsageEntry)> {
        let mut items: Vec<(i64, &UsageEntry)> = self.usage.iter().map(|(id, e)| (*id, e)).collect();
        items.sort_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then_with(|| b.1.last_used_timestamp.cmp(&a.1.last_used_timestamp))
                .then_with(|| a.0.cmp(&b.0))
        });
        items
    }

    pub fn top_n(&self, n: usize) -> Vec<i64> {
        self.ranked().into_iter().take(n).map(|(id, _)| id).collect()
    }

    /// Up to `n` categories from `categories` for quick entry: most used first,
    /// then untracked ones in list order to fill any shortfall.
    pub fn quick_pick<'a>(&self, categories: &'a [Category], n: usize) -> Vec<&'a Category> {
        let mut picked: Vec<&Category> = Vec::with_capacity(n);
        let mut seen: HashSet<i64> = HashSet::new();
        for (id, _) in self.ranked() {
            if picked.len() == n {
                return picked;
            }
            if let Some(c) = categories.iter().find(|c| c.id == id) {
                seen.insert(id);
                picked.push(c);
            }
        }
        for c in categories {
            if picked.len() == n {
                break;
            }
            if seen.insert(c.id) {
                picked.push(c);
            }
        }
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn cat(id: i64) -> Category {
        Category {
            id,
            name: format!("c{}", id),
            icon: String::new(),
            color: String::new(),
            is_essential: false,
            is_income: false,
        }
    }

    #[test]
    fn counts_and_tracks_last_category() {
        let mut u = CategoryUsage::default();
        u.record_usage(4, TransactionType::Expense, at(0));
        u.record_usage(4, TransactionType::Expense, at(10));
        u.record_usage(9, TransactionType::Income, at(20));
        assert_eq!(u.usage[&4].count, 2);
        assert_eq!(u.usage[&4].last_used_timestamp, at(10));
        assert_eq!(u.last_category(TransactionType::Expense), Some(4));
        assert_eq!(u.last_category(TransactionType::Income), Some(9));
    }

    #[test]
    fn ties_on_count_go_to_most_recent() {
        let mut u = CategoryUsage::default();
        u.record_usage(1, TransactionType::Expense, at(0));
        u.record_usage(2, TransactionType::Expense, at(5));
        u.record_usage(3, TransactionType::Expense, at(1));
        u.record_usage(3, TransactionType::Expense, at(2));
        assert_eq!(u.top_n(3), vec![3, 2, 1]);
        assert_eq!(u.top_n(1), vec![3]);
        assert!(CategoryUsage::default().top_n(5).is_empty());
    }

    #[test]
    fn quick_pick_fills_shortfall_in_list_order() {
        let mut u = CategoryUsage::default();
        u.record_usage(30, TransactionType::Expense, at(0));
        u.record_usage(99, TransactionType::Income, at(1)); // not in the list
        let cats = vec![cat(10), cat(20), cat(30), cat(40)];
        let ids: Vec<i64> = u.quick_pick(&cats, 3).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);

        let all: Vec<i64> = u.quick_pick(&cats, 10).iter().map(|c| c.id).collect();
        assert_eq!(all, vec![30, 10, 20, 40]);
        assert!(u.quick_pick(&cats, 0).is_empty());
    }

    #[test]
    fn blob_round_trips_through_json() {
        let mut u = CategoryUsage::default();
        u.record_usage(7, TransactionType::Expense, at(3));
        let json = serde_json::to_string(&u).unwrap();
        assert!(json.contains("lastCategoryByType"));
        let back: CategoryUsage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, u);
    }
}
