// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Expense breakdowns by category, subcategory, necessity and event.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{Category, Necessity, Subcategory, Transaction, TransactionKind};

pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";
pub const UNKNOWN_CATEGORY_LABEL: &str = "Unknown";

/// Expense amounts split by necessity. `total` is the sum of the three parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NecessityTotals {
    pub total: Decimal,
    pub necessary: Decimal,
    pub unnecessary: Decimal,
    pub debatable: Decimal,
    pub transaction_count: usize,
}

impl NecessityTotals {
    pub fn add(&mut self, amount: Decimal, necessity: Necessity) {
        self.total = self.total.saturating_add(amount);
        self.transaction_count += 1;
        let part = match necessity {
            Necessity::Necessary => &mut self.necessary,
            Necessity::Unnecessary => &mut self.unnecessary,
            Necessity::Debatable => &mut self.debatable,
        };
        *part = part.saturating_add(amount);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    /// Category or subcategory id; `None` for the synthetic uncategorized group.
    pub id: Option<i64>,
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(flatten)]
    pub totals: NecessityTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCategory {
    pub category_id: i64,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub total: Decimal,
    pub transaction_count: usize,
    /// Share of the untruncated grand total, two decimals.
    pub percentage: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventTotals {
    pub event_id: i64,
    pub income: Decimal,
    pub expense: Decimal,
    pub transaction_count: usize,
}

fn expenses(transactions: &[Transaction]) -> impl Iterator<Item = (&Transaction, Necessity)> {
    transactions.iter().filter_map(|t| match t.kind {
        TransactionKind::Expense { necessity } => Some((t, necessity)),
        TransactionKind::Income => None,
    })
}

/// Groups expenses by category id. Rows without a category are dropped.
fn group_by_category(transactions: &[Transaction]) -> BTreeMap<i64, NecessityTotals> {
    let mut groups: BTreeMap<i64, NecessityTotals> = BTreeMap::new();
    for (t, necessity) in expenses(transactions) {
        if let Some(cat) = t.category_id {
            groups.entry(cat).or_default().add(t.amount, necessity);
        }
    }
    groups
}

fn sort_by_total_desc(rows: &mut [BreakdownRow]) {
    // stable: equal totals keep ascending id order from the BTreeMap
    rows.sort_by(|a, b| b.totals.total.cmp(&a.totals.total));
}

pub fn by_category(transactions: &[Transaction], categories: &[Category]) -> Vec<BreakdownRow> {
    let lookup: HashMap<i64, &Category> = categories.iter().map(|c| (c.id, c)).collect();
    let mut rows: Vec<BreakdownRow> = group_by_category(transactions)
        .into_iter()
        .map(|(id, totals)| {
            let (name, icon, color) = match lookup.get(&id) {
                Some(c) => (c.name.clone(), c.icon.clone(), c.color.clone()),
                None => (UNKNOWN_CATEGORY_LABEL.to_string(), String::new(), String::new()),
            };
            BreakdownRow {
                id: Some(id),
                name,
                icon,
                color,
                totals,
            }
        })
        .collect();
    sort_by_total_desc(&mut rows);
    rows
}

/// Breakdown of one category's expenses by subcategory. Expenses without a
/// subcategory land in an "Uncategorized" row wearing the parent's icon and color.
pub fn by_subcategory(
    transactions: &[Transaction],
    parent: &Category,
    subcategories: &[Subcategory],
) -> Vec<BreakdownRow> {
    let names: HashMap<i64, &str> = subcategories
        .iter()
        .filter(|s| s.category_id == parent.id)
        .map(|s| (s.id, s.name.as_str()))
        .collect();

    let mut groups: BTreeMap<Option<i64>, NecessityTotals> = BTreeMap::new();
    for (t, necessity) in expenses(transactions) {
        if t.category_id != Some(parent.id) {
            continue;
        }
        groups
            .entry(t.subcategory_id)
            .or_default()
            .add(t.amount, necessity);
    }

    let mut rows: Vec<BreakdownRow> = groups
        .into_iter()
        .map(|(id, totals)| {
            let name = match id {
                Some(sid) => names
                    .get(&sid)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| UNKNOWN_CATEGORY_LABEL.to_string()),
                None => UNCATEGORIZED_LABEL.to_string(),
            };
            BreakdownRow {
                id,
                name,
                icon: parent.icon.clone(),
                color: parent.color.clone(),
                totals,
            }
        })
        .collect();
    sort_by_total_desc(&mut rows);
    rows
}

/// Returns `part / whole × 100` rounded half away from zero to 2 places, or 0 for an empty whole.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    // multiply first for exact results; divide first when that would overflow
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|p| p.checked_div(whole))
        .or_else(|| part.checked_div(whole)?.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Top `limit` expense categories. Percentages are computed against the
/// grand total of all groups before truncation.
pub fn top_categories(
    transactions: &[Transaction],
    categories: &[Category],
    limit: usize,
) -> Vec<TopCategory> {
    let rows = by_category(transactions, categories);
    let grand_total = rows
        .iter()
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.totals.total));
    rows.into_iter()
        .take(limit)
        .filter_map(|r| {
            Some(TopCategory {
                category_id: r.id?,
                percentage: percentage(r.totals.total, grand_total),
                name: r.name,
                icon: r.icon,
                color: r.color,
                total: r.totals.total,
                transaction_count: r.totals.transaction_count,
            })
        })
        .collect()
}

/// Expense totals per necessity over the whole set, category or not.
pub fn necessity_totals(transactions: &[Transaction]) -> NecessityTotals {
    let mut totals = NecessityTotals::default();
    for (t, necessity) in expenses(transactions) {
        totals.add(t.amount, necessity);
    }
    totals
}

/// Income and expense per event, ordered by event id. Rows outside any event are skipped.
pub fn event_totals(transactions: &[Transaction]) -> Vec<EventTotals> {
    let mut groups: BTreeMap<i64, EventTotals> = BTreeMap::new();
    for t in transactions {
        let Some(event_id) = t.event_id else {
            continue;
        };
        let entry = groups.entry(event_id).or_insert_with(|| EventTotals {
            event_id,
            ..Default::default()
        });
        entry.transaction_count += 1;
        match t.kind {
            TransactionKind::Income => entry.income = entry.income.saturating_add(t.amount),
            TransactionKind::Expense { .. } => {
                entry.expense = entry.expense.saturating_add(t.amount)
            }
        }
    }
    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::{category, expense, income};

    fn scenario() -> Vec<Transaction> {
        vec![
            expense(1, "100", Some(1), Necessity::Necessary, "2024-03-01"),
            expense(2, "50", Some(1), Necessity::Unnecessary, "2024-03-02"),
            income(3, "500", Some(2), "2024-03-01"),
        ]
    }

    #[test]
    fn category_breakdown_splits_necessity() {
        let cats = vec![category(1, "Food", false), category(2, "Salary", true)];
        let rows = by_category(&scenario(), &cats);
        assert_eq!(rows.len(), 1);
        let food = &rows[0];
        assert_eq!(food.id, Some(1));
        assert_eq!(food.name, "Food");
        assert_eq!(food.totals.total, Decimal::from(150));
        assert_eq!(food.totals.necessary, Decimal::from(100));
        assert_eq!(food.totals.unnecessary, Decimal::from(50));
        assert_eq!(food.totals.debatable, Decimal::ZERO);
        assert_eq!(food.totals.transaction_count, 2);
    }

    #[test]
    fn category_breakdown_drops_unattributed_and_sorts_desc() {
        let cats = vec![category(1, "Food", false), category(2, "Fun", false)];
        let rows = vec![
            expense(1, "10", Some(1), Necessity::Necessary, "2024-03-01"),
            expense(2, "70", Some(2), Necessity::Debatable, "2024-03-01"),
            expense(3, "999", None, Necessity::Necessary, "2024-03-01"),
            expense(4, "5", Some(7), Necessity::Necessary, "2024-03-01"),
        ];
        let out = by_category(&rows, &cats);
        let ids: Vec<Option<i64>> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![Some(2), Some(1), Some(7)]);
        assert_eq!(out[0].totals.debatable, Decimal::from(70));
        assert_eq!(out[2].name, UNKNOWN_CATEGORY_LABEL);
    }

    #[test]
    fn subcategory_breakdown_buckets_missing_subcategory() {
        let parent = category(1, "Food", false);
        let subs = vec![Subcategory {
            id: 10,
            category_id: 1,
            name: "Groceries".into(),
        }];
        let mut a = expense(1, "40", Some(1), Necessity::Necessary, "2024-03-01");
        a.subcategory_id = Some(10);
        let b = expense(2, "60", Some(1), Necessity::Unnecessary, "2024-03-01");
        let c = expense(3, "25", Some(2), Necessity::Unnecessary, "2024-03-01");
        let out = by_subcategory(&[a, b, c], &parent, &subs);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, None);
        assert_eq!(out[0].name, UNCATEGORIZED_LABEL);
        assert_eq!(out[0].icon, parent.icon);
        assert_eq!(out[0].color, parent.color);
        assert_eq!(out[0].totals.total, Decimal::from(60));
        assert_eq!(out[1].name, "Groceries");
    }

    #[test]
    fn top_categories_keep_full_grand_total_after_truncation() {
        let cats = vec![
            category(1, "A", false),
            category(2, "B", false),
            category(3, "C", false),
        ];
        let rows = vec![
            expense(1, "50", Some(1), Necessity::Necessary, "2024-03-01"),
            expense(2, "30", Some(2), Necessity::Necessary, "2024-03-01"),
            expense(3, "20", Some(3), Necessity::Necessary, "2024-03-01"),
        ];
        let top = top_categories(&rows, &cats, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].category_id, 1);
        assert_eq!(top[0].percentage, Decimal::from(50));
        assert_eq!(top[1].percentage, Decimal::from(30));
        let sum: Decimal = top.iter().map(|t| t.percentage).sum();
        assert!(sum < Decimal::ONE_HUNDRED);
    }

    #[test]
    fn percentage_rounds_to_two_places_and_handles_zero() {
        assert_eq!(percentage(Decimal::ONE, Decimal::from(3)), Decimal::new(3333, 2));
        assert_eq!(percentage(Decimal::from(2), Decimal::from(3)), Decimal::new(6667, 2));
        assert_eq!(percentage(Decimal::from(5), Decimal::ZERO), Decimal::ZERO);
        assert!(top_categories(&[], &[], 5).is_empty());
    }

    #[test]
    fn percentage_of_huge_totals_does_not_overflow() {
        let huge: Decimal = "1000000000000000000000000000".parse().unwrap();
        assert_eq!(percentage(huge, huge), Decimal::ONE_HUNDRED);

        let cats = vec![category(1, "A", false), category(2, "B", false)];
        let rows = vec![
            expense(1, "6000000000000000000000000000", Some(1), Necessity::Necessary, "2024-03-01"),
            expense(2, "2000000000000000000000000000", Some(2), Necessity::Debatable, "2024-03-01"),
        ];
        let top = top_categories(&rows, &cats, 5);
        assert_eq!(top[0].percentage, Decimal::from(75));
        assert_eq!(top[1].percentage, Decimal::from(25));

        let single = vec![expense(1, &huge.to_string(), Some(1), Necessity::Necessary, "2024-03-01")];
        assert_eq!(top_categories(&single, &cats, 1)[0].percentage, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn percentages_stay_within_bounds() {
        let cats = vec![category(1, "A", false), category(2, "B", false)];
        let rows = vec![
            expense(1, "0", Some(1), Necessity::Necessary, "2024-03-01"),
            expense(2, "0", Some(2), Necessity::Necessary, "2024-03-01"),
        ];
        for t in top_categories(&rows, &cats, 10) {
            assert_eq!(t.percentage, Decimal::ZERO);
        }
        let rows = vec![
            expense(1, "12.34", Some(1), Necessity::Necessary, "2024-03-01"),
            expense(2, "0.01", Some(2), Necessity::Necessary, "2024-03-01"),
        ];
        for t in top_categories(&rows, &cats, 10) {
            assert!(t.percentage >= Decimal::ZERO && t.percentage <= Decimal::ONE_HUNDRED);
        }
    }

    #[test]
    fn necessity_and_event_totals() {
        let mut rows = scenario();
        rows.push(expense(4, "7", None, Necessity::Debatable, "2024-03-03"));
        rows[0].event_id = Some(9);
        rows[2].event_id = Some(9);
        let n = necessity_totals(&rows);
        assert_eq!(n.total, Decimal::from(157));
        assert_eq!(n.debatable, Decimal::from(7));
        assert_eq!(n.transaction_count, 3);

        let ev = event_totals(&rows);
        assert_eq!(ev.len(), 1);
        assert_eq!(ev[0].event_id, 9);
        assert_eq!(ev[0].income, Decimal::from(500));
        assert_eq!(ev[0].expense, Decimal::from(100));
        assert_eq!(ev[0].transaction_count, 2);
    }

    #[test]
    fn breakdown_is_deterministic() {
        let cats = vec![category(1, "A", false), category(2, "B", false)];
        let rows = vec![
            expense(1, "10", Some(2), Necessity::Necessary, "2024-03-01"),
            expense(2, "10", Some(1), Necessity::Necessary, "2024-03-01"),
        ];
        let first = by_category(&rows, &cats);
        assert_eq!(first, by_category(&rows, &cats));
        // equal totals fall back to ascending id
        assert_eq!(first[0].id, Some(1));
    }
}
