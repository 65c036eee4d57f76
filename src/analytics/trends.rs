// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::periods::{YearMonth, day_buckets, month_buckets};
use crate::error::EngineError;
use crate::models::{Necessity, Transaction, TransactionKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTrend {
    pub month: YearMonth,
    pub income: Decimal,
    pub expense: Decimal,
    pub necessary: Decimal,
    pub unnecessary: Decimal,
    pub savings: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySpending {
    pub date: NaiveDate,
    pub total: Decimal,
    pub necessary: Decimal,
    pub unnecessary: Decimal,
}

#[derive(Debug, Default)]
struct Acc {
    income: Decimal,
    expense: Decimal,
    necessary: Decimal,
    unnecessary: Decimal,
}

impl Acc {
    fn add_expense(&mut self, amount: Decimal, necessity: Necessity) {
        self.expense = self.expense.saturating_add(amount);
        match necessity {
            Necessity::Necessary => self.necessary = self.necessary.saturating_add(amount),
            Necessity::Unnecessary => self.unnecessary = self.unnecessary.saturating_add(amount),
            Necessity::Debatable => {}
        }
    }
}

/// Income/expense per month for the `months` months ending at `anchor`.
///
/// Rows dated outside the window are ignored. Debatable expenses count toward
/// `expense` but have no per-month column of their own.
pub fn monthly_trend(transactions: &[Transaction], anchor: YearMonth, months: usize) -> Vec<MonthTrend> {
    let mut buckets = month_buckets::<Acc>(anchor, months);
    for t in transactions {
        let Some(bucket) = buckets.get_mut(&YearMonth::of(t.transaction_date)) else {
            continue;
        };
        match t.kind {
            TransactionKind::Income => bucket.income = bucket.income.saturating_add(t.amount),
            TransactionKind::Expense { necessity } => bucket.add_expense(t.amount, necessity),
        }
    }
    buckets
        .into_iter()
        .map(|(month, b)| MonthTrend {
            month,
            savings: b.income.saturating_sub(b.expense),
            income: b.income,
            expense: b.expense,
            necessary: b.necessary,
            unnecessary: b.unnecessary,
        })
        .collect()
}

/// Expense totals for every day of the month, including days without activity.
pub fn daily_spending(
    transactions: &[Transaction],
    year: i32,
    month: u32,
) -> Result<Vec<DaySpending>, EngineError> {
    let mut buckets = day_buckets::<Acc>(year, month)?;
    for t in transactions {
        let TransactionKind::Expense { necessity } = t.kind else {
            continue;
        };
        if let Some(bucket) = buckets.get_mut(&t.transaction_date) {
            bucket.add_expense(t.amount, necessity);
        }
    }
    Ok(buckets
        .into_iter()
        .map(|(date, b)| DaySpending {
            date,
            total: b.expense,
            necessary: b.necessary,
            unnecessary: b.unnecessary,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::periods::days_in_month;
    use crate::analytics::testing::{expense, income};

    fn scenario() -> Vec<Transaction> {
        vec![
            expense(1, "100", Some(1), Necessity::Necessary, "2024-03-01"),
            expense(2, "50", Some(1), Necessity::Unnecessary, "2024-03-02"),
            income(3, "500", Some(2), "2024-03-01"),
        ]
    }

    #[test]
    fn monthly_trend_for_march() {
        let anchor = YearMonth::new(2024, 3).unwrap();
        let trend = monthly_trend(&scenario(), anchor, 1);
        assert_eq!(trend.len(), 1);
        let march = &trend[0];
        assert_eq!(march.month, anchor);
        assert_eq!(march.income, Decimal::from(500));
        assert_eq!(march.expense, Decimal::from(150));
        assert_eq!(march.necessary, Decimal::from(100));
        assert_eq!(march.unnecessary, Decimal::from(50));
        assert_eq!(march.savings, Decimal::from(350));
    }

    #[test]
    fn monthly_trend_ignores_rows_outside_window_and_keeps_empty_months() {
        let mut rows = scenario();
        rows.push(expense(4, "80", Some(1), Necessity::Debatable, "2023-12-20"));
        rows.push(income(5, "1000", None, "2023-09-30"));
        rows.push(expense(6, "1", None, Necessity::Necessary, "2024-04-01"));
        let trend = monthly_trend(&rows, YearMonth::new(2024, 3).unwrap(), 6);
        let keys: Vec<String> = trend.iter().map(|m| m.month.to_string()).collect();
        assert_eq!(
            keys,
            vec!["2023-10", "2023-11", "2023-12", "2024-01", "2024-02", "2024-03"]
        );
        let dec = &trend[2];
        assert_eq!(dec.expense, Decimal::from(80));
        assert_eq!(dec.necessary + dec.unnecessary, Decimal::ZERO);
        assert_eq!(dec.savings, Decimal::from(-80));
        assert!(trend[0].income.is_zero() && trend[0].expense.is_zero());
        assert_eq!(trend[5].expense, Decimal::from(150));
    }

    #[test]
    fn daily_spending_has_a_bucket_per_day() {
        for (year, month) in [(2024, 2), (2023, 2), (2024, 3), (2024, 4)] {
            let days = daily_spending(&[], year, month).unwrap();
            assert_eq!(days.len() as u32, days_in_month(year, month).unwrap());
            assert!(days.iter().all(|d| d.total.is_zero()));
        }
    }

    #[test]
    fn daily_spending_folds_expenses_only() {
        let mut rows = scenario();
        rows.push(expense(4, "20", None, Necessity::Debatable, "2024-03-01"));
        rows.push(expense(5, "9", Some(1), Necessity::Necessary, "2024-02-29"));
        let days = daily_spending(&rows, 2024, 3).unwrap();
        assert_eq!(days.len(), 31);
        assert_eq!(days[0].date.to_string(), "2024-03-01");
        assert_eq!(days[0].total, Decimal::from(120));
        assert_eq!(days[0].necessary, Decimal::from(100));
        assert_eq!(days[0].unnecessary, Decimal::ZERO);
        assert_eq!(days[1].unnecessary, Decimal::from(50));
        assert!(days[2..].iter().all(|d| d.total.is_zero()));
    }

    #[test]
    fn daily_spending_rejects_bad_month() {
        assert!(daily_spending(&[], 2024, 0).is_err());
    }

    #[test]
    fn trend_is_deterministic() {
        let anchor = YearMonth::new(2024, 3).unwrap();
        let rows = scenario();
        assert_eq!(monthly_trend(&rows, anchor, 3), monthly_trend(&rows, anchor, 3));
    }
}
