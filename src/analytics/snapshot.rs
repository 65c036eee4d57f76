// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::periods::YearMonth;
use crate::models::{Settings, Transaction, TransactionKind};

/// Point-in-time view of the ledger as seen on `as_of`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub as_of: NaiveDate,
    pub balance: Decimal,
    pub today_income: Decimal,
    pub today_expense: Decimal,
    pub month_income: Decimal,
    pub month_expense: Decimal,
    pub budget_active: bool,
    pub daily_limit: Decimal,
    /// Negative when today's spending exceeds the limit.
    pub today_remaining: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Sums {
    income: Decimal,
    expense: Decimal,
}

impl Sums {
    fn add(&mut self, t: &Transaction) {
        match t.kind {
            TransactionKind::Income => self.income = self.income.saturating_add(t.amount),
            TransactionKind::Expense { .. } => self.expense = self.expense.saturating_add(t.amount),
        }
    }
}

/// Sums saturate at the `Decimal` bounds instead of overflowing.
fn net(initial: Decimal, sums: &Sums) -> Decimal {
    initial.saturating_add(sums.income).saturating_sub(sums.expense)
}

/// `initial + Σincome − Σexpense` over every row, regardless of date.
pub fn balance(initial: Decimal, transactions: &[Transaction]) -> Decimal {
    let mut sums = Sums::default();
    for t in transactions {
        sums.add(t);
    }
    net(initial, &sums)
}

/// Builds the snapshot from the full transaction log. Today's and this
/// month's sums are taken from the rows dated `today` / in `today`'s month.
pub fn snapshot(transactions: &[Transaction], settings: &Settings, today: NaiveDate) -> Snapshot {
    let month = YearMonth::of(today);
    let mut all = Sums::default();
    let mut day = Sums::default();
    let mut mon = Sums::default();
    for t in transactions {
        all.add(t);
        if t.transaction_date == today {
            day.add(t);
        }
        if month.contains(t.transaction_date) {
            mon.add(t);
        }
    }
    let limit = settings.budget_mode.daily_limit;
    Snapshot {
        as_of: today,
        balance: net(settings.initial_balance, &all),
        today_income: day.income,
        today_expense: day.expense,
        month_income: mon.income,
        month_expense: mon.expense,
        budget_active: settings.budget_mode.active,
        daily_limit: limit,
        today_remaining: limit.saturating_sub(day.expense),
    }
}
