// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar buckets built without looking at any transactions.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

use crate::error::EngineError;

/// A calendar month. Orders chronologically and displays as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, EngineError> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(EngineError::InvalidMonth { year, month });
        }
        Ok(YearMonth { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn pred(&self) -> Self {
        if self.month == 1 {
            YearMonth {
                year: self.year - 1,
                month: 12,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn succ(&self) -> Self {
        if self.month == 12 {
            YearMonth {
                year: self.year + 1,
                month: 1,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32, EngineError> {
    let ym = YearMonth::new(year, month)?;
    let next = ym
        .succ()
        .first_day()
        .ok_or(EngineError::InvalidMonth { year, month })?;
    Ok(next.pred_opt().map(|d| d.day()).unwrap_or(31))
}

/// Every calendar day of the month, in order.
pub fn month_days(year: i32, month: u32) -> Result<Vec<NaiveDate>, EngineError> {
    let last = days_in_month(year, month)?;
    (1..=last)
        .map(|d| NaiveDate::from_ymd_opt(year, month, d).ok_or(EngineError::InvalidMonth { year, month }))
        .collect()
}

/// `count` consecutive months ending at `anchor` (inclusive), oldest first.
/// The window stops early at the first month chrono cannot represent.
pub fn trailing_months(anchor: YearMonth, count: usize) -> Vec<YearMonth> {
    let mut months = Vec::new();
    let mut cur = anchor;
    while months.len() < count && cur.first_day().is_some() {
        months.push(cur);
        cur = cur.pred();
    }
    months.reverse();
    months
}

/// One zeroed accumulator per day of the month.
pub fn day_buckets<A: Default>(year: i32, month: u32) -> Result<BTreeMap<NaiveDate, A>, EngineError> {
    Ok(month_days(year, month)?
        .into_iter()
        .map(|d| (d, A::default()))
        .collect())
}

/// One zeroed accumulator per trailing month.
pub fn month_buckets<A: Default>(anchor: YearMonth, count: usize) -> BTreeMap<YearMonth, A> {
    trailing_months(anchor, count)
        .into_iter()
        .map(|m| (m, A::default()))
        .collect()
}
