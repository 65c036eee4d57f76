// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            other => Err(EngineError::InvalidTransaction(format!(
                "unknown transaction type '{}', expected expense|income",
                other
            ))),
        }
    }
}

/// Three-valued classification carried by expenses only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Necessity {
    Necessary,
    Unnecessary,
    Debatable,
}

impl Necessity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Necessity::Necessary => "necessary",
            Necessity::Unnecessary => "unnecessary",
            Necessity::Debatable => "debatable",
        }
    }

    /// Suggested necessity for a new expense in a category.
    pub fn suggested_for(category: &Category) -> Necessity {
        if category.is_essential {
            Necessity::Necessary
        } else {
            Necessity::Unnecessary
        }
    }
}

impl fmt::Display for Necessity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Necessity {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "necessary" => Ok(Necessity::Necessary),
            "unnecessary" => Ok(Necessity::Unnecessary),
            "debatable" => Ok(Necessity::Debatable),
            other => Err(EngineError::InvalidTransaction(format!(
                "unknown necessity '{}', expected necessary|unnecessary|debatable",
                other
            ))),
        }
    }
}

/// Income never carries a necessity; expenses always do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransactionKind {
    Expense { necessity: Necessity },
    Income,
}

impl TransactionKind {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TransactionKind::Expense { .. } => TransactionType::Expense,
            TransactionKind::Income => TransactionType::Income,
        }
    }

    pub fn necessity(&self) -> Option<Necessity> {
        match self {
            TransactionKind::Expense { necessity } => Some(*necessity),
            TransactionKind::Income => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(flatten)]
    pub kind: TransactionKind,
    pub amount: Decimal, // non-negative magnitude
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub transaction_date: NaiveDate,
    pub note: Option<String>,
    pub event_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub is_essential: bool,
    pub is_income: bool,
}

impl Category {
    pub fn transaction_type(&self) -> TransactionType {
        if self.is_income {
            TransactionType::Income
        } else {
            TransactionType::Expense
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetMode {
    pub active: bool,
    pub daily_limit: Decimal,
}

impl Default for BudgetMode {
    fn default() -> Self {
        BudgetMode {
            active: false,
            daily_limit: Decimal::from(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialBalance {
    pub amount: Decimal,
}

/// The two settings keys the aggregators read. Missing keys fall back to `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    pub initial_balance: Decimal,
    pub budget_mode: BudgetMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_matches_documented_values() {
        let s = Settings::default();
        assert_eq!(s.initial_balance, Decimal::ZERO);
        assert!(!s.budget_mode.active);
        assert_eq!(s.budget_mode.daily_limit, Decimal::from(500));
    }

    #[test]
    fn parses_types_and_necessities_case_insensitively() {
        assert_eq!(" Income ".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert_eq!("DEBATABLE".parse::<Necessity>().unwrap(), Necessity::Debatable);
        assert!("transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn essential_category_suggests_necessary() {
        let mut cat = Category {
            id: 1,
            name: "Rent".into(),
            icon: "home".into(),
            color: "#333".into(),
            is_essential: true,
            is_income: false,
        };
        assert_eq!(Necessity::suggested_for(&cat), Necessity::Necessary);
        cat.is_essential = false;
        assert_eq!(Necessity::suggested_for(&cat), Necessity::Unnecessary);
    }
}
