// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },
    #[error("Category '{0}' not found")]
    UnknownCategory(String),
    #[error("Subcategory {subcategory} does not belong to category {category}")]
    SubcategoryMismatch { subcategory: i64, category: i64 },
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
}
