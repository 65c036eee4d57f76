// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure aggregations over already-fetched transaction rows.
//!
//! Nothing in here touches the database or logs; the same rows always give
//! the same output.

pub mod breakdown;
pub mod periods;
pub mod snapshot;
pub mod trends;
