// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod events;
pub mod transactions;
pub mod settings;
pub mod reports;
pub mod streak;
pub mod exporter;
