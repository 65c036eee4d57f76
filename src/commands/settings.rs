// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::{fmt_money, maybe_print_json, optional, parse_decimal, pretty_table, required};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let s = store::get_settings(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
                let rows = vec![
                    vec!["initial_balance".into(), fmt_money(&s.initial_balance)],
                    vec!["budget_mode.active".into(), s.budget_mode.active.to_string()],
                    vec![
                        "budget_mode.daily_limit".into(),
                        fmt_money(&s.budget_mode.daily_limit),
                    ],
                ];
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        Some(("set-balance", sub)) => {
            let amount = parse_decimal(required(sub, "amount")?)?;
            store::set_initial_balance(conn, amount)?;
            println!("Initial balance set to {}", fmt_money(&amount));
        }
        Some(("budget", sub)) => {
            let mut mode = store::get_settings(conn)?.budget_mode;
            if sub.get_flag("on") {
                mode.active = true;
            }
            if sub.get_flag("off") {
                mode.active = false;
            }
            if let Some(limit) = optional(sub, "limit") {
                mode.daily_limit = parse_decimal(limit)?;
            }
            store::set_budget_mode(conn, &mode)?;
            println!(
                "Budget mode {} (daily limit {})",
                if mode.active { "on" } else { "off" },
                fmt_money(&mode.daily_limit)
            );
        }
        _ => {}
    }
    Ok(())
}
