// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::periods::YearMonth;
use crate::commands::reports::{categories_for, daily_for, trend_for};
use crate::utils::{optional, parse_month, required, today};
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("report", sub)) => export_report(conn, sub),
        _ => Ok(()),
    }
}

fn write_out<T: Serialize>(
    fmt: &str,
    out: &str,
    headers: &[&str],
    rows: Vec<Vec<String>>,
    items: &T,
) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(headers)?;
            for row in rows {
                wtr.write_record(row)?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(())
}

fn export_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind = required(sub, "kind")?.to_lowercase();
    let fmt = required(sub, "format")?.to_lowercase();
    let out = required(sub, "out")?;
    let month = match optional(sub, "month") {
        Some(m) => parse_month(m)?,
        None => YearMonth::of(today()),
    };

    match kind.as_str() {
        "trend" => {
            let months = *sub.get_one::<usize>("months").unwrap_or(&12);
            let data = trend_for(conn, month, months)?;
            let rows = data
                .iter()
                .map(|m| {
                    vec![
                        m.month.to_string(),
                        m.income.to_string(),
                        m.expense.to_string(),
                        m.necessary.to_string(),
                        m.unnecessary.to_string(),
                        m.savings.to_string(),
                    ]
                })
                .collect();
            write_out(
                &fmt,
                out,
                &["month", "income", "expense", "necessary", "unnecessary", "savings"],
                rows,
                &data,
            )?;
        }
        "daily" => {
            let data = daily_for(conn, month)?;
            let rows = data
                .iter()
                .map(|d| {
                    vec![
                        d.date.to_string(),
                        d.total.to_string(),
                        d.necessary.to_string(),
                        d.unnecessary.to_string(),
                    ]
                })
                .collect();
            write_out(&fmt, out, &["date", "total", "necessary", "unnecessary"], rows, &data)?;
        }
        "categories" => {
            let data = categories_for(conn, sub)?;
            let rows = data
                .iter()
                .map(|r| {
                    vec![
                        r.id.map(|id| id.to_string()).unwrap_or_default(),
                        r.name.clone(),
                        r.totals.total.to_string(),
                        r.totals.necessary.to_string(),
                        r.totals.unnecessary.to_string(),
                        r.totals.debatable.to_string(),
                        r.totals.transaction_count.to_string(),
                    ]
                })
                .collect();
            write_out(
                &fmt,
                out,
                &[
                    "id",
                    "name",
                    "total",
                    "necessary",
                    "unnecessary",
                    "debatable",
                    "transaction_count",
                ],
                rows,
                &data,
            )?;
        }
        other => bail!("Unknown report kind: {} (use trend|daily|categories)", other),
    }
    println!("Exported {} report to {}", kind, out);
    Ok(())
}
