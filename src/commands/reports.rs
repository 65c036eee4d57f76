// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::breakdown::{self, BreakdownRow, NecessityTotals, TopCategory};
use crate::analytics::periods::{YearMonth, trailing_months};
use crate::analytics::snapshot::{Snapshot, snapshot};
use crate::analytics::trends::{DaySpending, MonthTrend, daily_spending, monthly_trend};
use crate::models::TransactionType;
use crate::store::{self, TransactionFilter};
use crate::utils::{
    fmt_money, maybe_print_json, optional, parse_date, parse_month, pretty_table, today,
};
use anyhow::{Context, Result, bail};
use rusqlite::Connection;

/// Widest trend window, in months.
pub const MAX_TREND_MONTHS: usize = 1200;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("snapshot", sub)) => print_snapshot(conn, sub)?,
        Some(("trend", sub)) => print_trend(conn, sub)?,
        Some(("daily", sub)) => print_daily(conn, sub)?,
        Some(("categories", sub)) => print_categories(conn, sub)?,
        Some(("top", sub)) => print_top(conn, sub)?,
        Some(("necessity", sub)) => print_necessity(conn, sub)?,
        Some(("events", sub)) => print_events(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn json_flags(sub: &clap::ArgMatches) -> (bool, bool) {
    (sub.get_flag("json"), sub.get_flag("jsonl"))
}

fn range_filter(sub: &clap::ArgMatches, kind: Option<TransactionType>) -> Result<TransactionFilter> {
    Ok(TransactionFilter {
        kind,
        date_from: optional(sub, "from").map(parse_date).transpose()?,
        date_to: optional(sub, "to").map(parse_date).transpose()?,
        ..Default::default()
    })
}

fn month_or_current(sub: &clap::ArgMatches) -> Result<YearMonth> {
    match optional(sub, "month") {
        Some(m) => parse_month(m),
        None => Ok(YearMonth::of(today())),
    }
}

fn month_filter(first: YearMonth, last: YearMonth, kind: Option<TransactionType>) -> Result<TransactionFilter> {
    let from = first
        .first_day()
        .with_context(|| format!("Invalid month {}", first))?;
    let to = last
        .succ()
        .first_day()
        .and_then(|d| d.pred_opt())
        .with_context(|| format!("Invalid month {}", last))?;
    Ok(TransactionFilter {
        kind,
        date_from: Some(from),
        date_to: Some(to),
        ..Default::default()
    })
}

pub fn snapshot_for(conn: &Connection, as_of: chrono::NaiveDate) -> Result<Snapshot> {
    let settings = store::get_settings(conn)?;
    let all = store::fetch_transactions(conn, &TransactionFilter::default())?;
    Ok(snapshot(&all, &settings, as_of))
}

pub fn trend_for(conn: &Connection, anchor: YearMonth, months: usize) -> Result<Vec<MonthTrend>> {
    if months > MAX_TREND_MONTHS {
        bail!("--months must be at most {}, got {}", MAX_TREND_MONTHS, months);
    }
    let window = trailing_months(anchor, months);
    let Some(first) = window.first().copied() else {
        return Ok(Vec::new());
    };
    let rows = store::fetch_transactions(conn, &month_filter(first, anchor, None)?)?;
    Ok(monthly_trend(&rows, anchor, months))
}

pub fn daily_for(conn: &Connection, month: YearMonth) -> Result<Vec<DaySpending>> {
    let rows = store::fetch_transactions(
        conn,
        &month_filter(month, month, Some(TransactionType::Expense))?,
    )?;
    Ok(daily_spending(&rows, month.year, month.month)?)
}

/// Category breakdown, or a subcategory breakdown when `--category` is given.
pub fn categories_for(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<BreakdownRow>> {
    let mut filter = range_filter(sub, Some(TransactionType::Expense))?;
    match optional(sub, "category") {
        Some(name) => {
            let parent = store::category_by_name(conn, name)?;
            filter.category_id = Some(parent.id);
            let rows = store::fetch_transactions(conn, &filter)?;
            let subs = store::list_subcategories(conn, parent.id)?;
            Ok(breakdown::by_subcategory(&rows, &parent, &subs))
        }
        None => {
            let rows = store::fetch_transactions(conn, &filter)?;
            let cats = store::list_categories(conn, None)?;
            Ok(breakdown::by_category(&rows, &cats))
        }
    }
}

pub fn top_for(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TopCategory>> {
    let limit = *sub.get_one::<usize>("limit").unwrap_or(&5);
    let rows = store::fetch_transactions(conn, &range_filter(sub, Some(TransactionType::Expense))?)?;
    let cats = store::list_categories(conn, None)?;
    Ok(breakdown::top_categories(&rows, &cats, limit))
}

fn print_snapshot(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let as_of = match optional(sub, "date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let snap = snapshot_for(conn, as_of)?;
    if !maybe_print_json(json_flag, jsonl_flag, &snap)? {
        let mut rows = vec![
            vec!["Balance".into(), fmt_money(&snap.balance)],
            vec!["Income today".into(), fmt_money(&snap.today_income)],
            vec!["Spent today".into(), fmt_money(&snap.today_expense)],
            vec!["Income this month".into(), fmt_money(&snap.month_income)],
            vec!["Spent this month".into(), fmt_money(&snap.month_expense)],
        ];
        if snap.budget_active {
            rows.push(vec!["Remaining today".into(), fmt_money(&snap.today_remaining)]);
        }
        let header = format!("As of {}", snap.as_of);
        println!("{}", pretty_table(&[header.as_str(), "Amount"], rows));
    }
    Ok(())
}

fn print_trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let months = *sub.get_one::<usize>("months").unwrap_or(&6);
    let data = trend_for(conn, month_or_current(sub)?, months)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|m| {
                vec![
                    m.month.to_string(),
                    fmt_money(&m.income),
                    fmt_money(&m.expense),
                    fmt_money(&m.necessary),
                    fmt_money(&m.unnecessary),
                    fmt_money(&m.savings),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Month", "Income", "Expense", "Necessary", "Unnecessary", "Savings"],
                rows
            )
        );
    }
    Ok(())
}

fn print_daily(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let data = daily_for(conn, month_or_current(sub)?)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|d| {
                vec![
                    d.date.to_string(),
                    fmt_money(&d.total),
                    fmt_money(&d.necessary),
                    fmt_money(&d.unnecessary),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Day", "Spent", "Necessary", "Unnecessary"], rows)
        );
    }
    Ok(())
}

fn breakdown_table(rows: &[BreakdownRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            vec![
                r.name.clone(),
                fmt_money(&r.totals.total),
                fmt_money(&r.totals.necessary),
                fmt_money(&r.totals.unnecessary),
                fmt_money(&r.totals.debatable),
                r.totals.transaction_count.to_string(),
            ]
        })
        .collect()
}

fn print_categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let data = categories_for(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(
                &["Category", "Total", "Necessary", "Unnecessary", "Debatable", "Count"],
                breakdown_table(&data)
            )
        );
    }
    Ok(())
}

fn print_top(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let data = top_for(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .enumerate()
            .map(|(i, t)| {
                vec![
                    (i + 1).to_string(),
                    t.name.clone(),
                    fmt_money(&t.total),
                    format!("{}%", t.percentage),
                    t.transaction_count.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["#", "Category", "Total", "Share", "Count"], rows)
        );
    }
    Ok(())
}

fn print_necessity(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let rows = store::fetch_transactions(conn, &range_filter(sub, Some(TransactionType::Expense))?)?;
    let totals: NecessityTotals = breakdown::necessity_totals(&rows);
    if !maybe_print_json(json_flag, jsonl_flag, &totals)? {
        let share = |part| format!("{}%", breakdown::percentage(part, totals.total));
        let data = vec![
            vec!["necessary".into(), fmt_money(&totals.necessary), share(totals.necessary)],
            vec!["unnecessary".into(), fmt_money(&totals.unnecessary), share(totals.unnecessary)],
            vec!["debatable".into(), fmt_money(&totals.debatable), share(totals.debatable)],
            vec!["total".into(), fmt_money(&totals.total), String::new()],
        ];
        println!("{}", pretty_table(&["Necessity", "Spent", "Share"], data));
    }
    Ok(())
}

fn print_events(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let rows = store::fetch_transactions(conn, &TransactionFilter::default())?;
    let data = breakdown::event_totals(&rows);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let names: std::collections::HashMap<i64, String> = store::list_events(conn)?
            .into_iter()
            .map(|e| (e.id, e.name))
            .collect();
        let table = data
            .iter()
            .map(|e| {
                vec![
                    names.get(&e.event_id).cloned().unwrap_or_else(|| e.event_id.to_string()),
                    fmt_money(&e.income),
                    fmt_money(&e.expense),
                    e.transaction_count.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Event", "Income", "Expense", "Count"], table)
        );
    }
    Ok(())
}
