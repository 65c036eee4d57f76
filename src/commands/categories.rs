// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engagement::store::{EngagementStore, SqliteEngagementStore};
use crate::models::{Category, TransactionType};
use crate::store;
use crate::utils::{maybe_print_json, optional, pretty_table, required};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?;
            store::add_category(
                conn,
                name,
                optional(sub, "icon").unwrap_or(""),
                optional(sub, "color").unwrap_or(""),
                sub.get_flag("essential"),
                sub.get_flag("income"),
            )?;
            println!("Added category '{}'", name);
        }
        Some(("list", sub)) => {
            let kind = optional(sub, "kind")
                .map(|k| k.parse::<TransactionType>())
                .transpose()?;
            let cats = store::list_categories(conn, kind)?;
            print_categories(sub, &cats)?;
        }
        Some(("rm", sub)) => {
            let name = required(sub, "name")?;
            let n = store::remove_category(conn, name)?;
            if n == 0 {
                println!("No category named '{}'", name);
            } else {
                println!("Removed category '{}'", name);
            }
        }
        Some(("sub-add", sub)) => {
            let parent = store::category_by_name(conn, required(sub, "category")?)?;
            let name = required(sub, "name")?;
            store::add_subcategory(conn, parent.id, name)?;
            println!("Added subcategory '{}' under '{}'", name, parent.name);
        }
        Some(("quick", sub)) => {
            let picked = quick_pick(conn, sub)?;
            print_categories(sub, &picked)?;
        }
        _ => {}
    }
    Ok(())
}

/// Most used categories of the requested type, topped up from the full list.
pub fn quick_pick(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Category>> {
    let kind = required(sub, "kind")?.parse::<TransactionType>()?;
    let limit = *sub.get_one::<usize>("limit").unwrap_or(&6);
    let cats = store::list_categories(conn, Some(kind))?;
    let usage = SqliteEngagementStore::new(conn).load_usage()?;
    Ok(usage.quick_pick(&cats, limit).into_iter().cloned().collect())
}

fn print_categories(sub: &clap::ArgMatches, cats: &[Category]) -> Result<()> {
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
        let rows = cats
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    c.transaction_type().to_string(),
                    c.icon.clone(),
                    c.color.clone(),
                    if c.is_essential { "yes".into() } else { String::new() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Type", "Icon", "Color", "Essential"], rows)
        );
    }
    Ok(())
}
