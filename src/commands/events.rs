// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::{maybe_print_json, pretty_table, required};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?;
            store::add_event(conn, name)?;
            println!("Added event '{}'", name);
        }
        Some(("list", sub)) => {
            let events = store::list_events(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &events)? {
                let rows = events
                    .iter()
                    .map(|e| vec![e.id.to_string(), e.name.clone()])
                    .collect();
                println!("{}", pretty_table(&["Id", "Event"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
