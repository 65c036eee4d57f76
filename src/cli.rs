// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Command, arg, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print JSON"))
        .arg(arg!(--jsonl "Print one JSON object per line"))
}

pub fn build_cli() -> Command {
    Command::new("pocketpulse")
        .about("Personal finance tracker: balances, trends, spending breakdowns and logging streaks")
        .version(clap::crate_version!())
        .arg(
            arg!(--db <PATH> "SQLite database file")
                .env("POCKETPULSE_DB")
                .global(true),
        )
        .arg(arg!(-v --verbose "Debug logging on stderr").global(true))
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--icon <ICON>))
                        .arg(arg!(--color <COLOR>))
                        .arg(arg!(--essential "Suggest 'necessary' for expenses"))
                        .arg(arg!(--income "Category for income transactions")),
                )
                .subcommand(json_args(
                    Command::new("list").arg(arg!(--kind <KIND> "expense|income")),
                ))
                .subcommand(Command::new("rm").arg(arg!(--name <NAME>).required(true)))
                .subcommand(
                    Command::new("sub-add")
                        .arg(arg!(--category <CATEGORY>).required(true))
                        .arg(arg!(--name <NAME>).required(true)),
                )
                .subcommand(json_args(
                    Command::new("quick")
                        .about("Most used categories for quick entry")
                        .arg(arg!(--kind <KIND> "expense|income").default_value("expense"))
                        .arg(
                            arg!(--limit <N>)
                                .value_parser(value_parser!(usize))
                                .default_value("6"),
                        ),
                )),
        )
        .subcommand(
            Command::new("event")
                .about("Manage event groupings")
                .subcommand(Command::new("add").arg(arg!(--name <NAME>).required(true)))
                .subcommand(json_args(Command::new("list"))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(json_args(
                    Command::new("add")
                        .arg(arg!(--kind <KIND> "expense|income").default_value("expense"))
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--category <CATEGORY>).required(true))
                        .arg(arg!(--subcategory <SUBCATEGORY>))
                        .arg(arg!(--necessity <NECESSITY> "necessary|unnecessary|debatable"))
                        .arg(arg!(--date <DATE> "YYYY-MM-DD, defaults to today"))
                        .arg(arg!(--note <NOTE>))
                        .arg(arg!(--event <EVENT>)),
                ))
                .subcommand(json_args(
                    Command::new("list")
                        .arg(arg!(--kind <KIND>))
                        .arg(arg!(--category <CATEGORY>))
                        .arg(arg!(--from <DATE>))
                        .arg(arg!(--to <DATE>))
                        .arg(arg!(--limit <N>).value_parser(value_parser!(usize))),
                )),
        )
        .subcommand(
            Command::new("settings")
                .about("Initial balance and budget mode")
                .subcommand(json_args(Command::new("show")))
                .subcommand(
                    Command::new("set-balance").arg(arg!(--amount <AMOUNT>).required(true)),
                )
                .subcommand(
                    Command::new("budget")
                        .arg(arg!(--on "Enable budget mode").conflicts_with("off"))
                        .arg(arg!(--off "Disable budget mode"))
                        .arg(arg!(--limit <AMOUNT> "Daily spending limit")),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated views")
                .subcommand(json_args(
                    Command::new("snapshot").arg(arg!(--date <DATE> "Defaults to today")),
                ))
                .subcommand(json_args(
                    Command::new("trend")
                        .arg(
                            arg!(--months <N>)
                                .value_parser(value_parser!(usize))
                                .default_value("6"),
                        )
                        .arg(arg!(--month <MONTH> "Last month shown, YYYY-MM")),
                ))
                .subcommand(json_args(
                    Command::new("daily").arg(arg!(--month <MONTH> "YYYY-MM")),
                ))
                .subcommand(json_args(
                    Command::new("categories")
                        .arg(arg!(--from <DATE>))
                        .arg(arg!(--to <DATE>))
                        .arg(arg!(--category <CATEGORY> "Break one category down by subcategory")),
                ))
                .subcommand(json_args(
                    Command::new("top")
                        .arg(arg!(--from <DATE>))
                        .arg(arg!(--to <DATE>))
                        .arg(
                            arg!(--limit <N>)
                                .value_parser(value_parser!(usize))
                                .default_value("5"),
                        ),
                ))
                .subcommand(json_args(
                    Command::new("necessity")
                        .arg(arg!(--from <DATE>))
                        .arg(arg!(--to <DATE>)),
                ))
                .subcommand(json_args(Command::new("events"))),
        )
        .subcommand(
            Command::new("streak")
                .about("Logging streak")
                .subcommand(json_args(Command::new("show")))
                .subcommand(Command::new("reset").arg(arg!(--yes "Confirm the reset"))),
        )
        .subcommand(
            Command::new("export")
                .about("Write reports to a file")
                .subcommand(
                    Command::new("report")
                        .arg(arg!(--kind <KIND> "trend|daily|categories").required(true))
                        .arg(arg!(--format <FORMAT> "csv|json").default_value("csv"))
                        .arg(arg!(--out <PATH>).required(true))
                        .arg(arg!(--month <MONTH> "YYYY-MM"))
                        .arg(
                            arg!(--months <N>)
                                .value_parser(value_parser!(usize))
                                .default_value("12"),
                        )
                        .arg(arg!(--from <DATE>))
                        .arg(arg!(--to <DATE>))
                        .arg(arg!(--category <CATEGORY>)),
                ),
        )
}
