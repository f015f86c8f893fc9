// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, builder::PossibleValuesParser, value_parser};

use crate::models::Category;

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn category_arg(required: bool) -> Arg {
    let names: Vec<&'static str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    Arg::new("category")
        .long("category")
        .required(required)
        .value_parser(PossibleValuesParser::new(names))
        .ignore_case(true)
        .help("Expense category")
}

fn amount_arg(required: bool) -> Arg {
    Arg::new("amount")
        .long("amount")
        .required(required)
        .allow_hyphen_values(true)
        .help("Amount, e.g. 249.50")
}

fn description_arg() -> Arg {
    Arg::new("description")
        .long("description")
        .short('d')
        .help("Free-text description; on edit, an empty value clears it")
}

fn id_arg() -> Arg {
    Arg::new("id").long("id").required(true).help("Expense id")
}

pub fn build_cli() -> Command {
    Command::new("spendbook")
        .version(clap::crate_version!())
        .about("Personal expense tracker: record, scan, filter and summarize spending")
        .subcommand(Command::new("init").about("Create the local settings database"))
        .subcommand(
            Command::new("auth")
                .about("Manage the session token")
                .subcommand(
                    Command::new("login")
                        .about("Store a bearer token for API calls")
                        .arg(Arg::new("token").long("token").required(true)),
                )
                .subcommand(Command::new("logout").about("Forget the stored token"))
                .subcommand(Command::new("whoami").about("Show the user the token belongs to")),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change client settings")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("api_url").long("api-url").help("Backend base URL"))
                        .arg(
                            Arg::new("zone")
                                .long("zone")
                                .allow_hyphen_values(true)
                                .help("Calendar for month bucketing: local, utc or +HH:MM"),
                        )
                        .arg(
                            Arg::new("timeout")
                                .long("timeout")
                                .help("Request timeout in seconds"),
                        ),
                ),
        )
        .subcommand(
            Command::new("expense")
                .about("Record and browse expenses")
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .default_value("All")
                                .help("Category to show, or All"),
                        )
                        .arg(
                            Arg::new("search")
                                .long("search")
                                .short('s')
                                .default_value("")
                                .help("Case-insensitive text in description or category"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("add")
                        .arg(amount_arg(true))
                        .arg(category_arg(true))
                        .arg(description_arg()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(amount_arg(false))
                        .arg(category_arg(false))
                        .arg(description_arg()),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(
                    Command::new("scan")
                        .about("Upload a receipt image and record the expense it shows")
                        .arg(Arg::new("path").long("path").required(true))
                        .arg(amount_arg(false))
                        .arg(category_arg(false))
                        .arg(description_arg())
                        .arg(
                            Arg::new("dry_run")
                                .long("dry-run")
                                .action(ArgAction::SetTrue)
                                .help("Show what was read without saving"),
                        ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Totals and charts")
                .subcommand(json_flags(
                    Command::new("summary").about("This month's spend, in figures and words"),
                ))
                .subcommand(json_flags(
                    Command::new("monthly")
                        .about("Spend per month with a bar chart")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("categories").about("Spend per category"),
                )),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("expenses")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .value_parser(PossibleValuesParser::new(["csv", "json"])),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
}
