// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Month to report on (default: current UTC month)")
}

fn id_arg() -> Arg {
    Arg::new("id").required(true).help("Record id")
}

pub fn build_cli() -> Command {
    Command::new("pennywise")
        .about("Expenses, budgets, budget alerts and spending suggestions")
        .version(crate_version!())
        .subcommand_required(false)
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(
                    Command::new("set")
                        .about("Set a setting (backend, store_url, api_key, currency)")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(
                    Command::new("unset")
                        .about("Remove a setting")
                        .arg(Arg::new("key").required(true)),
                )
                .subcommand(Command::new("show").about("List settings").args(json_args())),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in with email and password")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account and its profile")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(
            Command::new("forgot-password")
                .about("Send a password reset email")
                .arg(Arg::new("email").long("email").required(true)),
        )
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(
            Command::new("whoami")
                .about("Show the signed-in user and profile")
                .args(json_args()),
        )
        .subcommand(
            Command::new("profile")
                .about("Update the signed-in user's profile")
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("email").long("email"))
                        .arg(Arg::new("phone").long("phone").help("Empty to clear"))
                        .arg(Arg::new("location").long("location").help("Empty to clear")),
                ),
        )
        .subcommand(
            Command::new("expense")
                .about("Record and browse expenses")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .help("Defaults to today (UTC)"),
                        )
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("shop").long("shop"))
                        .arg(Arg::new("address").long("address"))
                        .arg(Arg::new("location").long("location")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(month_arg())
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(Command::new("show").arg(id_arg()).args(json_args()))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("shop").long("shop"))
                        .arg(Arg::new("address").long("address"))
                        .arg(Arg::new("location").long("location")),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly category budgets")
                .subcommand(
                    Command::new("set")
                        .about("Create or update the allocation for a category and month")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(month_arg())
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(month_arg())
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("month")
                                .help("Every month"),
                        )
                        .args(json_args()),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(
                    Command::new("status")
                        .about("Allocated vs spent per category")
                        .arg(month_arg())
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("salary")
                .about("Salary records")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .default_value("monthly")
                                .help("daily|weekly|bi-weekly|monthly|quarterly|annual"),
                        )
                        .arg(Arg::new("start").long("start").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(Command::new("show").args(json_args()))
                .subcommand(Command::new("history").args(json_args())),
        )
        .subcommand(
            Command::new("investment")
                .about("Investment portfolio")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("type").long("type").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("rate").long("rate").help("Expected annual return, %"))
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD"))
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .default_value("one-time")
                                .help("one-time|sip"),
                        )
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("rate").long("rate"))
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("frequency").long("frequency"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(
                    Command::new("project")
                        .about("Compound each holding at its expected rate")
                        .arg(
                            Arg::new("years")
                                .long("years")
                                .default_value("5")
                                .value_parser(clap::value_parser!(u32).range(0..=100)),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Monthly overview")
                .arg(month_arg())
                .args(json_args()),
        )
        .subcommand(
            Command::new("alerts")
                .about("Exceeded budgets for the current month")
                .arg(Arg::new("category").long("category"))
                .args(json_args()),
        )
        .subcommand(
            Command::new("suggest")
                .about("Budget suggestions from the last three months")
                .args(json_args()),
        )
        .subcommand(
            Command::new("insights")
                .about("Spending summary for the last three months")
                .args(json_args()),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("expenses")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true))
                    .arg(month_arg()),
            ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for problems"))
}
