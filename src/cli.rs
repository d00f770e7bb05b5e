// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

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
            .help("Print as JSON lines"),
    )
}

fn range_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("from")
            .long("from")
            .help("Start date (YYYY-MM-DD), inclusive"),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .help("End date (YYYY-MM-DD), inclusive"),
    )
}

fn kind_arg(required: bool) -> Arg {
    Arg::new("kind")
        .long("kind")
        .value_parser(["income", "expense"])
        .required(required)
        .help("Entry kind")
}

pub fn build_cli() -> Command {
    Command::new("tillbook")
        .about("Tillbook: multi-account bookkeeping over a hosted table store")
        .version(clap::crate_version!())
        .subcommand(
            Command::new("tx")
                .about("Record and browse income/expense entries")
                .subcommand(
                    Command::new("add")
                        .about("Record a new entry")
                        .arg(kind_arg(true))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD (default: today)"))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .required(true)
                                .help("What the entry is for"),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .help("Positive amount, in --currency units"),
                        )
                        .arg(
                            Arg::new("currency")
                                .long("currency")
                                .default_value("TRY")
                                .help("TRY or USD"),
                        )
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .default_value("cash")
                                .help("Registered account id"),
                        )
                        .arg(
                            Arg::new("rate")
                                .long("rate")
                                .help("USD/TRY rate override (default: fetched)"),
                        ),
                )
                .subcommand(json_flags(range_args(
                    Command::new("list")
                        .about("List entries, newest first")
                        .arg(kind_arg(true))
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .help("Include soft-deleted entries"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )))
                .subcommand(
                    Command::new("search")
                        .about("Search entry descriptions")
                        .arg(kind_arg(true))
                        .arg(Arg::new("term").required(true)),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Update an entry in place")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("rate").long("rate")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete an entry (soft by default, keeping the audit trail)")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("purge")
                                .long("purge")
                                .action(ArgAction::SetTrue)
                                .help("Remove the row permanently"),
                        ),
                ),
        )
        .subcommand(
            Command::new("account")
                .about("Per-account ledgers and the dashboard total")
                .subcommand(Command::new("list").about("Registered accounts"))
                .subcommand(json_flags(range_args(
                    Command::new("show")
                        .about("One account's ledger with totals")
                        .arg(Arg::new("account").required(true).help("Account id"))
                        .arg(kind_arg(false)),
                )))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a ledger entry from an account page (permanent by default)")
                        .arg(Arg::new("account").required(true))
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("soft")
                                .long("soft")
                                .action(ArgAction::SetTrue)
                                .help("Keep the row, marked inactive"),
                        ),
                )
                .subcommand(
                    Command::new("dashboard").about("All account balances and the grand total"),
                ),
        )
        .subcommand(
            Command::new("stock")
                .about("Stock inventory")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("code").long("code").required(true))
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("quantity")
                                .long("quantity")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("price").long("price").required(true))
                        .arg(
                            Arg::new("real-stock")
                                .long("real-stock")
                                .value_parser(value_parser!(i64))
                                .help("Physical stock (default: same as --quantity)"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("edit")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("name").long("name"))
                        .arg(
                            Arg::new("quantity")
                                .long("quantity")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("real-stock")
                                .long("real-stock")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("price").long("price")),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(Command::new("stats").about("Item count and total inventory value")),
        )
        .subcommand(
            Command::new("order")
                .about("Daily orders")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("code").long("code").required(true))
                        .arg(Arg::new("customer").long("customer").required(true))
                        .arg(Arg::new("product").long("product").required(true))
                        .arg(
                            Arg::new("quantity")
                                .long("quantity")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("price").long("price").required(true))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD (default: today)"))
                        .arg(
                            Arg::new("not-real")
                                .long("not-real")
                                .action(ArgAction::SetTrue)
                                .help("Do not consume physical stock"),
                        )
                        .arg(
                            Arg::new("allow-shortage")
                                .long("allow-shortage")
                                .action(ArgAction::SetTrue)
                                .help("Accept the order even if stock runs short"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("date").long("date"))
                        .arg(
                            Arg::new("today")
                                .long("today")
                                .action(ArgAction::SetTrue),
                        ),
                ))
                .subcommand(
                    Command::new("search")
                        .arg(Arg::new("term").required(true))
                        .arg(Arg::new("date").long("date")),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("customer").long("customer"))
                        .arg(Arg::new("product").long("product"))
                        .arg(
                            Arg::new("quantity")
                                .long("quantity")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("price").long("price"))
                        .arg(Arg::new("date").long("date")),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("summary")
                        .about("Order count and turnover")
                        .arg(Arg::new("date").long("date")),
                ),
        )
        .subcommand(
            Command::new("contact")
                .about("Contact references")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("phone").long("phone").required(true))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .default_value(""),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("search").arg(Arg::new("term").required(true)))
                .subcommand(
                    Command::new("edit")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("phone").long("phone").required(true))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .default_value(""),
                        ),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("password")
                .about("Stored credentials")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("platform").long("platform").required(true))
                        .arg(Arg::new("username").long("username").required(true))
                        .arg(Arg::new("password").long("password").required(true))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .default_value(""),
                        ),
                )
                .subcommand(Command::new("list"))
                .subcommand(Command::new("search").arg(Arg::new("term").required(true)))
                .subcommand(
                    Command::new("edit")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("platform").long("platform").required(true))
                        .arg(Arg::new("username").long("username").required(true))
                        .arg(Arg::new("password").long("password").required(true))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .default_value(""),
                        ),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("clear").about("Delete every stored credential").arg(
                        Arg::new("yes")
                            .long("yes")
                            .action(ArgAction::SetTrue)
                            .required(true)
                            .help("Required confirmation"),
                    ),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import shipments")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("product").long("product").required(true))
                        .arg(
                            Arg::new("quantity")
                                .long("quantity")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD (default: today)"))
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .default_value("in customs"),
                        )
                        .arg(Arg::new("sub-status").long("sub-status").default_value(""))
                        .arg(Arg::new("notes").long("notes").default_value("")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("edit")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("product").long("product"))
                        .arg(
                            Arg::new("quantity")
                                .long("quantity")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("status").long("status"))
                        .arg(Arg::new("sub-status").long("sub-status"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("user")
                .about("Users and sign-in")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("username").long("username").required(true))
                        .arg(Arg::new("password").long("password").required(true))
                        .arg(
                            Arg::new("role")
                                .long("role")
                                .value_parser(["admin", "personnel", "observer"])
                                .default_value("personnel"),
                        ),
                )
                .subcommand(
                    Command::new("login")
                        .about("Verify credentials and show the granted role")
                        .arg(Arg::new("username").long("username").required(true))
                        .arg(Arg::new("password").long("password").required(true)),
                ),
        )
        .subcommand(
            Command::new("fx").about("Exchange rates").subcommand(
                Command::new("rate").about("Current USD/TRY rate (fetched, with fallback)"),
            ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data to files")
                .subcommand(range_args(
                    Command::new("transactions")
                        .arg(kind_arg(false))
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )),
        )
        .subcommand(Command::new("doctor").about("Check backend connectivity and configuration"))
}
