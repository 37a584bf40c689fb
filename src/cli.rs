// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command, value_parser};

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

fn polarity_arg(default: &'static str) -> Arg {
    Arg::new("polarity")
        .long("type")
        .value_parser(["income", "expense"])
        .default_value(default)
        .help("income or expense")
}

pub fn build_cli() -> Command {
    command!()
        .about("Personal income/expense ledger with a guarded running balance")
        .arg(
            Arg::new("user")
                .long("user")
                .short('u')
                .global(true)
                .help("Act as this user (defaults to the `default_user` setting)"),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Database file (defaults to $CASHTRACK_DB, then the data dir)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("username").required(true))
                        .arg(Arg::new("email").long("email").required(true)),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("title").required(true))
                        .arg(polarity_arg("income")),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("polarity")
                            .long("type")
                            .value_parser(["income", "expense"]),
                    ),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("category").required(true).help("Id or title"))
                        .arg(Arg::new("title").long("title"))
                        .arg(
                            Arg::new("polarity")
                                .long("type")
                                .value_parser(["income", "expense"]),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a category and all of its transactions")
                        .arg(Arg::new("category").required(true).help("Id or title")),
                )
                .subcommand(json_flags(
                    Command::new("show")
                        .arg(Arg::new("category").required(true).help("Id or title")),
                )),
        )
        .subcommand(
            Command::new("tx")
                .about("Record, list and remove transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("text").required(true).help("Description"))
                        .arg(
                            Arg::new("amount")
                                .required(true)
                                .allow_negative_numbers(true)
                                .help("Signed amount; the category decides the sign when given"),
                        )
                        .arg(Arg::new("category").long("category").help("Id or title"))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("YYYY-MM-DD[ HH:MM[:SS]] (UTC), defaults to now"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(
                            Arg::new("page")
                                .long("page")
                                .value_parser(value_parser!(usize))
                                .default_value("1"),
                        )
                        .arg(
                            Arg::new("page-size")
                                .long("page-size")
                                .value_parser(value_parser!(usize))
                                .help("Defaults to the `page_size` setting"),
                        ),
                ))
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(json_flags(
            Command::new("balance").about("Show the running balance"),
        ))
        .subcommand(
            Command::new("report")
                .about("Reports")
                .subcommand(json_flags(
                    Command::new("daily")
                        .arg(polarity_arg("expense"))
                        .arg(
                            Arg::new("days")
                                .long("days")
                                .value_parser(value_parser!(i64))
                                .help("Defaults to the `report_days` setting"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("by-category").arg(polarity_arg("expense")),
                ))
                .subcommand(json_flags(Command::new("totals"))),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv or json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("config")
                .about("Read or change settings")
                .subcommand(json_flags(Command::new("get")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check balances against the ledger"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn negative_amount_parses() {
        let m = build_cli().get_matches_from(["cashtrack", "tx", "add", "Coffee", "-4.50"]);
        let (_, tx) = m.subcommand().unwrap();
        let (_, add) = tx.subcommand().unwrap();
        assert_eq!(add.get_one::<String>("amount").unwrap(), "-4.50");
    }

    #[test]
    fn global_user_after_subcommand() {
        let m = build_cli().get_matches_from(["cashtrack", "balance", "--user", "blue"]);
        assert_eq!(m.get_one::<String>("user").unwrap(), "blue");
    }
}
