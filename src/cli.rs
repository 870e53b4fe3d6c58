// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

/// Upper bound for `--installments` and `--count` (30 years of monthly entries).
pub const MAX_SERIES: i64 = 360;

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
            .help("Print one JSON object per line"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id").long("id").required(true).help("Record id")
}

fn rm_cmd(what: &str) -> Command {
    Command::new("rm")
        .about(format!("Delete a {what}"))
        .arg(id_arg())
}

fn observations_arg() -> Arg {
    Arg::new("observations")
        .long("observations")
        .help("Free-form note; an empty value clears it on edit")
}

/// Options shared by payables and receivables. `party` is the flag naming
/// the counterpart ("supplier" or "client").
fn due_entry_cmds(party: &'static str, noun: &str) -> Vec<Command> {
    let add = Command::new("add")
        .about(format!("Add a {noun}"))
        .arg(
            Arg::new(party)
                .long(party)
                .required(true)
                .help("Name or id of the counterpart"),
        )
        .arg(
            Arg::new("category")
                .long("category")
                .required(true)
                .help("Category name or id"),
        )
        .arg(Arg::new("value").long("value").required(true))
        .arg(
            Arg::new("due")
                .long("due")
                .required(true)
                .help("Due date YYYY-MM-DD"),
        )
        .arg(observations_arg())
        .arg(
            Arg::new("installments")
                .long("installments")
                .value_parser(value_parser!(u32).range(2..=MAX_SERIES))
                .conflicts_with("recurrence")
                .help("Split into N monthly installments"),
        )
        .arg(
            Arg::new("recurrence")
                .long("recurrence")
                .help("Repeat: weekly|monthly|yearly"),
        )
        .arg(
            Arg::new("count")
                .long("count")
                .value_parser(value_parser!(u32).range(1..=MAX_SERIES))
                .requires("recurrence")
                .help("Number of occurrences for --recurrence"),
        );
    let list = json_flags(
        Command::new("list")
            .about(format!("List {noun}s"))
            .arg(
                Arg::new("open")
                    .long("open")
                    .action(ArgAction::SetTrue)
                    .help("Only entries not yet settled"),
            ),
    );
    let edit = Command::new("edit")
        .about(format!("Change fields of a {noun}"))
        .arg(id_arg())
        .arg(Arg::new(party).long(party))
        .arg(Arg::new("category").long("category"))
        .arg(Arg::new("value").long("value"))
        .arg(Arg::new("due").long("due"))
        .arg(observations_arg());
    vec![add, list, edit, rm_cmd(noun)]
}

fn settle_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name).about(about).arg(id_arg()).arg(
        Arg::new("date")
            .long("date")
            .help("Settlement date YYYY-MM-DD (default: today)"),
    )
}

pub fn build_cli() -> Command {
    Command::new("vibefin")
        .about("Track accounts, payables, receivables and transactions")
        .version(clap::crate_version!())
        .arg(
            Arg::new("offline")
                .long("offline")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Use the local store even when a backend is configured"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to vibefin.toml"),
        )
        .subcommand(Command::new("init").about("Show where configuration and data live"))
        .subcommand(
            Command::new("account")
                .about("Bank, cash, till and card accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("bank|cash|till|card"),
                        )
                        .arg(
                            Arg::new("initial-balance")
                                .long("initial-balance")
                                .default_value("0"),
                        )
                        .arg(
                            Arg::new("current-balance")
                                .long("current-balance")
                                .help("Defaults to the initial balance"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("initial-balance").long("initial-balance"))
                        .arg(Arg::new("current-balance").long("current-balance")),
                )
                .subcommand(rm_cmd("account")),
        )
        .subcommand(
            Command::new("category")
                .about("Income and expense categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("income|expense"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(Arg::new("type").long("type")),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("type").long("type")),
                )
                .subcommand(rm_cmd("category")),
        )
        .subcommand(
            Command::new("contact")
                .about("Clients and suppliers")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("client|supplier"),
                        )
                        .arg(observations_arg()),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(Arg::new("type").long("type")),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("type").long("type"))
                        .arg(observations_arg()),
                )
                .subcommand(rm_cmd("contact")),
        )
        .subcommand(
            Command::new("payable")
                .about("Bills to pay")
                .subcommands(due_entry_cmds("supplier", "payable"))
                .subcommand(settle_cmd("pay", "Mark as paid and record the expense"))
                .subcommand(
                    Command::new("unpay")
                        .about("Mark as unpaid again")
                        .arg(id_arg()),
                ),
        )
        .subcommand(
            Command::new("receivable")
                .about("Amounts to receive")
                .subcommands(due_entry_cmds("client", "receivable"))
                .subcommand(settle_cmd(
                    "receive",
                    "Mark as received and record the income",
                ))
                .subcommand(
                    Command::new("unreceive")
                        .about("Mark as not received again")
                        .arg(id_arg()),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("income|expense"),
                        )
                        .arg(
                            Arg::new("party")
                                .long("party")
                                .required(true)
                                .help("Client/supplier name or id"),
                        )
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("value").long("value").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("Payment date YYYY-MM-DD (default: today)"),
                        )
                        .arg(observations_arg()),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("type").long("type"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("party").long("party"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("value").long("value"))
                        .arg(Arg::new("date").long("date"))
                        .arg(observations_arg()),
                )
                .subcommand(rm_cmd("transaction")),
        )
        .subcommand(json_flags(
            Command::new("summary").about("Open balances and cash flow"),
        ))
}
