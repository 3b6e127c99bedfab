// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn reference_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand(
            Command::new("add")
                .about("Add an item")
                .arg(Arg::new("name").long("name").required(true)),
        )
        .subcommand(json_args(Command::new("list").about("List items by name")))
        .subcommand(
            Command::new("rename")
                .about("Rename an item")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .help("Item id or current name"),
                )
                .arg(Arg::new("name").long("name").required(true)),
        )
        .subcommand(
            Command::new("rm").about("Remove an unused item").arg(
                Arg::new("id")
                    .long("id")
                    .required(true)
                    .help("Item id or name"),
            ),
        )
}

fn exec_arg() -> Arg {
    Arg::new("exec")
        .long("exec")
        .action(ArgAction::Append)
        .help("method=NAME,market=NAME,stake=D,odd=D,result=D[,exit=D,minutes=D,plan=yes|no,emotion=L,entry=L,reason=TEXT,grade=L]")
}

fn fixture_args(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("date")
            .long("date")
            .required(required)
            .help("Match date YYYY-MM-DD"),
    )
    .arg(
        Arg::new("time")
            .long("time")
            .required(required)
            .help("Kick-off HH:MM"),
    )
    .arg(Arg::new("competition").long("competition").required(required))
    .arg(Arg::new("home").long("home").required(required))
    .arg(Arg::new("away").long("away").required(required))
}

fn assessment_args(cmd: Command) -> Command {
    let position = |id: &'static str| {
        Arg::new(id)
            .long(id)
            .value_parser(value_parser!(u8).range(1..=99))
            .help("League position")
    };
    let mut cmd = cmd.arg(position("class-home")).arg(position("class-away"));
    for id in [
        "momentum-home",
        "momentum-away",
        "must-win-home",
        "must-win-away",
        "importance-home",
        "importance-away",
        "absences-home",
        "absences-away",
        "trend",
        "matchup",
        "value",
        "highlight",
    ] {
        cmd = cmd.arg(Arg::new(id).long(id));
    }
    cmd
}

fn trading_cmd() -> Command {
    Command::new("trading")
        .about("Pre-analyses and operations")
        .subcommand(
            assessment_args(fixture_args(
                Command::new("new").about("Record a pre-analysis or an operation"),
                true,
            ))
            .arg(
                Arg::new("mode")
                    .long("mode")
                    .value_parser(["pre", "op"])
                    .default_value("pre"),
            )
            .arg(exec_arg()),
        )
        .subcommand(
            assessment_args(fixture_args(
                Command::new("edit").about("Edit a record; --exec replaces all executions"),
                false,
            ))
            .arg(Arg::new("id").long("id").required(true))
            .arg(exec_arg()),
        )
        .subcommand(
            Command::new("convert")
                .about("Turn a pre-analysis into an operation")
                .arg(Arg::new("id").long("id").required(true))
                .arg(exec_arg().required(true)),
        )
        .subcommand(
            Command::new("conclude")
                .about("Settle an operation")
                .arg(Arg::new("id").long("id").required(true)),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a record that is not concluded")
                .arg(Arg::new("id").long("id").required(true)),
        )
        .subcommand(
            Command::new("archive")
                .about("Archive every stale pre-analysis")
                .arg(
                    Arg::new("justification")
                        .long("justification")
                        .help("Why it was not operated (first 50 characters kept)"),
                ),
        )
        .subcommand(json_args(
            Command::new("list")
                .about("List pre-analyses or operations")
                .long_about(
                    "List pre-analyses or operations.\n\nListing pre-analyses first archives \
                     every stale one, recording --justification (empty when omitted).",
                )
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .value_parser(["pre", "op"])
                        .default_value("pre"),
                )
                .arg(Arg::new("competition").long("competition"))
                .arg(
                    Arg::new("justification")
                        .long("justification")
                        .help("Reason recorded on pre-analyses archived by this listing"),
                ),
        ))
        .subcommand(
            Command::new("show")
                .about("Show a record and its audit log")
                .arg(Arg::new("id").long("id").required(true))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue),
                ),
        )
}

pub fn build_cli() -> Command {
    Command::new("betjournal")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Pre-match analysis and betting operations journal")
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(reference_cmd("team", "Teams"))
        .subcommand(reference_cmd("competition", "Competitions"))
        .subcommand(reference_cmd("market", "Markets"))
        .subcommand(reference_cmd("method", "Methods"))
        .subcommand(trading_cmd())
        .subcommand(json_args(
            Command::new("report")
                .about("Performance of concluded operations")
                .arg(Arg::new("competition").long("competition"))
                .arg(Arg::new("market").long("market"))
                .arg(Arg::new("method").long("method"))
                .arg(Arg::new("from").long("from").help("First match date YYYY-MM-DD"))
                .arg(Arg::new("to").long("to").help("Last match date YYYY-MM-DD")),
        ))
        .subcommand(
            Command::new("dashboard")
                .about("Overall summary")
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("executions")
                        .about("Executions of concluded operations")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check journal integrity"))
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set-user")
                        .about("User recorded in audit entries")
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(
                    Command::new("set-currency")
                        .about("Currency symbol for printed amounts")
                        .arg(Arg::new("symbol").long("symbol").required(true)),
                ),
        )
}
