// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use betjournal::{Journal, cli, commands, db, utils};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let store = db::open_or_init()?;
    let user = utils::get_audit_user(store.conn())?;
    let journal = Journal::new(store).with_user(user);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some((name @ ("team" | "competition" | "market" | "method"), sub)) => {
            commands::references::handle(&journal, name, sub)?
        }
        Some(("trading", sub)) => commands::tradings::handle(&journal, sub)?,
        Some(("report", sub)) => commands::reports::report(&journal, sub)?,
        Some(("dashboard", sub)) => commands::reports::dashboard(&journal, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&journal, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&journal)?,
        Some(("config", sub)) => commands::settings::handle(journal.store().conn(), sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
