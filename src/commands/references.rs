// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::Journal;
use crate::db::SqliteStore;
use crate::models::ReferenceKind;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};

pub fn handle(journal: &Journal<SqliteStore>, kind: &str, m: &clap::ArgMatches) -> Result<()> {
    let kind: ReferenceKind = kind.parse().map_err(|e: String| anyhow!(e))?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let item = journal.add_item(kind, name)?;
            println!("Added {} '{}' ({})", kind.label().to_lowercase(), item.nome, item.id);
        }
        Some(("list", sub)) => {
            let items = journal.list_items(kind)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
                let rows = items
                    .into_iter()
                    .map(|i| vec![i.nome, i.id])
                    .collect();
                println!("{}", pretty_table(&[kind.label(), "ID"], rows));
            }
        }
        Some(("rename", sub)) => {
            let key = sub.get_one::<String>("id").unwrap();
            let name = sub.get_one::<String>("name").unwrap();
            let item = journal.resolve_item(kind, key)?;
            journal.rename_item(kind, &item.id, name)?;
            println!("Renamed '{}' to '{}'", item.nome, name.trim());
        }
        Some(("rm", sub)) => {
            let key = sub.get_one::<String>("id").unwrap();
            let item = journal.resolve_item(kind, key)?;
            journal.remove_item(kind, &item.id)?;
            println!("Removed {} '{}'", kind.label().to_lowercase(), item.nome);
        }
        _ => {}
    }
    Ok(())
}
