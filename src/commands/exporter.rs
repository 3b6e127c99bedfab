// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::Journal;
use crate::db::SqliteStore;
use crate::models::ReferenceKind;
use crate::report::concluded_operations;
use anyhow::{Context, Result};
use serde::Serialize;

pub fn handle(journal: &Journal<SqliteStore>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("executions", sub)) => export_executions(journal, sub),
        _ => Ok(()),
    }
}

#[derive(Debug, Serialize)]
pub struct ExecutionRow {
    pub trading_id: String,
    pub date: String,
    pub competition: String,
    pub home: String,
    pub away: String,
    pub method: String,
    pub market: String,
    pub stake: String,
    pub odd_entrada: String,
    pub odd_saida: String,
    pub resultado_financeiro: String,
    pub seguiu_plano: bool,
    pub estado_emocional: String,
    pub motivacao_entrada: String,
    pub autoavaliacao: String,
}

/// One row per execution of every concluded operation, oldest match first.
pub fn execution_rows(journal: &Journal<SqliteStore>) -> Result<Vec<ExecutionRow>> {
    let labels = journal.labels()?;
    let tradings = journal.list_tradings()?;
    let mut ops: Vec<_> = concluded_operations(&tradings).collect();
    ops.sort_by_key(|t| (t.fixture.data_jogo, t.fixture.hora_jogo));
    let mut rows = Vec::new();
    for t in ops {
        for e in t.executions() {
            rows.push(ExecutionRow {
                trading_id: t.id.clone(),
                date: t.fixture.data_jogo.to_string(),
                competition: labels.name(ReferenceKind::Competition, &t.fixture.id_competicao),
                home: labels.name(ReferenceKind::Team, &t.fixture.id_equipe_casa),
                away: labels.name(ReferenceKind::Team, &t.fixture.id_equipe_fora),
                method: labels.name(ReferenceKind::Method, &e.method_id),
                market: labels.name(ReferenceKind::Market, &e.market_id),
                stake: e.stake.to_string(),
                odd_entrada: e.odd_entrada.to_string(),
                odd_saida: e.odd_saida.map(|d| d.to_string()).unwrap_or_default(),
                resultado_financeiro: e.result_or_zero().to_string(),
                seguiu_plano: e.seguiu_plano,
                estado_emocional: e.estado_emocional.to_string(),
                motivacao_entrada: e.motivacao_entrada.to_string(),
                autoavaliacao: e.autoavaliacao.to_string(),
            });
        }
    }
    Ok(rows)
}

fn export_executions(journal: &Journal<SqliteStore>, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    let rows = execution_rows(journal)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr =
                csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
            for row in &rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)
                .with_context(|| format!("Write {}", out))?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} executions to {}", rows.len(), out);
    Ok(())
}
