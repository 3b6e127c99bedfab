// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::Journal;
use crate::db::SqliteStore;
use crate::models::{
    Fixture, MethodExecution, NewTrading, PreAnalysis, ReferenceKind, Stage, Trading,
};
use crate::report::Labels;
use crate::utils::{
    fmt_money, get_currency_symbol, maybe_print_json, parse_date, parse_decimal, parse_time,
    pretty_table,
};
use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use std::str::FromStr;

pub fn handle(journal: &Journal<SqliteStore>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("new", sub)) => new(journal, sub)?,
        Some(("edit", sub)) => edit(journal, sub)?,
        Some(("convert", sub)) => convert(journal, sub)?,
        Some(("conclude", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            journal.conclude_trading(id)?;
            println!("Concluded operation {}", id);
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            journal.delete_trading(id)?;
            println!("Deleted trading record {}", id);
        }
        Some(("archive", sub)) => {
            let archived = archive(journal, sub)?;
            println!("Archived {} stale pre-analyses", archived.len());
        }
        Some(("list", sub)) => list(journal, sub)?,
        Some(("show", sub)) => show(journal, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_opt<T: FromStr<Err = String>>(sub: &clap::ArgMatches, id: &str) -> Result<Option<T>> {
    match sub.get_one::<String>(id) {
        Some(raw) => Ok(Some(raw.parse::<T>().map_err(|e| anyhow!(e))?)),
        None => Ok(None),
    }
}

fn resolve_id(journal: &Journal<SqliteStore>, kind: ReferenceKind, key: &str) -> Result<String> {
    Ok(journal.resolve_item(kind, key)?.id)
}

fn fixture_from(journal: &Journal<SqliteStore>, sub: &clap::ArgMatches) -> Result<Fixture> {
    let arg = |id: &str| sub.get_one::<String>(id).unwrap();
    Ok(Fixture {
        data_jogo: parse_date(arg("date"))?,
        hora_jogo: parse_time(arg("time"))?,
        id_competicao: resolve_id(journal, ReferenceKind::Competition, arg("competition"))?,
        id_equipe_casa: resolve_id(journal, ReferenceKind::Team, arg("home"))?,
        id_equipe_fora: resolve_id(journal, ReferenceKind::Team, arg("away"))?,
    })
}

/// Overlays the fixture arguments present in `sub` onto `fixture`.
fn edit_fixture(
    journal: &Journal<SqliteStore>,
    sub: &clap::ArgMatches,
    fixture: &mut Fixture,
) -> Result<()> {
    if let Some(d) = sub.get_one::<String>("date") {
        fixture.data_jogo = parse_date(d)?;
    }
    if let Some(t) = sub.get_one::<String>("time") {
        fixture.hora_jogo = parse_time(t)?;
    }
    if let Some(c) = sub.get_one::<String>("competition") {
        fixture.id_competicao = resolve_id(journal, ReferenceKind::Competition, c)?;
    }
    if let Some(h) = sub.get_one::<String>("home") {
        fixture.id_equipe_casa = resolve_id(journal, ReferenceKind::Team, h)?;
    }
    if let Some(a) = sub.get_one::<String>("away") {
        fixture.id_equipe_fora = resolve_id(journal, ReferenceKind::Team, a)?;
    }
    Ok(())
}

/// Overlays the assessment arguments present in `sub` onto `a`.
fn edit_assessment(sub: &clap::ArgMatches, a: &mut PreAnalysis) -> Result<()> {
    if let Some(v) = sub.get_one::<u8>("class-home") {
        a.classificacao_m = Some(*v);
    }
    if let Some(v) = sub.get_one::<u8>("class-away") {
        a.classificacao_v = Some(*v);
    }
    a.momento_m = parse_opt(sub, "momentum-home")?.or(a.momento_m);
    a.momento_v = parse_opt(sub, "momentum-away")?.or(a.momento_v);
    a.must_win_m = parse_opt(sub, "must-win-home")?.or(a.must_win_m);
    a.must_win_v = parse_opt(sub, "must-win-away")?.or(a.must_win_v);
    a.importancia_prox_partida_m =
        parse_opt(sub, "importance-home")?.or(a.importancia_prox_partida_m);
    a.importancia_prox_partida_v =
        parse_opt(sub, "importance-away")?.or(a.importancia_prox_partida_v);
    a.desfalques_m = parse_opt(sub, "absences-home")?.or(a.desfalques_m);
    a.desfalques_v = parse_opt(sub, "absences-away")?.or(a.desfalques_v);
    a.tendencia_esperada = parse_opt(sub, "trend")?.or(a.tendencia_esperada);
    a.situacao_casa_fora = parse_opt(sub, "matchup")?.or(a.situacao_casa_fora);
    a.valor_potencial = parse_opt(sub, "value")?.or(a.valor_potencial);
    if let Some(h) = sub.get_one::<String>("highlight") {
        let h = h.trim();
        a.destaque_essencial = (!h.is_empty()).then(|| h.to_string());
    }
    Ok(())
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "sim" => Ok(true),
        "no" | "n" | "false" | "0" | "nao" | "não" => Ok(false),
        other => bail!("Invalid yes/no value '{}'", other),
    }
}

/// Parses one `--exec key=value,...` execution, resolving method and market names.
pub fn parse_exec(journal: &Journal<SqliteStore>, spec: &str) -> Result<MethodExecution> {
    let mut method = None;
    let mut market = None;
    let mut stake = None;
    let mut odd = None;
    let mut exec = MethodExecution::new("", "", Default::default(), Default::default());
    for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = part
            .split_once('=')
            .with_context(|| format!("Expected key=value in execution '{}'", part))?;
        let value = value.trim();
        match key.trim() {
            "method" => method = Some(resolve_id(journal, ReferenceKind::Method, value)?),
            "market" => market = Some(resolve_id(journal, ReferenceKind::Market, value)?),
            "stake" => stake = Some(parse_decimal(value)?),
            "odd" => odd = Some(parse_decimal(value)?),
            "result" => exec.resultado_financeiro = Some(parse_decimal(value)?),
            "exit" => exec.odd_saida = Some(parse_decimal(value)?),
            "minutes" => exec.tempo_exposicao = Some(parse_decimal(value)?),
            "plan" => exec.seguiu_plano = parse_bool(value)?,
            "emotion" => exec.estado_emocional = value.parse().map_err(|e: String| anyhow!(e))?,
            "entry" => exec.motivacao_entrada = value.parse().map_err(|e: String| anyhow!(e))?,
            "grade" => exec.autoavaliacao = value.parse().map_err(|e: String| anyhow!(e))?,
            "reason" => exec.motivacao_saida = (!value.is_empty()).then(|| value.to_string()),
            other => bail!("Unknown execution field '{}'", other),
        }
    }
    exec.method_id = method.with_context(|| format!("Execution '{}' needs method=", spec))?;
    exec.market_id = market.with_context(|| format!("Execution '{}' needs market=", spec))?;
    exec.stake = stake.with_context(|| format!("Execution '{}' needs stake=", spec))?;
    exec.odd_entrada = odd.with_context(|| format!("Execution '{}' needs odd=", spec))?;
    Ok(exec)
}

fn executions_from(
    journal: &Journal<SqliteStore>,
    sub: &clap::ArgMatches,
) -> Result<Option<Vec<MethodExecution>>> {
    match sub.get_many::<String>("exec") {
        Some(specs) => Ok(Some(
            specs
                .map(|s| parse_exec(journal, s))
                .collect::<Result<Vec<_>>>()?,
        )),
        None => Ok(None),
    }
}

fn new(journal: &Journal<SqliteStore>, sub: &clap::ArgMatches) -> Result<()> {
    let fixture = fixture_from(journal, sub)?;
    let mut analysis = PreAnalysis::default();
    edit_assessment(sub, &mut analysis)?;
    let executions = executions_from(journal, sub)?.unwrap_or_default();
    let operar = sub.get_one::<String>("mode").map(String::as_str) == Some("op");
    if !operar && !executions.is_empty() {
        bail!("Executions belong to operations; use --mode op");
    }
    let new = if operar {
        NewTrading {
            analysis,
            ..NewTrading::operation(fixture, executions)
        }
    } else {
        NewTrading::pre_analysis(fixture, analysis)
    };
    let t = journal.create_trading(new)?;
    println!(
        "Recorded {} {}",
        if t.operar() { "operation" } else { "pre-analysis" },
        t.id
    );
    Ok(())
}

fn edit(journal: &Journal<SqliteStore>, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let mut t = journal
        .get_trading(id)?
        .with_context(|| format!("Trading record '{}' not found", id))?;
    edit_fixture(journal, sub, &mut t.fixture)?;
    let executions = executions_from(journal, sub)?;
    match &mut t.stage {
        Stage::PreAnalysis(a) => {
            if executions.is_some() {
                bail!("Pre-analysis {} has no executions; convert it first", id);
            }
            edit_assessment(sub, a)?;
        }
        Stage::Operation(op) => {
            edit_assessment(sub, &mut op.analysis)?;
            if let Some(execs) = executions {
                op.method_executions = execs;
            }
        }
    }
    journal.update_trading(t)?;
    println!("Updated trading record {}", id);
    Ok(())
}

fn convert(journal: &Journal<SqliteStore>, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let executions = executions_from(journal, sub)?.unwrap_or_default();
    journal.convert_trading(id, executions)?;
    println!("Converted pre-analysis {} to an operation", id);
    Ok(())
}

fn match_label(labels: &Labels, t: &Trading) -> String {
    format!(
        "{} vs {}",
        labels.name(ReferenceKind::Team, &t.fixture.id_equipe_casa),
        labels.name(ReferenceKind::Team, &t.fixture.id_equipe_fora)
    )
}

fn archive(journal: &Journal<SqliteStore>, sub: &clap::ArgMatches) -> Result<Vec<String>> {
    let reason = sub
        .get_one::<String>("justification")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    Ok(journal.archive_stale(Utc::now(), |_| reason.clone())?)
}

fn list(journal: &Journal<SqliteStore>, sub: &clap::ArgMatches) -> Result<()> {
    let operar = sub.get_one::<String>("mode").map(String::as_str) == Some("op");
    if !operar {
        // Archive with the given justification before list_by_mode sweeps with none.
        archive(journal, sub)?;
    }
    let competition = match sub.get_one::<String>("competition") {
        Some(c) => Some(resolve_id(journal, ReferenceKind::Competition, c)?),
        None => None,
    };
    let rows = journal.list_by_mode(operar, competition.as_deref(), Utc::now())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let labels = journal.labels()?;
    let symbol = get_currency_symbol(journal.store().conn())?;
    let mut data = Vec::new();
    for t in &rows {
        let when = format!(
            "{} {}",
            t.fixture.data_jogo.format("%d/%m/%Y"),
            t.fixture.hora_jogo.format("%H:%M")
        );
        let competition = labels.name(ReferenceKind::Competition, &t.fixture.id_competicao);
        let status = match &t.stage {
            Stage::Operation(op) if op.concluido => op
                .total_result()
                .map(|r| fmt_money(&r, &symbol))
                .unwrap_or_else(|| "overflow".to_string()),
            Stage::Operation(_) => "open".to_string(),
            Stage::PreAnalysis(a) => a
                .tendencia_esperada
                .map(|v| v.label().to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        };
        let extra = match &t.stage {
            Stage::PreAnalysis(a) if a.is_archived() => format!(
                "archived: {}",
                a.justificativa_nao_operacao.clone().unwrap_or_default()
            ),
            Stage::PreAnalysis(a) => a.destaque_essencial.clone().unwrap_or_default(),
            Stage::Operation(op) => format!("{} method(s)", op.method_executions.len()),
        };
        data.push(vec![
            when,
            competition,
            match_label(&labels, t),
            status,
            extra,
            t.id.clone(),
        ]);
    }
    let headers = if operar {
        ["Date/Time", "Competition", "Match", "Result", "Methods", "ID"]
    } else {
        ["Date/Time", "Competition", "Match", "Trend", "Highlight", "ID"]
    };
    println!("{}", pretty_table(&headers, data));
    Ok(())
}

fn show(journal: &Journal<SqliteStore>, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let t = journal
        .get_trading(id)?
        .with_context(|| format!("Trading record '{}' not found", id))?;
    if maybe_print_json(sub.get_flag("json"), false, &t)? {
        return Ok(());
    }
    let labels = journal.labels()?;
    let symbol = get_currency_symbol(journal.store().conn())?;
    println!(
        "{} {} | {} | {}",
        t.fixture.data_jogo,
        t.fixture.hora_jogo.format("%H:%M"),
        labels.name(ReferenceKind::Competition, &t.fixture.id_competicao),
        match_label(&labels, &t)
    );
    if let Some(op) = t.operation() {
        let rows = op
            .method_executions
            .iter()
            .map(|e| {
                vec![
                    labels.name(ReferenceKind::Method, &e.method_id),
                    labels.name(ReferenceKind::Market, &e.market_id),
                    fmt_money(&e.stake, &symbol),
                    e.odd_entrada.to_string(),
                    e.resultado_financeiro
                        .map(|r| fmt_money(&r, &symbol))
                        .unwrap_or_default(),
                    e.estado_emocional.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Method", "Market", "Stake", "Odd", "Result", "Emotion"],
                rows
            )
        );
        println!(
            "Status: {}",
            if op.concluido { "concluded" } else { "open" }
        );
    }
    let audit = t
        .audit_log
        .iter()
        .map(|e| {
            vec![
                e.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                e.user.clone(),
                e.action.to_string(),
                e.details.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["When", "User", "Action", "Details"], audit)
    );
    Ok(())
}
