// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use betjournal::db::SqliteStore;
use betjournal::models::{EstadoEmocional, Momento, ReferenceKind};
use betjournal::{Journal, cli, commands, utils};
use chrono::Utc;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn journal() -> Journal<SqliteStore> {
    let j = Journal::new(SqliteStore::open_in_memory().unwrap());
    j.add_item(ReferenceKind::Competition, "Brasileirão").unwrap();
    j.add_item(ReferenceKind::Team, "Flamengo").unwrap();
    j.add_item(ReferenceKind::Team, "Palmeiras").unwrap();
    j.add_item(ReferenceKind::Method, "Lay Empate").unwrap();
    j.add_item(ReferenceKind::Market, "Match Odds").unwrap();
    j
}

fn run(journal: &Journal<SqliteStore>, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["betjournal"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some((name @ ("team" | "competition" | "market" | "method"), sub)) => {
            commands::references::handle(journal, name, sub)
        }
        Some(("trading", sub)) => commands::tradings::handle(journal, sub),
        Some(("report", sub)) => commands::reports::report(journal, sub),
        Some(("dashboard", sub)) => commands::reports::dashboard(journal, sub),
        Some(("export", sub)) => commands::exporter::handle(journal, sub),
        Some(("doctor", _)) => commands::doctor::handle(journal),
        Some(("config", sub)) => commands::settings::handle(journal.store().conn(), sub),
        _ => Ok(()),
    }
}

const OP: &[&str] = &[
    "trading",
    "new",
    "--mode",
    "op",
    "--date",
    "2025-03-01",
    "--time",
    "16:00",
    "--competition",
    "brasileirão",
    "--home",
    "Flamengo",
    "--away",
    "Palmeiras",
    "--exec",
    "method=Lay Empate,market=Match Odds,stake=100,odd=3.2,result=-100,emotion=calmo,plan=no",
];

#[test]
fn reference_commands_trim_and_reject_duplicates() {
    let j = journal();
    run(&j, &["team", "add", "--name", "  Grêmio "]).unwrap();
    let names: Vec<String> = j
        .list_items(ReferenceKind::Team)
        .unwrap()
        .into_iter()
        .map(|i| i.nome)
        .collect();
    assert_eq!(names, vec!["Flamengo", "Grêmio", "Palmeiras"]);

    let err = run(&j, &["team", "add", "--name", "grêmio"]).unwrap_err();
    assert!(err.to_string().contains("already exists"));

    run(&j, &["team", "rename", "--id", "Grêmio", "--name", "Grêmio FBPA"]).unwrap();
    assert!(j.resolve_item(ReferenceKind::Team, "Grêmio FBPA").is_ok());

    run(&j, &["team", "rm", "--id", "grêmio fbpa"]).unwrap();
    assert_eq!(j.list_items(ReferenceKind::Team).unwrap().len(), 2);
}

#[test]
fn operation_flow_through_the_cli() {
    let j = journal();
    run(&j, OP).unwrap();

    let t = j.list_tradings().unwrap().remove(0);
    assert!(t.operar());
    let e = &t.executions()[0];
    assert_eq!(e.stake, Decimal::from(100));
    assert_eq!(e.resultado_financeiro, Some(Decimal::from(-100)));
    assert_eq!(e.estado_emocional, EstadoEmocional::Calmo);
    assert!(!e.seguiu_plano);

    let err = run(&j, &["market", "rm", "--id", "Match Odds"]).unwrap_err();
    assert!(err.to_string().contains("used by trading record"));

    run(&j, &["trading", "conclude", "--id", &t.id]).unwrap();
    assert!(j.get_trading(&t.id).unwrap().unwrap().concluido());

    let err = run(&j, &["trading", "rm", "--id", &t.id]).unwrap_err();
    assert!(err.to_string().contains("concluded"));

    let r = j.report(&Default::default()).unwrap();
    assert_eq!(r.summary.roi, Decimal::from(-100));
    run(&j, &["report", "--market", "Match Odds", "--json"]).unwrap();
    run(&j, &["dashboard"]).unwrap();
}

#[test]
fn pre_analysis_edit_and_convert() {
    let j = journal();
    run(
        &j,
        &[
            "trading",
            "new",
            "--date",
            "2099-06-01",
            "--time",
            "21:30",
            "--competition",
            "Brasileirão",
            "--home",
            "Palmeiras",
            "--away",
            "Flamengo",
            "--class-home",
            "2",
            "--momentum-home",
            "boa fase",
        ],
    )
    .unwrap();
    let t = j.list_tradings().unwrap().remove(0);
    assert!(!t.operar());
    assert_eq!(t.analysis().classificacao_m, Some(2));
    assert_eq!(t.analysis().momento_m, Some(Momento::BoaFase));

    let err = run(
        &j,
        &["trading", "edit", "--id", &t.id, "--exec", "method=Lay Empate,market=Match Odds,stake=10,odd=2,result=5"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("convert it first"));

    run(&j, &["trading", "edit", "--id", &t.id, "--highlight", "Clássico"]).unwrap();
    run(
        &j,
        &["trading", "convert", "--id", &t.id, "--exec", "method=Lay Empate,market=Match Odds,stake=10,odd=2,result=5"],
    )
    .unwrap();

    let op = j.get_trading(&t.id).unwrap().unwrap();
    assert!(op.operar());
    assert_eq!(op.analysis().classificacao_m, Some(2));
    assert_eq!(op.analysis().destaque_essencial.as_deref(), Some("Clássico"));
    assert_eq!(op.audit_log.len(), 3);
}

#[test]
fn bad_execution_spec_is_reported() {
    let j = journal();
    let mut args = OP.to_vec();
    *args.last_mut().unwrap() = "method=Lay Empate,stake=100,odd=3.2,result=1";
    let err = run(&j, &args).unwrap_err();
    assert!(err.to_string().contains("market="));

    *args.last_mut().unwrap() = "method=Lay Empate,market=Match Odds,stake=100,odd=1.01,result=1";
    let err = run(&j, &args).unwrap_err();
    assert!(err.to_string().contains("odd_entrada"));
    assert!(j.list_tradings().unwrap().is_empty());
}

#[test]
fn export_executions_csv_and_json() {
    let j = journal();
    run(&j, OP).unwrap();
    let id = j.list_tradings().unwrap()[0].id.clone();

    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("out.csv");
    let csv_out = csv_path.to_str().unwrap();

    // Open operations are not exported.
    run(&j, &["export", "executions", "--out", csv_out]).unwrap();
    let body = std::fs::read_to_string(&csv_path).unwrap();
    assert!(!body.contains("Match Odds"));

    run(&j, &["trading", "conclude", "--id", &id]).unwrap();
    run(&j, &["export", "executions", "--out", csv_out]).unwrap();
    let mut rdr = csv::Reader::from_path(&csv_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[0], "trading_id");
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], id.as_str());
    assert!(rows[0].iter().any(|f| f == "Match Odds"));
    assert!(rows[0].iter().any(|f| f == "Brasileirão"));

    let json_path = dir.path().join("out.json");
    run(
        &j,
        &["export", "executions", "--format", "json", "--out", json_path.to_str().unwrap()],
    )
    .unwrap();
    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(v[0]["method"], "Lay Empate");
    assert_eq!(v[0]["resultado_financeiro"], "-100");
}

#[test]
fn config_sets_user_and_currency() {
    let j = journal();
    let conn = j.store().conn();
    assert_eq!(utils::get_audit_user(conn).unwrap(), utils::DEFAULT_AUDIT_USER);
    assert_eq!(utils::get_currency_symbol(conn).unwrap(), "R$");

    run(&j, &["config", "set-user", "--name", " Ana "]).unwrap();
    run(&j, &["config", "set-currency", "--symbol", "€"]).unwrap();
    assert_eq!(utils::get_audit_user(conn).unwrap(), "Ana");
    assert_eq!(utils::get_currency_symbol(conn).unwrap(), "€");
    assert!(run(&j, &["config", "set-user", "--name", "  "]).is_err());
    run(&j, &["config", "show"]).unwrap();
}

#[test]
fn doctor_flags_stale_and_open_records() {
    let j = journal();
    run(&j, OP).unwrap();
    run(
        &j,
        &[
            "trading", "new", "--date", "2025-02-01", "--time", "16:00", "--competition",
            "Brasileirão", "--home", "Flamengo", "--away", "Palmeiras",
        ],
    )
    .unwrap();

    let issues = commands::doctor::diagnose(&j, Utc::now().date_naive()).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|(k, _)| k.as_str()).collect();
    assert!(kinds.contains(&"stale_pre_analysis"));
    assert!(kinds.contains(&"open_operation"));
    assert!(!kinds.iter().any(|k| k.starts_with("dangling")));

    run(&j, &["trading", "archive", "--justification", "Sem valor"]).unwrap();
    let issues = commands::doctor::diagnose(&j, Utc::now().date_naive()).unwrap();
    assert!(issues.iter().all(|(k, _)| k != "stale_pre_analysis"));
    run(&j, &["doctor"]).unwrap();
}

#[test]
fn listing_pre_analyses_records_the_given_justification() {
    let j = journal();
    run(
        &j,
        &[
            "trading", "new", "--date", "2025-02-01", "--time", "16:00", "--competition",
            "Brasileirão", "--home", "Flamengo", "--away", "Palmeiras",
        ],
    )
    .unwrap();
    run(&j, &["trading", "list", "--json", "--justification", "Sem valor nas odds"]).unwrap();

    let t = j.list_tradings().unwrap().remove(0);
    assert!(t.analysis().is_archived());
    assert_eq!(
        t.analysis().justificativa_nao_operacao.as_deref(),
        Some("Sem valor nas odds")
    );

    // Already archived: a later listing leaves the reason alone.
    run(&j, &["trading", "list", "--json", "--justification", "outra"]).unwrap();
    let again = j.get_trading(&t.id).unwrap().unwrap();
    assert_eq!(again, t);
}
