// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::Journal;
use crate::db::SqliteStore;
use crate::models::ReferenceKind;
use crate::report::{ReportFilter, ReportRow, Stats};
use crate::utils::{
    fmt_money, fmt_percent, get_currency_symbol, maybe_print_json, parse_date, pretty_table,
};
use anyhow::Result;

fn stats_cells(s: &Stats, symbol: &str) -> Vec<String> {
    vec![
        s.count.to_string(),
        fmt_money(&s.profit, symbol),
        fmt_percent(&s.roi),
        fmt_percent(&s.win_rate),
    ]
}

fn print_rows(title: &str, rows: &[ReportRow], symbol: &str) {
    if rows.is_empty() {
        return;
    }
    let data = rows
        .iter()
        .map(|r| {
            let mut row = vec![r.label.clone()];
            row.extend(stats_cells(&r.stats, symbol));
            row
        })
        .collect();
    println!(
        "{}",
        pretty_table(&[title, "Executions", "Profit/Loss", "ROI", "Hit rate"], data)
    );
}

pub fn report(journal: &Journal<SqliteStore>, sub: &clap::ArgMatches) -> Result<()> {
    let resolve = |arg: &str, kind: ReferenceKind| -> Result<Option<String>> {
        match sub.get_one::<String>(arg) {
            Some(key) => Ok(Some(journal.resolve_item(kind, key)?.id)),
            None => Ok(None),
        }
    };
    let filter = ReportFilter {
        competition: resolve("competition", ReferenceKind::Competition)?,
        market: resolve("market", ReferenceKind::Market)?,
        method: resolve("method", ReferenceKind::Method)?,
        from: sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?,
        to: sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?,
    };
    let report = journal.report(&filter)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let symbol = get_currency_symbol(journal.store().conn())?;
    let mut summary = vec![report.operations.to_string()];
    summary.extend(stats_cells(&report.summary, &symbol));
    println!(
        "{}",
        pretty_table(
            &["Operations", "Executions", "Profit/Loss", "ROI", "Hit rate"],
            vec![summary]
        )
    );
    print_rows("Market", &report.by_market, &symbol);
    print_rows("Method", &report.by_method, &symbol);
    print_rows("Competition", &report.by_competition, &symbol);
    Ok(())
}

pub fn dashboard(journal: &Journal<SqliteStore>, sub: &clap::ArgMatches) -> Result<()> {
    let d = journal.dashboard()?;
    if maybe_print_json(sub.get_flag("json"), false, &d)? {
        return Ok(());
    }
    let symbol = get_currency_symbol(journal.store().conn())?;
    let rows = vec![
        vec!["Total profit/loss".into(), fmt_money(&d.stats.profit, &symbol)],
        vec!["Total ROI".into(), fmt_percent(&d.stats.roi)],
        vec!["Hit rate (per method)".into(), fmt_percent(&d.stats.win_rate)],
        vec![
            "Average profit per match".into(),
            fmt_money(&d.average_profit_per_match, &symbol),
        ],
        vec!["Matches operated".into(), d.total_operations.to_string()],
        vec!["Winning executions".into(), d.stats.wins.to_string()],
        vec!["Losing executions".into(), d.stats.losses.to_string()],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}
