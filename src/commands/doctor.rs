// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::Journal;
use crate::models::{ReferenceKind, Trading};
use crate::store::Store;
use crate::utils::pretty_table;
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;

/// Integrity findings as (issue, detail) pairs.
pub fn diagnose<S: Store>(journal: &Journal<S>, today: NaiveDate) -> Result<Vec<(String, String)>> {
    let mut known: HashSet<(ReferenceKind, String)> = HashSet::new();
    for kind in ReferenceKind::ALL {
        for item in journal.list_items(kind)? {
            known.insert((kind, item.id));
        }
    }
    let tradings = journal.list_tradings()?;
    let mut issues = Vec::new();

    // 1) References to items that no longer exist
    for t in &tradings {
        for (kind, id) in referenced_ids(t) {
            if !known.contains(&(kind, id.to_string())) {
                issues.push((
                    format!("dangling_{}", kind.label().to_lowercase()),
                    format!("{} -> {}", t.id, id),
                ));
            }
        }
    }

    // 2) Pre-analyses the next listing will archive
    for t in tradings.iter().filter(|t| t.is_archivable(today)) {
        issues.push((
            "stale_pre_analysis".into(),
            format!("{} ({})", t.id, t.fixture.data_jogo),
        ));
    }

    // 3) Operations still open after the match day
    for t in &tradings {
        if t.operar() && !t.concluido() && t.fixture.data_jogo < today {
            issues.push((
                "open_operation".into(),
                format!("{} ({})", t.id, t.fixture.data_jogo),
            ));
        }
    }
    Ok(issues)
}

fn referenced_ids(t: &Trading) -> Vec<(ReferenceKind, &str)> {
    let mut ids = vec![
        (ReferenceKind::Competition, t.fixture.id_competicao.as_str()),
        (ReferenceKind::Team, t.fixture.id_equipe_casa.as_str()),
        (ReferenceKind::Team, t.fixture.id_equipe_fora.as_str()),
    ];
    for e in t.executions() {
        ids.push((ReferenceKind::Method, e.method_id.as_str()));
        ids.push((ReferenceKind::Market, e.market_id.as_str()));
    }
    ids
}

pub fn handle<S: Store>(journal: &Journal<S>) -> Result<()> {
    let rows: Vec<Vec<String>> = diagnose(journal, Utc::now().date_naive())?
        .into_iter()
        .map(|(issue, detail)| vec![issue, detail])
        .collect();
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
