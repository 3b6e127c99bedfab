// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::error::{JournalError, JournalResult};
use crate::models::{MethodExecution, ReferenceItem, ReferenceKind, Trading};
use crate::utils::collation_key;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub count: usize,
    pub profit: Decimal,
    pub total_stake: Decimal,
    pub wins: usize,
    pub losses: usize,
    pub roi: Decimal,
    pub win_rate: Decimal,
}

/// Profit, ROI and hit-rate over a set of executions. Absent results count as zero.
///
/// Fails with [`JournalError::Overflow`] instead of panicking when the sums or
/// ratios leave the range of `Decimal`.
pub fn aggregate<'a, I>(executions: I) -> JournalResult<Stats>
where
    I: IntoIterator<Item = &'a MethodExecution>,
{
    let overflow = || JournalError::Overflow("execution totals");
    let mut s = Stats::default();
    for exec in executions {
        let result = exec.result_or_zero();
        s.count += 1;
        s.profit = s.profit.checked_add(result).ok_or_else(overflow)?;
        s.total_stake = s.total_stake.checked_add(exec.stake).ok_or_else(overflow)?;
        if result > Decimal::ZERO {
            s.wins += 1;
        } else if result < Decimal::ZERO {
            s.losses += 1;
        }
    }
    if s.total_stake > Decimal::ZERO {
        s.roi = percent(s.profit, s.total_stake).ok_or(JournalError::Overflow("ROI"))?;
    }
    if s.count > 0 {
        s.win_rate = percent(Decimal::from(s.wins as u64), Decimal::from(s.count as u64))
            .ok_or(JournalError::Overflow("hit rate"))?;
    }
    Ok(s)
}

fn percent(part: Decimal, whole: Decimal) -> Option<Decimal> {
    part.checked_div(whole)?.checked_mul(Decimal::ONE_HUNDRED)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub competition: Option<String>,
    pub market: Option<String>,
    pub method: Option<String>,
    /// Inclusive bounds on the match date.
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ReportFilter {
    pub fn matches(&self, t: &Trading) -> bool {
        if let Some(c) = &self.competition {
            if &t.fixture.id_competicao != c {
                return false;
            }
        }
        if let Some(m) = &self.market {
            if !t.executions().iter().any(|e| &e.market_id == m) {
                return false;
            }
        }
        if let Some(m) = &self.method {
            if !t.executions().iter().any(|e| &e.method_id == m) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if t.fixture.data_jogo < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if t.fixture.data_jogo > to {
                return false;
            }
        }
        true
    }
}

/// id -> name lookup for row labels.
#[derive(Debug, Clone, Default)]
pub struct Labels {
    names: HashMap<(ReferenceKind, String), String>,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, kind: ReferenceKind, items: &[ReferenceItem]) -> Self {
        for item in items {
            self.names
                .insert((kind, item.id.clone()), item.nome.clone());
        }
        self
    }

    /// Name of the item, or the raw id when it no longer exists.
    pub fn name(&self, kind: ReferenceKind, id: &str) -> String {
        self.names
            .get(&(kind, id.to_string()))
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub id: String,
    pub label: String,
    pub stats: Stats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub operations: usize,
    pub summary: Stats,
    pub by_market: Vec<ReportRow>,
    pub by_method: Vec<ReportRow>,
    pub by_competition: Vec<ReportRow>,
}

pub fn concluded_operations(tradings: &[Trading]) -> impl Iterator<Item = &Trading> {
    tradings.iter().filter(|t| t.operar() && t.concluido())
}

fn sorted_rows(mut rows: Vec<ReportRow>) -> Vec<ReportRow> {
    rows.retain(|r| r.stats.count > 0);
    rows.sort_by(|a, b| {
        collation_key(&a.label)
            .cmp(&collation_key(&b.label))
            .then_with(|| a.label.cmp(&b.label))
    });
    rows
}

fn rows_by<F>(
    executions: &[&MethodExecution],
    kind: ReferenceKind,
    labels: &Labels,
    key: F,
) -> JournalResult<Vec<ReportRow>>
where
    F: Fn(&MethodExecution) -> &str,
{
    let ids: BTreeSet<&str> = executions.iter().map(|e| key(e)).collect();
    let rows = ids
        .into_iter()
        .map(|id| {
            Ok(ReportRow {
                id: id.to_string(),
                label: labels.name(kind, id),
                stats: aggregate(executions.iter().copied().filter(|e| key(e) == id))?,
            })
        })
        .collect::<JournalResult<Vec<_>>>()?;
    Ok(sorted_rows(rows))
}

/// Performance of concluded operations matching `filter`, overall and per dimension.
pub fn build_report(
    tradings: &[Trading],
    filter: &ReportFilter,
    labels: &Labels,
) -> JournalResult<Report> {
    let selected: Vec<&Trading> = concluded_operations(tradings)
        .filter(|t| filter.matches(t))
        .collect();
    let executions: Vec<&MethodExecution> =
        selected.iter().flat_map(|t| t.executions()).collect();

    let by_market = rows_by(&executions, ReferenceKind::Market, labels, |e| {
        e.market_id.as_str()
    })?;
    let by_method = rows_by(&executions, ReferenceKind::Method, labels, |e| {
        e.method_id.as_str()
    })?;

    let competitions: BTreeSet<&str> = selected
        .iter()
        .map(|t| t.fixture.id_competicao.as_str())
        .collect();
    let by_competition = sorted_rows(
        competitions
            .into_iter()
            .map(|id| {
                Ok(ReportRow {
                    id: id.to_string(),
                    label: labels.name(ReferenceKind::Competition, id),
                    stats: aggregate(
                        selected
                            .iter()
                            .filter(|t| t.fixture.id_competicao == id)
                            .flat_map(|t| t.executions()),
                    )?,
                })
            })
            .collect::<JournalResult<Vec<_>>>()?,
    );

    Ok(Report {
        operations: selected.len(),
        summary: aggregate(executions.iter().copied())?,
        by_market,
        by_method,
        by_competition,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub stats: Stats,
    pub total_operations: usize,
    pub average_profit_per_match: Decimal,
}

/// Unfiltered summary of every concluded operation with at least one execution.
pub fn build_dashboard(tradings: &[Trading]) -> JournalResult<Dashboard> {
    let operated: Vec<&Trading> = concluded_operations(tradings)
        .filter(|t| !t.executions().is_empty())
        .collect();
    let stats = aggregate(operated.iter().flat_map(|t| t.executions()))?;
    let total_operations = operated.len();
    let average_profit_per_match = if total_operations > 0 {
        stats
            .profit
            .checked_div(Decimal::from(total_operations as u64))
            .ok_or(JournalError::Overflow("average profit"))?
    } else {
        Decimal::ZERO
    };
    Ok(Dashboard {
        stats,
        total_operations,
        average_profit_per_match,
    })
}
