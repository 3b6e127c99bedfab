// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Validation and state transitions of trading records.
//!
//! Everything here is pure: callers pass the clock and the method names, and
//! persistence happens in [`crate::journal`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::error::{JournalError, JournalResult, ValidationError};
use crate::models::{
    AuditAction, AuditLogEntry, Fixture, MethodExecution, Operation, PreAnalysis, ReferenceItem,
    Stage, Trading,
};

pub const MAX_EXIT_REASON_CHARS: usize = 200;
pub const MAX_JUSTIFICATION_CHARS: usize = 50;

pub const DETAILS_CREATED: &str = "Record created.";
pub const DETAILS_UPDATED: &str = "Record updated.";
pub const DETAILS_CONVERTED: &str = "Converted from pre-analysis to operation.";
pub const DETAILS_CONCLUDED: &str = "Operation concluded.";
pub const DETAILS_ARCHIVED: &str = "Pre-analysis archived as not operated.";

/// Odds must be strictly above this.
pub fn min_odd() -> Decimal {
    Decimal::new(101, 2)
}

pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn method_label(methods: &[ReferenceItem], id: &str) -> String {
    methods
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.nome.clone())
        .unwrap_or_else(|| {
            if id.is_empty() {
                "unknown".to_string()
            } else {
                id.to_string()
            }
        })
}

/// Checks the field set the record's mode requires before it is persisted.
pub fn validate(trading: &Trading, methods: &[ReferenceItem]) -> Result<(), ValidationError> {
    validate_fixture(&trading.fixture)?;
    match &trading.stage {
        Stage::PreAnalysis(_) => Ok(()),
        Stage::Operation(op) => validate_executions(&op.method_executions, methods),
    }
}

fn validate_fixture(f: &Fixture) -> Result<(), ValidationError> {
    let required = [
        ("id_competicao", &f.id_competicao),
        ("id_equipe_casa", &f.id_equipe_casa),
        ("id_equipe_fora", &f.id_equipe_fora),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, "is required"));
        }
    }
    Ok(())
}

fn validate_executions(
    executions: &[MethodExecution],
    methods: &[ReferenceItem],
) -> Result<(), ValidationError> {
    if executions.is_empty() {
        return Err(ValidationError::new(
            "methodExecutions",
            "select at least one method for the operation",
        ));
    }
    let mut seen = HashSet::new();
    for exec in executions {
        let name = method_label(methods, &exec.method_id);
        if exec.method_id.trim().is_empty() {
            return Err(ValidationError::new("methodId", "is required"));
        }
        if !seen.insert(exec.method_id.as_str()) {
            return Err(ValidationError::for_method(
                "methodId",
                &name,
                "method applied more than once",
            ));
        }
        if exec.market_id.trim().is_empty() {
            return Err(ValidationError::for_method("marketId", &name, "is required"));
        }
        if exec.stake <= Decimal::ZERO {
            return Err(ValidationError::for_method(
                "stake",
                &name,
                "must be greater than zero",
            ));
        }
        if exec.odd_entrada <= min_odd() {
            return Err(ValidationError::for_method(
                "odd_entrada",
                &name,
                format!("must be greater than {}", min_odd()),
            ));
        }
        if let Some(exit) = exec.odd_saida {
            if exit <= min_odd() {
                return Err(ValidationError::for_method(
                    "odd_saida",
                    &name,
                    format!("must be greater than {}", min_odd()),
                ));
            }
        }
        if exec.resultado_financeiro.is_none() {
            return Err(ValidationError::for_method(
                "resultado_financeiro",
                &name,
                "is required",
            ));
        }
        if let Some(reason) = &exec.motivacao_saida {
            if reason.chars().count() > MAX_EXIT_REASON_CHARS {
                return Err(ValidationError::for_method(
                    "motivacao_saida",
                    &name,
                    format!("must be at most {} characters", MAX_EXIT_REASON_CHARS),
                ));
            }
        }
    }
    Ok(())
}

/// Folds a caller-edited record onto the stored one.
///
/// Identity, registration time, conclusion stamp, the archival stamp and
/// justification, and the audit log always come from `existing`. Returns the audit action the edit
/// should be logged under.
pub fn merge_update(existing: &Trading, incoming: Trading) -> JournalResult<(Trading, AuditAction)> {
    let Trading {
        fixture, stage, ..
    } = incoming;
    let (stage, action) = match (&existing.stage, stage) {
        (Stage::Operation(_), Stage::PreAnalysis(_)) => {
            return Err(JournalError::illegal(
                "an operation cannot go back to pre-analysis",
            ));
        }
        (Stage::PreAnalysis(old), Stage::Operation(mut op)) => {
            if old.is_archived() {
                return Err(JournalError::illegal(
                    "an archived pre-analysis cannot be operated",
                ));
            }
            if op.concluido {
                return Err(JournalError::illegal(
                    "conclude the operation through the conclude transition",
                ));
            }
            op.data_conclusao = None;
            keep_archival(old, &mut op.analysis);
            (Stage::Operation(op), AuditAction::Convert)
        }
        (Stage::Operation(old), Stage::Operation(mut op)) => {
            if old.concluido && !op.concluido {
                return Err(JournalError::illegal(
                    "a concluded operation cannot be reopened",
                ));
            }
            if !old.concluido && op.concluido {
                return Err(JournalError::illegal(
                    "conclude the operation through the conclude transition",
                ));
            }
            op.data_conclusao = old.data_conclusao;
            keep_archival(&old.analysis, &mut op.analysis);
            (Stage::Operation(op), AuditAction::Update)
        }
        (Stage::PreAnalysis(old), Stage::PreAnalysis(mut analysis)) => {
            keep_archival(old, &mut analysis);
            (Stage::PreAnalysis(analysis), AuditAction::Update)
        }
    };
    let merged = Trading {
        id: existing.id.clone(),
        fixture,
        stage,
        data_hora_registro: existing.data_hora_registro,
        audit_log: existing.audit_log.clone(),
    };
    Ok((merged, action))
}

/// Archival is owned by the sweep; edits never set or change it.
fn keep_archival(stored: &PreAnalysis, edited: &mut PreAnalysis) {
    edited.data_envio_historico = stored.data_envio_historico;
    edited.justificativa_nao_operacao = stored.justificativa_nao_operacao.clone();
}

impl Trading {
    pub fn record(
        &mut self,
        action: AuditAction,
        user: &str,
        details: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        self.audit_log.push(AuditLogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: now,
            user: user.to_string(),
            action,
            details: details.into(),
        });
    }

    /// Pre-analysis -> operation with no executions; the assessment is kept.
    pub fn convert(&mut self) -> JournalResult<()> {
        let analysis = match &mut self.stage {
            Stage::Operation(_) => {
                return Err(JournalError::illegal(format!(
                    "trading record {} is already an operation",
                    self.id
                )));
            }
            Stage::PreAnalysis(a) if a.is_archived() => {
                return Err(JournalError::illegal(format!(
                    "trading record {} was archived and cannot be operated",
                    self.id
                )));
            }
            Stage::PreAnalysis(a) => std::mem::take(a),
        };
        self.stage = Stage::Operation(analysis.into_operation());
        Ok(())
    }

    pub fn conclude(&mut self, methods: &[ReferenceItem], now: DateTime<Utc>) -> JournalResult<()> {
        let id = self.id.clone();
        let op = match &mut self.stage {
            Stage::PreAnalysis(_) => {
                return Err(JournalError::illegal(format!(
                    "trading record {} is a pre-analysis; only operations can be concluded",
                    id
                )));
            }
            Stage::Operation(op) => op,
        };
        if op.concluido {
            return Err(JournalError::illegal(format!(
                "trading record {} is already concluded",
                id
            )));
        }
        if op.method_executions.is_empty() {
            return Err(JournalError::illegal(format!(
                "trading record {} has no method executions",
                id
            )));
        }
        if let Some(missing) = op
            .method_executions
            .iter()
            .find(|e| e.resultado_financeiro.is_none())
        {
            return Err(JournalError::illegal(format!(
                "cannot conclude without resultado_financeiro for method '{}'",
                method_label(methods, &missing.method_id)
            )));
        }
        op.concluido = true;
        op.data_conclusao = Some(now);
        Ok(())
    }

    /// Unconverted, unarchived pre-analysis whose match day is before `today`.
    pub fn is_archivable(&self, today: NaiveDate) -> bool {
        match &self.stage {
            Stage::PreAnalysis(a) => !a.is_archived() && self.fixture.data_jogo < today,
            Stage::Operation(_) => false,
        }
    }

    /// Stamps the record as deliberately not operated. No-op unless archivable.
    pub fn archive(&mut self, justification: &str, now: DateTime<Utc>) -> bool {
        if !self.is_archivable(now.date_naive()) {
            return false;
        }
        if let Stage::PreAnalysis(a) = &mut self.stage {
            a.justificativa_nao_operacao =
                Some(truncate_chars(justification, MAX_JUSTIFICATION_CHARS));
            a.data_envio_historico = Some(now);
        }
        true
    }

    pub fn ensure_deletable(&self) -> JournalResult<()> {
        if self.concluido() {
            return Err(JournalError::illegal(format!(
                "trading record {} is concluded and cannot be deleted",
                self.id
            )));
        }
        Ok(())
    }
}

impl PreAnalysis {
    /// Explicit conversion of an assessment into an empty operation.
    pub fn into_operation(self) -> Operation {
        Operation {
            analysis: self,
            ..Operation::new(Vec::new())
        }
    }
}
