// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The journal service: trading records on top of an injected [`Store`].
//!
//! Every mutation validates first and writes once, so a failed call leaves
//! the store untouched. Reference-data operations live in
//! [`crate::reference`].

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{JournalError, JournalResult};
use crate::lifecycle::{self, DETAILS_ARCHIVED, DETAILS_CONCLUDED, DETAILS_CONVERTED};
use crate::models::{
    AuditAction, MethodExecution, NewTrading, Operation, ReferenceKind, Stage, Trading,
};
use crate::report::{self, Dashboard, Labels, Report, ReportFilter};
use crate::store::{self, Collection, Store};
use crate::utils::DEFAULT_AUDIT_USER;

pub struct Journal<S> {
    store: S,
    user: String,
}

impl<S: Store> Journal<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            user: DEFAULT_AUDIT_USER.to_string(),
        }
    }

    /// User recorded on audit entries.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn list_tradings(&self) -> JournalResult<Vec<Trading>> {
        Ok(store::load_all(&self.store, Collection::Tradings)?)
    }

    pub fn get_trading(&self, id: &str) -> JournalResult<Option<Trading>> {
        Ok(store::load(&self.store, Collection::Tradings, id)?)
    }

    fn require_trading(&self, id: &str) -> JournalResult<Trading> {
        self.get_trading(id)?
            .ok_or_else(|| JournalError::not_found("Trading record", id))
    }

    fn persist_new(&self, trading: &Trading) -> JournalResult<()> {
        let doc = store::encode(Collection::Tradings, trading)?;
        self.store.insert(Collection::Tradings, &trading.id, doc)?;
        Ok(())
    }

    fn persist(&self, trading: &Trading) -> JournalResult<()> {
        let doc = store::encode(Collection::Tradings, trading)?;
        self.store.replace(Collection::Tradings, &trading.id, doc)?;
        Ok(())
    }

    pub fn create_trading(&self, new: NewTrading) -> JournalResult<Trading> {
        self.create_trading_at(new, Utc::now())
    }

    pub fn create_trading_at(&self, new: NewTrading, now: DateTime<Utc>) -> JournalResult<Trading> {
        let stage = if new.operar {
            let mut op = Operation::new(new.method_executions);
            op.analysis = new.analysis;
            Stage::Operation(op)
        } else {
            Stage::PreAnalysis(new.analysis)
        };
        let mut trading = Trading {
            id: uuid::Uuid::new_v4().to_string(),
            fixture: new.fixture,
            stage,
            data_hora_registro: now,
            audit_log: Vec::new(),
        };
        lifecycle::validate(&trading, &self.list_items(ReferenceKind::Method)?)?;
        trading.record(
            AuditAction::Create,
            &self.user,
            lifecycle::DETAILS_CREATED,
            now,
        );
        self.persist_new(&trading)?;
        info!(id = %trading.id, operar = trading.operar(), "trading record created");
        Ok(trading)
    }

    /// Saves an edited record. The stored record must still exist.
    pub fn update_trading(&self, edited: Trading) -> JournalResult<Trading> {
        let now = Utc::now();
        let existing = self.require_trading(&edited.id)?;
        let (mut merged, action) = lifecycle::merge_update(&existing, edited)?;
        lifecycle::validate(&merged, &self.list_items(ReferenceKind::Method)?)?;
        let details = match action {
            AuditAction::Convert => DETAILS_CONVERTED,
            _ => lifecycle::DETAILS_UPDATED,
        };
        merged.record(action, &self.user, details, now);
        self.persist(&merged)?;
        info!(id = %merged.id, action = %action, "trading record updated");
        Ok(merged)
    }

    /// Turns a pre-analysis into an operation carrying `executions`.
    pub fn convert_trading(
        &self,
        id: &str,
        executions: Vec<MethodExecution>,
    ) -> JournalResult<Trading> {
        let now = Utc::now();
        let mut trading = self.require_trading(id)?;
        trading.convert()?;
        if let Stage::Operation(op) = &mut trading.stage {
            op.method_executions = executions;
        }
        lifecycle::validate(&trading, &self.list_items(ReferenceKind::Method)?)?;
        trading.record(AuditAction::Convert, &self.user, DETAILS_CONVERTED, now);
        self.persist(&trading)?;
        info!(id = %trading.id, "pre-analysis converted to operation");
        Ok(trading)
    }

    pub fn conclude_trading(&self, id: &str) -> JournalResult<Trading> {
        self.conclude_trading_at(id, Utc::now())
    }

    pub fn conclude_trading_at(&self, id: &str, now: DateTime<Utc>) -> JournalResult<Trading> {
        let mut trading = self.require_trading(id)?;
        trading.conclude(&self.list_items(ReferenceKind::Method)?, now)?;
        trading.record(AuditAction::Conclude, &self.user, DETAILS_CONCLUDED, now);
        self.persist(&trading)?;
        info!(id = %trading.id, "operation concluded");
        Ok(trading)
    }

    pub fn delete_trading(&self, id: &str) -> JournalResult<()> {
        let trading = self.require_trading(id)?;
        trading.ensure_deletable()?;
        self.store.delete(Collection::Tradings, id)?;
        info!(id, "trading record deleted");
        Ok(())
    }

    /// Archives every stale, unconverted pre-analysis in one pass.
    ///
    /// `justify` supplies the reason per record. Returns the archived ids;
    /// records archived earlier are left alone.
    pub fn archive_stale<F>(&self, now: DateTime<Utc>, mut justify: F) -> JournalResult<Vec<String>>
    where
        F: FnMut(&Trading) -> String,
    {
        let today = now.date_naive();
        let mut archived = Vec::new();
        for mut trading in self.list_tradings()? {
            if !trading.is_archivable(today) {
                continue;
            }
            let reason = justify(&trading);
            if trading.archive(&reason, now) {
                trading.record(AuditAction::Update, &self.user, DETAILS_ARCHIVED, now);
                self.persist(&trading)?;
                debug!(id = %trading.id, "pre-analysis archived");
                archived.push(trading.id);
            }
        }
        if !archived.is_empty() {
            info!(count = archived.len(), "archived stale pre-analyses");
        }
        Ok(archived)
    }

    /// Pre-analyses or operations, newest match first, after the archive sweep
    /// when listing pre-analyses.
    pub fn list_by_mode(
        &self,
        operar: bool,
        competition: Option<&str>,
        now: DateTime<Utc>,
    ) -> JournalResult<Vec<Trading>> {
        if !operar {
            self.archive_stale(now, |_| String::new())?;
        }
        let mut rows: Vec<Trading> = self
            .list_tradings()?
            .into_iter()
            .filter(|t| t.operar() == operar)
            .filter(|t| competition.is_none_or(|c| t.fixture.id_competicao == c))
            .collect();
        rows.sort_by(|a, b| {
            (b.fixture.data_jogo, b.fixture.hora_jogo).cmp(&(a.fixture.data_jogo, a.fixture.hora_jogo))
        });
        Ok(rows)
    }

    pub fn labels(&self) -> JournalResult<Labels> {
        let mut labels = Labels::new();
        for kind in ReferenceKind::ALL {
            labels = labels.with_items(kind, &self.list_items(kind)?);
        }
        Ok(labels)
    }

    pub fn report(&self, filter: &ReportFilter) -> JournalResult<Report> {
        let tradings = self.list_tradings()?;
        report::build_report(&tradings, filter, &self.labels()?)
    }

    pub fn dashboard(&self) -> JournalResult<Dashboard> {
        report::build_dashboard(&self.list_tradings()?)
    }
}
