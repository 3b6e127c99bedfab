// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tracing::info;

use crate::error::{JournalError, JournalResult, ValidationError};
use crate::journal::Journal;
use crate::models::{ReferenceItem, ReferenceKind, Trading};
use crate::store::{self, Store};
use crate::utils::collation_key;

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn clean_name(name: &str) -> JournalResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::new("nome", "name cannot be empty").into());
    }
    Ok(name.to_string())
}

/// Whether `t` points at the reference item `id` of the given kind.
pub fn references(t: &Trading, kind: ReferenceKind, id: &str) -> bool {
    match kind {
        ReferenceKind::Team => t.fixture.id_equipe_casa == id || t.fixture.id_equipe_fora == id,
        ReferenceKind::Competition => t.fixture.id_competicao == id,
        ReferenceKind::Market => t.executions().iter().any(|e| e.market_id == id),
        ReferenceKind::Method => t.executions().iter().any(|e| e.method_id == id),
    }
}

impl<S: Store> Journal<S> {
    /// Items of one kind sorted by name.
    pub fn list_items(&self, kind: ReferenceKind) -> JournalResult<Vec<ReferenceItem>> {
        let mut items: Vec<ReferenceItem> = store::load_all(self.store(), kind.collection())?;
        items.sort_by(|a, b| {
            collation_key(&a.nome)
                .cmp(&collation_key(&b.nome))
                .then_with(|| a.nome.cmp(&b.nome))
        });
        Ok(items)
    }

    pub fn get_item(&self, kind: ReferenceKind, id: &str) -> JournalResult<Option<ReferenceItem>> {
        Ok(store::load(self.store(), kind.collection(), id)?)
    }

    /// Finds an item by id, falling back to a case-insensitive name match.
    pub fn resolve_item(&self, kind: ReferenceKind, key: &str) -> JournalResult<ReferenceItem> {
        let key = key.trim();
        if let Some(item) = self.get_item(kind, key)? {
            return Ok(item);
        }
        self.list_items(kind)?
            .into_iter()
            .find(|i| same_name(&i.nome, key))
            .ok_or_else(|| JournalError::not_found(kind.label(), key))
    }

    pub fn add_item(&self, kind: ReferenceKind, name: &str) -> JournalResult<ReferenceItem> {
        let name = clean_name(name)?;
        if self
            .list_items(kind)?
            .iter()
            .any(|i| same_name(&i.nome, &name))
        {
            return Err(JournalError::DuplicateName { kind, name });
        }
        let item = ReferenceItem {
            id: uuid::Uuid::new_v4().to_string(),
            nome: name,
        };
        let collection = kind.collection();
        self.store()
            .insert(collection, &item.id, store::encode(collection, &item)?)?;
        info!(kind = %kind, id = %item.id, name = %item.nome, "reference item added");
        Ok(item)
    }

    pub fn rename_item(&self, kind: ReferenceKind, id: &str, name: &str) -> JournalResult<()> {
        let name = clean_name(name)?;
        let items = self.list_items(kind)?;
        let mut item = items
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| JournalError::not_found(kind.label(), id))?;
        if items
            .iter()
            .any(|i| i.id != id && same_name(&i.nome, &name))
        {
            return Err(JournalError::DuplicateName { kind, name });
        }
        item.nome = name;
        let collection = kind.collection();
        self.store()
            .replace(collection, id, store::encode(collection, &item)?)?;
        info!(kind = %kind, id, name = %item.nome, "reference item renamed");
        Ok(())
    }

    /// Deletes an item no trading record refers to.
    pub fn remove_item(&self, kind: ReferenceKind, id: &str) -> JournalResult<()> {
        if self.get_item(kind, id)?.is_none() {
            return Err(JournalError::not_found(kind.label(), id));
        }
        if let Some(user) = self
            .list_tradings()?
            .into_iter()
            .find(|t| references(t, kind, id))
        {
            return Err(JournalError::InUse {
                kind,
                id: id.to_string(),
                trading_id: user.id,
            });
        }
        self.store().delete(kind.collection(), id)?;
        info!(kind = %kind, id, "reference item removed");
        Ok(())
    }
}
