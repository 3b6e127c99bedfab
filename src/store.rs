// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Collection-level persistence seam.
//!
//! The journal only ever talks to a [`Store`]: five operations over named
//! collections of JSON documents. The SQLite implementation lives in
//! [`crate::db`]; [`MemoryStore`] backs tests and throwaway sessions.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Teams,
    Competitions,
    Markets,
    Methods,
    Tradings,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Teams,
        Collection::Competitions,
        Collection::Markets,
        Collection::Methods,
        Collection::Tradings,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Teams => "teams",
            Collection::Competitions => "competitions",
            Collection::Markets => "markets",
            Collection::Methods => "methods",
            Collection::Tradings => "tradings",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{collection}: document '{id}' already exists")]
    Conflict { collection: Collection, id: String },

    #[error("{collection}: document '{id}' does not exist")]
    Missing { collection: Collection, id: String },

    #[error("{collection}: malformed document: {source}")]
    Malformed {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub trait Store {
    /// All documents of a collection in insertion order.
    fn list(&self, collection: Collection) -> Result<Vec<Value>, StoreError>;

    fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError>;

    fn insert(&self, collection: Collection, id: &str, doc: Value) -> Result<Value, StoreError>;

    fn replace(&self, collection: Collection, id: &str, doc: Value) -> Result<Value, StoreError>;

    /// Removing an absent document is not an error.
    fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for &S {
    fn list(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        (**self).list(collection)
    }

    fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(collection, id)
    }

    fn insert(&self, collection: Collection, id: &str, doc: Value) -> Result<Value, StoreError> {
        (**self).insert(collection, id, doc)
    }

    fn replace(&self, collection: Collection, id: &str, doc: Value) -> Result<Value, StoreError> {
        (**self).replace(collection, id, doc)
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        (**self).delete(collection, id)
    }
}

pub fn encode<T: Serialize>(collection: Collection, item: &T) -> Result<Value, StoreError> {
    serde_json::to_value(item).map_err(|source| StoreError::Malformed { collection, source })
}

pub fn decode<T: DeserializeOwned>(collection: Collection, doc: Value) -> Result<T, StoreError> {
    serde_json::from_value(doc).map_err(|source| StoreError::Malformed { collection, source })
}

pub fn load_all<T: DeserializeOwned>(
    store: &impl Store,
    collection: Collection,
) -> Result<Vec<T>, StoreError> {
    store
        .list(collection)?
        .into_iter()
        .map(|doc| decode(collection, doc))
        .collect()
}

pub fn load<T: DeserializeOwned>(
    store: &impl Store,
    collection: Collection,
    id: &str,
) -> Result<Option<T>, StoreError> {
    store
        .get(collection, id)?
        .map(|doc| decode(collection, doc))
        .transpose()
}

/// In-process store; nothing survives the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RefCell<HashMap<Collection, Vec<(String, Value)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn list(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .collections
            .borrow()
            .get(&collection)
            .map(|docs| docs.iter().map(|(_, d)| d.clone()).collect())
            .unwrap_or_default())
    }

    fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.collections.borrow().get(&collection).and_then(|docs| {
            docs.iter()
                .find(|(doc_id, _)| doc_id == id)
                .map(|(_, d)| d.clone())
        }))
    }

    fn insert(&self, collection: Collection, id: &str, doc: Value) -> Result<Value, StoreError> {
        let mut all = self.collections.borrow_mut();
        let docs = all.entry(collection).or_default();
        if docs.iter().any(|(doc_id, _)| doc_id == id) {
            return Err(StoreError::Conflict {
                collection,
                id: id.to_string(),
            });
        }
        docs.push((id.to_string(), doc.clone()));
        Ok(doc)
    }

    fn replace(&self, collection: Collection, id: &str, doc: Value) -> Result<Value, StoreError> {
        let mut all = self.collections.borrow_mut();
        let slot = all
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|(doc_id, _)| doc_id == id))
            .ok_or_else(|| StoreError::Missing {
                collection,
                id: id.to_string(),
            })?;
        slot.1 = doc.clone();
        Ok(doc)
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        if let Some(docs) = self.collections.borrow_mut().get_mut(&collection) {
            docs.retain(|(doc_id, _)| doc_id != id);
        }
        Ok(())
    }
}
