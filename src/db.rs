// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

use crate::store::{Collection, Store, StoreError};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.betjournal", "Betjournal", "betjournal"));

pub const DB_ENV: &str = "BETJOURNAL_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Ok(custom) = std::env::var(DB_ENV) {
        let custom = custom.trim();
        if !custom.is_empty() {
            return Ok(PathBuf::from(custom));
        }
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("betjournal.sqlite"))
}

pub fn open_or_init() -> Result<SqliteStore> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(SqliteStore { conn })
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
    "#,
    )?;
    // One document table per collection; `body` holds the serialised item.
    for collection in Collection::ALL {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table}(
                id TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
            table = collection.name()
        ))?;
    }
    Ok(())
}

/// [`Store`] over one SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

fn parse_body(collection: Collection, body: &str) -> Result<Value, StoreError> {
    serde_json::from_str(body).map_err(|source| StoreError::Malformed { collection, source })
}

impl Store for SqliteStore {
    fn list(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT body FROM {} ORDER BY rowid",
            collection.name()
        ))?;
        let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
        let mut docs = Vec::new();
        for row in rows {
            docs.push(parse_body(collection, &row?)?);
        }
        Ok(docs)
    }

    fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError> {
        let body: Option<String> = self
            .conn
            .query_row(
                &format!("SELECT body FROM {} WHERE id=?1", collection.name()),
                params![id],
                |r| r.get(0),
            )
            .optional()?;
        body.map(|b| parse_body(collection, &b)).transpose()
    }

    fn insert(&self, collection: Collection, id: &str, doc: Value) -> Result<Value, StoreError> {
        if self.get(collection, id)?.is_some() {
            return Err(StoreError::Conflict {
                collection,
                id: id.to_string(),
            });
        }
        self.conn.execute(
            &format!("INSERT INTO {}(id, body) VALUES (?1, ?2)", collection.name()),
            params![id, doc.to_string()],
        )?;
        Ok(doc)
    }

    fn replace(&self, collection: Collection, id: &str, doc: Value) -> Result<Value, StoreError> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE {} SET body=?2, updated_at=datetime('now') WHERE id=?1",
                collection.name()
            ),
            params![id, doc.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::Missing {
                collection,
                id: id.to_string(),
            });
        }
        Ok(doc)
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        self.conn.execute(
            &format!("DELETE FROM {} WHERE id=?1", collection.name()),
            params![id],
        )?;
        Ok(())
    }
}
