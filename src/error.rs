// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::ReferenceKind;
use crate::store::StoreError;

/// A rejected save, naming the field and, for executions, the method.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}{}: {message}", method_suffix(.method))]
pub struct ValidationError {
    pub field: &'static str,
    pub method: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            method: None,
            message: message.into(),
        }
    }

    pub fn for_method(field: &'static str, method: &str, message: impl Into<String>) -> Self {
        Self {
            field,
            method: Some(method.to_string()),
            message: message.into(),
        }
    }
}

fn method_suffix(method: &Option<String>) -> String {
    match method {
        Some(m) => format!(" for method '{}'", m),
        None => String::new(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("{kind} named '{name}' already exists")]
    DuplicateName { kind: ReferenceKind, name: String },

    #[error("{kind} '{id}' cannot be removed: used by trading record {trading_id}")]
    InUse {
        kind: ReferenceKind,
        id: String,
        trading_id: String,
    },

    #[error("invalid record: {0}")]
    Validation(#[from] ValidationError),

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("illegal transition: {0}")]
    IllegalTransition(String),

    #[error("amounts too large to aggregate in {0}")]
    Overflow(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl JournalError {
    pub fn not_found(entity: &'static str, id: &str) -> Self {
        JournalError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn illegal(reason: impl Into<String>) -> Self {
        JournalError::IllegalTransition(reason.into())
    }
}

pub type JournalResult<T> = std::result::Result<T, JournalError>;
