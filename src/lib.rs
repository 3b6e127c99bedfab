// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod db;
pub mod error;
pub mod journal;
pub mod lifecycle;
pub mod models;
pub mod reference;
pub mod report;
pub mod store;
pub mod utils;

pub use error::{JournalError, JournalResult, ValidationError};
pub use journal::Journal;
