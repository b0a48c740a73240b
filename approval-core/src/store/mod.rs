//! Record Store - flat, file-backed tables
//!
//! # Tables
//!
//! | Table | Key | Row | File |
//! |-------|-----|-----|------|
//! | requests | `id` | [`Request`](shared::models::Request) | `REQUESTS_FILE` |
//! | staff | `name` | [`StaffAccount`](shared::models::StaffAccount) | `STAFF_FILE` |
//!
//! Each table is a JSON array of flat string-valued rows. Reads always load
//! the whole table; writes always rewrite the whole table through a temp file
//! and a rename, so a reader never observes a half-written table.
//!
//! # Write discipline
//!
//! Every mutation goes through [`Table::update`]:
//! in-process writer mutex -> `<file>.lock` advisory lock -> fresh load ->
//! apply -> atomic persist -> release.

mod codec;
mod encoding;
mod table;

pub use codec::{Row, RowCodec, RowReader};
pub use encoding::TextDecoder;
pub use table::{Table, TableOptions};

use shared::error::{AppError, ErrorCode};
use std::path::PathBuf;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{} is locked by another process", path.display())]
    Locked { path: PathBuf },

    #[error("{} cannot be read: {reason}", path.display())]
    Unavailable { path: PathBuf, reason: String },

    #[error("{} is corrupted: {reason}", path.display())]
    Corrupted { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Lock contention (the caller may retry the whole operation)
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked { .. })
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let code = match &err {
            StoreError::Locked { .. } => ErrorCode::StoreLocked,
            StoreError::Corrupted { .. } => ErrorCode::StorageCorrupted,
            StoreError::Unavailable { .. } | StoreError::Io(_) | StoreError::Serialization(_) => {
                ErrorCode::StoreUnavailable
            }
        };
        AppError::with_message(code, err.to_string())
    }
}
