//! File-backed flat table with whole-table reads and atomic rewrites

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use fs2::FileExt;
use parking_lot::Mutex;
use serde_json::Value;

use super::codec::{Row, RowCodec, RowReader};
use super::encoding::TextDecoder;
use super::{StoreError, StoreResult};
use crate::core::Config;

/// Options shared by every table of one work directory
#[derive(Debug, Clone)]
pub struct TableOptions {
    pub decoder: TextDecoder,
    pub lock_retries: u32,
    pub lock_retry_delay: Duration,
}

impl TableOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            decoder: TextDecoder::from_labels(&config.fallback_encodings),
            lock_retries: config.store_lock_retries,
            lock_retry_delay: Duration::from_millis(config.store_lock_retry_ms),
        }
    }
}

/// Exclusive advisory lock on `<table file>.lock`, released on drop
struct FileLock {
    file: File,
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// A table of `T` rows persisted as one JSON file
pub struct Table<T> {
    path: PathBuf,
    lock_path: PathBuf,
    options: TableOptions,
    /// In-process writer mutex; each table of an engine gets its own
    writer: Arc<Mutex<()>>,
    _rows: PhantomData<fn() -> T>,
}

impl<T: RowCodec> Table<T> {
    pub fn open(path: impl Into<PathBuf>, options: TableOptions, writer: Arc<Mutex<()>>) -> Self {
        let path = path.into();
        let mut lock_name = path.file_name().unwrap_or_default().to_os_string();
        lock_name.push(".lock");
        let lock_path = path.with_file_name(lock_name);

        Self {
            path,
            lock_path,
            options,
            writer,
            _rows: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row, including soft-deleted ones.
    ///
    /// A missing file is an empty table. Any other read or decode failure is
    /// an error; no default data is substituted.
    pub fn load_all(&self) -> StoreResult<Vec<T>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                tracing::error!(
                    table = T::TABLE,
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read table"
                );
                return Err(StoreError::Unavailable {
                    path: self.path.clone(),
                    reason: e.to_string(),
                });
            }
        };

        let Some((text, encoding)) = self.options.decoder.decode(&bytes) else {
            tracing::error!(
                table = T::TABLE,
                path = %self.path.display(),
                fallbacks = ?self.options.decoder.fallback_names(),
                "Table is not valid UTF-8 nor any fallback encoding"
            );
            return Err(StoreError::Unavailable {
                path: self.path.clone(),
                reason: "unsupported text encoding".into(),
            });
        };
        if encoding != encoding_rs::UTF_8 {
            tracing::warn!(
                table = T::TABLE,
                encoding = encoding.name(),
                "Table decoded with fallback encoding; next write converts it to UTF-8"
            );
        }

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<Value> =
            serde_json::from_str(&text).map_err(|e| self.corrupted(e.to_string()))?;
        let rows = raw
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let object = value
                    .as_object()
                    .ok_or_else(|| self.corrupted(format!("row {index} is not an object")))?;
                T::from_row(&RowReader::new(object))
                    .map_err(|reason| self.corrupted(format!("row {index}: {reason}")))
            })
            .collect::<StoreResult<Vec<T>>>()?;

        let mut keys = HashSet::with_capacity(rows.len());
        if let Some(dup) = rows.iter().find(|row| !keys.insert(row.key())) {
            return Err(self.corrupted(format!("duplicate key '{}'", dup.key())));
        }
        Ok(rows)
    }

    /// Overwrite the whole table atomically
    pub fn persist(&self, rows: &[T]) -> StoreResult<()> {
        let _writer = self.writer.lock();
        let _lock = self.lock_file()?;
        self.write_rows(rows)
    }

    /// Read-modify-write under both locks.
    ///
    /// `apply` sees a fresh table. If it fails nothing is written; if the
    /// write fails the change is dropped with the in-memory copy.
    pub fn update<R, E>(&self, apply: impl FnOnce(&mut Vec<T>) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let _writer = self.writer.lock();
        let _lock = self.lock_file()?;
        let mut rows = self.load_all()?;
        let output = apply(&mut rows)?;
        self.write_rows(&rows)?;
        Ok(output)
    }

    fn corrupted(&self, reason: String) -> StoreError {
        tracing::error!(table = T::TABLE, path = %self.path.display(), %reason, "Corrupted table");
        StoreError::Corrupted {
            path: self.path.clone(),
            reason,
        }
    }

    fn lock_file(&self) -> StoreResult<FileLock> {
        if let Some(parent) = self.lock_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;

        let mut attempt = 0;
        loop {
            match FileExt::try_lock_exclusive(&file) {
                Ok(()) => return Ok(FileLock { file }),
                Err(e) if attempt < self.options.lock_retries => {
                    attempt += 1;
                    tracing::debug!(
                        table = T::TABLE,
                        attempt,
                        error = %e,
                        "Table lock busy, retrying"
                    );
                    std::thread::sleep(self.options.lock_retry_delay);
                }
                Err(e) => {
                    tracing::warn!(
                        table = T::TABLE,
                        attempts = attempt + 1,
                        error = %e,
                        "Table lock not acquired"
                    );
                    return Err(StoreError::Locked {
                        path: self.path.clone(),
                    });
                }
            }
        }
    }

    /// Temp file in the same directory, fsync, rename over the target
    fn write_rows(&self, rows: &[T]) -> StoreResult<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let encoded: Vec<Row> = rows.iter().map(T::to_row).collect();
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        serde_json::to_writer_pretty(tmp.as_file_mut(), &encoded)?;
        tmp.as_file_mut().flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&self.path).map_err(|e| {
            // a spreadsheet holding the file open makes the rename fail
            if e.error.kind() == ErrorKind::PermissionDenied {
                tracing::error!(
                    table = T::TABLE,
                    path = %self.path.display(),
                    "Rename refused, table held open"
                );
                StoreError::Locked {
                    path: self.path.clone(),
                }
            } else {
                tracing::error!(
                    table = T::TABLE,
                    path = %self.path.display(),
                    error = %e.error,
                    "Persist failed"
                );
                StoreError::Io(e.error)
            }
        })?;

        tracing::debug!(table = T::TABLE, rows = rows.len(), "Table persisted");
        Ok(())
    }
}
