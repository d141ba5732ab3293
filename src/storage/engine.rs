//! The embedded database handle.

use super::boot_lock::{BootLock, acquire_boot_lock};
use super::tx::Tx;
use crate::error::{PlanLockError, Result};
use parking_lot::Mutex;
use rusqlite::{Connection, TransactionBehavior};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Tuning for opening the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageOptions {
    /// How long to wait for another process to release the database file.
    pub open_timeout: Duration,

    /// How long SQLite waits on a busy database before failing a statement.
    pub busy_timeout: Duration,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            open_timeout: Duration::from_secs(1),
            busy_timeout: Duration::from_millis(5000),
        }
    }
}

/// An open database file.
///
/// Open one per process at startup and share it (usually behind an `Arc`)
/// with every store. Write transactions are serialized; a failed closure
/// rolls back so no partial write is ever visible. Dropping the handle
/// closes the connection and then releases the file lock.
pub struct Database {
    conn: Mutex<Connection>,
    path: PathBuf,
    boot_lock: BootLock,
}

impl Database {
    /// Open or create the database at `path`.
    ///
    /// Fails with `DatabaseLocked` if another process holds the database for
    /// longer than `options.open_timeout`.
    pub fn open<P: AsRef<Path>>(path: P, options: &StorageOptions) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                PlanLockError::StorageError(format!(
                    "failed to create data directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let boot_lock = acquire_boot_lock(path, options.open_timeout)?;

        let conn = Connection::open(path).map_err(|e| {
            PlanLockError::StorageError(format!(
                "failed to open database '{}': {}",
                path.display(),
                e
            ))
        })?;
        conn.busy_timeout(options.busy_timeout)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = FULL;
            CREATE TABLE IF NOT EXISTS kv (
                bucket TEXT NOT NULL,
                key BLOB NOT NULL,
                value BLOB NOT NULL,
                PRIMARY KEY (bucket, key)
            ) WITHOUT ROWID;
            ",
        )?;

        log::info!(
            "opened database {} (lock file {})",
            path.display(),
            boot_lock.path().display()
        );

        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_path_buf(),
            boot_lock,
        })
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` in a write transaction.
    ///
    /// Commits if `f` returns `Ok`, rolls back otherwise.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Tx<'_>) -> Result<T>,
    {
        let mut conn = self.conn.lock();
        let tx = Tx {
            inner: conn.transaction_with_behavior(TransactionBehavior::Immediate)?,
        };
        let value = f(&tx)?;
        tx.inner.commit()?;
        Ok(value)
    }

    /// Run `f` in a read transaction. Nothing written inside is kept.
    pub fn view<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Tx<'_>) -> Result<T>,
    {
        let mut conn = self.conn.lock();
        let tx = Tx {
            inner: conn.transaction_with_behavior(TransactionBehavior::Deferred)?,
        };
        f(&tx)
    }

    /// Close the database, surfacing any error from the final flush.
    pub fn close(self) -> Result<()> {
        let Database {
            conn,
            path,
            boot_lock,
        } = self;
        conn.into_inner()
            .close()
            .map_err(|(_, e)| PlanLockError::StorageError(format!("failed to close database: {}", e)))?;
        drop(boot_lock);
        log::info!("closed database {}", path.display());
        Ok(())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}
