//! Process-level exclusive lock on the database file.
//!
//! Only one process may open a given database at a time. The lock lives on a
//! sidecar `<db>.lock` file and is released when the guard is dropped.

use crate::error::{PlanLockError, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Backoff between try_lock attempts.
const POLL_INTERVAL_MS: u64 = 50;

/// Guard that holds the exclusive lock; releasing on drop.
#[derive(Debug)]
pub(super) struct BootLock {
    _file: File,
    path: PathBuf,
}

impl BootLock {
    pub(super) fn path(&self) -> &Path {
        &self.path
    }
}

/// Path of the sidecar lock file for `db_path`.
pub(super) fn boot_lock_path(db_path: &Path) -> PathBuf {
    let mut path = db_path.as_os_str().to_owned();
    path.push(".lock");
    PathBuf::from(path)
}

/// Acquire the exclusive boot lock for `db_path`, waiting up to `timeout`.
///
/// Fails with `DatabaseLocked` if another process still holds it when the
/// timeout elapses.
pub(super) fn acquire_boot_lock(db_path: &Path, timeout: Duration) -> Result<BootLock> {
    let lock_path = boot_lock_path(db_path);

    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|e| {
            PlanLockError::StorageError(format!(
                "failed to open lock file '{}': {}",
                lock_path.display(),
                e
            ))
        })?;

    let deadline = Instant::now() + timeout;
    let poll = Duration::from_millis(POLL_INTERVAL_MS);

    loop {
        match file.try_lock_exclusive() {
            Ok(()) => {
                return Ok(BootLock {
                    _file: file,
                    path: lock_path,
                });
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                if Instant::now() >= deadline {
                    return Err(PlanLockError::DatabaseLocked(format!(
                        "timed out after {:?} waiting for '{}' (a possible cause is another \
                         instance already running against {})",
                        timeout,
                        lock_path.display(),
                        db_path.display()
                    )));
                }
                thread::sleep(poll);
            }
            Err(e) => {
                return Err(PlanLockError::StorageError(format!(
                    "failed to acquire lock '{}': {}",
                    lock_path.display(),
                    e
                )));
            }
        }
    }
}
