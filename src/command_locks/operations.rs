//! Lock, unlock and check for global command locks.

use crate::error::{PlanLockError, Result};
use crate::models::{CommandLock, CommandName};
use crate::storage::{Bucket, Database};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Storage key for the lock on `name`.
pub fn command_lock_key(name: CommandName) -> String {
    format!("{}/lock", name)
}

#[derive(Debug, Clone)]
pub struct CommandLockStore {
    db: Arc<Database>,
}

impl CommandLockStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Disable `name`, recording `at` as the lock time.
    ///
    /// Fails with `LockExists` if the command is already locked; the
    /// existing lock is left as is.
    pub fn lock_command(&self, name: CommandName, at: DateTime<Utc>) -> Result<CommandLock> {
        let key = command_lock_key(name);
        let lock = CommandLock::new(name, at);

        self.db.update(|tx| {
            if tx.get(Bucket::GlobalLocks, &key)?.is_some() {
                return Err(PlanLockError::LockExists(format!(
                    "command '{}' is already locked",
                    name
                )));
            }
            tx.put_json(Bucket::GlobalLocks, &key, &lock)?;
            Ok(())
        })?;

        log::info!("locked command '{}'", name);
        Ok(lock)
    }

    /// Re-enable `name`. Fails with `LockNotFound` if it is not locked.
    pub fn unlock_command(&self, name: CommandName) -> Result<()> {
        let key = command_lock_key(name);

        self.db.update(|tx| {
            if !tx.delete(Bucket::GlobalLocks, &key)? {
                return Err(PlanLockError::LockNotFound(format!(
                    "command '{}' is not locked",
                    name
                )));
            }
            Ok(())
        })?;

        log::info!("unlocked command '{}'", name);
        Ok(())
    }

    /// The lock on `name`, if any.
    pub fn check_command_lock(&self, name: CommandName) -> Result<Option<CommandLock>> {
        let key = command_lock_key(name);
        self.db.view(|tx| tx.get_json(Bucket::GlobalLocks, &key))
    }
}
