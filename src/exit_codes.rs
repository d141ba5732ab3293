//! Exit code constants for the planlock CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid key, missing lock)
//! - 2: Storage failure (database I/O, transaction aborted)
//! - 3: Data failure (a stored record could not be decoded)
//! - 4: Lock failure (database held by another instance, lock already exists)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid keys, or nothing to unlock.
pub const USER_ERROR: i32 = 1;

/// Storage failure: the embedded database rejected or aborted a transaction.
pub const STORAGE_FAILURE: i32 = 2;

/// Data failure: a stored record is corrupt or from an incompatible version.
pub const DATA_FAILURE: i32 = 3;

/// Lock failure: the database file or a command lock is already held.
pub const LOCK_FAILURE: i32 = 4;
