//! Project lock subsystem.
//!
//! This module guarantees mutual exclusion for plan/apply runs against the
//! same project and workspace:
//! - One current lock per lock key (`runLocks` bucket)
//! - A FIFO queue of waiting requests per lock key (`queue` bucket)
//! - Hand-off of the lock to the head of the queue on unlock
//!
//! # Lock Keys
//!
//! Keys are `{repo_full_name}/{path}/{workspace}`. See `keys` for the
//! encoding and its ambiguities.
//!
//! # Queueing
//!
//! A request for a key held by another pull request is not an error: it is
//! queued (at most once per pull request) and told its position. The same
//! pull request asking again is re-granted the lock it already holds.
//!
//! # Leases
//!
//! Locks are held until released unless the caller attaches a lease. An
//! expired lease is released by the next `try_lock` on that key, even one
//! from the pull request that held it.

mod client;
mod keys;
mod operations;
mod types;


// Re-export public API
pub use client::{Locker, LockingClient, NoOpLocker};
pub use keys::{lock_key, parse_lock_key};
pub use operations::LockStore;
pub use types::{
    DequeueStatus, EnqueueStatus, TryLockResponse, UnlockByPullOutcome, UnlockResponse,
};
