//! Global command locks.
//!
//! A command lock disables one command type (for example `apply`) for every
//! repository until it is removed. Locks live in the `globalLocks` bucket
//! under `{command_name}/lock`.

mod operations;

#[cfg(test)]
mod tests;

pub use operations::{CommandLockStore, command_lock_key};
