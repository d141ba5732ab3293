//! Planlock: project locks, plan queues and pull request status for
//! Terraform pull-request automation.
//!
//! Plan and apply runs against the same project workspace must not overlap.
//! This crate keeps that guarantee on top of an embedded database:
//! - `locks`: one lock per project workspace with a FIFO queue of waiters
//! - `command_locks`: global switches disabling a command type
//! - `pull_status`: per-pull-request project status, merged per head commit
//!
//! One `storage::Database` is opened per process and shared by the stores.

pub mod cli;
pub mod command_locks;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod locks;
pub mod logging;
pub mod models;
pub mod pull_status;
pub mod storage;

#[cfg(test)]
mod test_support;
