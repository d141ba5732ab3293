//! Per-pull-request project status.
//!
//! Records the latest plan/apply status of every project a pull request
//! touched, keyed by `{hostname}::{repo_full_name}::{pull_num}` in the
//! `pulls` bucket.
//!
//! # Staleness
//!
//! A status recorded for a different head commit is discarded when new
//! results arrive. Results for the same head commit are merged into the
//! existing status, leaving untouched projects as they were.

mod keys;
mod merge;
mod operations;


pub use keys::{PULL_KEY_SEPARATOR, pull_key};
pub use operations::PullStatusStore;
