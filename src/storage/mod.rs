//! Embedded transactional key-value storage.
//!
//! This module is the durability layer for every store in the crate. It
//! provides:
//! - Named partitions (`Bucket`) in a single SQLite file
//! - Atomic read-modify-write transactions (`Database::update`)
//! - Read-only transactions (`Database::view`)
//! - Byte-ordered prefix scans (`Tx::scan_prefix`)
//!
//! # Isolation
//!
//! Write transactions run with `BEGIN IMMEDIATE` behind an in-process mutex,
//! so writers are fully serialized and each closure sees its own writes.
//!
//! # Startup
//!
//! Opening the database takes an exclusive lock on `<db>.lock`. A second
//! process pointed at the same file fails with `DatabaseLocked` once
//! the open timeout elapses.

mod boot_lock;
mod bucket;
mod engine;
mod tx;


// Re-export public API
pub use bucket::Bucket;
pub use engine::{Database, StorageOptions};
pub use tx::{Tx, decode_json};
