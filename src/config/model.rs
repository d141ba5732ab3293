//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for a planlock data directory.
///
/// This struct represents the contents of `{data_dir}/config.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Storage settings
    // =========================================================================
    /// Database file name inside the data directory.
    #[serde(default = "default_db_file")]
    pub db_file: String,

    /// Seconds to wait for another process to release the database.
    #[serde(default = "default_open_timeout_secs")]
    pub open_timeout_secs: u64,

    /// Milliseconds SQLite retries a busy database before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    // =========================================================================
    // Lock settings
    // =========================================================================
    /// Lease length for new project locks. Unset means locks never expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_lease_minutes: Option<u64>,

    /// Grant every lock request without recording anything.
    #[serde(default)]
    pub disable_locking: bool,

    // =========================================================================
    // Output settings
    // =========================================================================
    /// Append lock and status changes to `events.ndjson`.
    #[serde(default = "default_true")]
    pub audit_log: bool,

    /// One of off, error, warn, info, debug, trace.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// VCS hostname used when a command does not name one.
    #[serde(default = "default_vcs_hostname")]
    pub default_vcs_hostname: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_file: default_db_file(),
            open_timeout_secs: default_open_timeout_secs(),
            busy_timeout_ms: default_busy_timeout_ms(),
            lock_lease_minutes: None,
            disable_locking: false,
            audit_log: default_true(),
            log_level: default_log_level(),
            default_vcs_hostname: default_vcs_hostname(),
        }
    }
}
