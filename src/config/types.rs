//! Configuration types and defaults for planlock.

use serde::{Deserialize, Serialize};

/// Log verbosity accepted in `log_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse a log level, case-insensitively.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Some(Self::Off),
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }

    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            Self::Off => log::LevelFilter::Off,
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

// Default value functions for serde
pub(crate) fn default_db_file() -> String {
    "planlock.db".to_string()
}
pub(crate) fn default_open_timeout_secs() -> u64 {
    1
}
pub(crate) fn default_busy_timeout_ms() -> u64 {
    5000
}
pub(crate) fn default_log_level() -> String {
    "info".to_string()
}
pub(crate) fn default_vcs_hostname() -> String {
    "github.com".to_string()
}
pub(crate) fn default_true() -> bool {
    true
}
