//! Config loading, validation, and derived settings.

use super::model::Config;
use super::types::LogLevel;
use crate::error::{PlanLockError, Result};
use crate::storage::StorageOptions;
use std::path::Path;
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(PlanLockError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            PlanLockError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from `path`, or use the defaults if the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| PlanLockError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            PlanLockError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `open_timeout_secs`, `busy_timeout_ms` and `lock_lease_minutes` must be positive
    /// - `db_file` must be a bare file name
    /// - `log_level` must be a known level
    pub fn validate(&self) -> Result<()> {
        if self.open_timeout_secs == 0 {
            return Err(invalid("open_timeout_secs must be greater than 0"));
        }

        if self.busy_timeout_ms == 0 {
            return Err(invalid("busy_timeout_ms must be greater than 0"));
        }

        if self.lock_lease_minutes == Some(0) {
            return Err(invalid(
                "lock_lease_minutes must be greater than 0 (omit it to disable leases)",
            ));
        }

        if self.db_file.is_empty()
            || self.db_file.contains('/')
            || self.db_file.contains('\\')
            || self.db_file == "."
            || self.db_file == ".."
        {
            return Err(PlanLockError::UserError(format!(
                "config validation failed: db_file must be a file name, not a path (found '{}')",
                self.db_file
            )));
        }

        if LogLevel::from_str(&self.log_level).is_none() {
            return Err(PlanLockError::UserError(format!(
                "config validation failed: unknown log_level '{}'. Use one of off, error, warn, info, debug, trace.",
                self.log_level
            )));
        }

        Ok(())
    }

    /// Storage engine options derived from the timeouts.
    pub fn storage_options(&self) -> StorageOptions {
        StorageOptions {
            open_timeout: Duration::from_secs(self.open_timeout_secs),
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }

    /// Lease length for new locks, if leases are enabled.
    pub fn lease(&self) -> Option<chrono::Duration> {
        self.lock_lease_minutes
            .and_then(|minutes| i64::try_from(minutes).ok())
            .and_then(chrono::Duration::try_minutes)
    }

    /// Configured log level. Falls back to info for unvalidated configs.
    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_str(&self.log_level).unwrap_or_default()
    }
}

fn invalid(message: &str) -> PlanLockError {
    PlanLockError::UserError(format!("config validation failed: {}", message))
}
