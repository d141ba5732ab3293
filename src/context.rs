//! Data directory resolution for planlock.
//!
//! Every command works against one data directory holding the config file,
//! the database and the audit log. The directory is chosen, in order, from
//! the `--data-dir` flag, the `PLANLOCK_DATA_DIR` environment variable, and
//! `.planlock` under the current working directory.

use crate::config::Config;
use crate::error::{PlanLockError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "PLANLOCK_DATA_DIR";

/// Data directory used when neither the flag nor the environment names one.
pub const DEFAULT_DATA_DIR: &str = ".planlock";

/// Resolved paths for a planlock data directory. All paths are absolute.
#[derive(Debug, Clone)]
pub struct DataContext {
    pub data_dir: PathBuf,
}

impl DataContext {
    /// Resolve the data directory against the current working directory.
    pub fn resolve(data_dir_override: Option<&Path>) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            PlanLockError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        Ok(Self::resolve_from(&cwd, data_dir_override))
    }

    /// Resolve the data directory relative to `cwd`.
    pub fn resolve_from<P: AsRef<Path>>(cwd: P, data_dir_override: Option<&Path>) -> Self {
        let chosen = match data_dir_override {
            Some(dir) => dir.to_path_buf(),
            None => match env::var_os(DATA_DIR_ENV) {
                Some(dir) if !dir.is_empty() => PathBuf::from(dir),
                _ => PathBuf::from(DEFAULT_DATA_DIR),
            },
        };

        Self {
            data_dir: cwd.as_ref().join(chosen),
        }
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.yaml")
    }

    /// Get the path to the audit log.
    pub fn events_file(&self) -> PathBuf {
        self.data_dir.join("events.ndjson")
    }

    /// Get the path to the database file named by `config`.
    pub fn db_path(&self, config: &Config) -> PathBuf {
        self.data_dir.join(&config.db_file)
    }

    /// Load `config.yaml`, or the defaults if the data directory has none.
    pub fn load_config(&self) -> Result<Config> {
        Config::load_or_default(self.config_path())
    }
}
