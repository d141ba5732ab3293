//! Command names and the global command lock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A command that can be run against a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommandName {
    #[default]
    Plan,
    Apply,
    Unlock,
    PolicyCheck,
    ApprovePolicies,
    Autoplan,
    Import,
    State,
    Version,
}

impl CommandName {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::Plan => "plan",
            CommandName::Apply => "apply",
            CommandName::Unlock => "unlock",
            CommandName::PolicyCheck => "policy_check",
            CommandName::ApprovePolicies => "approve_policies",
            CommandName::Autoplan => "autoplan",
            CommandName::Import => "import",
            CommandName::State => "state",
            CommandName::Version => "version",
        }
    }
}

impl std::fmt::Display for CommandName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CommandName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plan" => Ok(CommandName::Plan),
            "apply" => Ok(CommandName::Apply),
            "unlock" => Ok(CommandName::Unlock),
            "policy_check" => Ok(CommandName::PolicyCheck),
            "approve_policies" => Ok(CommandName::ApprovePolicies),
            "autoplan" => Ok(CommandName::Autoplan),
            "import" => Ok(CommandName::Import),
            "state" => Ok(CommandName::State),
            "version" => Ok(CommandName::Version),
            other => Err(format!("unknown command name '{}'", other)),
        }
    }
}

/// When a command lock was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CommandLockMetadata {
    pub unix_time: i64,
}

/// A global lock disabling one command type until it is unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLock {
    pub command_name: CommandName,
    pub lock_metadata: CommandLockMetadata,
}

impl CommandLock {
    pub fn new(command_name: CommandName, at: DateTime<Utc>) -> Self {
        Self {
            command_name,
            lock_metadata: CommandLockMetadata {
                unix_time: at.timestamp(),
            },
        }
    }

    /// The lock time, or `None` if the stored timestamp is out of range.
    pub fn lock_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.lock_metadata.unix_time, 0)
    }
}
