//! Audit log of lock and status changes.
//!
//! Events are appended to `{data_dir}/events.ndjson`, one JSON object per
//! line. The database holds the current state; this file records who changed
//! it and when.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: what happened (`lock_acquired`, `command_locked`, ...)
//! - `actor`: `user@HOST` of the process that made the change
//! - `key`: storage key the change applies to, when there is one
//! - `details`: action-specific object
//!
//! ```no_run
//! use planlock::context::DataContext;
//! use planlock::events::{Event, EventAction, append_event};
//! use serde_json::json;
//!
//! let ctx = DataContext::resolve(None)?;
//! let event = Event::new(EventAction::CommandLocked)
//!     .with_key("apply/lock")
//!     .with_details(json!({"command": "apply"}));
//! append_event(&ctx, &event)?;
//! # Ok::<(), planlock::error::PlanLockError>(())
//! ```

use crate::context::DataContext;
use crate::error::{PlanLockError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    LockAcquired,
    LockEnqueued,
    LockReleased,
    /// A released lock passed to the head of its queue.
    LockHandedOff,
    LocksReleasedByPull,
    CommandLocked,
    CommandUnlocked,
    PullStatusRecorded,
    PullStatusDeleted,
    ProjectStatusUpdated,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventAction::LockAcquired => "lock_acquired",
            EventAction::LockEnqueued => "lock_enqueued",
            EventAction::LockReleased => "lock_released",
            EventAction::LockHandedOff => "lock_handed_off",
            EventAction::LocksReleasedByPull => "locks_released_by_pull",
            EventAction::CommandLocked => "command_locked",
            EventAction::CommandUnlocked => "command_unlocked",
            EventAction::PullStatusRecorded => "pull_status_recorded",
            EventAction::PullStatusDeleted => "pull_status_deleted",
            EventAction::ProjectStatusUpdated => "project_status_updated",
        };
        write!(f, "{}", s)
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,

    pub action: EventAction,

    /// `user@HOST` of the process that made the change.
    pub actor: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    pub details: Value,
}

impl Event {
    /// Create a new event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            key: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            PlanLockError::SerializationError(format!("failed to serialize event to JSON: {}", e))
        })
    }
}

fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append an event to the audit log.
///
/// The data directory and file are created if missing. Each call writes
/// exactly one line and syncs it to disk.
pub fn append_event(ctx: &DataContext, event: &Event) -> Result<()> {
    let events_file = ctx.events_file();
    let json_line = event.to_ndjson_line()?;

    if !ctx.data_dir.exists() {
        fs::create_dir_all(&ctx.data_dir).map_err(|e| {
            PlanLockError::UserError(format!(
                "failed to create data directory '{}': {}",
                ctx.data_dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            PlanLockError::UserError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        PlanLockError::UserError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        PlanLockError::UserError(format!(
            "failed to sync events file '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_context() -> (TempDir, DataContext) {
        let temp_dir = TempDir::new().unwrap();
        let ctx = DataContext {
            data_dir: temp_dir.path().join("data"),
        };
        (temp_dir, ctx)
    }

    fn read_lines(ctx: &DataContext) -> Vec<String> {
        fs::read_to_string(ctx.events_file())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_event_creation() {
        let event = Event::new(EventAction::LockAcquired);

        assert_eq!(event.action, EventAction::LockAcquired);
        assert!(event.actor.contains('@'));
        assert!(event.key.is_none());
        assert!(event.details.is_object());
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::new(EventAction::LockEnqueued)
            .with_key("owner/repo/./default")
            .with_details(json!({"pull": 2, "position": 1}));

        let line = event.to_ndjson_line().unwrap();
        assert!(!line.contains('\n'));

        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["action"], "lock_enqueued");
        assert_eq!(value["key"], "owner/repo/./default");
        assert_eq!(value["details"]["position"], 1);
    }

    #[test]
    fn test_event_without_key_omits_field() {
        let line = Event::new(EventAction::CommandLocked).to_ndjson_line().unwrap();
        assert!(!line.contains("\"key\""));
    }

    #[test]
    fn test_append_event_creates_dir_and_file() {
        let (_temp_dir, ctx) = test_context();
        assert!(!ctx.data_dir.exists());

        append_event(&ctx, &Event::new(EventAction::LockReleased)).unwrap();

        assert!(ctx.events_file().exists());
        assert_eq!(read_lines(&ctx).len(), 1);
    }

    #[test]
    fn test_append_event_multiple_lines() {
        let (_temp_dir, ctx) = test_context();

        append_event(&ctx, &Event::new(EventAction::LockAcquired).with_key("a")).unwrap();
        append_event(&ctx, &Event::new(EventAction::LockHandedOff).with_key("a")).unwrap();
        append_event(&ctx, &Event::new(EventAction::PullStatusDeleted)).unwrap();

        let lines = read_lines(&ctx);
        assert_eq!(lines.len(), 3);
        let actions: Vec<EventAction> = lines
            .iter()
            .map(|l| serde_json::from_str::<Event>(l).unwrap().action)
            .collect();
        assert_eq!(
            actions,
            vec![
                EventAction::LockAcquired,
                EventAction::LockHandedOff,
                EventAction::PullStatusDeleted
            ]
        );
    }

    #[test]
    fn test_append_event_trailing_newline() {
        let (_temp_dir, ctx) = test_context();
        append_event(&ctx, &Event::new(EventAction::CommandUnlocked)).unwrap();

        let content = fs::read_to_string(ctx.events_file()).unwrap();
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_event_action_display_matches_serde() {
        for action in [
            EventAction::LockAcquired,
            EventAction::LocksReleasedByPull,
            EventAction::ProjectStatusUpdated,
            EventAction::PullStatusRecorded,
        ] {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action));
        }
    }
}
