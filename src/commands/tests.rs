//! Tests for command handlers against a temporary data directory.

use super::*;
use crate::cli::{
    CommandNameArgs, LockKeyArgs, LockTryArgs, PullArgs, PullRecordArgs, PullSetStatusArgs,
    UnlockPullArgs,
};
use crate::error::PlanLockError;
use crate::events::{Event, EventAction};
use crate::models::{CommandName, Lease, Project, ProjectPlanStatus};
use tempfile::TempDir;

fn open_session(config: Config) -> (TempDir, Session) {
    let temp_dir = TempDir::new().unwrap();
    let ctx = DataContext {
        data_dir: temp_dir.path().join("data"),
    };
    let session = Session::open(ctx, config).unwrap();
    (temp_dir, session)
}

fn try_args(pull: u64) -> LockTryArgs {
    LockTryArgs {
        repo: "owner/repo".to_string(),
        path: ".".to_string(),
        workspace: "default".to_string(),
        project_name: String::new(),
        pull,
        head_commit: "sha1".to_string(),
        user: Some("alice".to_string()),
        hostname: None,
    }
}

fn key_args(key: &str) -> LockKeyArgs {
    LockKeyArgs {
        key: key.to_string(),
    }
}

fn pull_args(num: u64) -> PullArgs {
    PullArgs {
        repo: "owner/repo".to_string(),
        pull: num,
        hostname: None,
    }
}

fn recorded_actions(session: &Session) -> Vec<EventAction> {
    let path = session.ctx.events_file();
    if !path.exists() {
        return Vec::new();
    }
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str::<Event>(line).unwrap().action)
        .collect()
}

const KEY: &str = "owner/repo/./default";

#[test]
fn test_session_creates_database_in_data_dir() {
    let (_temp_dir, session) = open_session(Config::default());
    let db_path = session.ctx.db_path(&session.config);

    assert!(db_path.exists());
    let ctx = session.ctx.clone();
    session.close().unwrap();

    // The boot lock is released on close
    let reopened = Session::open(ctx, Config::default()).unwrap();
    reopened.close().unwrap();
}

#[test]
fn test_lock_try_queue_and_unlock() {
    let (_temp_dir, session) = open_session(Config::default());
    let project = Project::new("owner/repo", ".", "");

    lock::cmd_lock_try(&session, try_args(1)).unwrap();
    lock::cmd_lock_try(&session, try_args(2)).unwrap();
    // Already queued: no second entry and no second event
    lock::cmd_lock_try(&session, try_args(2)).unwrap();

    let queue = session.lock_store().list_queue(&project, "default").unwrap();
    assert_eq!(queue.len(), 1);

    lock::cmd_lock_queue(&session, key_args(KEY)).unwrap();
    lock::cmd_lock_list(&session).unwrap();
    lock::cmd_lock_get(&session, key_args(KEY)).unwrap();
    lock::cmd_lock_unlock(&session, key_args(KEY)).unwrap();

    let holder = session.lock_store().get_lock(&project, "default").unwrap().unwrap();
    assert_eq!(holder.pull.num, 2);
    assert_eq!(holder.user.username, "alice");
    assert_eq!(holder.pull.base_repo.vcs_host.hostname, "github.com");

    assert_eq!(
        recorded_actions(&session),
        vec![
            EventAction::LockAcquired,
            EventAction::LockEnqueued,
            EventAction::LockReleased,
            EventAction::LockHandedOff,
        ]
    );
}

#[test]
fn test_lock_try_by_holder_records_one_acquisition() {
    let (_temp_dir, session) = open_session(Config::default());

    lock::cmd_lock_try(&session, try_args(1)).unwrap();
    let first = session
        .lock_store()
        .get_lock(&Project::new("owner/repo", ".", ""), "default")
        .unwrap()
        .unwrap();

    lock::cmd_lock_try(&session, try_args(1)).unwrap();
    let second = session
        .lock_store()
        .get_lock(&Project::new("owner/repo", ".", ""), "default")
        .unwrap()
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(recorded_actions(&session), vec![EventAction::LockAcquired]);
}

#[test]
fn test_lock_unlock_missing_key_is_not_an_error() {
    let (_temp_dir, session) = open_session(Config::default());

    lock::cmd_lock_unlock(&session, key_args(KEY)).unwrap();
    assert!(recorded_actions(&session).is_empty());
}

#[test]
fn test_lock_commands_reject_malformed_key() {
    let (_temp_dir, session) = open_session(Config::default());

    let err = lock::cmd_lock_get(&session, key_args("nope")).unwrap_err();
    assert!(matches!(err, PlanLockError::InvalidKey(_)));
    let err = lock::cmd_lock_queue(&session, key_args("owner/repo")).unwrap_err();
    assert!(matches!(err, PlanLockError::InvalidKey(_)));
}

#[test]
fn test_unlock_pull() {
    let (_temp_dir, session) = open_session(Config::default());

    lock::cmd_lock_try(&session, try_args(1)).unwrap();
    lock::cmd_lock_try(
        &session,
        LockTryArgs {
            path: "modules/net".to_string(),
            ..try_args(1)
        },
    )
    .unwrap();

    lock::cmd_lock_unlock_pull(
        &session,
        UnlockPullArgs {
            repo: "owner/repo".to_string(),
            pull: 1,
        },
    )
    .unwrap();

    assert!(session.lock_store().list().unwrap().is_empty());
    assert_eq!(
        recorded_actions(&session).last(),
        Some(&EventAction::LocksReleasedByPull)
    );
}

#[test]
fn test_disabled_locking_stores_nothing() {
    let config = Config {
        disable_locking: true,
        ..Config::default()
    };
    let (_temp_dir, session) = open_session(config);

    lock::cmd_lock_try(&session, try_args(1)).unwrap();
    lock::cmd_lock_try(&session, try_args(2)).unwrap();

    assert!(session.lock_store().list().unwrap().is_empty());
}

#[test]
fn test_configured_lease_is_applied() {
    let config = Config {
        lock_lease_minutes: Some(15),
        ..Config::default()
    };
    let (_temp_dir, session) = open_session(config);

    lock::cmd_lock_try(&session, try_args(1)).unwrap();

    let lock = session
        .lock_store()
        .get_lock(&Project::new("owner/repo", ".", ""), "default")
        .unwrap()
        .unwrap();
    assert!(matches!(lock.lease, Lease::ExpiresAt(_)));
}

#[test]
fn test_audit_log_can_be_disabled() {
    let config = Config {
        audit_log: false,
        ..Config::default()
    };
    let (_temp_dir, session) = open_session(config);

    lock::cmd_lock_try(&session, try_args(1)).unwrap();

    assert!(!session.ctx.events_file().exists());
}

#[test]
fn test_command_lock_cycle() {
    let (_temp_dir, session) = open_session(Config::default());
    let apply = || CommandNameArgs {
        name: "apply".to_string(),
    };

    command_lock::cmd_command_lock(&session, apply()).unwrap();
    let err = command_lock::cmd_command_lock(&session, apply()).unwrap_err();
    assert!(matches!(err, PlanLockError::LockExists(_)));

    command_lock::cmd_command_check(&session, apply()).unwrap();
    assert!(
        session
            .command_locks()
            .check_command_lock(CommandName::Apply)
            .unwrap()
            .is_some()
    );

    command_lock::cmd_command_unlock(&session, apply()).unwrap();
    let err = command_lock::cmd_command_unlock(&session, apply()).unwrap_err();
    assert!(matches!(err, PlanLockError::LockNotFound(_)));

    assert_eq!(
        recorded_actions(&session),
        vec![EventAction::CommandLocked, EventAction::CommandUnlocked]
    );
}

#[test]
fn test_command_lock_unknown_name() {
    let (_temp_dir, session) = open_session(Config::default());

    let err = command_lock::cmd_command_lock(
        &session,
        CommandNameArgs {
            name: "deploy".to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, PlanLockError::UserError(_)));
    assert!(err.to_string().contains("deploy"));
}

#[test]
fn test_pull_record_set_status_and_delete() {
    let (temp_dir, session) = open_session(Config::default());
    let results_path = temp_dir.path().join("results.json");
    std::fs::write(
        &results_path,
        r#"[
            {"command": "plan", "workspace": "default", "repo_rel_dir": ".",
             "outcome": {"plan_success": {"no_changes": false}}},
            {"workspace": "staging", "repo_rel_dir": ".",
             "outcome": {"failure": "x"}}
        ]"#,
    )
    .unwrap();

    pull::cmd_pull_record(
        &session,
        PullRecordArgs {
            pull: pull_args(4),
            head_commit: "sha1".to_string(),
            results: results_path,
        },
    )
    .unwrap();

    pull::cmd_pull_set_status(
        &session,
        PullSetStatusArgs {
            pull: pull_args(4),
            workspace: "default".to_string(),
            dir: ".".to_string(),
            status: "applied".to_string(),
        },
    )
    .unwrap();

    let pull = session.pull_request("owner/repo", 4, None, "");
    let status = session.pull_statuses().get_pull_status(&pull).unwrap().unwrap();
    assert_eq!(status.pull.head_commit, "sha1");
    assert_eq!(status.projects.len(), 2);
    assert_eq!(status.projects[0].status, ProjectPlanStatus::Applied);
    assert_eq!(status.projects[1].status, ProjectPlanStatus::PlanErrored);

    pull::cmd_pull_show(
        &session,
        crate::cli::PullShowArgs {
            pull: pull_args(4),
            json: true,
        },
    )
    .unwrap();

    pull::cmd_pull_delete(&session, pull_args(4)).unwrap();
    assert!(session.pull_statuses().get_pull_status(&pull).unwrap().is_none());

    assert_eq!(
        recorded_actions(&session),
        vec![
            EventAction::PullStatusRecorded,
            EventAction::ProjectStatusUpdated,
            EventAction::PullStatusDeleted,
        ]
    );
}

#[test]
fn test_pull_record_bad_results_file() {
    let (temp_dir, session) = open_session(Config::default());
    let results_path = temp_dir.path().join("results.json");
    std::fs::write(&results_path, "{not json").unwrap();

    let err = pull::cmd_pull_record(
        &session,
        PullRecordArgs {
            pull: pull_args(4),
            head_commit: "sha1".to_string(),
            results: results_path,
        },
    )
    .unwrap_err();
    assert!(matches!(err, PlanLockError::UserError(_)));
    assert!(err.to_string().contains("failed to parse results file"));

    let err = pull::read_results(&temp_dir.path().join("missing.json")).unwrap_err();
    assert!(err.to_string().contains("failed to read results file"));
}

#[test]
fn test_pull_set_status_unknown_status() {
    let (_temp_dir, session) = open_session(Config::default());

    let err = pull::cmd_pull_set_status(
        &session,
        PullSetStatusArgs {
            pull: pull_args(4),
            workspace: "default".to_string(),
            dir: ".".to_string(),
            status: "shipped".to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, PlanLockError::UserError(_)));
}

#[test]
fn test_pull_commands_use_hostname_override() {
    let (_temp_dir, session) = open_session(Config::default());

    let err = pull::cmd_pull_delete(
        &session,
        PullArgs {
            hostname: Some("bad::host".to_string()),
            ..pull_args(1)
        },
    )
    .unwrap_err();
    assert!(matches!(err, PlanLockError::InvalidKey(_)));
}

#[test]
fn test_pull_show_summary_counts_errors() {
    let (temp_dir, session) = open_session(Config::default());
    let results_path = temp_dir.path().join("results.json");
    std::fs::write(
        &results_path,
        r#"[
            {"command": "plan", "workspace": "default", "repo_rel_dir": ".",
             "outcome": {"plan_success": {"no_changes": true}}},
            {"command": "apply", "workspace": "staging", "repo_rel_dir": ".",
             "outcome": {"failure": "boom"}},
            {"command": "policy_check", "workspace": "prod", "repo_rel_dir": ".",
             "outcome": {"error": "denied"}}
        ]"#,
    )
    .unwrap();
    pull::cmd_pull_record(
        &session,
        PullRecordArgs {
            pull: pull_args(9),
            head_commit: "sha1".to_string(),
            results: results_path,
        },
    )
    .unwrap();

    let pull = session.pull_request("owner/repo", 9, None, "");
    let status = session.pull_statuses().get_pull_status(&pull).unwrap().unwrap();
    assert_eq!(
        pull::status_summary(&status),
        "3 project(s): 1 planned, 0 applied, 2 errored"
    );

    pull::cmd_pull_show(
        &session,
        crate::cli::PullShowArgs {
            pull: pull_args(9),
            json: false,
        },
    )
    .unwrap();
}
