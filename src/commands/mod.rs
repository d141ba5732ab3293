//! Command implementations for planlock.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, and the `Session` that owns the open database for the
//! duration of one command.

mod command_lock;
mod lock;
mod pull;

#[cfg(test)]
mod tests;

use crate::cli::{Command, CommandLockAction, LockAction, PullAction};
use crate::command_locks::CommandLockStore;
use crate::config::Config;
use crate::context::DataContext;
use crate::error::Result;
use crate::events::{Event, append_event};
use crate::locks::{LockStore, Locker, LockingClient, NoOpLocker};
use crate::models::{ProjectLock, PullRequest, Repo, VcsHost, VcsHostType};
use crate::pull_status::PullStatusStore;
use crate::storage::Database;
use std::sync::Arc;

/// An open data directory: its config and database.
///
/// The database is opened once per command and closed when the command
/// finishes; stores borrow it through `Arc` clones.
pub struct Session {
    pub ctx: DataContext,
    pub config: Config,
    db: Arc<Database>,
}

impl Session {
    /// Open the database named by `config` inside `ctx`'s data directory.
    pub fn open(ctx: DataContext, config: Config) -> Result<Self> {
        let db = Database::open(ctx.db_path(&config), &config.storage_options())?;
        Ok(Self {
            ctx,
            config,
            db: Arc::new(db),
        })
    }

    /// The locker for this data directory, honoring `disable_locking` and
    /// `lock_lease_minutes`.
    pub fn locker(&self) -> Box<dyn Locker> {
        if self.config.disable_locking {
            return Box::new(NoOpLocker);
        }
        let client = LockingClient::new(self.lock_store());
        match self.config.lease() {
            Some(length) => Box::new(client.with_lease(length)),
            None => Box::new(client),
        }
    }

    pub fn lock_store(&self) -> LockStore {
        LockStore::new(self.db.clone())
    }

    pub fn command_locks(&self) -> CommandLockStore {
        CommandLockStore::new(self.db.clone())
    }

    pub fn pull_statuses(&self) -> PullStatusStore {
        PullStatusStore::new(self.db.clone())
    }

    /// Append `event` to the audit log if it is enabled.
    ///
    /// The change it describes is already committed, so a failed append is
    /// reported but does not fail the command.
    pub fn record(&self, event: Event) {
        if !self.config.audit_log {
            return;
        }
        if let Err(e) = append_event(&self.ctx, &event) {
            log::warn!("failed to record {} event: {}", event.action, e);
            eprintln!("Warning: failed to log {} event: {}", event.action, e);
        }
    }

    /// Build a pull request reference from CLI arguments.
    pub fn pull_request(
        &self,
        repo_full_name: &str,
        num: u64,
        hostname: Option<String>,
        head_commit: &str,
    ) -> PullRequest {
        let hostname = hostname.unwrap_or_else(|| self.config.default_vcs_hostname.clone());
        PullRequest {
            num,
            head_commit: head_commit.to_string(),
            base_repo: Repo::new(
                repo_full_name,
                VcsHost {
                    hostname,
                    host_type: VcsHostType::default(),
                },
            ),
            ..Default::default()
        }
    }

    /// Close the database. Stores handed out earlier must be dropped first.
    pub fn close(self) -> Result<()> {
        match Arc::try_unwrap(self.db) {
            Ok(db) => db.close(),
            // Still shared; the last drop closes it
            Err(_) => Ok(()),
        }
    }
}

/// Dispatch a command to its implementation.
///
/// Opens the database for the command and closes it afterwards, whether or
/// not the command succeeded.
pub fn dispatch(ctx: DataContext, config: Config, command: Command) -> Result<()> {
    let session = Session::open(ctx, config)?;
    let result = run(&session, command);
    let closed = session.close();
    result.and(closed)
}

fn run(session: &Session, command: Command) -> Result<()> {
    match command {
        Command::Lock(lock_cmd) => match lock_cmd.action {
            LockAction::Try(args) => lock::cmd_lock_try(session, args),
            LockAction::Unlock(args) => lock::cmd_lock_unlock(session, args),
            LockAction::Get(args) => lock::cmd_lock_get(session, args),
            LockAction::List => lock::cmd_lock_list(session),
            LockAction::Queue(args) => lock::cmd_lock_queue(session, args),
            LockAction::UnlockPull(args) => lock::cmd_lock_unlock_pull(session, args),
        },
        Command::Command(command_cmd) => match command_cmd.action {
            CommandLockAction::Lock(args) => command_lock::cmd_command_lock(session, args),
            CommandLockAction::Unlock(args) => command_lock::cmd_command_unlock(session, args),
            CommandLockAction::Check(args) => command_lock::cmd_command_check(session, args),
        },
        Command::Pull(pull_cmd) => match pull_cmd.action {
            PullAction::Show(args) => pull::cmd_pull_show(session, args),
            PullAction::Delete(args) => pull::cmd_pull_delete(session, args),
            PullAction::Record(args) => pull::cmd_pull_record(session, args),
            PullAction::SetStatus(args) => pull::cmd_pull_set_status(session, args),
        },
    }
}

/// Username of the invoking user, from the environment.
pub(crate) fn current_username() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Print the fields of a project lock, indented by `indent` spaces.
pub(crate) fn print_lock(lock: &ProjectLock, indent: usize) {
    let pad = " ".repeat(indent);
    println!("{}Pull:       #{}", pad, lock.pull.num);
    println!("{}User:       {}", pad, lock.user.username);
    println!("{}Workspace:  {}", pad, lock.workspace);
    println!("{}Path:       {}", pad, lock.project.path);
    if !lock.project.project_name.is_empty() {
        println!("{}Project:    {}", pad, lock.project.project_name);
    }
    println!(
        "{}Since:      {}",
        pad,
        lock.time.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let crate::models::Lease::ExpiresAt(at) = lock.lease {
        println!("{}Expires:    {}", pad, at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
}
