//! CLI argument parsing for planlock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Planlock: project locks, plan queues and pull request status for
/// Terraform pull-request automation.
///
/// State lives in one data directory:
/// - `config.yaml` for settings
/// - an embedded database with locks, queues and pull status
/// - `events.ndjson`, an append-only audit log
#[derive(Parser, Debug)]
#[command(name = "planlock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (default: $PLANLOCK_DATA_DIR, then ./.planlock).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for planlock.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project lock commands.
    ///
    /// Acquire, release and inspect locks on project workspaces.
    Lock(LockCommand),

    /// Global command lock commands.
    ///
    /// Disable or re-enable a command type (e.g. apply) everywhere.
    Command(CommandLockCommand),

    /// Pull request status commands.
    ///
    /// Record and inspect per-project plan/apply status.
    Pull(PullCommand),
}

/// Lock subcommands.
#[derive(Parser, Debug)]
pub struct LockCommand {
    #[command(subcommand)]
    pub action: LockAction,
}

/// Available lock actions.
#[derive(Subcommand, Debug)]
pub enum LockAction {
    /// Lock a project workspace for a pull request, or join its queue.
    Try(LockTryArgs),

    /// Release a lock by key, handing it to the next queued pull request.
    Unlock(LockKeyArgs),

    /// Show the lock at a key.
    Get(LockKeyArgs),

    /// List all current locks.
    List,

    /// Show pull requests waiting on a key.
    Queue(LockKeyArgs),

    /// Release every lock held by a pull request.
    UnlockPull(UnlockPullArgs),
}

/// Arguments for the `lock try` command.
#[derive(Parser, Debug)]
pub struct LockTryArgs {
    /// Repository full name (owner/repo).
    #[arg(long)]
    pub repo: String,

    /// Project path relative to the repository root.
    #[arg(long, default_value = ".")]
    pub path: String,

    /// Terraform workspace.
    #[arg(short, long, default_value = "default")]
    pub workspace: String,

    /// Project name, if the project is named in repo config.
    #[arg(long, default_value = "")]
    pub project_name: String,

    /// Pull request number.
    #[arg(long)]
    pub pull: u64,

    /// Head commit of the pull request.
    #[arg(long, default_value = "")]
    pub head_commit: String,

    /// User running the command (default: $USER).
    #[arg(long)]
    pub user: Option<String>,

    /// VCS hostname (default: config `default_vcs_hostname`).
    #[arg(long)]
    pub hostname: Option<String>,
}

/// A lock key argument.
#[derive(Parser, Debug)]
pub struct LockKeyArgs {
    /// Lock key in the form owner/repo/path/workspace.
    pub key: String,
}

/// Arguments for the `lock unlock-pull` command.
#[derive(Parser, Debug)]
pub struct UnlockPullArgs {
    /// Repository full name (owner/repo).
    #[arg(long)]
    pub repo: String,

    /// Pull request number.
    #[arg(long)]
    pub pull: u64,
}

/// Command lock subcommands.
#[derive(Parser, Debug)]
pub struct CommandLockCommand {
    #[command(subcommand)]
    pub action: CommandLockAction,
}

/// Available command lock actions.
#[derive(Subcommand, Debug)]
pub enum CommandLockAction {
    /// Disable a command.
    Lock(CommandNameArgs),

    /// Re-enable a command.
    Unlock(CommandNameArgs),

    /// Show whether a command is disabled.
    Check(CommandNameArgs),
}

/// A command name argument.
#[derive(Parser, Debug)]
pub struct CommandNameArgs {
    /// Command name (plan, apply, policy_check, ...).
    pub name: String,
}

/// Pull status subcommands.
#[derive(Parser, Debug)]
pub struct PullCommand {
    #[command(subcommand)]
    pub action: PullAction,
}

/// Available pull status actions.
#[derive(Subcommand, Debug)]
pub enum PullAction {
    /// Show the recorded status of a pull request.
    Show(PullShowArgs),

    /// Forget the recorded status of a pull request.
    Delete(PullArgs),

    /// Record command results for a pull request.
    ///
    /// Results for a new head commit replace the recorded status; results for
    /// the same head commit are merged into it.
    Record(PullRecordArgs),

    /// Overwrite the status of one project.
    SetStatus(PullSetStatusArgs),
}

/// Identifies a pull request.
#[derive(Args, Debug, Clone)]
pub struct PullArgs {
    /// Repository full name (owner/repo).
    #[arg(long)]
    pub repo: String,

    /// Pull request number.
    #[arg(long)]
    pub pull: u64,

    /// VCS hostname (default: config `default_vcs_hostname`).
    #[arg(long)]
    pub hostname: Option<String>,
}

/// Arguments for the `pull show` command.
#[derive(Parser, Debug)]
pub struct PullShowArgs {
    #[command(flatten)]
    pub pull: PullArgs,

    /// Print the status as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `pull record` command.
#[derive(Parser, Debug)]
pub struct PullRecordArgs {
    #[command(flatten)]
    pub pull: PullArgs,

    /// Head commit the results were produced for.
    #[arg(long)]
    pub head_commit: String,

    /// JSON file holding an array of project results.
    #[arg(long)]
    pub results: PathBuf,
}

/// Arguments for the `pull set-status` command.
#[derive(Parser, Debug)]
pub struct PullSetStatusArgs {
    #[command(flatten)]
    pub pull: PullArgs,

    /// Terraform workspace of the project.
    #[arg(short, long, default_value = "default")]
    pub workspace: String,

    /// Project directory relative to the repository root.
    #[arg(long, default_value = ".")]
    pub dir: String,

    /// New status (planned, applied, plan_errored, ...).
    #[arg(long)]
    pub status: String,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_lock_try_minimal() {
        let cli =
            Cli::try_parse_from(["planlock", "lock", "try", "--repo", "owner/repo", "--pull", "3"])
                .unwrap();
        if let Command::Lock(LockCommand {
            action: LockAction::Try(args),
        }) = cli.command
        {
            assert_eq!(args.repo, "owner/repo");
            assert_eq!(args.path, ".");
            assert_eq!(args.workspace, "default");
            assert_eq!(args.pull, 3);
            assert!(args.user.is_none());
            assert!(args.hostname.is_none());
        } else {
            panic!("Expected lock try command");
        }
    }

    #[test]
    fn parse_lock_try_full() {
        let cli = Cli::try_parse_from([
            "planlock",
            "--data-dir",
            "/tmp/pl",
            "lock",
            "try",
            "--repo",
            "owner/repo",
            "--path",
            "modules/net",
            "-w",
            "staging",
            "--project-name",
            "network",
            "--pull",
            "12",
            "--head-commit",
            "abc123",
            "--user",
            "alice",
            "--hostname",
            "gitlab.com",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/pl")));
        if let Command::Lock(LockCommand {
            action: LockAction::Try(args),
        }) = cli.command
        {
            assert_eq!(args.path, "modules/net");
            assert_eq!(args.workspace, "staging");
            assert_eq!(args.project_name, "network");
            assert_eq!(args.head_commit, "abc123");
            assert_eq!(args.user.as_deref(), Some("alice"));
            assert_eq!(args.hostname.as_deref(), Some("gitlab.com"));
        } else {
            panic!("Expected lock try command");
        }
    }

    #[test]
    fn parse_lock_try_requires_pull() {
        let result = Cli::try_parse_from(["planlock", "lock", "try", "--repo", "owner/repo"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_lock_key_commands() {
        for (name, expect) in [("unlock", 0), ("get", 1), ("queue", 2)] {
            let cli =
                Cli::try_parse_from(["planlock", "lock", name, "owner/repo/./default"]).unwrap();
            let Command::Lock(lock_cmd) = cli.command else {
                panic!("Expected lock command");
            };
            let (index, key) = match lock_cmd.action {
                LockAction::Unlock(args) => (0, args.key),
                LockAction::Get(args) => (1, args.key),
                LockAction::Queue(args) => (2, args.key),
                other => panic!("unexpected {:?}", other),
            };
            assert_eq!(index, expect);
            assert_eq!(key, "owner/repo/./default");
        }
    }

    #[test]
    fn parse_lock_list() {
        let cli = Cli::try_parse_from(["planlock", "lock", "list"]).unwrap();
        if let Command::Lock(lock_cmd) = cli.command {
            assert!(matches!(lock_cmd.action, LockAction::List));
        } else {
            panic!("Expected lock command");
        }
    }

    #[test]
    fn parse_unlock_pull() {
        let cli = Cli::try_parse_from([
            "planlock",
            "lock",
            "unlock-pull",
            "--repo",
            "owner/repo",
            "--pull",
            "7",
        ])
        .unwrap();
        if let Command::Lock(LockCommand {
            action: LockAction::UnlockPull(args),
        }) = cli.command
        {
            assert_eq!(args.repo, "owner/repo");
            assert_eq!(args.pull, 7);
        } else {
            panic!("Expected lock unlock-pull command");
        }
    }

    #[test]
    fn parse_command_lock() {
        let cli = Cli::try_parse_from(["planlock", "command", "lock", "apply"]).unwrap();
        if let Command::Command(CommandLockCommand {
            action: CommandLockAction::Lock(args),
        }) = cli.command
        {
            assert_eq!(args.name, "apply");
        } else {
            panic!("Expected command lock");
        }
    }

    #[test]
    fn parse_pull_record() {
        let cli = Cli::try_parse_from([
            "planlock",
            "pull",
            "record",
            "--repo",
            "owner/repo",
            "--pull",
            "4",
            "--head-commit",
            "sha1",
            "--results",
            "results.json",
        ])
        .unwrap();
        if let Command::Pull(PullCommand {
            action: PullAction::Record(args),
        }) = cli.command
        {
            assert_eq!(args.pull.repo, "owner/repo");
            assert_eq!(args.pull.pull, 4);
            assert_eq!(args.head_commit, "sha1");
            assert_eq!(args.results, PathBuf::from("results.json"));
        } else {
            panic!("Expected pull record command");
        }
    }

    #[test]
    fn parse_pull_set_status() {
        let cli = Cli::try_parse_from([
            "planlock",
            "pull",
            "set-status",
            "--repo",
            "owner/repo",
            "--pull",
            "4",
            "--status",
            "applied",
        ])
        .unwrap();
        if let Command::Pull(PullCommand {
            action: PullAction::SetStatus(args),
        }) = cli.command
        {
            assert_eq!(args.workspace, "default");
            assert_eq!(args.dir, ".");
            assert_eq!(args.status, "applied");
        } else {
            panic!("Expected pull set-status command");
        }
    }

    #[test]
    fn parse_verbose_count() {
        let cli = Cli::try_parse_from(["planlock", "-vv", "lock", "list"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
