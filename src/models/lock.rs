//! Durable project lock record.

use super::project::Project;
use super::pull::{PullRequest, User};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a project lock stays valid.
///
/// Locks are indefinite unless a lease is configured. An expired lease is only
/// acted upon by `TryLock`, which releases the lock before evaluating the
/// new request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum Lease {
    #[default]
    Indefinite,
    ExpiresAt(DateTime<Utc>),
}

impl Lease {
    /// A lease that expires `length` after `start`.
    pub fn for_duration(start: DateTime<Utc>, length: Duration) -> Self {
        Lease::ExpiresAt(start + length)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self {
            Lease::Indefinite => false,
            Lease::ExpiresAt(at) => *at <= now,
        }
    }

    /// Keep the lease length but restart it at `handed_off_at`.
    ///
    /// Queued requests must not burn their lease while waiting.
    pub fn rebased(&self, requested_at: DateTime<Utc>, handed_off_at: DateTime<Utc>) -> Self {
        match self {
            Lease::Indefinite => Lease::Indefinite,
            Lease::ExpiresAt(at) => {
                let length = (*at - requested_at).max(Duration::zero());
                Lease::ExpiresAt(handed_off_at + length)
            }
        }
    }
}

/// A lock on a project and workspace held by one pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLock {
    /// The project that is locked.
    pub project: Project,

    /// The pull request whose command created this lock.
    pub pull: PullRequest,

    /// The user that ran the command.
    pub user: User,

    /// Terraform workspace the lock is held against.
    pub workspace: String,

    /// When the lock was first requested.
    pub time: DateTime<Utc>,

    #[serde(default)]
    pub lease: Lease,
}

impl ProjectLock {
    pub fn new(
        project: Project,
        workspace: &str,
        pull: PullRequest,
        user: User,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            project,
            pull,
            user,
            workspace: workspace.to_string(),
            time,
            lease: Lease::Indefinite,
        }
    }

    pub fn with_lease(mut self, lease: Lease) -> Self {
        self.lease = lease;
        self
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.lease.is_expired(now)
    }
}

impl std::fmt::Display for ProjectLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{} (pull #{}, user: {}, since: {})",
            self.project.repo_full_name,
            self.project.path,
            self.workspace,
            self.pull.num,
            self.user.username,
            self.time.to_rfc3339()
        )
    }
}
