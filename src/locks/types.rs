//! Lock store request and response types.

use crate::error::{PlanLockError, Result};
use crate::models::ProjectLock;

/// What happened to a request that did not get the lock.
///
/// `project_locks_in_front` is the 1-indexed position of the request in the
/// queue for its lock key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnqueueStatus {
    /// The request was not queued (it got the lock).
    #[default]
    None,
    /// The request was appended to the queue.
    Enqueued { project_locks_in_front: usize },
    /// The pull request was already waiting; nothing was added.
    AlreadyInTheQueue { project_locks_in_front: usize },
}

impl EnqueueStatus {
    /// Queue position, or 0 when not queued.
    pub fn project_locks_in_front(&self) -> usize {
        match self {
            EnqueueStatus::None => 0,
            EnqueueStatus::Enqueued {
                project_locks_in_front,
            }
            | EnqueueStatus::AlreadyInTheQueue {
                project_locks_in_front,
            } => *project_locks_in_front,
        }
    }
}

impl std::fmt::Display for EnqueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnqueueStatus::None => write!(f, "not queued"),
            EnqueueStatus::Enqueued {
                project_locks_in_front,
            } => write!(f, "enqueued at position {}", project_locks_in_front),
            EnqueueStatus::AlreadyInTheQueue {
                project_locks_in_front,
            } => write!(f, "already in the queue at position {}", project_locks_in_front),
        }
    }
}

/// Result of `TryLock`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryLockResponse {
    /// Whether the requester now holds the lock.
    pub acquired: bool,

    /// The lock at the key after the call: the requester's when acquired,
    /// otherwise the one that blocked it.
    pub current_lock: ProjectLock,

    pub enqueue_status: EnqueueStatus,

    /// The lock key the request resolved to.
    pub lock_key: String,
}

/// Result of `Unlock`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnlockResponse {
    /// The lock that was held before the call, if any.
    pub released: Option<ProjectLock>,

    /// The queued lock that was handed the key, if any.
    pub dequeued: Option<ProjectLock>,
}

/// Locks handed to the next waiter as a side effect of a bulk unlock.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DequeueStatus {
    pub project_locks: Vec<ProjectLock>,
}

/// Result of `UnlockByPull`.
///
/// Each matching lock is released in its own transaction, so a failure can
/// leave some locks released and others held. Callers should retry only what
/// is still held.
#[derive(Debug)]
pub enum UnlockByPullOutcome {
    /// Every matching lock was released.
    Completed {
        found: Vec<ProjectLock>,
        released: Vec<ProjectLock>,
        dequeue: DequeueStatus,
    },
    /// Some locks were released before a failure.
    Partial {
        found: Vec<ProjectLock>,
        released: Vec<ProjectLock>,
        dequeue: DequeueStatus,
        error: PlanLockError,
    },
    /// Nothing was released.
    FailedBeforeRelease {
        found: Vec<ProjectLock>,
        error: PlanLockError,
    },
}

impl UnlockByPullOutcome {
    /// Every lock the scan matched, released or not.
    pub fn found(&self) -> &[ProjectLock] {
        match self {
            UnlockByPullOutcome::Completed { found, .. }
            | UnlockByPullOutcome::Partial { found, .. }
            | UnlockByPullOutcome::FailedBeforeRelease { found, .. } => found,
        }
    }

    /// Locks that were actually released.
    pub fn released(&self) -> &[ProjectLock] {
        match self {
            UnlockByPullOutcome::Completed { released, .. }
            | UnlockByPullOutcome::Partial { released, .. } => released,
            UnlockByPullOutcome::FailedBeforeRelease { .. } => &[],
        }
    }

    pub fn dequeue_status(&self) -> Option<&DequeueStatus> {
        match self {
            UnlockByPullOutcome::Completed { dequeue, .. }
            | UnlockByPullOutcome::Partial { dequeue, .. } => Some(dequeue),
            UnlockByPullOutcome::FailedBeforeRelease { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&PlanLockError> {
        match self {
            UnlockByPullOutcome::Completed { .. } => None,
            UnlockByPullOutcome::Partial { error, .. }
            | UnlockByPullOutcome::FailedBeforeRelease { error, .. } => Some(error),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, UnlockByPullOutcome::Completed { .. })
    }

    /// Collapse into released locks and hand-offs, or the error.
    pub fn into_result(self) -> Result<(Vec<ProjectLock>, DequeueStatus)> {
        match self {
            UnlockByPullOutcome::Completed {
                released, dequeue, ..
            } => Ok((released, dequeue)),
            UnlockByPullOutcome::Partial { error, .. }
            | UnlockByPullOutcome::FailedBeforeRelease { error, .. } => Err(error),
        }
    }
}
