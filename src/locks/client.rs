//! Key-addressed locking seam for command orchestration.

use super::keys::{lock_key, parse_lock_key};
use super::operations::LockStore;
use super::types::{EnqueueStatus, TryLockResponse, UnlockByPullOutcome, UnlockResponse};
use crate::error::Result;
use crate::models::{Lease, Project, ProjectLock, PullRequest, User};
use chrono::{Duration, Utc};
use std::collections::BTreeMap;

/// Locking operations as seen by the code that runs plan and apply.
pub trait Locker: Send + Sync {
    /// Lock `project` in `workspace` for `pull`, or queue the request.
    fn try_lock(
        &self,
        project: Project,
        workspace: &str,
        pull: PullRequest,
        user: User,
    ) -> Result<TryLockResponse>;

    /// Release the lock with the given key.
    fn unlock(&self, key: &str) -> Result<UnlockResponse>;

    /// All current locks by key.
    fn list(&self) -> Result<BTreeMap<String, ProjectLock>>;

    /// Release every lock held by a pull request.
    fn unlock_by_pull(&self, repo_full_name: &str, pull_num: u64) -> UnlockByPullOutcome;

    /// The lock with the given key, if any.
    fn get_lock(&self, key: &str) -> Result<Option<ProjectLock>>;
}

/// `Locker` backed by the lock store.
#[derive(Debug, Clone)]
pub struct LockingClient {
    store: LockStore,
    lease: Option<Duration>,
}

impl LockingClient {
    pub fn new(store: LockStore) -> Self {
        Self { store, lease: None }
    }

    /// Give every new lock a lease of `length`.
    pub fn with_lease(mut self, length: Duration) -> Self {
        self.lease = Some(length);
        self
    }
}

impl Locker for LockingClient {
    fn try_lock(
        &self,
        project: Project,
        workspace: &str,
        pull: PullRequest,
        user: User,
    ) -> Result<TryLockResponse> {
        let now = Utc::now();
        let lease = match self.lease {
            Some(length) => Lease::for_duration(now, length),
            None => Lease::Indefinite,
        };
        let lock = ProjectLock::new(project, workspace, pull, user, now).with_lease(lease);
        self.store.try_lock_at(lock, now)
    }

    fn unlock(&self, key: &str) -> Result<UnlockResponse> {
        let (project, workspace) = parse_lock_key(key)?;
        self.store.unlock(&project, &workspace)
    }

    fn list(&self) -> Result<BTreeMap<String, ProjectLock>> {
        Ok(self
            .store
            .list()?
            .into_iter()
            .map(|lock| (lock_key(&lock.project, &lock.workspace), lock))
            .collect())
    }

    fn unlock_by_pull(&self, repo_full_name: &str, pull_num: u64) -> UnlockByPullOutcome {
        self.store.unlock_by_pull(repo_full_name, pull_num)
    }

    fn get_lock(&self, key: &str) -> Result<Option<ProjectLock>> {
        let (project, workspace) = parse_lock_key(key)?;
        self.store.get_lock(&project, &workspace)
    }
}

/// `Locker` used when locking is disabled: every request acquires and
/// nothing is stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLocker;

impl Locker for NoOpLocker {
    fn try_lock(
        &self,
        project: Project,
        workspace: &str,
        pull: PullRequest,
        user: User,
    ) -> Result<TryLockResponse> {
        let lock_key = lock_key(&project, workspace);
        Ok(TryLockResponse {
            acquired: true,
            current_lock: ProjectLock::new(project, workspace, pull, user, Utc::now()),
            enqueue_status: EnqueueStatus::None,
            lock_key,
        })
    }

    fn unlock(&self, _key: &str) -> Result<UnlockResponse> {
        Ok(UnlockResponse::default())
    }

    fn list(&self) -> Result<BTreeMap<String, ProjectLock>> {
        Ok(BTreeMap::new())
    }

    fn unlock_by_pull(&self, _repo_full_name: &str, _pull_num: u64) -> UnlockByPullOutcome {
        UnlockByPullOutcome::Completed {
            found: Vec::new(),
            released: Vec::new(),
            dequeue: Default::default(),
        }
    }

    fn get_lock(&self, _key: &str) -> Result<Option<ProjectLock>> {
        Ok(None)
    }
}
