//! Lock acquisition, queueing, hand-off and listing.

use super::keys::{lock_key, repo_prefix};
use super::types::{
    DequeueStatus, EnqueueStatus, TryLockResponse, UnlockByPullOutcome, UnlockResponse,
};
use crate::error::Result;
use crate::models::{Project, ProjectLock};
use crate::storage::{Bucket, Database, Tx, decode_json};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Arc;

/// Store for project locks and their wait queues.
///
/// Each operation on a single key is one transaction: readers never see a
/// lock released without its queue advanced, or a request half-enqueued.
#[derive(Debug, Clone)]
pub struct LockStore {
    db: Arc<Database>,
}

impl LockStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Try to acquire the lock for `new_lock`'s project and workspace.
    ///
    /// # Returns
    ///
    /// * `acquired = true` - the key was free, or already held by the same
    ///   pull request (the original lock is kept untouched)
    /// * `acquired = false` - held by another pull request; the request is
    ///   queued once and `enqueue_status` carries its position
    pub fn try_lock(&self, new_lock: ProjectLock) -> Result<TryLockResponse> {
        self.try_lock_at(new_lock, Utc::now())
    }

    /// `try_lock` with an explicit clock, used for lease expiry.
    pub fn try_lock_at(&self, new_lock: ProjectLock, now: DateTime<Utc>) -> Result<TryLockResponse> {
        let key = lock_key(&new_lock.project, &new_lock.workspace);

        self.db.update(|tx| {
            let mut current: Option<ProjectLock> = tx.get_json(Bucket::RunLocks, &key)?;

            if let Some(lock) = &current
                && lock.is_expired(now)
            {
                log::info!(
                    "lease expired for {} held by pull #{}, releasing",
                    key,
                    lock.pull.num
                );
                current = release_in_tx(tx, &key, now)?.dequeued;
            }

            let Some(current) = current else {
                tx.put_json(Bucket::RunLocks, &key, &new_lock)?;
                log::debug!("pull #{} acquired {}", new_lock.pull.num, key);
                return Ok(TryLockResponse {
                    acquired: true,
                    current_lock: new_lock,
                    enqueue_status: EnqueueStatus::None,
                    lock_key: key.clone(),
                });
            };

            // A holder whose lease expired was released above; its re-request
            // is a new request.
            if current.pull.num == new_lock.pull.num {
                return Ok(TryLockResponse {
                    acquired: true,
                    current_lock: current,
                    enqueue_status: EnqueueStatus::None,
                    lock_key: key.clone(),
                });
            }

            let mut queue: VecDeque<ProjectLock> =
                tx.get_json(Bucket::Queue, &key)?.unwrap_or_default();

            let enqueue_status = match queue
                .iter()
                .position(|queued| queued.pull.num == new_lock.pull.num)
            {
                Some(index) => EnqueueStatus::AlreadyInTheQueue {
                    project_locks_in_front: index + 1,
                },
                None => {
                    log::debug!(
                        "pull #{} queued for {} behind pull #{}",
                        new_lock.pull.num,
                        key,
                        current.pull.num
                    );
                    queue.push_back(new_lock);
                    tx.put_json(Bucket::Queue, &key, &queue)?;
                    EnqueueStatus::Enqueued {
                        project_locks_in_front: queue.len(),
                    }
                }
            };

            Ok(TryLockResponse {
                acquired: false,
                current_lock: current,
                enqueue_status,
                lock_key: key.clone(),
            })
        })
    }

    /// Release the lock on `project` and `workspace`.
    ///
    /// If requests are waiting, the head of the queue becomes the new holder
    /// in the same transaction.
    pub fn unlock(&self, project: &Project, workspace: &str) -> Result<UnlockResponse> {
        let key = lock_key(project, workspace);
        let now = Utc::now();
        self.db.update(|tx| release_in_tx(tx, &key, now))
    }

    /// All current locks in key order. Queued requests are not included.
    ///
    /// A record that fails to decode aborts the whole listing.
    pub fn list(&self) -> Result<Vec<ProjectLock>> {
        self.db.view(|tx| {
            tx.scan(Bucket::RunLocks)?
                .iter()
                .map(|(key, bytes)| decode_json(Bucket::RunLocks, key, bytes))
                .collect()
        })
    }

    /// Requests waiting on `project` and `workspace`, head first.
    pub fn list_queue(&self, project: &Project, workspace: &str) -> Result<Vec<ProjectLock>> {
        let key = lock_key(project, workspace);
        self.db.view(|tx| {
            let queue: Option<VecDeque<ProjectLock>> = tx.get_json(Bucket::Queue, &key)?;
            Ok(queue.map(Vec::from).unwrap_or_default())
        })
    }

    /// The current lock on `project` and `workspace`, if any.
    pub fn get_lock(&self, project: &Project, workspace: &str) -> Result<Option<ProjectLock>> {
        let key = lock_key(project, workspace);
        self.db.view(|tx| tx.get_json(Bucket::RunLocks, &key))
    }

    /// Release every lock in `repo_full_name` held by `pull_num`.
    ///
    /// Matching locks are collected first, then released one transaction at
    /// a time. A lock that changed hands since the scan is left alone.
    /// Locks in repos nested under `repo_full_name` are not touched.
    pub fn unlock_by_pull(&self, repo_full_name: &str, pull_num: u64) -> UnlockByPullOutcome {
        let prefix = repo_prefix(repo_full_name);

        let found = match self.db.view(|tx| {
            let mut matches = Vec::new();
            for (key, bytes) in tx.scan_prefix(Bucket::RunLocks, &prefix)? {
                let lock: ProjectLock = decode_json(Bucket::RunLocks, &key, &bytes)?;
                // The prefix also covers nested repos such as group/app/sub
                if lock.pull.num == pull_num && lock.project.repo_full_name == repo_full_name {
                    matches.push(lock);
                }
            }
            Ok(matches)
        }) {
            Ok(found) => found,
            Err(error) => {
                return UnlockByPullOutcome::FailedBeforeRelease {
                    found: Vec::new(),
                    error,
                };
            }
        };

        let mut released = Vec::new();
        let mut dequeue = DequeueStatus::default();

        let keys: Vec<String> = found
            .iter()
            .map(|lock| lock_key(&lock.project, &lock.workspace))
            .collect();

        for key in keys {
            let now = Utc::now();
            let result = self.db.update(|tx| {
                let current: Option<ProjectLock> = tx.get_json(Bucket::RunLocks, &key)?;
                match current {
                    Some(current) if current.pull.num == pull_num => release_in_tx(tx, &key, now),
                    _ => Ok(UnlockResponse::default()),
                }
            });

            match result {
                Ok(response) => {
                    if let Some(lock) = response.released {
                        released.push(lock);
                    }
                    if let Some(next) = response.dequeued {
                        dequeue.project_locks.push(next);
                    }
                }
                Err(error) => {
                    log::warn!(
                        "unlocking {} for pull #{} failed after {} of {} locks: {}",
                        key,
                        pull_num,
                        released.len(),
                        found.len(),
                        error
                    );
                    if released.is_empty() {
                        return UnlockByPullOutcome::FailedBeforeRelease { found, error };
                    }
                    return UnlockByPullOutcome::Partial {
                        found,
                        released,
                        dequeue,
                        error,
                    };
                }
            }
        }

        UnlockByPullOutcome::Completed {
            found,
            released,
            dequeue,
        }
    }
}

/// Release the lock at `key` inside an open transaction.
///
/// With an empty queue the key is freed. Otherwise the head of the queue is
/// promoted to holder and the rest of the queue is written back.
fn release_in_tx(tx: &Tx<'_>, key: &str, now: DateTime<Utc>) -> Result<UnlockResponse> {
    let released: Option<ProjectLock> = tx.get_json(Bucket::RunLocks, key)?;
    let mut queue: VecDeque<ProjectLock> = tx.get_json(Bucket::Queue, key)?.unwrap_or_default();

    let Some(mut next) = queue.pop_front() else {
        tx.delete(Bucket::RunLocks, key)?;
        tx.delete(Bucket::Queue, key)?;
        return Ok(UnlockResponse {
            released,
            dequeued: None,
        });
    };

    next.lease = next.lease.rebased(next.time, now);
    tx.put_json(Bucket::RunLocks, key, &next)?;
    if queue.is_empty() {
        tx.delete(Bucket::Queue, key)?;
    } else {
        tx.put_json(Bucket::Queue, key, &queue)?;
    }

    log::info!(
        "handed {} from pull #{} to pull #{}",
        key,
        released.as_ref().map(|l| l.pull.num).unwrap_or_default(),
        next.pull.num
    );

    Ok(UnlockResponse {
        released,
        dequeued: Some(next),
    })
}
