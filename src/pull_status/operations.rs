//! Record, read and delete pull request status.

use super::keys::pull_key;
use super::merge::{merge_results, set_project_status};
use crate::error::Result;
use crate::models::{ProjectPlanStatus, ProjectResult, PullRequest, PullStatus};
use crate::storage::{Bucket, Database};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct PullStatusStore {
    db: Arc<Database>,
}

impl PullStatusStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Record `results` for `pull` and return the stored status.
    ///
    /// Read, merge and write happen in one transaction.
    pub fn update_pull_with_results(
        &self,
        pull: &PullRequest,
        results: &[ProjectResult],
    ) -> Result<PullStatus> {
        let key = pull_key(pull)?;

        self.db.update(|tx| {
            let current: Option<PullStatus> = tx.get_json(Bucket::Pulls, &key)?;
            if let Some(stale) = current
                .as_ref()
                .filter(|status| status.pull.head_commit != pull.head_commit)
            {
                log::debug!(
                    "discarding status for {} at {} (now at {})",
                    key,
                    stale.pull.head_commit,
                    pull.head_commit
                );
            }

            let status = merge_results(current, pull, results);
            tx.put_json(Bucket::Pulls, &key, &status)?;
            Ok(status)
        })
    }

    /// The stored status for `pull`, if any.
    pub fn get_pull_status(&self, pull: &PullRequest) -> Result<Option<PullStatus>> {
        let key = pull_key(pull)?;
        self.db.view(|tx| tx.get_json(Bucket::Pulls, &key))
    }

    /// Forget `pull`'s status. Succeeds if there was none.
    pub fn delete_pull_status(&self, pull: &PullRequest) -> Result<()> {
        let key = pull_key(pull)?;
        let deleted = self.db.update(|tx| tx.delete(Bucket::Pulls, &key))?;
        if deleted {
            log::debug!("deleted status for {}", key);
        }
        Ok(())
    }

    /// Overwrite the status of the first project in `workspace` and
    /// `repo_rel_dir`.
    ///
    /// Does nothing if `pull` has no recorded status or no project matches.
    pub fn update_project_status(
        &self,
        pull: &PullRequest,
        workspace: &str,
        repo_rel_dir: &str,
        new_status: ProjectPlanStatus,
    ) -> Result<()> {
        let key = pull_key(pull)?;

        self.db.update(|tx| {
            let Some(mut status) = tx.get_json::<PullStatus>(Bucket::Pulls, &key)? else {
                return Ok(());
            };
            if set_project_status(&mut status, workspace, repo_rel_dir, new_status) {
                tx.put_json(Bucket::Pulls, &key, &status)?;
            }
            Ok(())
        })
    }
}
