use crate::models::{Project, ProjectLock, PullRequest, Repo, User, VcsHost, VcsHostType};
use crate::storage::{Database, StorageOptions};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub(crate) const TEST_REPO: &str = "owner/repo";

/// Open a fresh database in a temp dir. Keep the `TempDir` alive for the test.
pub(crate) fn open_test_db() -> (TempDir, Arc<Database>) {
    let temp_dir = TempDir::new().unwrap();
    let options = StorageOptions {
        open_timeout: Duration::from_millis(200),
        busy_timeout: Duration::from_secs(5),
    };
    let db = Database::open(temp_dir.path().join("planlock.db"), &options).unwrap();
    (temp_dir, Arc::new(db))
}

pub(crate) fn test_pull(repo_full_name: &str, num: u64, head_commit: &str) -> PullRequest {
    PullRequest {
        num,
        head_commit: head_commit.to_string(),
        url: format!("https://github.com/{}/pull/{}", repo_full_name, num),
        branch: format!("feature-{}", num),
        author: "lkysow".to_string(),
        base_repo: Repo::new(
            repo_full_name,
            VcsHost {
                hostname: "github.com".to_string(),
                host_type: VcsHostType::Github,
            },
        ),
        ..Default::default()
    }
}

pub(crate) fn test_lock(repo_full_name: &str, path: &str, workspace: &str, pull_num: u64) -> ProjectLock {
    ProjectLock::new(
        Project::new(repo_full_name, path, ""),
        workspace,
        test_pull(repo_full_name, pull_num, "sha1"),
        User::new("lkysow"),
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
    )
}
