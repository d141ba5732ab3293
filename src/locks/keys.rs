//! Lock key encoding.
//!
//! A lock key is `{repo_full_name}/{path}/{workspace}`. Project name is not
//! part of the key, so two named projects sharing a path and workspace share
//! one lock.

use crate::error::{PlanLockError, Result};
use crate::models::Project;
use regex::Regex;
use std::sync::LazyLock;

/// `owner/repo`, then the path, then the workspace after the last slash.
static LOCK_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?/.*?)/(.*)/(.*)$").expect("Invalid lock key regex"));

/// Build the lock key for a project and workspace.
pub fn lock_key(project: &Project, workspace: &str) -> String {
    format!("{}/{}/{}", project.repo_full_name, project.path, workspace)
}

/// The prefix shared by every lock key of a repository.
pub fn repo_prefix(repo_full_name: &str) -> String {
    format!("{}/", repo_full_name)
}

/// Split a lock key back into its project and workspace.
///
/// The repo is taken to be the first two segments, which is ambiguous for
/// repos with nested owners (GitLab subgroups). Prefer passing projects
/// around over parsing keys.
pub fn parse_lock_key(key: &str) -> Result<(Project, String)> {
    let caps = LOCK_KEY_REGEX.captures(key).ok_or_else(|| {
        PlanLockError::InvalidKey(format!(
            "'{}' does not match the format <owner>/<repo>/<path>/<workspace>",
            key
        ))
    })?;

    let repo_full_name = &caps[1];
    let path = &caps[2];
    let workspace = &caps[3];
    if workspace.is_empty() {
        return Err(PlanLockError::InvalidKey(format!(
            "'{}' has an empty workspace",
            key
        )));
    }

    Ok((Project::new(repo_full_name, path, ""), workspace.to_string()))
}
