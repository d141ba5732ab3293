//! Pull request, repository and user identities.
//!
//! These are snapshots handed in by the VCS layer at command time. Only the
//! fields the lock and status stores need are interpreted here.

use serde::{Deserialize, Serialize};

/// Which kind of VCS host a repo lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VcsHostType {
    #[default]
    Github,
    Gitlab,
    BitbucketCloud,
    BitbucketServer,
    AzureDevops,
    Gitea,
}

impl std::fmt::Display for VcsHostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VcsHostType::Github => "Github",
            VcsHostType::Gitlab => "Gitlab",
            VcsHostType::BitbucketCloud => "BitbucketCloud",
            VcsHostType::BitbucketServer => "BitbucketServer",
            VcsHostType::AzureDevops => "AzureDevops",
            VcsHostType::Gitea => "Gitea",
        };
        write!(f, "{}", s)
    }
}

/// A VCS hosting provider instance, e.g. `github.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct VcsHost {
    pub hostname: String,
    #[serde(default)]
    pub host_type: VcsHostType,
}

/// A repository on a VCS host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Repo {
    /// Owner and name separated by `/`. May hold more slashes for GitLab
    /// subgroups or Azure DevOps projects.
    pub full_name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub name: String,
    pub vcs_host: VcsHost,
}

impl Repo {
    /// Build a repo from its full name, splitting off the last segment as the name.
    pub fn new(full_name: &str, vcs_host: VcsHost) -> Self {
        let (owner, name) = match full_name.rsplit_once('/') {
            Some((owner, name)) => (owner.to_string(), name.to_string()),
            None => (String::new(), full_name.to_string()),
        };
        Self {
            full_name: full_name.to_string(),
            owner,
            name,
            vcs_host,
        }
    }
}

/// Open or closed. Merged pulls are reported as closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestState {
    #[default]
    Open,
    Closed,
}

/// A pull request as seen when a command ran.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PullRequest {
    /// Pull request number.
    pub num: u64,

    /// Head commit sha. Basis for staleness detection of pull status.
    #[serde(default)]
    pub head_commit: String,

    #[serde(default)]
    pub url: String,

    /// Head branch name.
    #[serde(default)]
    pub branch: String,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub state: PullRequestState,

    /// The repository the pull request merges into.
    pub base_repo: Repo,
}

/// The user that ran a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct User {
    pub username: String,
}

impl User {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
        }
    }
}
