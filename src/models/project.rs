//! Terraform project identity.

use serde::{Deserialize, Serialize};

/// A Terraform root module inside a repository.
///
/// Since a repo may hold several projects, the path to the project root
/// relative to the repo root is part of the identity. `path` is always
/// normalized: never ends in `/`, and `.` means the repo root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Project {
    /// Optional configured project name. Not part of the lock key.
    #[serde(default)]
    pub project_name: String,

    /// Owner and repo name, e.g. `runatlantis/atlantis`.
    pub repo_full_name: String,

    /// Path to the project root relative to the repo root.
    pub path: String,
}

impl Project {
    /// Create a project, normalizing `path`.
    pub fn new(repo_full_name: &str, path: &str, project_name: &str) -> Self {
        let mut path = clean_path(path);
        if path == "/" {
            path = ".".to_string();
        }
        Self {
            project_name: project_name.to_string(),
            repo_full_name: repo_full_name.to_string(),
            path,
        }
    }
}

impl std::fmt::Display for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "repofullname={} path={}", self.repo_full_name, self.path)
    }
}

/// Lexically clean a slash-separated path.
///
/// Collapses repeated separators, drops `.` segments, resolves `..` against
/// the preceding segment and strips any trailing separator. An empty result
/// becomes `.`.
pub(crate) fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}
