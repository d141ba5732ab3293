//! Pure status merge rules, kept apart from storage.

use crate::models::{ProjectPlanStatus, ProjectResult, ProjectStatus, PullRequest, PullStatus};

/// Combine `current` with `results` for `pull`.
///
/// A missing status or one for another head commit is replaced by a status
/// built from `results` alone. Otherwise each result overwrites the entry
/// with the same workspace, dir and project name in place, or is appended.
pub(super) fn merge_results(
    current: Option<PullStatus>,
    pull: &PullRequest,
    results: &[ProjectResult],
) -> PullStatus {
    let mut projects = match current {
        Some(status) if status.pull.head_commit == pull.head_commit => status.projects,
        _ => Vec::new(),
    };

    for result in results {
        match projects.iter_mut().find(|p| result.matches(p)) {
            Some(existing) => existing.status = result.plan_status(),
            None => projects.push(ProjectStatus::from(result)),
        }
    }

    PullStatus {
        pull: pull.clone(),
        projects,
    }
}

/// Set the status of the first project in `workspace` and `repo_rel_dir`.
///
/// Project name is not considered. Returns whether a project matched.
pub(super) fn set_project_status(
    status: &mut PullStatus,
    workspace: &str,
    repo_rel_dir: &str,
    new_status: ProjectPlanStatus,
) -> bool {
    match status
        .projects
        .iter_mut()
        .find(|p| p.workspace == workspace && p.repo_rel_dir == repo_rel_dir)
    {
        Some(project) => {
            project.status = new_status;
            true
        }
        None => false,
    }
}
