//! Command results and the merged per-pull status.

use super::command::CommandName;
use super::pull::PullRequest;
use serde::{Deserialize, Serialize};

/// Where a project is in the plan/apply cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPlanStatus {
    /// The plan, or a non-apply command, errored.
    PlanErrored,
    /// A plan was generated but not yet applied.
    Planned,
    /// A plan was generated with no changes.
    PlannedNoChanges,
    /// A plan was generated but applying it errored.
    ApplyErrored,
    /// A plan was generated and applied.
    Applied,
    /// An unapplied plan was discarded, e.g. because the project was unlocked.
    PlanDiscarded,
    PolicyCheckErrored,
    PolicyCheckPassed,
}

impl ProjectPlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectPlanStatus::PlanErrored => "plan_errored",
            ProjectPlanStatus::Planned => "planned",
            ProjectPlanStatus::PlannedNoChanges => "planned_no_changes",
            ProjectPlanStatus::ApplyErrored => "apply_errored",
            ProjectPlanStatus::Applied => "applied",
            ProjectPlanStatus::PlanDiscarded => "plan_discarded",
            ProjectPlanStatus::PolicyCheckErrored => "policy_check_errored",
            ProjectPlanStatus::PolicyCheckPassed => "policy_check_passed",
        }
    }

    /// Whether this status is one of the error states.
    pub fn is_errored(&self) -> bool {
        matches!(
            self,
            ProjectPlanStatus::PlanErrored
                | ProjectPlanStatus::ApplyErrored
                | ProjectPlanStatus::PolicyCheckErrored
        )
    }
}

impl std::fmt::Display for ProjectPlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProjectPlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plan_errored" => Ok(ProjectPlanStatus::PlanErrored),
            "planned" => Ok(ProjectPlanStatus::Planned),
            "planned_no_changes" => Ok(ProjectPlanStatus::PlannedNoChanges),
            "apply_errored" => Ok(ProjectPlanStatus::ApplyErrored),
            "applied" => Ok(ProjectPlanStatus::Applied),
            "plan_discarded" => Ok(ProjectPlanStatus::PlanDiscarded),
            "policy_check_errored" => Ok(ProjectPlanStatus::PolicyCheckErrored),
            "policy_check_passed" => Ok(ProjectPlanStatus::PolicyCheckPassed),
            other => Err(format!("unknown plan status '{}'", other)),
        }
    }
}

/// What running a command against one project produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectOutcome {
    /// The command could not run.
    Error(String),
    /// The command ran and failed.
    Failure(String),
    PlanSuccess {
        #[serde(default)]
        no_changes: bool,
        #[serde(default)]
        summary: String,
    },
    ApplySuccess(String),
    PolicyCheckSuccess(String),
    ImportSuccess(String),
    StateRmSuccess(String),
}

/// The result of one command against one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectResult {
    #[serde(default)]
    pub command: CommandName,
    pub workspace: String,
    pub repo_rel_dir: String,
    #[serde(default)]
    pub project_name: String,
    pub outcome: ProjectOutcome,
}

impl ProjectResult {
    pub fn new(
        command: CommandName,
        workspace: &str,
        repo_rel_dir: &str,
        project_name: &str,
        outcome: ProjectOutcome,
    ) -> Self {
        Self {
            command,
            workspace: workspace.to_string(),
            repo_rel_dir: repo_rel_dir.to_string(),
            project_name: project_name.to_string(),
            outcome,
        }
    }

    /// The plan status this result leaves the project in.
    pub fn plan_status(&self) -> ProjectPlanStatus {
        use ProjectOutcome::*;

        match (&self.outcome, self.command) {
            (Error(_) | Failure(_), CommandName::Apply) => ProjectPlanStatus::ApplyErrored,
            (
                Error(_) | Failure(_),
                CommandName::PolicyCheck | CommandName::ApprovePolicies,
            ) => ProjectPlanStatus::PolicyCheckErrored,
            (Error(_) | Failure(_), _) => ProjectPlanStatus::PlanErrored,
            (PlanSuccess { no_changes: true, .. }, _) => ProjectPlanStatus::PlannedNoChanges,
            (PlanSuccess { .. }, _) => ProjectPlanStatus::Planned,
            (ApplySuccess(_), _) => ProjectPlanStatus::Applied,
            (PolicyCheckSuccess(_), _) => ProjectPlanStatus::PolicyCheckPassed,
            (ImportSuccess(_) | StateRmSuccess(_), _) => ProjectPlanStatus::PlanDiscarded,
        }
    }

    /// Whether the triple identifies `status`'s project.
    pub fn matches(&self, status: &ProjectStatus) -> bool {
        self.workspace == status.workspace
            && self.repo_rel_dir == status.repo_rel_dir
            && self.project_name == status.project_name
    }
}

/// The status of one project within a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStatus {
    pub workspace: String,
    pub repo_rel_dir: String,
    #[serde(default)]
    pub project_name: String,
    pub status: ProjectPlanStatus,
}

impl From<&ProjectResult> for ProjectStatus {
    fn from(result: &ProjectResult) -> Self {
        Self {
            workspace: result.workspace.clone(),
            repo_rel_dir: result.repo_rel_dir.clone(),
            project_name: result.project_name.clone(),
            status: result.plan_status(),
        }
    }
}

/// Merged status of every project touched by a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullStatus {
    pub pull: PullRequest,
    #[serde(default)]
    pub projects: Vec<ProjectStatus>,
}

impl PullStatus {
    /// Number of projects with `status`.
    pub fn status_count(&self, status: ProjectPlanStatus) -> usize {
        self.projects.iter().filter(|p| p.status == status).count()
    }

    /// Number of projects in one of the error states.
    pub fn errored_count(&self) -> usize {
        self.projects.iter().filter(|p| p.status.is_errored()).count()
    }
}
