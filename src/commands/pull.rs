//! Implementation of the `planlock pull` commands.

use super::Session;
use crate::cli::{PullArgs, PullRecordArgs, PullSetStatusArgs, PullShowArgs};
use crate::error::{PlanLockError, Result};
use crate::events::{Event, EventAction};
use crate::models::{ProjectPlanStatus, ProjectResult, PullRequest, PullStatus};
use crate::pull_status::pull_key;
use serde_json::json;
use std::path::Path;

fn pull_from_args(session: &Session, args: PullArgs, head_commit: &str) -> PullRequest {
    session.pull_request(&args.repo, args.pull, args.hostname, head_commit)
}

/// Read a JSON array of project results from `path`.
pub(crate) fn read_results(path: &Path) -> Result<Vec<ProjectResult>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PlanLockError::UserError(format!(
            "failed to read results file '{}': {}",
            path.display(),
            e
        ))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        PlanLockError::UserError(format!(
            "failed to parse results file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// One-line tally of a pull request's project statuses.
pub(crate) fn status_summary(status: &PullStatus) -> String {
    format!(
        "{} project(s): {} planned, {} applied, {} errored",
        status.projects.len(),
        status.status_count(ProjectPlanStatus::Planned)
            + status.status_count(ProjectPlanStatus::PlannedNoChanges),
        status.status_count(ProjectPlanStatus::Applied),
        status.errored_count()
    )
}

fn print_status(key: &str, status: &PullStatus) {
    println!("{}", key);
    if !status.pull.head_commit.is_empty() {
        println!("  Head commit: {}", status.pull.head_commit);
    }
    println!();

    if status.projects.is_empty() {
        println!("  No projects recorded.");
        return;
    }

    println!("  {:<12} {:<30} {:<16} STATUS", "WORKSPACE", "DIR", "PROJECT");
    for project in &status.projects {
        println!(
            "  {:<12} {:<30} {:<16} {}",
            project.workspace,
            project.repo_rel_dir,
            if project.project_name.is_empty() {
                "-"
            } else {
                project.project_name.as_str()
            },
            project.status
        );
    }
    println!();
    println!("  {}", status_summary(status));
}

/// Execute `planlock pull show`.
pub fn cmd_pull_show(session: &Session, args: PullShowArgs) -> Result<()> {
    let pull = pull_from_args(session, args.pull, "");
    let key = pull_key(&pull)?;

    let Some(status) = session.pull_statuses().get_pull_status(&pull)? else {
        println!("No status recorded for {}.", key);
        return Ok(());
    };

    if args.json {
        let rendered = serde_json::to_string_pretty(&status).map_err(|e| {
            PlanLockError::SerializationError(format!("failed to render status: {}", e))
        })?;
        println!("{}", rendered);
    } else {
        print_status(&key, &status);
    }

    Ok(())
}

/// Execute `planlock pull delete`.
pub fn cmd_pull_delete(session: &Session, args: PullArgs) -> Result<()> {
    let pull = pull_from_args(session, args, "");
    let key = pull_key(&pull)?;

    session.pull_statuses().delete_pull_status(&pull)?;

    session.record(Event::new(EventAction::PullStatusDeleted).with_key(&key));
    println!("Deleted status for {}.", key);

    Ok(())
}

/// Execute `planlock pull record`.
pub fn cmd_pull_record(session: &Session, args: PullRecordArgs) -> Result<()> {
    let results = read_results(&args.results)?;
    let pull = pull_from_args(session, args.pull, &args.head_commit);
    let key = pull_key(&pull)?;

    let status = session
        .pull_statuses()
        .update_pull_with_results(&pull, &results)?;

    session.record(
        Event::new(EventAction::PullStatusRecorded)
            .with_key(&key)
            .with_details(json!({
                "head_commit": args.head_commit,
                "results": results.len(),
                "projects": status.projects.len(),
            })),
    );

    println!(
        "Recorded {} result(s); {} project(s) tracked.",
        results.len(),
        status.projects.len()
    );
    println!();
    print_status(&key, &status);

    Ok(())
}

/// Execute `planlock pull set-status`.
pub fn cmd_pull_set_status(session: &Session, args: PullSetStatusArgs) -> Result<()> {
    let new_status: ProjectPlanStatus =
        args.status.parse().map_err(PlanLockError::UserError)?;
    let pull = pull_from_args(session, args.pull, "");
    let key = pull_key(&pull)?;

    session
        .pull_statuses()
        .update_project_status(&pull, &args.workspace, &args.dir, new_status)?;

    session.record(
        Event::new(EventAction::ProjectStatusUpdated)
            .with_key(&key)
            .with_details(json!({
                "workspace": args.workspace,
                "dir": args.dir,
                "status": new_status.as_str(),
            })),
    );
    println!(
        "Set {} in {} to {} (if recorded).",
        args.dir, args.workspace, new_status
    );

    Ok(())
}
