//! Domain records shared by the lock, command lock and pull status stores.
//!
//! Everything here is a plain serde value type. The VCS layer builds the
//! identities (`Project`, `PullRequest`, `User`); the stores persist
//! `ProjectLock`, `CommandLock` and `PullStatus` as JSON.

mod command;
mod lock;
mod project;
mod pull;
mod status;


// Re-export public API
pub use command::{CommandLock, CommandLockMetadata, CommandName};
pub use lock::{Lease, ProjectLock};
pub use project::Project;
pub use pull::{PullRequest, PullRequestState, Repo, User, VcsHost, VcsHostType};
pub use status::{ProjectOutcome, ProjectPlanStatus, ProjectResult, ProjectStatus, PullStatus};
