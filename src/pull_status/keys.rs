use crate::error::{PlanLockError, Result};
use crate::models::PullRequest;

pub const PULL_KEY_SEPARATOR: &str = "::";

/// Storage key for `pull`'s status.
///
/// Fails if the hostname or repo name contains the separator, since the key
/// could then be read back more than one way.
pub fn pull_key(pull: &PullRequest) -> Result<String> {
    let hostname = &pull.base_repo.vcs_host.hostname;
    let repo = &pull.base_repo.full_name;

    for (field, value) in [("hostname", hostname), ("repo name", repo)] {
        if value.contains(PULL_KEY_SEPARATOR) {
            return Err(PlanLockError::InvalidKey(format!(
                "{} '{}' contains the key separator '{}'",
                field, value, PULL_KEY_SEPARATOR
            )));
        }
    }

    Ok(format!(
        "{}{sep}{}{sep}{}",
        hostname,
        repo,
        pull.num,
        sep = PULL_KEY_SEPARATOR
    ))
}
