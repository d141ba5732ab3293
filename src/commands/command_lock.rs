//! Implementation of the `planlock command` commands.

use super::Session;
use crate::cli::CommandNameArgs;
use crate::error::{PlanLockError, Result};
use crate::events::{Event, EventAction};
use crate::models::CommandName;
use chrono::Utc;
use serde_json::json;

fn parse_command_name(name: &str) -> Result<CommandName> {
    name.parse::<CommandName>().map_err(PlanLockError::UserError)
}

/// Execute `planlock command lock`.
pub fn cmd_command_lock(session: &Session, args: CommandNameArgs) -> Result<()> {
    let name = parse_command_name(&args.name)?;
    let lock = session.command_locks().lock_command(name, Utc::now())?;

    session.record(
        Event::new(EventAction::CommandLocked)
            .with_key(crate::command_locks::command_lock_key(name))
            .with_details(json!({
                "command": name.as_str(),
                "unix_time": lock.lock_metadata.unix_time,
            })),
    );
    println!("Command '{}' is now disabled.", name);

    Ok(())
}

/// Execute `planlock command unlock`.
pub fn cmd_command_unlock(session: &Session, args: CommandNameArgs) -> Result<()> {
    let name = parse_command_name(&args.name)?;
    session.command_locks().unlock_command(name)?;

    session.record(
        Event::new(EventAction::CommandUnlocked)
            .with_key(crate::command_locks::command_lock_key(name))
            .with_details(json!({"command": name.as_str()})),
    );
    println!("Command '{}' is enabled again.", name);

    Ok(())
}

/// Execute `planlock command check`.
pub fn cmd_command_check(session: &Session, args: CommandNameArgs) -> Result<()> {
    let name = parse_command_name(&args.name)?;

    match session.command_locks().check_command_lock(name)? {
        Some(lock) => match lock.lock_time() {
            Some(at) => println!(
                "Command '{}' is disabled (since {}).",
                name,
                at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            None => println!("Command '{}' is disabled.", name),
        },
        None => println!("Command '{}' is enabled.", name),
    }

    Ok(())
}
