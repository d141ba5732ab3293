//! Implementation of the `planlock lock` commands.

use super::{Session, current_username, print_lock};
use crate::cli::{LockKeyArgs, LockTryArgs, UnlockPullArgs};
use crate::error::Result;
use crate::events::{Event, EventAction};
use crate::locks::{EnqueueStatus, lock_key, parse_lock_key};
use crate::models::{Project, User};
use chrono::Utc;
use serde_json::json;

/// Execute `planlock lock try`.
///
/// Not getting the lock is a normal outcome: the pull request is queued and
/// the command succeeds, reporting its position.
pub fn cmd_lock_try(session: &Session, args: LockTryArgs) -> Result<()> {
    let project = Project::new(&args.repo, &args.path, &args.project_name);
    let pull = session.pull_request(&args.repo, args.pull, args.hostname, &args.head_commit);
    let user = User::new(&args.user.unwrap_or_else(current_username));

    let requested_at = Utc::now();
    let response = session
        .locker()
        .try_lock(project, &args.workspace, pull, user)?;

    // The holder asking again gets its original lock back; nothing changed
    if response.acquired && response.current_lock.time < requested_at {
        println!(
            "Pull #{} already holds lock: {}",
            args.pull, response.lock_key
        );
        print_lock(&response.current_lock, 2);
        return Ok(());
    }

    if response.acquired {
        session.record(
            Event::new(EventAction::LockAcquired)
                .with_key(&response.lock_key)
                .with_details(json!({
                    "pull": response.current_lock.pull.num,
                    "user": response.current_lock.user.username,
                })),
        );
        println!("Acquired lock: {}", response.lock_key);
        print_lock(&response.current_lock, 2);
        return Ok(());
    }

    if let EnqueueStatus::Enqueued { .. } = response.enqueue_status {
        session.record(
            Event::new(EventAction::LockEnqueued)
                .with_key(&response.lock_key)
                .with_details(json!({
                    "pull": args.pull,
                    "holder": response.current_lock.pull.num,
                    "position": response.enqueue_status.project_locks_in_front(),
                })),
        );
    }

    println!(
        "Lock {} is held by pull #{}.",
        response.lock_key, response.current_lock.pull.num
    );
    println!("Pull #{} is {}.", args.pull, response.enqueue_status);
    println!();
    println!("Current holder:");
    print_lock(&response.current_lock, 2);

    Ok(())
}

/// Execute `planlock lock unlock`.
pub fn cmd_lock_unlock(session: &Session, args: LockKeyArgs) -> Result<()> {
    let response = session.locker().unlock(&args.key)?;

    let Some(released) = response.released else {
        println!("No lock at {}.", args.key);
        return Ok(());
    };

    session.record(
        Event::new(EventAction::LockReleased)
            .with_key(&args.key)
            .with_details(json!({"pull": released.pull.num})),
    );
    println!("Released lock: {} (pull #{})", args.key, released.pull.num);

    if let Some(next) = response.dequeued {
        session.record(
            Event::new(EventAction::LockHandedOff)
                .with_key(&args.key)
                .with_details(json!({"from": released.pull.num, "to": next.pull.num})),
        );
        println!("Handed off to pull #{}", next.pull.num);
    }

    Ok(())
}

/// Execute `planlock lock get`.
pub fn cmd_lock_get(session: &Session, args: LockKeyArgs) -> Result<()> {
    match session.locker().get_lock(&args.key)? {
        Some(lock) => {
            println!("{}:", args.key);
            print_lock(&lock, 2);
        }
        None => println!("No lock at {}.", args.key),
    }
    Ok(())
}

/// Execute `planlock lock list`.
pub fn cmd_lock_list(session: &Session) -> Result<()> {
    let locks = session.locker().list()?;

    if locks.is_empty() {
        println!("No active locks.");
        return Ok(());
    }

    println!("Active locks ({}):", locks.len());
    println!();
    for (key, lock) in &locks {
        println!("  {}:", key);
        print_lock(lock, 4);
        println!();
    }

    Ok(())
}

/// Execute `planlock lock queue`.
pub fn cmd_lock_queue(session: &Session, args: LockKeyArgs) -> Result<()> {
    let (project, workspace) = parse_lock_key(&args.key)?;
    let queue = session.lock_store().list_queue(&project, &workspace)?;

    if queue.is_empty() {
        println!("No pull requests waiting on {}.", args.key);
        return Ok(());
    }

    println!("Waiting on {} ({}):", args.key, queue.len());
    for (index, lock) in queue.iter().enumerate() {
        println!(
            "  {}. pull #{} by {} (since {})",
            index + 1,
            lock.pull.num,
            lock.user.username,
            lock.time.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    Ok(())
}

/// Execute `planlock lock unlock-pull`.
///
/// Locks released before a failure stay released; they are reported before
/// the error is returned.
pub fn cmd_lock_unlock_pull(session: &Session, args: UnlockPullArgs) -> Result<()> {
    let outcome = session.locker().unlock_by_pull(&args.repo, args.pull);

    let released: Vec<String> = outcome
        .released()
        .iter()
        .map(|lock| lock_key(&lock.project, &lock.workspace))
        .collect();
    let handed_off: Vec<u64> = outcome
        .dequeue_status()
        .map(|d| d.project_locks.iter().map(|l| l.pull.num).collect())
        .unwrap_or_default();

    if !released.is_empty() {
        session.record(
            Event::new(EventAction::LocksReleasedByPull).with_details(json!({
                "repo": args.repo,
                "pull": args.pull,
                "released": released,
                "handed_off_to": handed_off,
                "complete": outcome.is_complete(),
            })),
        );
    }

    if outcome.found().is_empty() {
        println!("Pull #{} holds no locks in {}.", args.pull, args.repo);
    } else {
        println!(
            "Released {} of {} lock(s) held by pull #{}:",
            released.len(),
            outcome.found().len(),
            args.pull
        );
        for key in &released {
            println!("  - {}", key);
        }
        for num in &handed_off {
            println!("  Handed off to pull #{}", num);
        }
    }

    outcome.into_result().map(|_| ())
}
