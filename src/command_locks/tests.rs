use super::*;
use crate::error::PlanLockError;
use crate::models::CommandName;
use crate::storage::Bucket;
use crate::test_support::open_test_db;
use chrono::{TimeZone, Utc};

#[test]
fn test_command_lock_key() {
    assert_eq!(command_lock_key(CommandName::Apply), "apply/lock");
    assert_eq!(command_lock_key(CommandName::PolicyCheck), "policy_check/lock");
}

#[test]
fn test_lock_and_check() {
    let (_temp_dir, db) = open_test_db();
    let store = CommandLockStore::new(db);
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();

    assert!(store.check_command_lock(CommandName::Apply).unwrap().is_none());

    let lock = store.lock_command(CommandName::Apply, at).unwrap();
    assert_eq!(lock.command_name, CommandName::Apply);
    assert_eq!(lock.lock_time(), Some(at));

    let checked = store.check_command_lock(CommandName::Apply).unwrap();
    assert_eq!(checked, Some(lock));
    assert!(store.check_command_lock(CommandName::Plan).unwrap().is_none());
}

#[test]
fn test_lock_twice_fails_without_overwrite() {
    let (_temp_dir, db) = open_test_db();
    let store = CommandLockStore::new(db);
    let first = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    let second = Utc.with_ymd_and_hms(2024, 3, 2, 9, 30, 0).unwrap();

    store.lock_command(CommandName::Apply, first).unwrap();
    let err = store.lock_command(CommandName::Apply, second).unwrap_err();

    assert!(matches!(err, PlanLockError::LockExists(_)));
    assert!(err.is_conflict());
    let kept = store.check_command_lock(CommandName::Apply).unwrap().unwrap();
    assert_eq!(kept.lock_time(), Some(first));
}

#[test]
fn test_unlock() {
    let (_temp_dir, db) = open_test_db();
    let store = CommandLockStore::new(db);

    store.lock_command(CommandName::Apply, Utc::now()).unwrap();
    store.unlock_command(CommandName::Apply).unwrap();

    assert!(store.check_command_lock(CommandName::Apply).unwrap().is_none());
}

#[test]
fn test_unlock_without_lock_fails() {
    let (_temp_dir, db) = open_test_db();
    let store = CommandLockStore::new(db);

    let err = store.unlock_command(CommandName::Apply).unwrap_err();
    assert!(matches!(err, PlanLockError::LockNotFound(_)));
    assert!(err.is_conflict());
}

#[test]
fn test_check_corrupt_lock_is_an_error() {
    let (_temp_dir, db) = open_test_db();
    let store = CommandLockStore::new(db.clone());
    db.update(|tx| tx.put(Bucket::GlobalLocks, "apply/lock", b"[]"))
        .unwrap();

    let err = store.check_command_lock(CommandName::Apply).unwrap_err();
    assert!(matches!(err, PlanLockError::SerializationError(_)));
}
