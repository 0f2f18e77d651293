use anti_screensaver::instance_lock::InstanceLock;
use anti_screensaver::InstanceError;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_second_instance_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("anti-screensaver.lock");

    let first = InstanceLock::acquire(&path).expect("first instance");
    match InstanceLock::acquire(&path) {
        Err(InstanceError::AlreadyRunning(held)) => assert_eq!(held, path),
        other => panic!("expected AlreadyRunning, got {:?}", other),
    }
    assert_eq!(first.path(), path.as_path());
}

#[test]
fn test_lock_released_on_drop() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("anti-screensaver.lock");

    let first = InstanceLock::acquire(&path).expect("first instance");
    drop(first);

    assert!(InstanceLock::acquire(&path).is_ok(), "Lock should be free again");
}

#[test]
fn test_lock_file_records_pid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("anti-screensaver.lock");

    let _lock = InstanceLock::acquire(&path).expect("lock");
    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.trim(), std::process::id().to_string());
}

#[test]
fn test_stale_lock_file_is_reused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("anti-screensaver.lock");
    // Left behind by a crashed process; nobody holds the lock
    fs::write(&path, "99999\n").unwrap();

    assert!(InstanceLock::acquire(&path).is_ok());
}

#[test]
fn test_unwritable_location_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing-dir").join("anti-screensaver.lock");

    assert!(matches!(
        InstanceLock::acquire(&path),
        Err(InstanceError::Io { .. })
    ));
}
