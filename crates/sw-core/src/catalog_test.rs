use super::*;
use crate::error::MigrateError;
use tempfile::TempDir;

fn touch(dir: &TempDir, name: &str) {
    std::fs::write(dir.path().join(name), "-- test fixture\n").unwrap();
}

#[test]
fn test_discover_orders_by_ordinal() {
    let dir = TempDir::new().unwrap();
    touch(&dir, "0010-tenth.sql");
    touch(&dir, "0002-second.sh");
    touch(&dir, "0001-first.sql");

    let scripts = discover(dir.path()).unwrap();
    let ordinals: Vec<u32> = scripts.iter().map(|s| s.ordinal).collect();
    assert_eq!(ordinals, vec![1, 2, 10]);
}

#[test]
fn test_discover_ignores_non_migration_files() {
    let dir = TempDir::new().unwrap();
    touch(&dir, "0001-first.sql");
    touch(&dir, "README.md");
    touch(&dir, "config.py");
    touch(&dir, ".gitignore");
    std::fs::create_dir(dir.path().join("archive")).unwrap();

    let scripts = discover(dir.path()).unwrap();
    assert_eq!(scripts.len(), 1);
}

#[test]
fn test_discover_does_not_recurse() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("nested");
    std::fs::create_dir(&sub).unwrap();
    std::fs::write(sub.join("0001-nested.sql"), "SELECT 1;").unwrap();

    assert!(discover(dir.path()).unwrap().is_empty());
}

#[test]
fn test_discover_missing_directory_is_empty() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    assert!(discover(&missing).unwrap().is_empty());
}

#[test]
fn test_duplicate_ordinal_fails_discovery() {
    let dir = TempDir::new().unwrap();
    touch(&dir, "0001-first.sql");
    touch(&dir, "0001-also-first.sh");

    let err = discover(dir.path()).unwrap_err();
    match err {
        MigrateError::DuplicateOrdinal { ordinal, .. } => assert_eq!(ordinal, 1),
        other => panic!("expected DuplicateOrdinal, got {}", other),
    }
}

#[test]
fn test_malformed_ordinal_fails_discovery() {
    let dir = TempDir::new().unwrap();
    touch(&dir, "001-too-short.sql");

    assert!(matches!(
        discover(dir.path()),
        Err(MigrateError::NamingViolation { .. })
    ));
}

#[test]
fn test_pending_filters_strictly_greater() {
    let dir = TempDir::new().unwrap();
    touch(&dir, "0001-a.sql");
    touch(&dir, "0003-b.sql");
    touch(&dir, "0007-c.sql");
    let scripts = discover(dir.path()).unwrap();

    let from_zero: Vec<u32> = pending(&scripts, 0).iter().map(|s| s.ordinal).collect();
    assert_eq!(from_zero, vec![1, 3, 7]);

    let from_three: Vec<u32> = pending(&scripts, 3).iter().map(|s| s.ordinal).collect();
    assert_eq!(from_three, vec![7]);

    // Empty when the version already equals the highest ordinal
    assert!(pending(&scripts, 7).is_empty());
    assert!(pending(&scripts, 99).is_empty());
}
