use dupscan::duplicates::{DuplicateFinder, FinderError};
use dupscan::output::Report;
use dupscan::scanner::ScanError;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_group_paths_continues_on_missing_files() {
    let finder = DuplicateFinder::with_defaults();

    let result = finder.group_paths(vec![
        PathBuf::from("nonexistent_1.txt"),
        PathBuf::from("nonexistent_2.txt"),
    ]);

    assert!(result.groups.is_empty());
    assert_eq!(result.errors.len(), 2);
    assert!(result.errors[0].reason.contains("nonexistent_1.txt"));
}

#[test]
fn test_file_deleted_between_listing_and_hashing() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    let c = dir.path().join("c");
    fs::write(&a, "same").unwrap();
    fs::write(&b, "same").unwrap();
    fs::write(&c, "same").unwrap();

    let listed = vec![a.clone(), b.clone(), c.clone()];
    fs::remove_file(&b).unwrap();

    let result = DuplicateFinder::with_defaults().group_paths(listed);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path, b);
    assert_eq!(result.groups.len(), 1);
    let members: Vec<_> = result.groups[0].paths().collect();
    assert_eq!(members, vec![a.as_path(), c.as_path()]);
    assert_eq!(result.total_reclaimable, 4);
}

#[test]
fn test_every_file_lands_in_exactly_one_bucket() {
    let dir = tempdir().unwrap();
    let mut listed = Vec::new();
    for i in 0..12 {
        let path = dir.path().join(format!("f{i:02}"));
        fs::write(&path, format!("{}", i % 5)).unwrap();
        listed.push(path);
    }
    fs::remove_file(&listed[3]).unwrap();
    fs::remove_file(&listed[7]).unwrap();

    let result = DuplicateFinder::with_defaults().group_paths(listed.clone());
    let grouped: usize = result.groups.iter().map(|g| g.len()).sum();

    assert_eq!(grouped + result.unique_files + result.errors.len(), listed.len());
    for path in &listed {
        let in_groups = result
            .groups
            .iter()
            .filter(|g| g.paths().any(|p| p == path.as_path()))
            .count();
        let in_errors = result.errors.iter().filter(|e| &e.path == path).count();
        assert!(in_groups + in_errors <= 1, "{} counted twice", path.display());
    }
}

#[test]
fn test_invalid_root_is_fatal() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    match DuplicateFinder::with_defaults().find_duplicates(&missing) {
        Err(FinderError::InvalidRoot(ScanError::NotFound(path))) => assert_eq!(path, missing),
        other => panic!("Expected InvalidRoot, got {other:?}"),
    }
}

#[test]
#[cfg(unix)]
fn test_unreadable_file_is_recorded() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::write(dir.path().join("a"), "same").unwrap();
    fs::write(dir.path().join("b"), "same").unwrap();
    fs::write(&locked, "same").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root can read anything; nothing to check in that case.
    if fs::read(&locked).is_ok() {
        return;
    }

    let result = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let report = Report::render(&result);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path, locked);
    assert_eq!(report.summary.duplicate_files, 1);
    assert_eq!(report.rows.len(), 2);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
}
