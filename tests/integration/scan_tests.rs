use dupscan::duplicates::{DuplicateFinder, FinderConfig};
use dupscan::output::Report;
use dupscan::scanner::{hash_to_hex, Hasher, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tempfile::tempdir;

const SHA256_X: &str = "2d711642b726b04401627ca9fbac32f5c8530fb1903cc4db02258717921a4881";

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let result = finder.find_duplicates(dir.path()).unwrap();
    let report = Report::render(&result);

    assert!(result.groups.is_empty());
    assert_eq!(result.total_reclaimable, 0);
    assert_eq!(result.files_scanned, 0);
    assert!(report.rows.is_empty());
}

#[test]
fn test_scan_two_copies_and_one_unique() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("A"), "x").unwrap();
    fs::write(dir.path().join("B"), "x").unwrap();
    fs::write(dir.path().join("C"), "y").unwrap();

    let result = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.total_reclaimable, 1);
    assert_eq!(result.unique_files, 1);

    let report = Report::render(&result);
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].path, dir.path().join("A"));
    assert_eq!(report.rows[1].path, dir.path().join("B"));
    assert!(report.rows.iter().all(|r| r.hash == SHA256_X));
    assert!(!report.rows.iter().any(|r| r.path.ends_with("C")));
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    for (name, content) in [("a.txt", "content a"), ("b.txt", "content b"), ("c.txt", "content c")] {
        File::create(dir.path().join(name))
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
    }

    let result = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(result.groups.is_empty());
    assert_eq!(result.files_scanned, 3);
    assert_eq!(result.unique_files, 3);
}

#[test]
fn test_scan_nested_duplicates_regardless_of_name() {
    let dir = tempdir().unwrap();
    let deep = dir.path().join("one").join("two").join("three");
    fs::create_dir_all(&deep).unwrap();

    let content = vec![0xA5u8; 200_000];
    fs::write(dir.path().join("top.bin"), &content).unwrap();
    fs::write(deep.join("renamed.dat"), &content).unwrap();

    let result = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.total_reclaimable, 200_000);
    let paths: Vec<PathBuf> = result.groups[0].paths().map(PathBuf::from).collect();
    assert!(paths.contains(&dir.path().join("top.bin")));
    assert!(paths.contains(&deep.join("renamed.dat")));
}

#[test]
fn test_scan_empty_files_are_duplicates() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("e1")).unwrap();
    File::create(dir.path().join("e2")).unwrap();

    let result = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].size(), 0);
    assert_eq!(result.total_reclaimable, 0);
    assert_eq!(result.duplicate_files(), 1);
}

#[test]
fn test_scan_is_deterministic() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        fs::write(dir.path().join(format!("f{i:02}")), format!("{}", i % 4)).unwrap();
    }

    let finder = DuplicateFinder::with_defaults();
    let first = Report::render(&finder.find_duplicates(dir.path()).unwrap());
    let second = Report::render(&finder.find_duplicates(dir.path()).unwrap());

    assert_eq!(first, second);
    assert_eq!(first.summary.duplicate_groups, 4);
    assert_eq!(first.summary.duplicate_files, 16);
}

#[test]
fn test_buffer_size_does_not_change_groups() {
    let dir = tempdir().unwrap();
    let content: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
    fs::write(dir.path().join("a"), &content).unwrap();
    fs::write(dir.path().join("b"), &content).unwrap();

    let small = DuplicateFinder::new(FinderConfig::default().with_buffer_size(7))
        .find_duplicates(dir.path())
        .unwrap();
    let large = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(small.groups, large.groups);
    assert_eq!(
        small.groups[0].hash_hex(),
        hash_to_hex(&Hasher::hash_bytes(&content))
    );
}

#[test]
#[cfg(unix)]
fn test_scan_symlinks_skipped_unless_followed() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("real"), "data").unwrap();
    std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

    let skipped = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert!(skipped.groups.is_empty());
    assert_eq!(skipped.files_scanned, 1);

    let followed = DuplicateFinder::new(
        FinderConfig::default().with_walker_config(WalkerConfig::new(true)),
    )
    .find_duplicates(dir.path())
    .unwrap();
    assert_eq!(followed.groups.len(), 1);
    assert_eq!(followed.total_reclaimable, 4);
}
