use clap::Parser;
use dupscan::cli::Cli;
use dupscan::error::ExitCode;
use dupscan::run_app;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Scan with a config file next to the report, so the user's own
/// config.toml never takes part.
fn scan(root: &Path, output: &Path, extra: &[&str]) -> anyhow::Result<ExitCode> {
    let config = output
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("dupscan-test.toml");
    let mut args = vec![
        "dupscan".to_string(),
        "-q".to_string(),
        "--no-color".to_string(),
        "--config".to_string(),
        config.to_string_lossy().into_owned(),
        "scan".to_string(),
        root.to_string_lossy().into_owned(),
        "--no-progress".to_string(),
        "--output-file".to_string(),
        output.to_string_lossy().into_owned(),
    ];
    if !extra.contains(&"--format") {
        args.extend(["--format".to_string(), "csv".to_string()]);
    }
    args.extend(extra.iter().map(|s| (*s).to_string()));
    run_app(Cli::try_parse_from(args).unwrap())
}

#[test]
fn test_scan_with_duplicates_exits_success() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("A"), "x").unwrap();
    fs::write(data.join("B"), "x").unwrap();
    fs::write(data.join("C"), "y").unwrap();
    let report = dir.path().join("duplicados.csv");

    let code = scan(&data, &report, &["--format", "csv"]).unwrap();

    assert_eq!(code, ExitCode::Success);
    let text = fs::read_to_string(&report).unwrap();
    assert_eq!(text.lines().count(), 3);
    assert!(text.starts_with("hash,path\n"));
}

#[test]
fn test_scan_without_duplicates_exits_two() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("only"), "alone").unwrap();
    let report = dir.path().join("out.csv");

    let code = scan(&data, &report, &["--format", "csv"]).unwrap();

    assert_eq!(code, ExitCode::NoDuplicates);
    assert_eq!(fs::read_to_string(&report).unwrap(), "hash,path\n");
}

#[test]
fn test_scan_json_format() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("a"), "dup").unwrap();
    fs::write(data.join("b"), "dup").unwrap();
    let report = dir.path().join("report.json");

    let code = scan(&data, &report, &["--format", "json"]).unwrap();

    assert_eq!(code, ExitCode::Success);
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["summary"]["duplicate_files"], 1);
    assert_eq!(json["root"], data.to_str().unwrap());
}

#[test]
fn test_invalid_root_is_error_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("duplicados.csv");

    let err = scan(&dir.path().join("missing"), &report, &[]).unwrap_err();

    assert!(format!("{err:#}").contains("Invalid root directory"));
    assert!(!report.exists());
}

#[test]
fn test_root_that_is_a_file_is_error() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file.txt");
    fs::write(&file, "x").unwrap();

    let err = scan(&file, &dir.path().join("r.csv"), &[]).unwrap_err();
    assert!(format!("{err:#}").contains("Not a directory"));
}

#[test]
fn test_unwritable_report_exits_four() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("a"), "dup").unwrap();
    fs::write(data.join("b"), "dup").unwrap();
    let report = dir.path().join("no_such_dir").join("report.csv");

    let code = scan(&data, &report, &["--format", "csv"]).unwrap();

    assert_eq!(code, ExitCode::ReportWriteFailed);
}

#[test]
fn test_config_file_flag_sets_scan_defaults() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("a"), "dup").unwrap();
    fs::write(data.join("b"), "dup").unwrap();
    let config = dir.path().join("settings.toml");
    let report = dir.path().join("from_config.json");
    fs::write(
        &config,
        format!("format = \"json\"\noutput_file = {:?}\n", report.to_str().unwrap()),
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "dupscan",
        "-q",
        "--config",
        config.to_str().unwrap(),
        "scan",
        data.to_str().unwrap(),
        "--no-progress",
    ])
    .unwrap();

    assert_eq!(run_app(cli).unwrap(), ExitCode::Success);
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["summary"]["duplicate_groups"], 1);
}

#[test]
fn test_config_save_writes_given_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("nested").join("config.toml");

    let cli = Cli::try_parse_from([
        "dupscan",
        "-q",
        "--config",
        config.to_str().unwrap(),
        "config",
        "--save",
    ])
    .unwrap();

    assert_eq!(run_app(cli).unwrap(), ExitCode::Success);
    let saved = fs::read_to_string(&config).unwrap();
    assert!(saved.contains("output_file = \"duplicados.csv\""));
}

#[test]
fn test_oversized_buffer_is_rejected() {
    let err = Cli::try_parse_from(["dupscan", "scan", "/tmp", "--buffer-size", "1TB"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}

#[test]
fn test_hash_command() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("x.txt");
    fs::write(&file, "x").unwrap();

    let cli = Cli::try_parse_from(["dupscan", "-q", "hash", file.to_str().unwrap()]).unwrap();
    assert_eq!(run_app(cli).unwrap(), ExitCode::Success);

    let missing = dir.path().join("missing");
    let cli = Cli::try_parse_from([
        "dupscan",
        "-q",
        "hash",
        file.to_str().unwrap(),
        missing.to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(run_app(cli).unwrap(), ExitCode::PartialSuccess);
}
