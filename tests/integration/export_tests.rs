use dupscan::duplicates::DuplicateFinder;
use dupscan::output::{CsvOutput, JsonOutput, Report};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_csv_report_for_scan() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("A"), "x").unwrap();
    fs::write(data.join("B"), "x").unwrap();
    fs::write(data.join("C"), "y").unwrap();

    let result = DuplicateFinder::with_defaults().find_duplicates(&data).unwrap();
    let report = Report::render(&result);
    let target = dir.path().join("duplicados.csv");
    CsvOutput::new(&report).write_file(&target).unwrap();

    let mut reader = csv::Reader::from_path(&target).unwrap();
    assert_eq!(
        reader.headers().unwrap().iter().collect::<Vec<_>>(),
        vec!["hash", "path"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][1], data.join("A").to_str().unwrap());
    assert_eq!(&rows[1][1], data.join("B").to_str().unwrap());
    assert_eq!(&rows[0][0], &rows[1][0]);
}

#[test]
fn test_csv_report_empty_directory_is_header_only() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("empty");
    fs::create_dir(&data).unwrap();

    let result = DuplicateFinder::with_defaults().find_duplicates(&data).unwrap();
    let target = dir.path().join("out.csv");
    CsvOutput::new(&Report::render(&result)).write_file(&target).unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "hash,path\n");
}

#[test]
fn test_csv_handles_unicode_paths() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("datos");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("canción.mp3"), "la la").unwrap();
    fs::write(data.join("copia de canción.mp3"), "la la").unwrap();

    let result = DuplicateFinder::with_defaults().find_duplicates(&data).unwrap();
    let csv = CsvOutput::new(&Report::render(&result)).to_string().unwrap();

    assert!(csv.contains("canción.mp3"));
    assert!(csv.contains("copia de canción.mp3"));
}

#[test]
fn test_json_report_matches_summary() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one"), vec![1u8; 2048]).unwrap();
    fs::write(dir.path().join("two"), vec![1u8; 2048]).unwrap();
    fs::write(dir.path().join("three"), vec![1u8; 2048]).unwrap();

    let result = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let report = Report::render(&result);

    let mut buffer = Vec::new();
    JsonOutput::new(dir.path(), &result, &report.summary)
        .write_to(&mut buffer)
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

    assert_eq!(json["summary"]["duplicate_groups"], 1);
    assert_eq!(json["summary"]["duplicate_files"], 2);
    assert_eq!(json["summary"]["reclaimable_bytes"], 4096);
    assert_eq!(json["summary"]["reclaimable_display"], "4.00 KB");
    assert_eq!(json["groups"][0]["reclaimable"], 4096);
    assert_eq!(json["groups"][0]["files"].as_array().unwrap().len(), 3);
}
