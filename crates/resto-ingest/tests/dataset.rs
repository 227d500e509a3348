use std::fs;

use resto_ingest::{IngestOptions, numeric_column_f64, read_dataset, read_dataset_with_options};

#[test]
fn reads_header_and_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("customers.csv");
    fs::write(&path, "Age,Income,WaitTime\n25,50000,10\n40,75000,\n").expect("write csv");

    let df = read_dataset(&path).expect("read dataset");
    assert_eq!(df.height(), 2);
    let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
    assert_eq!(names, vec!["Age", "Income", "WaitTime"]);
    assert_eq!(
        numeric_column_f64(&df, "WaitTime").expect("wait column"),
        vec![Some(10.0), None]
    );
}

#[test]
fn trims_header_whitespace() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("padded.csv");
    fs::write(&path, "\u{feff} Age , Gender\n30,F\n").expect("write csv");

    let df = read_dataset(&path).expect("read dataset");
    let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
    assert_eq!(names, vec!["Age", "Gender"]);
}

#[test]
fn honors_row_limit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("many.csv");
    fs::write(&path, "A\n1\n2\n3\n4\n").expect("write csv");

    let options = IngestOptions {
        max_rows: Some(2),
        ..IngestOptions::default()
    };
    let df = read_dataset_with_options(&path, &options).expect("read dataset");
    assert_eq!(df.height(), 2);
}

#[test]
fn missing_file_is_an_error_with_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.csv");
    let err = read_dataset(&path).unwrap_err();
    assert!(format!("{err:#}").contains("absent.csv"));
}

#[test]
fn header_colliding_after_trim_is_kept_as_written() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dupes.csv");
    fs::write(&path, "Age, Age,Income \n30,31,1000\n").expect("write csv");

    let df = read_dataset(&path).expect("read dataset");
    let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
    assert_eq!(names, vec!["Age", " Age", "Income"]);
    assert_eq!(
        numeric_column_f64(&df, " Age").expect("padded column"),
        vec![Some(31.0)]
    );
}
