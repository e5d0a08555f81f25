use std::fs;
use std::path::PathBuf;

use lac_cli::ingest::{
    IngestError, build_table_set, parse_assignment, parse_table_arg, read_postcodes, read_table,
};
use lac_common::ColumnReader;
use lac_model::{MetadataValue, keys};
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write csv");
    path
}

#[test]
fn read_table_keeps_every_column_as_text() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(
        &dir,
        "header.csv",
        "CHILD,SEX,DOB\n001,1,01/02/2015\n002,,03/04/2016\n",
    );

    let df = read_table(&path).expect("read table");
    assert_eq!(df.height(), 2);

    let reader = ColumnReader::new(&df);
    // Leading zeros survive because nothing is parsed as a number.
    assert_eq!(
        reader.strings("CHILD"),
        Some(vec!["001".to_string(), "002".to_string()])
    );
    assert_eq!(
        reader.strings("SEX"),
        Some(vec!["1".to_string(), String::new()])
    );
}

#[test]
fn read_table_reports_missing_file() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("nope.csv");
    let error = read_table(&missing).expect_err("missing file");
    assert!(matches!(error, IngestError::FileNotFound { .. }));
}

#[test]
fn assignments_are_trimmed_and_validated() {
    assert_eq!(
        parse_assignment(" collection_year = 2023 ").expect("parse"),
        ("collection_year".to_string(), "2023".to_string())
    );
    assert!(matches!(
        parse_assignment("no-equals"),
        Err(IngestError::InvalidAssignment { .. })
    ));
    assert!(parse_assignment("=value").is_err());

    let (name, path) = parse_table_arg("Header=data/header.csv").expect("table arg");
    assert_eq!(name, "Header");
    assert_eq!(path, PathBuf::from("data/header.csv"));
    assert!(parse_table_arg("Header=").is_err());
}

#[test]
fn postcodes_use_pcd_column_and_drop_blanks() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(&dir, "postcodes.csv", "laua,pcd\nE1,AB1 2CD\nE1,\nE2,EF3 4GH\n");
    assert_eq!(
        read_postcodes(&path).expect("postcodes"),
        vec!["AB1 2CD".to_string(), "EF3 4GH".to_string()]
    );

    let first_column = write_csv(&dir, "plain.csv", "postcode\nXY1 1ZZ\n");
    assert_eq!(
        read_postcodes(&first_column).expect("postcodes"),
        vec!["XY1 1ZZ".to_string()]
    );
}

#[test]
fn table_set_collects_tables_and_metadata() {
    let dir = TempDir::new().expect("tempdir");
    let header = write_csv(&dir, "header.csv", "CHILD,SEX\n1,1\n2,2\n");
    let episodes = write_csv(&dir, "episodes.csv", "CHILD,DECOM\n1,01/04/2022\n");
    let postcodes = write_csv(&dir, "postcodes.csv", "pcd\nAB1 2CD\n");

    let tables = build_table_set(
        &[
            ("Header".to_string(), header),
            ("Episodes".to_string(), episodes),
        ],
        &[("collection_year".to_string(), "2023".to_string())],
        Some(&postcodes),
    )
    .expect("table set");

    assert_eq!(tables.len(), 2);
    assert_eq!(tables.height("Header"), Some(2));
    assert_eq!(tables.metadata_text(keys::FILE_FORMAT).ok(), Some("csv"));
    assert_eq!(tables.metadata_text(keys::COLLECTION_YEAR).ok(), Some("2023"));
    assert_eq!(
        tables.metadata().get(keys::POSTCODES),
        Some(&MetadataValue::List(vec!["AB1 2CD".to_string()]))
    );
}

#[test]
fn explicit_file_format_overrides_default() {
    let dir = TempDir::new().expect("tempdir");
    let header = write_csv(&dir, "header.csv", "CHILD\n1\n");
    let tables = build_table_set(
        &[("Header".to_string(), header)],
        &[("file_format".to_string(), "xml".to_string())],
        None,
    )
    .expect("table set");
    assert_eq!(tables.metadata_text(keys::FILE_FORMAT).ok(), Some("xml"));
}

#[test]
fn duplicate_table_names_are_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let header = write_csv(&dir, "header.csv", "CHILD\n1\n");
    let error = build_table_set(
        &[
            ("Header".to_string(), header.clone()),
            ("Header".to_string(), header),
        ],
        &[],
        None,
    )
    .expect_err("duplicate");
    assert!(matches!(error, IngestError::DuplicateTable { name } if name == "Header"));
}
