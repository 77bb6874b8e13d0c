//! Artifact archive inspection against a validated import file.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use bulk_client::{ClientError, inspect_archive, missing_artifacts};
use bulk_model::{Criterion, CriterionKind, StudyConfig};
use bulk_schema::validate_csv;
use zip::write::SimpleFileOptions;

fn write_zip(path: &Path, entries: &[&str]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    zip.add_directory("images/", options).unwrap();
    for name in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(b"artifact").unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn listing_uses_base_names_and_skips_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("artifacts.zip");
    write_zip(
        &path,
        &["images/a.png", "b.png", "__MACOSX/images/._a.png", "images/._c.png"],
    );

    let listing = inspect_archive(&path).unwrap();
    let names: Vec<&str> = listing.file_names.iter().map(String::as_str).collect();
    assert_eq!(names, ["a.png", "b.png"]);
    assert!(listing.contains("a.png"));
    assert!(!listing.contains("images/a.png"));
}

#[test]
fn reports_referenced_files_missing_from_archive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("artifacts.zip");
    write_zip(&path, &["a.png", "b.png", "c.png"]);

    let config = StudyConfig::new(
        2,
        vec![Criterion::new(
            "score",
            1,
            CriterionKind::Rating {
                start_value: None,
                end_value: None,
            },
        )],
    );
    let csv = "artifact_1_filename,artifact_2_filename,question,description,criterion_1_RATING_answer\n\
               a.png,b.png,\"Q1\",\"\",\"3\"\n\
               c.png,d.png,\"Q2\",\"\",\"5\"\n";
    let report = validate_csv(&config, csv.as_bytes()).unwrap();
    assert!(report.is_importable());

    let listing = inspect_archive(&path).unwrap();
    assert_eq!(missing_artifacts(&listing, &report), ["d.png"]);
}

#[test]
fn non_zip_file_is_archive_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("artifacts.zip");
    std::fs::write(&path, b"not a zip").unwrap();

    assert!(matches!(inspect_archive(&path), Err(ClientError::Archive(_))));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        inspect_archive(&dir.path().join("absent.zip")),
        Err(ClientError::Io(_))
    ));
}
