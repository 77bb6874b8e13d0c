//! Import file validation tests.

use std::io::Write;

use bulk_model::{AnswerValue, Criterion, CriterionId, CriterionKind, StudyConfig};
use bulk_schema::{Issue, SchemaError, Severity, validate_csv, validate_csv_path};

fn study() -> StudyConfig {
    StudyConfig::new(
        2,
        vec![
            Criterion::new(
                "color",
                2,
                CriterionKind::MultipleChoice {
                    options: vec!["Red".into(), "Green".into(), "Blue".into()],
                    multiple_selection: true,
                },
            ),
            Criterion::new(
                "quality",
                1,
                CriterionKind::Rating {
                    start_value: Some(1),
                    end_value: Some(5),
                },
            ),
        ],
    )
}

const HEADER: &str = "artifact_1_filename,artifact_2_filename,question,description,criterion_1_RATING_answer,criterion_2_MULTIPLE_CHOICE_answer";

fn validate(body: &str) -> bulk_schema::ValidationReport {
    let text = format!("{HEADER}\n{body}");
    validate_csv(&study(), text.as_bytes()).expect("validation runs")
}

#[test]
fn well_formed_rows_become_task_records() {
    let report = validate(
        "a.png,b.png,\"Which is clearer?\",\"\",\"4\",\"Red,Green\"\n\
         c.png,d.png,\"Which loads faster?\",\"desc\",\"\",\"Blue\"\n",
    );
    assert!(report.issues.is_empty(), "{:?}", report.issues);
    assert!(report.is_importable());
    assert_eq!(report.rows_read, 2);
    assert_eq!(report.records.len(), 2);

    let first = &report.records[0];
    assert_eq!(first.line, 2);
    assert_eq!(first.artifact_filenames, vec!["a.png", "b.png"]);
    assert_eq!(
        first.answers.get(&CriterionId::new("quality")),
        Some(&AnswerValue::Rating(4))
    );
    assert_eq!(
        first.answers.get(&CriterionId::new("color")),
        Some(&AnswerValue::Choice(vec!["Red".into(), "Green".into()]))
    );

    let second = &report.records[1];
    assert_eq!(
        second.answers.get(&CriterionId::new("quality")),
        Some(&AnswerValue::Empty)
    );
    assert_eq!(
        report.referenced_artifacts().into_iter().collect::<Vec<_>>(),
        vec!["a.png", "b.png", "c.png", "d.png"]
    );
}

#[test]
fn header_mismatch_stops_row_mapping() {
    let text = "artifact_1_filename,question,description\nx.png,\"q\",\"d\"\n";
    let report = validate_csv(&study(), text.as_bytes()).unwrap();
    assert_eq!(report.records.len(), 0);
    assert_eq!(report.rows_read, 0);
    match &report.issues[..] {
        [Issue::HeaderMismatch { missing, .. }] => {
            assert!(missing.contains(&"artifact_2_filename".to_string()));
        }
        other => panic!("unexpected issues: {other:?}"),
    }
}

#[test]
fn invalid_answers_reject_only_their_row() {
    let report = validate(
        "a.png,b.png,\"ok\",\"\",\"9\",\"Red\"\n\
         c.png,d.png,\"ok\",\"\",\"2\",\"Red\"\n",
    );
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].line, 3);
    assert_eq!(report.error_count(), 1);
    let issue = &report.issues[0];
    assert_eq!(issue.line(), Some(2));
    assert_eq!(issue.column(), Some("criterion_1_RATING_answer"));
    assert_eq!(issue.message(), "rating 9 outside 1..=5");
    assert!(!report.is_importable());
}

#[test]
fn quoting_deviations_are_warnings() {
    let report = validate("\"a.png\",b.png,question text,\"\",\"3\",\"Red\"\n");
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.error_count(), 0);
    assert_eq!(report.warning_count(), 2);
    assert!(report.is_importable());
    let columns: Vec<&str> = report.issues.iter().filter_map(Issue::column).collect();
    assert_eq!(columns, vec!["artifact_1_filename", "question"]);
}

#[test]
fn quoting_checked_with_carriage_return_line_endings() {
    let text = format!("{HEADER}\r\"a.png\",b.png,\"Q\",\"\",\"3\",\"Red\"\r");
    let report = validate_csv(&study(), text.as_bytes()).unwrap();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.warning_count(), 1);
    assert_eq!(report.issues[0].column(), Some("artifact_1_filename"));
}

#[test]
fn repeated_header_column_is_reported_as_unexpected() {
    let text = format!("{HEADER},description\n");
    let report = validate_csv(&study(), text.as_bytes()).unwrap();
    match &report.issues[..] {
        [
            Issue::HeaderMismatch {
                missing,
                unexpected,
                out_of_order,
            },
        ] => {
            assert!(missing.is_empty());
            assert_eq!(unexpected, &vec!["description".to_string()]);
            assert!(!out_of_order);
        }
        other => panic!("unexpected issues: {other:?}"),
    }
}

#[test]
fn row_width_and_missing_cells_are_errors() {
    let report = validate(
        "a.png,\"q\"\n\
         ,b.png,\"\",\"\",\"1\",\"Red\"\n",
    );
    assert!(report.records.is_empty());
    assert!(matches!(
        report.issues[0],
        Issue::RowWidth {
            line: 2,
            expected: 6,
            found: 2
        }
    ));
    assert!(
        report
            .issues
            .iter()
            .any(|issue| matches!(issue, Issue::MissingFilename { line: 3, .. }))
    );
    assert!(
        report
            .issues
            .iter()
            .any(|issue| matches!(issue, Issue::MissingQuestion { line: 3 }))
    );
}

#[test]
fn header_only_file_has_no_rows() {
    let report = validate("");
    assert_eq!(report.issues, vec![Issue::NoDataRows]);
    assert!(!report.is_importable());
}

#[test]
fn empty_file_is_reported() {
    let report = validate_csv(&study(), "".as_bytes()).unwrap();
    assert_eq!(report.issues, vec![Issue::EmptyFile]);
}

#[test]
fn colliding_columns_refuse_the_import() {
    let config = StudyConfig::new(
        1,
        vec![
            Criterion::new("a", 1, CriterionKind::CodeEdit),
            Criterion::new("b", 1, CriterionKind::CodeEdit),
        ],
    );
    let text = "artifact_1_filename,question,description,criterion_1_CODE_EDIT_answer,criterion_1_CODE_EDIT_answer\n";
    let report = validate_csv(&config, text.as_bytes()).unwrap();
    assert_eq!(
        report.issues,
        vec![Issue::DuplicateColumn {
            column: "criterion_1_CODE_EDIT_answer".to_string()
        }]
    );
    assert_eq!(report.issues[0].severity(), Severity::Error);
}

#[test]
fn multiline_quoted_values_keep_line_numbers() {
    let config = StudyConfig::new(1, vec![Criterion::new("code", 1, CriterionKind::CodeEdit)]);
    let text = "artifact_1_filename,question,description,criterion_1_CODE_EDIT_answer\n\
                a.py,\"Fix it\",\"\",\"def f():\n    return 1\"\n\
                b.py,\"Again\",\"\",\"\"\n";
    let report = validate_csv(&config, text.as_bytes()).unwrap();
    assert!(report.issues.is_empty(), "{:?}", report.issues);
    assert_eq!(report.records[0].line, 2);
    assert_eq!(report.records[1].line, 4);
    assert_eq!(
        report.records[0].answers.get(&CriterionId::new("code")),
        Some(&AnswerValue::Code("def f():\n    return 1".to_string()))
    );
}

#[test]
fn validate_path_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    writeln!(file, "a.png,b.png,\"q\",\"\",\"5\",\"Blue\"").unwrap();
    let report = validate_csv_path(&study(), file.path()).unwrap();
    assert_eq!(report.records.len(), 1);

    let missing = validate_csv_path(&study(), std::path::Path::new("/nonexistent/tasks.csv"));
    assert!(matches!(missing, Err(SchemaError::FileNotFound { .. })));
}
