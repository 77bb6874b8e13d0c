//! Validation of an import file against the derived schema.
//!
//! Each row that passes becomes a [`TaskRecord`]. Problems are collected as
//! [`Issue`]s rather than aborting, so one pass reports everything wrong
//! with the file.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use bulk_model::{AnswerSheet, StudyConfig, TaskRecord};
use serde::Serialize;

use crate::answer::{AnswerProblem, parse_answer};
use crate::columns::{Column, ColumnSchema};
use crate::error::{Result, SchemaError};
use crate::quoting::{RawRecord, scan_records};

/// Issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Severity {
    /// Blocks the import.
    Error,
    /// Accepted, but deviates from the documented convention.
    Warning,
}

impl Severity {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

/// Validation issue - each variant carries only its needed data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Issue {
    // Configuration checks
    /// Two criteria derive the same column name.
    DuplicateColumn { column: String },

    // Structure checks
    /// File has no header row.
    EmptyFile,
    /// Header row differs from the schema.
    HeaderMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
        /// True when the names match but their order does not.
        out_of_order: bool,
    },
    /// Header is fine but there are no data rows.
    NoDataRows,
    /// Row has the wrong number of cells.
    RowWidth {
        line: u64,
        expected: usize,
        found: usize,
    },

    // Cell checks
    MissingFilename { line: u64, column: String },
    FilenameHasComma {
        line: u64,
        column: String,
        value: String,
    },
    MissingQuestion { line: u64 },
    InvalidAnswer {
        line: u64,
        column: String,
        problem: AnswerProblem,
    },

    // Convention checks
    /// Cell quoting deviates from the convention (bare filenames, quoted rest).
    Quoting {
        line: u64,
        column: String,
        expected_quoted: bool,
    },
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::Quoting { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Source line, for row-level issues.
    pub fn line(&self) -> Option<u64> {
        match self {
            Issue::RowWidth { line, .. }
            | Issue::MissingFilename { line, .. }
            | Issue::FilenameHasComma { line, .. }
            | Issue::MissingQuestion { line }
            | Issue::InvalidAnswer { line, .. }
            | Issue::Quoting { line, .. } => Some(*line),
            Issue::HeaderMismatch { .. } | Issue::EmptyFile => Some(1),
            Issue::DuplicateColumn { .. } | Issue::NoDataRows => None,
        }
    }

    pub fn column(&self) -> Option<&str> {
        match self {
            Issue::DuplicateColumn { column }
            | Issue::MissingFilename { column, .. }
            | Issue::FilenameHasComma { column, .. }
            | Issue::InvalidAnswer { column, .. }
            | Issue::Quoting { column, .. } => Some(column),
            Issue::MissingQuestion { .. } => Some("question"),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Issue::DuplicateColumn { column } => format!(
                "column {column} is derived from more than one criterion (same priority and type)"
            ),
            Issue::EmptyFile => "file is empty; expected a header row".to_string(),
            Issue::HeaderMismatch {
                missing,
                unexpected,
                out_of_order,
            } => {
                let mut parts = Vec::new();
                if !missing.is_empty() {
                    parts.push(format!("missing columns: {}", missing.join(", ")));
                }
                if !unexpected.is_empty() {
                    parts.push(format!("unexpected columns: {}", unexpected.join(", ")));
                }
                if *out_of_order {
                    parts.push("columns are out of order".to_string());
                }
                format!("header does not match the schema ({})", parts.join("; "))
            }
            Issue::NoDataRows => "file has a header but no task rows".to_string(),
            Issue::RowWidth {
                expected, found, ..
            } => format!("expected {expected} cells, found {found}"),
            Issue::MissingFilename { .. } => "artifact filename is empty".to_string(),
            Issue::FilenameHasComma { value, .. } => {
                format!("filename '{value}' contains a comma")
            }
            Issue::MissingQuestion { .. } => "question is empty".to_string(),
            Issue::InvalidAnswer { problem, .. } => problem.to_string(),
            Issue::Quoting {
                expected_quoted, ..
            } => {
                if *expected_quoted {
                    "value should be enclosed in double quotes".to_string()
                } else {
                    "filename should not be quoted".to_string()
                }
            }
        }
    }
}

/// Outcome of validating one import file.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub schema: ColumnSchema,
    pub issues: Vec<Issue>,
    /// Rows that passed, in file order.
    pub records: Vec<TaskRecord>,
    pub rows_read: usize,
}

impl ValidationReport {
    fn new(schema: ColumnSchema) -> Self {
        Self {
            schema,
            issues: Vec::new(),
            records: Vec::new(),
            rows_read: 0,
        }
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// True when the file can be submitted as-is.
    pub fn is_importable(&self) -> bool {
        !self.has_errors() && !self.records.is_empty()
    }

    /// Distinct artifact filenames referenced by accepted rows.
    pub fn referenced_artifacts(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .flat_map(|record| record.artifact_filenames.iter().cloned())
            .collect()
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == severity)
            .count()
    }
}

/// Validates an import file on disk.
pub fn validate_csv_path(config: &StudyConfig, path: &Path) -> Result<ValidationReport> {
    if !path.exists() {
        return Err(SchemaError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path).map_err(|source| SchemaError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let _span = tracing::info_span!("validate", file = %path.display()).entered();
    validate_csv(config, file)
}

/// Validates import CSV text against the schema derived from `config`.
pub fn validate_csv<R: Read>(config: &StudyConfig, mut input: R) -> Result<ValidationReport> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;

    let schema = ColumnSchema::derive(config);
    let mut report = ValidationReport::new(schema.clone());

    let duplicates = schema.duplicate_names();
    if !duplicates.is_empty() {
        tracing::warn!(
            study = %config.display_name(),
            duplicates = ?duplicates,
            "schema has colliding column names; import refused"
        );
        report.issues.extend(
            duplicates
                .into_iter()
                .map(|column| Issue::DuplicateColumn { column }),
        );
        return Ok(report);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header: Vec<String> = reader
        .headers()?
        .iter()
        .map(|name| name.trim().to_string())
        .collect();
    if header.is_empty() || header.iter().all(String::is_empty) {
        report.issues.push(Issue::EmptyFile);
        return Ok(report);
    }
    if let Some(issue) = compare_header(&schema.names(), &header) {
        tracing::debug!(found = ?header, "header mismatch");
        report.issues.push(issue);
        return Ok(report);
    }

    // Index 0 is the header; both readers skip blank lines.
    let raw_records = scan_records(&text);

    for (index, result) in reader.records().enumerate() {
        let record = result?;
        report.rows_read += 1;
        let line = record.position().map_or(0, csv::Position::line);
        let cells: Vec<&str> = record.iter().collect();
        let raw = raw_records.get(index + 1);
        if let Some(task) = check_row(&schema, line, &cells, raw, &mut report.issues) {
            report.records.push(task);
        }
    }

    if report.rows_read == 0 {
        report.issues.push(Issue::NoDataRows);
    }

    tracing::info!(
        rows = report.rows_read,
        accepted = report.records.len(),
        errors = report.error_count(),
        warnings = report.warning_count(),
        "validation complete"
    );
    Ok(report)
}

fn compare_header(expected: &[String], found: &[String]) -> Option<Issue> {
    if expected == found {
        return None;
    }
    let mut remaining: BTreeMap<&str, usize> = BTreeMap::new();
    for name in expected {
        *remaining.entry(name.as_str()).or_default() += 1;
    }
    // Repeats beyond the expected count are unexpected too.
    let mut unexpected = Vec::new();
    for name in found {
        match remaining.get_mut(name.as_str()) {
            Some(count) if *count > 0 => *count -= 1,
            _ => unexpected.push(name.clone()),
        }
    }
    let missing: Vec<String> = expected
        .iter()
        .filter(|name| !found.contains(name))
        .cloned()
        .collect();
    let out_of_order = missing.is_empty() && unexpected.is_empty();
    Some(Issue::HeaderMismatch {
        missing,
        unexpected,
        out_of_order,
    })
}

fn check_row(
    schema: &ColumnSchema,
    line: u64,
    cells: &[&str],
    raw: Option<&RawRecord>,
    issues: &mut Vec<Issue>,
) -> Option<TaskRecord> {
    if cells.len() != schema.len() {
        issues.push(Issue::RowWidth {
            line,
            expected: schema.len(),
            found: cells.len(),
        });
        return None;
    }

    let errors_before = issues.len();
    let mut artifact_filenames = Vec::new();
    let mut question = String::new();
    let mut description = String::new();
    let mut answers = AnswerSheet::new();

    for (column, cell) in schema.columns().iter().zip(cells.iter().copied()) {
        match column {
            Column::ArtifactFilename(_) => {
                let filename = cell.trim();
                if filename.is_empty() {
                    issues.push(Issue::MissingFilename {
                        line,
                        column: column.name(),
                    });
                } else if filename.contains(',') {
                    issues.push(Issue::FilenameHasComma {
                        line,
                        column: column.name(),
                        value: filename.to_string(),
                    });
                } else {
                    artifact_filenames.push(filename.to_string());
                }
            }
            Column::Question => {
                if cell.trim().is_empty() {
                    issues.push(Issue::MissingQuestion { line });
                }
                question = cell.to_string();
            }
            Column::Description => description = cell.to_string(),
            Column::CriterionAnswer(criterion) => match parse_answer(criterion, cell) {
                Ok(value) => {
                    answers.insert(criterion.id.clone(), value);
                }
                Err(problem) => issues.push(Issue::InvalidAnswer {
                    line,
                    column: column.name(),
                    problem,
                }),
            },
        }
    }
    let row_failed = issues.len() > errors_before;

    match raw {
        Some(raw) if raw.fields.len() == schema.len() => {
            for (column, field) in schema.columns().iter().zip(&raw.fields) {
                if column.expects_quotes() != field.quoted {
                    issues.push(Issue::Quoting {
                        line,
                        column: column.name(),
                        expected_quoted: column.expects_quotes(),
                    });
                }
            }
        }
        Some(raw) => tracing::debug!(
            line,
            scanned = raw.fields.len(),
            parsed = cells.len(),
            "raw scan disagrees with parsed row; quoting not checked"
        ),
        None => tracing::debug!(line, "no raw record for row; quoting not checked"),
    }

    if row_failed {
        return None;
    }
    Some(TaskRecord {
        line,
        artifact_filenames,
        question,
        description,
        answers,
    })
}
