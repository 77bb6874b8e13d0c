//! Bulk import schema: the CSV layout a study expects, example rows that
//! teach it, and validation of uploaded files against it.
//!
//! # Features
//!
//! - **Schema derivation**: artifact filename, question, description, and one
//!   answer column per criterion in priority order
//! - **Examples**: single-row and expanded previews plus a template writer
//! - **Help panel**: per-criterion example value and explanation
//! - **Validation**: header, row, and answer checks that map rows to task records
//!
//! # Example
//!
//! ```
//! use bulk_model::StudyConfig;
//! use bulk_schema::{ColumnSchema, render_header};
//!
//! let config = StudyConfig::from_json(r#"{"artifactCountPerTask": 1}"#).unwrap();
//! let schema = ColumnSchema::derive(&config);
//! assert_eq!(render_header(&schema), "artifact_1_filename,question,description");
//! ```

mod answer;
mod columns;
mod error;
mod example;
mod help;
mod quoting;
mod validate;

// === Error Types ===
pub use error::{Result, SchemaError};

// === Schema ===
pub use columns::{Column, ColumnSchema};

// === Examples ===
pub use example::{
    EXPANDED_EXAMPLE_ROWS, example_row, expanded_example_rows, format_cell, numbered_example_row,
    quote_field, render_header, render_row, write_template,
};

// === Help Panel ===
pub use help::{CriterionHelp, HIGHLIGHT_EXAMPLE, criterion_help, help_panel};

// === Validation ===
pub use answer::{AnswerProblem, parse_answer};
pub use quoting::{RawField, RawRecord, scan_records};
pub use validate::{Issue, Severity, ValidationReport, validate_csv, validate_csv_path};
