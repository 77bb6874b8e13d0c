//! Data model for bulk task import.
//!
//! Criteria and study configuration are read-only inputs fetched from the
//! study service. Task records and answer sheets are produced from an import
//! file, one per row.

pub mod criterion;
pub mod error;
pub mod folder;
pub mod study;
pub mod task;

pub use criterion::{
    Criterion, CriterionId, CriterionKind, CriterionType, DEFAULT_RATING_END,
    DEFAULT_RATING_START,
};
pub use error::{ModelError, Result};
pub use folder::{Breadcrumb, FolderEntry, FolderTrail};
pub use study::StudyConfig;
pub use task::{AnswerSheet, AnswerValue, HighlightPoint, TaskRecord, TaskSummary, UploadResult};
