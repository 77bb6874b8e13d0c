//! Task records produced from an import file, and backend task/upload types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::criterion::{CriterionId, null_as_default, string_or_number};

/// One point marked on an image, in relative coordinates (`0.0..=1.0`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightPoint {
    pub x: f64,
    pub y: f64,
}

/// A parsed answer cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    /// Empty quoted cell (`""`): no reference answer for this criterion.
    Empty,
    Choice(Vec<String>),
    Rating(i64),
    Text(String),
    Number(f64),
    Code(String),
    Highlights(Vec<HighlightPoint>),
}

impl AnswerValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, AnswerValue::Empty)
    }
}

/// Answers for one task, keyed by criterion.
///
/// Built fresh for every row; never shared between tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet {
    answers: BTreeMap<CriterionId, AnswerValue>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer, returning the previous one for the same criterion.
    pub fn insert(&mut self, criterion: CriterionId, value: AnswerValue) -> Option<AnswerValue> {
        self.answers.insert(criterion, value)
    }

    pub fn get(&self, criterion: &CriterionId) -> Option<&AnswerValue> {
        self.answers.get(criterion)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Number of criteria with a non-empty answer.
    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|value| !value.is_empty()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CriterionId, &AnswerValue)> {
        self.answers.iter()
    }
}

/// A validated import row, ready to become one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// 1-based line in the source file.
    pub line: u64,
    pub artifact_filenames: Vec<String>,
    pub question: String,
    pub description: String,
    pub answers: AnswerSheet,
}

/// Backend response to a successful bulk upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub tasks_created: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub folder_name: String,
}

/// Task list entry shown after an import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub question: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artifact_count: u32,
    #[serde(default)]
    pub folder_name: Option<String>,
}
