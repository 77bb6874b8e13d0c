//! Study configuration consumed by the bulk import schema.

use serde::{Deserialize, Serialize};

use crate::criterion::{Criterion, null_as_default, optional_string_or_number};
use crate::error::Result;

/// The part of a study's configuration that shapes the import schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyConfig {
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Number of artifact filename columns preceding question/description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub artifact_count_per_task: u32,
    /// Evaluation criteria in backend order. Missing or null means none.
    #[serde(
        rename = "evaluationCriteria",
        default,
        deserialize_with = "null_as_default"
    )]
    pub criteria: Vec<Criterion>,
}

impl StudyConfig {
    pub fn new(artifact_count_per_task: u32, criteria: Vec<Criterion>) -> Self {
        Self {
            id: None,
            title: None,
            artifact_count_per_task,
            criteria,
        }
    }

    /// Parses a study configuration JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Criteria sorted ascending by priority; equal priorities keep input order.
    pub fn sorted_criteria(&self) -> Vec<&Criterion> {
        let mut sorted: Vec<&Criterion> = self.criteria.iter().collect();
        sorted.sort_by_key(|criterion| criterion.priority_order);
        sorted
    }

    /// Label used in logs and summaries.
    pub fn display_name(&self) -> &str {
        self.title
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("study")
    }
}
