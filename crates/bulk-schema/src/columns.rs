//! Column schema derived from a study configuration.
//!
//! The schema is the ordered list of columns an import file must carry:
//!
//! ```text
//! artifact_1_filename … artifact_N_filename, question, description,
//! criterion_{priorityOrder}_{type}_answer …
//! ```
//!
//! Criterion columns follow ascending `priorityOrder`; criteria with equal
//! priority keep their configuration order.

use std::collections::BTreeMap;

use bulk_model::{Criterion, StudyConfig};

/// One column of the import schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// 1-based artifact slot.
    ArtifactFilename(u32),
    Question,
    Description,
    CriterionAnswer(Criterion),
}

impl Column {
    /// Header name of the column.
    pub fn name(&self) -> String {
        match self {
            Column::ArtifactFilename(index) => format!("artifact_{index}_filename"),
            Column::Question => "question".to_string(),
            Column::Description => "description".to_string(),
            Column::CriterionAnswer(criterion) => format!(
                "criterion_{}_{}_answer",
                criterion.priority_order,
                criterion.criterion_type()
            ),
        }
    }

    /// Whether cells of this column are written double-quoted.
    ///
    /// Filenames are written bare; every other value is quoted.
    pub fn expects_quotes(&self) -> bool {
        !matches!(self, Column::ArtifactFilename(_))
    }

    pub fn criterion(&self) -> Option<&Criterion> {
        match self {
            Column::CriterionAnswer(criterion) => Some(criterion),
            _ => None,
        }
    }

    /// Short description for schema listings.
    pub fn kind_label(&self) -> String {
        match self {
            Column::ArtifactFilename(_) => "Artifact filename".to_string(),
            Column::Question => "Task question".to_string(),
            Column::Description => "Task description".to_string(),
            Column::CriterionAnswer(criterion) => {
                format!("{} answer", criterion.criterion_type().label())
            }
        }
    }
}

/// Ordered import columns for one study configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnSchema {
    columns: Vec<Column>,
}

impl ColumnSchema {
    /// Derives the schema. Never fails; an empty criteria list yields only
    /// the filename, question, and description columns.
    pub fn derive(config: &StudyConfig) -> Self {
        let artifact_count = config.artifact_count_per_task;
        if artifact_count == 0 {
            tracing::warn!(
                study = %config.display_name(),
                "artifactCountPerTask is 0; schema has no filename columns"
            );
        }

        let mut columns = Vec::with_capacity(artifact_count as usize + 2 + config.criteria.len());
        columns.extend((1..=artifact_count).map(Column::ArtifactFilename));
        columns.push(Column::Question);
        columns.push(Column::Description);
        columns.extend(
            config
                .sorted_criteria()
                .into_iter()
                .map(|criterion| Column::CriterionAnswer(criterion.clone())),
        );

        tracing::debug!(
            study = %config.display_name(),
            column_count = columns.len(),
            "derived import schema"
        );
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Index of the column with the given header name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name() == name)
    }

    pub fn artifact_count(&self) -> usize {
        self.columns
            .iter()
            .filter(|column| matches!(column, Column::ArtifactFilename(_)))
            .count()
    }

    /// Header names that occur more than once, in first-occurrence order.
    ///
    /// Two criteria sharing a priority and a type produce the same name.
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        let names = self.names();
        for name in &names {
            *counts.entry(name.clone()).or_default() += 1;
        }
        let mut duplicates = Vec::new();
        for name in names {
            if counts.get(&name).copied().unwrap_or(0) > 1 && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulk_model::CriterionKind;

    fn rating(id: &str, priority: i64) -> Criterion {
        Criterion::new(
            id,
            priority,
            CriterionKind::Rating {
                start_value: Some(1),
                end_value: Some(5),
            },
        )
    }

    #[test]
    fn test_derive_without_criteria() {
        let schema = ColumnSchema::derive(&StudyConfig::new(1, vec![]));
        assert_eq!(
            schema.names(),
            vec!["artifact_1_filename", "question", "description"]
        );
    }

    #[test]
    fn test_derive_zero_artifacts() {
        let schema = ColumnSchema::derive(&StudyConfig::new(0, vec![rating("r", 1)]));
        assert_eq!(
            schema.names(),
            vec!["question", "description", "criterion_1_RATING_answer"]
        );
        assert_eq!(schema.artifact_count(), 0);
    }

    #[test]
    fn test_negative_and_sparse_priorities() {
        let config = StudyConfig::new(
            1,
            vec![
                rating("a", 10),
                Criterion::new("b", -3, CriterionKind::CodeEdit),
            ],
        );
        let schema = ColumnSchema::derive(&config);
        assert_eq!(schema.position("criterion_-3_CODE_EDIT_answer"), Some(3));
        assert_eq!(schema.position("criterion_10_RATING_answer"), Some(4));
    }

    #[test]
    fn test_duplicate_names_reported_once() {
        let config = StudyConfig::new(
            1,
            vec![rating("a", 1), rating("b", 1), rating("c", 1)],
        );
        let schema = ColumnSchema::derive(&config);
        assert_eq!(schema.len(), 6);
        assert_eq!(schema.duplicate_names(), vec!["criterion_1_RATING_answer"]);
    }

    #[test]
    fn test_quoting_rule_per_column() {
        assert!(!Column::ArtifactFilename(1).expects_quotes());
        assert!(Column::Question.expects_quotes());
        assert!(Column::CriterionAnswer(rating("a", 1)).expects_quotes());
    }
}
