//! Per-criterion help: one realistic example value and an explanation of
//! what each answer column accepts.

use bulk_model::{Criterion, CriterionKind, CriterionType, StudyConfig};
use serde::Serialize;

use crate::columns::Column;
use crate::example::quote_field;

/// Example highlight value: one point in relative image coordinates.
pub const HIGHLIGHT_EXAMPLE: &str = r#"[{"x":0.32,"y":0.12}]"#;

/// Help entry for one answer column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionHelp {
    pub column: String,
    pub question: String,
    pub criterion_type: CriterionType,
    /// Example cell, already quoted.
    pub example: String,
    pub explanation: String,
}

/// Builds the help entry for one criterion.
pub fn criterion_help(criterion: &Criterion) -> CriterionHelp {
    let (example, explanation) = match &criterion.kind {
        CriterionKind::MultipleChoice {
            options,
            multiple_selection,
        } => multiple_choice_help(options, *multiple_selection),
        kind @ CriterionKind::Rating { .. } => {
            let (start, end) = kind
                .rating_bounds()
                .unwrap_or((bulk_model::DEFAULT_RATING_START, bulk_model::DEFAULT_RATING_END));
            (
                quote_field(&start.to_string()),
                format!("Whole number rating from {start} to {end} (inclusive)."),
            )
        }
        CriterionKind::OpenEnded {
            min_length,
            max_length,
        } => (
            quote_field("Example explanation"),
            format!("Free text{}.", length_clause(*min_length, *max_length)),
        ),
        CriterionKind::Numeric {
            integer_only,
            min_value,
            max_value,
        } => {
            let (example, noun) = if *integer_only {
                ("42", "Whole number")
            } else {
                ("3.14", "Number (decimals allowed)")
            };
            (
                quote_field(example),
                format!("{noun}{}.", range_clause(*min_value, *max_value)),
            )
        }
        CriterionKind::CodeEdit => (
            quote_field("Ideal code explanation"),
            "Reference code or an explanation of the ideal edit.".to_string(),
        ),
        CriterionKind::ImageHighlight {
            number_of_annotations,
        } => {
            let limit = match number_of_annotations {
                Some(n) => format!(", at most {n}"),
                None => String::new(),
            };
            (
                quote_field(HIGHLIGHT_EXAMPLE),
                format!(
                    "JSON array of points with x and y between 0 and 1{limit}; inner quotes doubled."
                ),
            )
        }
    };

    CriterionHelp {
        column: Column::CriterionAnswer(criterion.clone()).name(),
        question: criterion.question.clone(),
        criterion_type: criterion.criterion_type(),
        example,
        explanation,
    }
}

/// Help entries for all criteria, in column order.
pub fn help_panel(config: &StudyConfig) -> Vec<CriterionHelp> {
    config
        .sorted_criteria()
        .into_iter()
        .map(criterion_help)
        .collect()
}

fn multiple_choice_help(options: &[String], multiple_selection: bool) -> (String, String) {
    let listed = if options.is_empty() {
        String::new()
    } else {
        format!(" Options: {}.", options.join(", "))
    };
    if multiple_selection && options.len() >= 2 {
        (
            quote_field(&format!("{},{}", options[0], options[1])),
            format!("One or more options, comma-joined inside the quotes.{listed}"),
        )
    } else {
        let first = options.first().map_or("A", String::as_str);
        let explanation = if multiple_selection {
            format!("One or more options, comma-joined inside the quotes.{listed}")
        } else {
            format!("Exactly one option.{listed}")
        };
        (quote_field(first), explanation)
    }
}

fn length_clause(min: Option<u32>, max: Option<u32>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!(", {min} to {max} characters"),
        (Some(min), None) => format!(", at least {min} characters"),
        (None, Some(max)) => format!(", at most {max} characters"),
        (None, None) => String::new(),
    }
}

fn range_clause(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!(" between {min} and {max}"),
        (Some(min), None) => format!(" of at least {min}"),
        (None, Some(max)) => format!(" of at most {max}"),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_choice_single_selection() {
        let criterion = Criterion::new(
            "1",
            1,
            CriterionKind::MultipleChoice {
                options: vec!["Yes".to_string(), "No".to_string()],
                multiple_selection: false,
            },
        );
        let help = criterion_help(&criterion);
        assert_eq!(help.example, "\"Yes\"");
        assert!(help.explanation.starts_with("Exactly one option."));
    }

    #[test]
    fn test_multiple_choice_without_options() {
        let criterion = Criterion::new(
            "1",
            1,
            CriterionKind::MultipleChoice {
                options: vec![],
                multiple_selection: true,
            },
        );
        assert_eq!(criterion_help(&criterion).example, "\"A\"");
    }

    #[test]
    fn test_rating_defaults_start() {
        let criterion = Criterion::new(
            "1",
            4,
            CriterionKind::Rating {
                start_value: None,
                end_value: Some(7),
            },
        );
        let help = criterion_help(&criterion);
        assert_eq!(help.column, "criterion_4_RATING_answer");
        assert_eq!(help.example, "\"1\"");
        assert_eq!(help.explanation, "Whole number rating from 1 to 7 (inclusive).");
    }

    #[test]
    fn test_numeric_examples() {
        let integer = Criterion::new(
            "1",
            1,
            CriterionKind::Numeric {
                integer_only: true,
                min_value: Some(0.0),
                max_value: Some(100.0),
            },
        );
        let help = criterion_help(&integer);
        assert_eq!(help.example, "\"42\"");
        assert_eq!(help.explanation, "Whole number between 0 and 100.");

        let decimal = Criterion::new(
            "2",
            2,
            CriterionKind::Numeric {
                integer_only: false,
                min_value: None,
                max_value: None,
            },
        );
        assert_eq!(criterion_help(&decimal).example, "\"3.14\"");
    }

    #[test]
    fn test_highlight_example_is_escaped() {
        let criterion = Criterion::new(
            "1",
            1,
            CriterionKind::ImageHighlight {
                number_of_annotations: Some(3),
            },
        );
        let help = criterion_help(&criterion);
        assert_eq!(help.example, r#""[{""x"":0.32,""y"":0.12}]""#);
        assert!(help.explanation.contains("at most 3"));
    }
}
