//! Parsing of answer cells against their criterion.

use bulk_model::{AnswerValue, Criterion, CriterionKind, HighlightPoint};
use serde::Serialize;
use thiserror::Error;

/// Why an answer cell was rejected.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum AnswerProblem {
    #[error("'{value}' is not one of the options ({})", .allowed.join(", "))]
    UnknownOption { value: String, allowed: Vec<String> },

    #[error("{count} options given but only one may be selected")]
    MultipleNotAllowed { count: usize },

    #[error("'{value}' is not a whole number")]
    NotAnInteger { value: String },

    #[error("'{value}' is not a number")]
    NotANumber { value: String },

    #[error("rating {value} outside {start}..={end}")]
    RatingOutOfRange { value: i64, start: i64, end: i64 },

    #[error("{value} is below the minimum {min}")]
    BelowMinimum { value: f64, min: f64 },

    #[error("{value} is above the maximum {max}")]
    AboveMaximum { value: f64, max: f64 },

    #[error("text has {length} characters, minimum is {min}")]
    TooShort { length: usize, min: u32 },

    #[error("text has {length} characters, maximum is {max}")]
    TooLong { length: usize, max: u32 },

    #[error("highlights must be a JSON array of {{x, y}} points: {reason}")]
    MalformedHighlights { reason: String },

    #[error("{count} highlights given, at most {max} allowed")]
    TooManyHighlights { count: usize, max: u32 },

    #[error("highlight ({x}, {y}) lies outside the image (0..=1)")]
    HighlightOutOfBounds { x: f64, y: f64 },
}

/// Parses one answer cell. An empty cell means "no reference answer".
pub fn parse_answer(criterion: &Criterion, raw: &str) -> Result<AnswerValue, AnswerProblem> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(AnswerValue::Empty);
    }

    match &criterion.kind {
        CriterionKind::MultipleChoice {
            options,
            multiple_selection,
        } => parse_choice(trimmed, options, *multiple_selection),
        kind @ CriterionKind::Rating { .. } => {
            let value: i64 = trimmed.parse().map_err(|_| AnswerProblem::NotAnInteger {
                value: trimmed.to_string(),
            })?;
            let (start, end) = kind
                .rating_bounds()
                .unwrap_or((bulk_model::DEFAULT_RATING_START, bulk_model::DEFAULT_RATING_END));
            if value < start || value > end {
                return Err(AnswerProblem::RatingOutOfRange { value, start, end });
            }
            Ok(AnswerValue::Rating(value))
        }
        CriterionKind::OpenEnded {
            min_length,
            max_length,
        } => {
            let length = trimmed.chars().count();
            if let Some(min) = *min_length
                && length < min as usize
            {
                return Err(AnswerProblem::TooShort { length, min });
            }
            if let Some(max) = *max_length
                && length > max as usize
            {
                return Err(AnswerProblem::TooLong { length, max });
            }
            Ok(AnswerValue::Text(trimmed.to_string()))
        }
        CriterionKind::Numeric {
            integer_only,
            min_value,
            max_value,
        } => {
            let value = parse_number(trimmed, *integer_only)?;
            if let Some(min) = *min_value
                && value < min
            {
                return Err(AnswerProblem::BelowMinimum { value, min });
            }
            if let Some(max) = *max_value
                && value > max
            {
                return Err(AnswerProblem::AboveMaximum { value, max });
            }
            Ok(AnswerValue::Number(value))
        }
        CriterionKind::CodeEdit => Ok(AnswerValue::Code(raw.to_string())),
        CriterionKind::ImageHighlight {
            number_of_annotations,
        } => parse_highlights(trimmed, *number_of_annotations),
    }
}

fn parse_choice(
    value: &str,
    options: &[String],
    multiple_selection: bool,
) -> Result<AnswerValue, AnswerProblem> {
    let selected: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect();
    if selected.len() > 1 && !multiple_selection {
        return Err(AnswerProblem::MultipleNotAllowed {
            count: selected.len(),
        });
    }
    if !options.is_empty()
        && let Some(unknown) = selected.iter().find(|choice| !options.contains(choice))
    {
        return Err(AnswerProblem::UnknownOption {
            value: unknown.clone(),
            allowed: options.to_vec(),
        });
    }
    Ok(AnswerValue::Choice(selected))
}

fn parse_number(value: &str, integer_only: bool) -> Result<f64, AnswerProblem> {
    if integer_only {
        let parsed: i64 = value.parse().map_err(|_| AnswerProblem::NotAnInteger {
            value: value.to_string(),
        })?;
        return Ok(parsed as f64);
    }
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(AnswerProblem::NotANumber {
            value: value.to_string(),
        }),
    }
}

fn parse_highlights(value: &str, limit: Option<u32>) -> Result<AnswerValue, AnswerProblem> {
    let points: Vec<HighlightPoint> =
        serde_json::from_str(value).map_err(|e| AnswerProblem::MalformedHighlights {
            reason: e.to_string(),
        })?;
    if let Some(max) = limit
        && points.len() > max as usize
    {
        return Err(AnswerProblem::TooManyHighlights {
            count: points.len(),
            max,
        });
    }
    let in_bounds = |v: f64| (0.0..=1.0).contains(&v);
    if let Some(point) = points.iter().find(|p| !in_bounds(p.x) || !in_bounds(p.y)) {
        return Err(AnswerProblem::HighlightOutOfBounds {
            x: point.x,
            y: point.y,
        });
    }
    Ok(AnswerValue::Highlights(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(multiple: bool) -> Criterion {
        Criterion::new(
            "mc",
            1,
            CriterionKind::MultipleChoice {
                options: vec!["Red".into(), "Green".into(), "Blue".into()],
                multiple_selection: multiple,
            },
        )
    }

    #[test]
    fn test_empty_cell_is_empty_answer() {
        assert_eq!(parse_answer(&choice(false), ""), Ok(AnswerValue::Empty));
        assert_eq!(
            parse_answer(&Criterion::new("c", 1, CriterionKind::CodeEdit), "  "),
            Ok(AnswerValue::Empty)
        );
    }

    #[test]
    fn test_multiple_choice() {
        assert_eq!(
            parse_answer(&choice(true), "Red, Green"),
            Ok(AnswerValue::Choice(vec!["Red".into(), "Green".into()]))
        );
        assert_eq!(
            parse_answer(&choice(false), "Red,Green"),
            Err(AnswerProblem::MultipleNotAllowed { count: 2 })
        );
        assert!(matches!(
            parse_answer(&choice(true), "Purple"),
            Err(AnswerProblem::UnknownOption { .. })
        ));
    }

    #[test]
    fn test_rating_range() {
        let rating = Criterion::new(
            "r",
            1,
            CriterionKind::Rating {
                start_value: Some(1),
                end_value: Some(5),
            },
        );
        assert_eq!(parse_answer(&rating, "5"), Ok(AnswerValue::Rating(5)));
        assert_eq!(
            parse_answer(&rating, "6"),
            Err(AnswerProblem::RatingOutOfRange {
                value: 6,
                start: 1,
                end: 5
            })
        );
        assert!(matches!(
            parse_answer(&rating, "4.5"),
            Err(AnswerProblem::NotAnInteger { .. })
        ));
    }

    #[test]
    fn test_open_ended_length() {
        let open = Criterion::new(
            "o",
            1,
            CriterionKind::OpenEnded {
                min_length: Some(3),
                max_length: Some(5),
            },
        );
        assert_eq!(
            parse_answer(&open, "ab"),
            Err(AnswerProblem::TooShort { length: 2, min: 3 })
        );
        assert_eq!(
            parse_answer(&open, "abcdef"),
            Err(AnswerProblem::TooLong { length: 6, max: 5 })
        );
        assert_eq!(
            parse_answer(&open, "abcd"),
            Ok(AnswerValue::Text("abcd".into()))
        );
    }

    #[test]
    fn test_numeric() {
        let integer = Criterion::new(
            "n",
            1,
            CriterionKind::Numeric {
                integer_only: true,
                min_value: Some(0.0),
                max_value: Some(100.0),
            },
        );
        assert_eq!(parse_answer(&integer, "42"), Ok(AnswerValue::Number(42.0)));
        assert!(matches!(
            parse_answer(&integer, "3.14"),
            Err(AnswerProblem::NotAnInteger { .. })
        ));
        assert!(matches!(
            parse_answer(&integer, "101"),
            Err(AnswerProblem::AboveMaximum { .. })
        ));

        let decimal = Criterion::new(
            "d",
            1,
            CriterionKind::Numeric {
                integer_only: false,
                min_value: None,
                max_value: None,
            },
        );
        assert_eq!(parse_answer(&decimal, "2.5"), Ok(AnswerValue::Number(2.5)));
        assert!(matches!(
            parse_answer(&decimal, "NaN"),
            Err(AnswerProblem::NotANumber { .. })
        ));
    }

    #[test]
    fn test_highlights() {
        let highlight = Criterion::new(
            "h",
            1,
            CriterionKind::ImageHighlight {
                number_of_annotations: Some(1),
            },
        );
        assert_eq!(
            parse_answer(&highlight, r#"[{"x":0.32,"y":0.12}]"#),
            Ok(AnswerValue::Highlights(vec![HighlightPoint {
                x: 0.32,
                y: 0.12
            }]))
        );
        assert!(matches!(
            parse_answer(&highlight, r#"[{"x":0.1,"y":0.1},{"x":0.2,"y":0.2}]"#),
            Err(AnswerProblem::TooManyHighlights { count: 2, max: 1 })
        ));
        assert!(matches!(
            parse_answer(&highlight, r#"[{"x":1.5,"y":0.1}]"#),
            Err(AnswerProblem::HighlightOutOfBounds { .. })
        ));
        assert!(matches!(
            parse_answer(&highlight, "not json"),
            Err(AnswerProblem::MalformedHighlights { .. })
        ));
    }
}
