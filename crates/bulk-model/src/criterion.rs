//! Evaluation criteria attached to a study.
//!
//! The backend sends criteria as one flat JSON object per criterion where
//! every type-specific attribute is present but nullable. Here a criterion
//! is split into the shared descriptor and a [`CriterionKind`] variant that
//! carries only the attributes meaningful for its type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ModelError;

/// Opaque criterion identifier.
///
/// The backend emits either numeric or string ids; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CriterionId(String);

impl CriterionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CriterionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        string_or_number(deserializer).map(Self)
    }
}

/// Accepts a JSON string or integer and yields its text form.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Signed(n) => n.to_string(),
        RawId::Unsigned(n) => n.to_string(),
    })
}

/// Like [`string_or_number`], also accepting `null`.
pub(crate) fn optional_string_or_number<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<CriterionId>::deserialize(deserializer)?.map(|id| id.0))
}

/// Criterion type tag as it appears on the wire and in column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriterionType {
    MultipleChoice,
    Rating,
    OpenEnded,
    Numeric,
    CodeEdit,
    ImageHighlight,
}

impl CriterionType {
    /// All supported types, in declaration order.
    pub const ALL: [CriterionType; 6] = [
        CriterionType::MultipleChoice,
        CriterionType::Rating,
        CriterionType::OpenEnded,
        CriterionType::Numeric,
        CriterionType::CodeEdit,
        CriterionType::ImageHighlight,
    ];

    /// Wire tag, e.g. `MULTIPLE_CHOICE`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            CriterionType::MultipleChoice => "MULTIPLE_CHOICE",
            CriterionType::Rating => "RATING",
            CriterionType::OpenEnded => "OPEN_ENDED",
            CriterionType::Numeric => "NUMERIC",
            CriterionType::CodeEdit => "CODE_EDIT",
            CriterionType::ImageHighlight => "IMAGE_HIGHLIGHT",
        }
    }

    /// Human-readable label.
    pub const fn label(&self) -> &'static str {
        match self {
            CriterionType::MultipleChoice => "Multiple choice",
            CriterionType::Rating => "Rating",
            CriterionType::OpenEnded => "Open ended",
            CriterionType::Numeric => "Numeric",
            CriterionType::CodeEdit => "Code edit",
            CriterionType::ImageHighlight => "Image highlight",
        }
    }
}

impl fmt::Display for CriterionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CriterionType {
    type Err = ModelError;

    /// Parses a wire tag (case-insensitive, `-` and spaces treated as `_`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        CriterionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownCriterionType(s.to_string()))
    }
}

/// Type-specific attributes, keyed by the `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum CriterionKind {
    MultipleChoice {
        #[serde(default, deserialize_with = "null_as_default")]
        options: Vec<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        multiple_selection: bool,
    },
    Rating {
        #[serde(default)]
        start_value: Option<i64>,
        #[serde(default)]
        end_value: Option<i64>,
    },
    OpenEnded {
        #[serde(default)]
        min_length: Option<u32>,
        #[serde(default)]
        max_length: Option<u32>,
    },
    Numeric {
        #[serde(default, deserialize_with = "null_as_default")]
        integer_only: bool,
        #[serde(default)]
        min_value: Option<f64>,
        #[serde(default)]
        max_value: Option<f64>,
    },
    CodeEdit,
    ImageHighlight {
        #[serde(default)]
        number_of_annotations: Option<u32>,
    },
}

/// Rating scale bounds used when the study leaves them unset.
pub const DEFAULT_RATING_START: i64 = 1;
pub const DEFAULT_RATING_END: i64 = 5;

impl CriterionKind {
    pub fn criterion_type(&self) -> CriterionType {
        match self {
            CriterionKind::MultipleChoice { .. } => CriterionType::MultipleChoice,
            CriterionKind::Rating { .. } => CriterionType::Rating,
            CriterionKind::OpenEnded { .. } => CriterionType::OpenEnded,
            CriterionKind::Numeric { .. } => CriterionType::Numeric,
            CriterionKind::CodeEdit => CriterionType::CodeEdit,
            CriterionKind::ImageHighlight { .. } => CriterionType::ImageHighlight,
        }
    }

    /// Inclusive rating bounds with defaults applied, or `None` for other kinds.
    pub fn rating_bounds(&self) -> Option<(i64, i64)> {
        match self {
            CriterionKind::Rating {
                start_value,
                end_value,
            } => Some((
                start_value.unwrap_or(DEFAULT_RATING_START),
                end_value.unwrap_or(DEFAULT_RATING_END),
            )),
            _ => None,
        }
    }
}

/// One evaluation dimension of a study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub id: CriterionId,
    /// Column ordering key. Not unique and not contiguous.
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority_order: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub question: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(flatten)]
    pub kind: CriterionKind,
}

impl Criterion {
    pub fn new(id: impl Into<String>, priority_order: i64, kind: CriterionKind) -> Self {
        Self {
            id: CriterionId::new(id),
            priority_order,
            question: String::new(),
            description: String::new(),
            kind,
        }
    }

    #[must_use]
    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = question.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn criterion_type(&self) -> CriterionType {
        self.kind.criterion_type()
    }
}

/// Deserializes `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
