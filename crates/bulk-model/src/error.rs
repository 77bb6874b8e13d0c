//! Error types for study model parsing.

use thiserror::Error;

/// Errors raised while building model values from external input.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Criterion type tag outside the supported set.
    #[error("unknown criterion type: {0}")]
    UnknownCriterionType(String),

    /// Study configuration document could not be parsed.
    #[error("invalid study configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// Breadcrumb index past the end of the trail.
    #[error("breadcrumb {index} out of range (trail depth {depth})")]
    BreadcrumbOutOfRange { index: usize, depth: usize },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
