//! Study service REST API.

pub mod client;
pub mod types;

pub use client::{ARCHIVE_FIELD, CSV_FIELD, StudyApiClient};
pub use types::ErrorBody;
