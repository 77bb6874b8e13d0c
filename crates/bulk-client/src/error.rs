//! Error types for the study service client and upload flow.

use std::fmt;

use thiserror::Error;

/// The two files a bulk upload needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFileRole {
    Archive,
    Csv,
}

impl fmt::Display for UploadFileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archive => f.write_str("artifact archive"),
            Self::Csv => f.write_str("CSV mapping file"),
        }
    }
}

/// Errors that can occur while talking to the study service or uploading.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// A required upload file was not selected. No request was sent.
    #[error("missing {0}")]
    MissingFile(UploadFileRole),

    /// Another upload from this orchestrator has not finished.
    #[error("an upload is already in progress")]
    AlreadyInFlight,

    /// Network request failed before a response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with a non-success status.
    #[error("server returned {status}{}", message_suffix(.message))]
    Http {
        status: u16,
        /// `error` (or `message`) field of the response body, if any.
        message: Option<String>,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(String),

    /// Failed to parse JSON response.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Archive could not be read.
    #[error("archive error: {0}")]
    Archive(String),

    /// Client settings file is invalid.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Shown when a failed upload carries no server message.
pub const GENERIC_UPLOAD_FAILURE: &str = "Failed to upload tasks";

impl ClientError {
    /// Returns a user-facing message for notifications.
    ///
    /// Server-provided messages are passed through verbatim.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingFile(_) => "Please select both a ZIP file and a CSV file".to_string(),
            Self::AlreadyInFlight => "An upload is already in progress".to_string(),
            Self::Http {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Http { message: None, .. } | Self::Network(_) | Self::JsonParse(_) => {
                GENERIC_UPLOAD_FAILURE.to_string()
            }
            Self::Io(_) => "Could not read the selected files".to_string(),
            Self::Archive(_) => "Could not read the artifact archive".to_string(),
            Self::InvalidSettings(_) => "Client settings are invalid".to_string(),
        }
    }

    /// Whether the user may reasonably retry the same action.
    ///
    /// Retrying is always left to the user; nothing here retries on its own.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::AlreadyInFlight => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

impl From<zip::result::ZipError> for ClientError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive(err.to_string())
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
