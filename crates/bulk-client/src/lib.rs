//! Study service client and bulk upload flow.
//!
//! This crate talks to the study service (configuration, task lists, artifact
//! folders), checks artifact archives against a validated import file, and
//! drives the bulk upload itself.
//!
//! # Overview
//!
//! - [`StudyApiClient`]: blocking REST client built from [`ClientSettings`]
//! - [`inspect_archive`] / [`missing_artifacts`]: archive vs. CSV cross-check
//! - [`UploadOrchestrator`]: one upload at a time, local file checks first,
//!   success/error [`Notification`]s, and the redirect back to the task list
//!
//! # Example
//!
//! ```no_run
//! use bulk_client::{ClientSettings, StudyApiClient, UploadFile, UploadOrchestrator, UploadRequest};
//!
//! fn upload() -> bulk_client::Result<()> {
//!     let settings = ClientSettings::load(None)?;
//!     let client = StudyApiClient::new(&settings)?;
//!     let orchestrator = UploadOrchestrator::new(client, settings.redirect_delay());
//!
//!     let request = UploadRequest::new("42")
//!         .with_archive(UploadFile::from_path("artifacts.zip"))
//!         .with_csv(UploadFile::from_path("tasks.csv"));
//!     let outcome = orchestrator.submit(&request)?;
//!     println!("{}", outcome.notification.message);
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod error;

// Study service API
pub mod api;

// Upload flow
pub mod archive;
pub mod upload;

// Re-export main types for convenience
pub use api::{ARCHIVE_FIELD, CSV_FIELD, ErrorBody, StudyApiClient};
pub use archive::{ArchiveListing, inspect_archive, missing_artifacts};
pub use config::ClientSettings;
pub use error::{ClientError, GENERIC_UPLOAD_FAILURE, Result, UploadFileRole};
pub use upload::{
    ImportTransport, Notification, NotificationKind, UploadFile, UploadOrchestrator,
    UploadOutcome, UploadRequest, task_list_path,
};
