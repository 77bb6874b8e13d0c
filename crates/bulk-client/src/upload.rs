//! Bulk upload orchestration.
//!
//! An upload takes exactly two files, an artifact archive and a CSV mapping
//! file, and sends them in a single request. The server decides success or
//! failure for the whole import; nothing is retried here.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bulk_model::UploadResult;

use crate::error::{ClientError, Result, UploadFileRole};

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub path: PathBuf,
    /// Name sent to the server.
    pub file_name: String,
}

impl UploadFile {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Self { path, file_name }
    }
}

/// Sends a bulk upload somewhere. The study service client is the real one.
pub trait ImportTransport {
    fn submit_bulk(
        &self,
        study_id: &str,
        archive: &UploadFile,
        csv: &UploadFile,
    ) -> Result<UploadResult>;
}

/// What the user picked. Either file may still be missing.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub study_id: String,
    pub archive: Option<UploadFile>,
    pub csv: Option<UploadFile>,
}

impl UploadRequest {
    pub fn new(study_id: impl Into<String>) -> Self {
        Self {
            study_id: study_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_archive(mut self, archive: UploadFile) -> Self {
        self.archive = Some(archive);
        self
    }

    #[must_use]
    pub fn with_csv(mut self, csv: UploadFile) -> Self {
        self.csv = Some(csv);
        self
    }

    /// First required file that was not selected, archive before CSV.
    pub fn missing_file(&self) -> Option<UploadFileRole> {
        if self.archive.is_none() {
            Some(UploadFileRole::Archive)
        } else if self.csv.is_none() {
            Some(UploadFileRole::Csv)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    /// Error notification for a failed upload.
    pub fn from_error(error: &ClientError) -> Self {
        Self::error(error.user_message())
    }

    pub fn uploaded(result: &UploadResult) -> Self {
        Self::success(format!(
            "Successfully created {} tasks in folder \"{}\"",
            result.tasks_created, result.folder_name
        ))
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

/// A finished, successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub result: UploadResult,
    pub notification: Notification,
    /// Where to go once `redirect_after` has elapsed.
    pub return_to: String,
    pub redirect_after: Duration,
}

/// Path of a study's task list.
pub fn task_list_path(study_id: &str) -> String {
    format!("/studies/{study_id}/tasks")
}

/// Runs uploads one at a time through a transport.
#[derive(Debug)]
pub struct UploadOrchestrator<T> {
    transport: T,
    redirect_delay: Duration,
    in_flight: AtomicBool,
}

impl<T: ImportTransport> UploadOrchestrator<T> {
    pub fn new(transport: T, redirect_delay: Duration) -> Self {
        Self {
            transport,
            redirect_delay,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// False while a submission is outstanding.
    pub fn is_submit_enabled(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }

    /// Validates the selection locally, then submits it.
    ///
    /// A missing file is rejected before any request is made.
    pub fn submit(&self, request: &UploadRequest) -> Result<UploadOutcome> {
        let (Some(archive), Some(csv)) = (&request.archive, &request.csv) else {
            let role = request.missing_file().unwrap_or(UploadFileRole::Archive);
            return Err(ClientError::MissingFile(role));
        };

        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        tracing::info!(
            study_id = %request.study_id,
            archive = %archive.file_name,
            csv = %csv.file_name,
            "uploading tasks"
        );

        match self.transport.submit_bulk(&request.study_id, archive, csv) {
            Ok(result) => {
                tracing::info!(
                    study_id = %request.study_id,
                    tasks_created = result.tasks_created,
                    folder = %result.folder_name,
                    "bulk upload complete"
                );
                Ok(UploadOutcome {
                    notification: Notification::uploaded(&result),
                    result,
                    return_to: task_list_path(&request.study_id),
                    redirect_after: self.redirect_delay,
                })
            }
            Err(error) => {
                tracing::warn!(study_id = %request.study_id, %error, "bulk upload failed");
                Err(error)
            }
        }
    }
}

/// Marks an upload as outstanding until dropped.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClientError::AlreadyInFlight)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
