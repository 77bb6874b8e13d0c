//! Blocking REST client for the study service.

use bulk_model::{FolderEntry, StudyConfig, TaskSummary, UploadResult};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use super::types::ErrorBody;
use crate::config::ClientSettings;
use crate::error::{ClientError, Result};
use crate::upload::{ImportTransport, UploadFile};

/// Multipart field carrying the artifact archive.
pub const ARCHIVE_FIELD: &str = "zipFile";

/// Multipart field carrying the CSV mapping file.
pub const CSV_FIELD: &str = "csvFile";

/// Study service client.
#[derive(Debug, Clone)]
pub struct StudyApiClient {
    client: Client,
    base_url: String,
}

impl StudyApiClient {
    /// Creates a client from settings.
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .default_headers(headers)
            .timeout(settings.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/studies/{id}`: artifact count and evaluation criteria.
    pub fn fetch_study_config(&self, study_id: &str) -> Result<StudyConfig> {
        let mut config: StudyConfig = self.get_json(&format!("/api/studies/{study_id}"))?;
        if config.id.is_none() {
            config.id = Some(study_id.to_string());
        }
        tracing::info!(
            study_id,
            artifact_count = config.artifact_count_per_task,
            criteria = config.criteria.len(),
            "fetched study configuration"
        );
        Ok(config)
    }

    /// `GET /api/studies/{id}/tasks`.
    pub fn list_tasks(&self, study_id: &str) -> Result<Vec<TaskSummary>> {
        self.get_json(&format!("/api/studies/{study_id}/tasks"))
    }

    /// Lists the root artifact folder, or the given sub-folder.
    pub fn list_folder(
        &self,
        study_id: &str,
        folder_id: Option<&str>,
    ) -> Result<Vec<FolderEntry>> {
        let path = match folder_id {
            Some(folder) => format!("/api/studies/{study_id}/artifacts/folders/{folder}"),
            None => format!("/api/studies/{study_id}/artifacts/folders"),
        };
        self.get_json(&path)
    }

    /// `POST /api/studies/{id}/tasks/bulk-upload` with both files attached.
    pub fn submit_bulk(
        &self,
        study_id: &str,
        archive: &UploadFile,
        csv: &UploadFile,
    ) -> Result<UploadResult> {
        let form = Form::new()
            .part(ARCHIVE_FIELD, file_part(archive, "application/zip")?)
            .part(CSV_FIELD, file_part(csv, "text/csv")?);

        let url = self.url(&format!("/api/studies/{study_id}/tasks/bulk-upload"));
        tracing::debug!(
            %url,
            archive = %archive.file_name,
            csv = %csv.file_name,
            "submitting bulk upload"
        );
        let response = self.client.post(&url).multipart(form).send()?;
        let response = check_status(response)?;
        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send()?;
        let response = check_status(response)?;
        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl ImportTransport for StudyApiClient {
    fn submit_bulk(
        &self,
        study_id: &str,
        archive: &UploadFile,
        csv: &UploadFile,
    ) -> Result<UploadResult> {
        StudyApiClient::submit_bulk(self, study_id, archive, csv)
    }
}

fn file_part(file: &UploadFile, mime: &str) -> Result<Part> {
    let bytes = std::fs::read(&file.path)?;
    Ok(Part::bytes(bytes)
        .file_name(file.file_name.clone())
        .mime_str(mime)?)
}

/// Turns a non-success response into [`ClientError::Http`].
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let message = ErrorBody::parse(&body).server_message();
    tracing::warn!(status = status.as_u16(), message = ?message, "request failed");
    Err(ClientError::Http {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_join_without_double_slash() {
        let settings = ClientSettings::default().with_api_base_url("https://studies.example.org/");
        let client = StudyApiClient::new(&settings).unwrap();
        assert_eq!(
            client.url("/api/studies/7/tasks"),
            "https://studies.example.org/api/studies/7/tasks"
        );
    }

    #[test]
    fn test_file_part_missing_file_is_io_error() {
        let file = UploadFile::from_path("/nonexistent/archive.zip");
        assert!(matches!(
            file_part(&file, "application/zip"),
            Err(ClientError::Io(_))
        ));
    }
}
