//! Configuration types for the study service client.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Default study service location.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Delay between a successful upload and returning to the task list.
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 2000;

/// Default request timeout in seconds. Uploads carry whole archives.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// User agent string for API requests.
pub const USER_AGENT_VALUE: &str = concat!("study-bulk/", env!("CARGO_PKG_VERSION"));

/// Client settings, read from an optional JSON file.
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientSettings {
    /// Base URL of the study service, without trailing slash.
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub redirect_delay_ms: u64,
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            redirect_delay_ms: DEFAULT_REDIRECT_DELAY_MS,
            user_agent: USER_AGENT_VALUE.to_string(),
        }
    }
}

impl ClientSettings {
    /// Loads settings from `path`, or returns defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .map_err(|e| ClientError::InvalidSettings(format!("{}: {e}", path.display())))?;
        let settings: Self = serde_json::from_str(&text)
            .map_err(|e| ClientError::InvalidSettings(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "loaded client settings");
        settings.validated()
    }

    /// Overrides the base URL (e.g. from a command-line flag).
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    /// Base URL with any trailing slashes removed.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// Checks the base URL scheme and timeout.
    pub fn validated(self) -> Result<Self> {
        let base = self.base_url();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ClientError::InvalidSettings(format!(
                "apiBaseUrl must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::InvalidSettings(
                "timeoutSecs must be greater than 0".to_string(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = ClientSettings::default();
        assert_eq!(settings.base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(settings.redirect_delay(), Duration::from_secs(2));
        assert_eq!(settings.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"apiBaseUrl": "https://studies.example.org/", "redirectDelayMs": 500}}"#)
            .unwrap();
        let settings = ClientSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.base_url(), "https://studies.example.org");
        assert_eq!(settings.redirect_delay(), Duration::from_millis(500));
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_load_rejects_bad_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"apiBaseUrl": "ftp://nope"}}"#).unwrap();
        assert!(matches!(
            ClientSettings::load(Some(file.path())),
            Err(ClientError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_load_without_path_is_default() {
        assert_eq!(ClientSettings::load(None).unwrap(), ClientSettings::default());
    }
}
