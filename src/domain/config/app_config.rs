//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::schedule::Duration;

/// Default dashboard server
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server_url: Option<String>,
    pub cookie: Option<String>,
    pub poll_interval: Option<String>,
    pub request_timeout: Option<String>,
    pub notify: Option<bool>,
    pub sound: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            server_url: Some(DEFAULT_SERVER_URL.to_string()),
            cookie: None,
            poll_interval: Some("30s".to_string()),
            request_timeout: Some("10s".to_string()),
            notify: Some(true),
            sound: Some(true),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            server_url: other.server_url.or(self.server_url),
            cookie: other.cookie.or(self.cookie),
            poll_interval: other.poll_interval.or(self.poll_interval),
            request_timeout: other.request_timeout.or(self.request_timeout),
            notify: other.notify.or(self.notify),
            sound: other.sound.or(self.sound),
        }
    }

    /// Get the server URL without a trailing slash
    pub fn server_url_or_default(&self) -> &str {
        self.server_url
            .as_deref()
            .map(|s| s.trim_end_matches('/'))
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Dashboard page opened when a notification is clicked
    pub fn dashboard_url(&self) -> String {
        format!("{}/dashboard/", self.server_url_or_default())
    }

    /// Get poll_interval as parsed Duration, or default if not set/invalid
    pub fn poll_interval_or_default(&self) -> Duration {
        self.poll_interval
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_poll_interval)
    }

    /// Get request_timeout as parsed Duration, or default if not set/invalid
    pub fn request_timeout_or_default(&self) -> Duration {
        self.request_timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_request_timeout)
    }

    /// Get notify setting, or true if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(true)
    }

    /// Get sound setting, or true if not set
    pub fn sound_or_default(&self) -> bool {
        self.sound.unwrap_or(true)
    }
}
