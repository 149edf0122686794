//! Notifications endpoint adapter

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::application::ports::{FetchError, NotificationSource};
use crate::domain::notification::{NotificationId, NotificationItem, NotificationType};

use super::DashboardClient;

/// Unread notifications endpoint
const NOTIFICATIONS_PATH: &str = "/api/notifications/";

// Response types for the notifications endpoint

#[derive(Debug, Deserialize)]
struct NotificationsResponse {
    notifications: Vec<WireNotification>,
}

#[derive(Debug, Deserialize)]
struct WireNotification {
    id: WireId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    notification_type: Option<String>,
    /// Older payloads name the field `type`
    #[serde(default, rename = "type")]
    legacy_type: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default = "default_sound")]
    sound_enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Signed(i64),
    Unsigned(u64),
    Text(String),
}

fn default_sound() -> bool {
    true
}

impl From<WireNotification> for NotificationItem {
    fn from(wire: WireNotification) -> Self {
        let id = match wire.id {
            WireId::Signed(n) => NotificationId::new(n.to_string()),
            WireId::Unsigned(n) => NotificationId::new(n.to_string()),
            WireId::Text(s) => NotificationId::new(s),
        };

        Self {
            id,
            title: wire.title,
            message: wire.message,
            kind: wire
                .notification_type
                .or(wire.legacy_type)
                .as_deref()
                .map(NotificationType::from_wire)
                .unwrap_or_default(),
            created_at: wire.created_at.as_deref().and_then(parse_timestamp),
            sound_enabled: wire.sound_enabled,
        }
    }
}

/// Parse an ISO-8601 timestamp, with or without an offset
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Parse the endpoint's JSON body
fn parse_body(body: &str) -> Result<Vec<NotificationItem>, FetchError> {
    let response: NotificationsResponse =
        serde_json::from_str(body).map_err(|e| FetchError::MalformedPayload(e.to_string()))?;

    Ok(response.notifications.into_iter().map(Into::into).collect())
}

/// Notification source backed by the dashboard's REST endpoint
pub struct HttpNotificationSource {
    client: DashboardClient,
}

impl HttpNotificationSource {
    pub fn new(client: DashboardClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotificationSource for HttpNotificationSource {
    async fn fetch_unread(&self) -> Result<Vec<NotificationItem>, FetchError> {
        let response = self
            .client
            .get(NOTIFICATIONS_PATH)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Server {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        parse_body(&body)
    }
}
