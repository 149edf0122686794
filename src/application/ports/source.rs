//! Notification source port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::notification::NotificationItem;

/// Fetch errors. The poller treats every variant the same way.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Network(String),

    #[error("Server returned HTTP {status}")]
    Server { status: u16 },

    #[error("Malformed notifications payload: {0}")]
    MalformedPayload(String),
}

/// Port for reading the unread notification list
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// Fetch unread notifications, most recent first
    async fn fetch_unread(&self) -> Result<Vec<NotificationItem>, FetchError>;
}
