//! Notification item entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// Opaque notification identifier, stable across polls
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationId(String);

impl NotificationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NotificationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Kind of notification, used to pick the delivery icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NotificationType {
    Reminder,
    DueSoon,
    Overdue,
    Completed,
    #[default]
    Generic,
}

impl NotificationType {
    /// Get the wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reminder => "reminder",
            Self::DueSoon => "due_soon",
            Self::Overdue => "overdue",
            Self::Completed => "completed",
            Self::Generic => "generic",
        }
    }

    /// Map a wire value, falling back to `Generic` for anything unrecognised
    pub fn from_wire(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for NotificationType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reminder" => Ok(Self::Reminder),
            "due_soon" => Ok(Self::DueSoon),
            "overdue" => Ok(Self::Overdue),
            "completed" => Ok(Self::Completed),
            "generic" => Ok(Self::Generic),
            _ => Err(()),
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A server-side notification, fetched read-only
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationItem {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub kind: NotificationType,
    pub created_at: Option<DateTime<Utc>>,
    /// Per-item sound flag from the backend
    pub sound_enabled: bool,
}

impl NotificationItem {
    /// Create an item with no timestamp and sound allowed
    pub fn new(
        id: impl Into<NotificationId>,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationType,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            message: message.into(),
            kind,
            created_at: None,
            sound_enabled: true,
        }
    }
}

impl From<String> for NotificationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
