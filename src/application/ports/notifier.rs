//! Desktop notification port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::notification::{NotificationItem, NotificationType, PermissionState};
use crate::domain::schedule::Duration;

/// Notification errors
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Notification permission denied")]
    PermissionDenied,

    #[error("Failed to show notification: {0}")]
    SendFailed(String),

    #[error("Failed to record permission: {0}")]
    PermissionStore(String),
}

/// Notification icon types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationIcon {
    Reminder,
    DueSoon,
    Overdue,
    Completed,
    Default,
}

impl NotificationIcon {
    /// Pick the icon for a notification type
    pub const fn for_type(kind: NotificationType) -> Self {
        match kind {
            NotificationType::Reminder => Self::Reminder,
            NotificationType::DueSoon => Self::DueSoon,
            NotificationType::Overdue => Self::Overdue,
            NotificationType::Completed => Self::Completed,
            NotificationType::Generic => Self::Default,
        }
    }

    /// Get the freedesktop icon name
    pub const fn icon_name(&self) -> &'static str {
        match self {
            Self::Reminder => "appointment-soon",
            Self::DueSoon => "task-due",
            Self::Overdue => "task-past-due",
            Self::Completed => "emblem-default",
            Self::Default => "dialog-information",
        }
    }
}

/// A desktop notification ready to show
#[derive(Debug, Clone, PartialEq)]
pub struct DesktopNotification {
    pub title: String,
    pub body: String,
    pub icon: NotificationIcon,
    /// Replaces any earlier notification carrying the same tag
    pub tag: &'static str,
    pub dismiss_after: Duration,
}

impl DesktopNotification {
    /// Tag shared by every task notification
    pub const TAG: &'static str = "todo-notification";

    /// Build the notification shown for an unread item
    pub fn for_item(item: &NotificationItem) -> Self {
        Self {
            title: item.title.clone(),
            body: item.message.clone(),
            icon: NotificationIcon::for_type(item.kind),
            tag: Self::TAG,
            dismiss_after: Duration::notification_dismiss(),
        }
    }
}

/// Port for desktop notifications
#[async_trait]
pub trait NotificationPresenter: Send + Sync {
    /// Read the current permission state. Never cached by callers.
    async fn permission(&self) -> PermissionState;

    /// Ask the platform for permission and return its answer
    async fn request_permission(&self) -> Result<PermissionState, NotificationError>;

    /// Show a notification. Auto-dismisses after `dismiss_after`.
    async fn show(&self, notification: &DesktopNotification) -> Result<(), NotificationError>;
}

/// Blanket implementation for boxed presenter types
#[async_trait]
impl NotificationPresenter for Box<dyn NotificationPresenter> {
    async fn permission(&self) -> PermissionState {
        self.as_ref().permission().await
    }

    async fn request_permission(&self) -> Result<PermissionState, NotificationError> {
        self.as_ref().request_permission().await
    }

    async fn show(&self, notification: &DesktopNotification) -> Result<(), NotificationError> {
        self.as_ref().show(notification).await
    }
}
