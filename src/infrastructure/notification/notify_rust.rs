//! Desktop notification adapter using notify-rust
//!
//! Permission is remembered in the preference store. On freedesktop systems
//! the request probes the notification server; elsewhere it is granted.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use notify_rust::{Notification, Timeout};

use crate::application::ports::{
    DesktopNotification, KeyValueStore, NotificationError, NotificationPresenter,
};
use crate::domain::notification::PermissionState;
use crate::domain::preferences::PERMISSION_KEY;

/// Desktop presenter backed by notify-rust
pub struct NotifyRustPresenter {
    app_name: String,
    store: Arc<dyn KeyValueStore>,
    /// Opened when the user clicks a notification
    dashboard_url: String,
    /// Server id of the last shown notification, replaced by the next one
    last_id: Arc<Mutex<Option<u32>>>,
}

impl NotifyRustPresenter {
    pub fn new(store: Arc<dyn KeyValueStore>, dashboard_url: impl Into<String>) -> Self {
        Self {
            app_name: "Taskbell".to_string(),
            store,
            dashboard_url: dashboard_url.into(),
            last_id: Arc::new(Mutex::new(None)),
        }
    }

    /// Create with custom app name
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }
}

#[async_trait]
impl NotificationPresenter for NotifyRustPresenter {
    async fn permission(&self) -> PermissionState {
        match self.store.get(PERMISSION_KEY).await {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                log::warn!("{}; treating permission as default", e);
                PermissionState::Default
            }),
            Ok(None) => PermissionState::Default,
            Err(e) => {
                log::warn!("Could not read notification permission: {}", e);
                PermissionState::Default
            }
        }
    }

    async fn request_permission(&self) -> Result<PermissionState, NotificationError> {
        let answer = tokio::task::spawn_blocking(probe_server)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("Task join error: {}", e)))?;

        self.store
            .set(PERMISSION_KEY, answer.as_str())
            .await
            .map_err(|e| NotificationError::PermissionStore(e.to_string()))?;

        Ok(answer)
    }

    async fn show(&self, notification: &DesktopNotification) -> Result<(), NotificationError> {
        if !self.permission().await.is_granted() {
            return Err(NotificationError::PermissionDenied);
        }

        let notification = notification.clone();
        let app_name = self.app_name.clone();
        let dashboard_url = self.dashboard_url.clone();
        let last_id = Arc::clone(&self.last_id);

        // notify-rust operations can block, so run in spawn_blocking
        tokio::task::spawn_blocking(move || {
            show_blocking(&app_name, &notification, &dashboard_url, &last_id)
        })
        .await
        .map_err(|e| NotificationError::SendFailed(format!("Task join error: {}", e)))?
    }
}

/// Ask the notification server whether it is reachable
#[cfg(all(unix, not(target_os = "macos")))]
fn probe_server() -> PermissionState {
    match notify_rust::get_server_information() {
        Ok(info) => {
            log::debug!("Notification server: {} {}", info.name, info.version);
            PermissionState::Granted
        }
        Err(e) => {
            log::warn!("No notification server available: {}", e);
            PermissionState::Denied
        }
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn probe_server() -> PermissionState {
    PermissionState::Granted
}

fn build(app_name: &str, notification: &DesktopNotification) -> Notification {
    let timeout_ms = u32::try_from(notification.dismiss_after.as_millis()).unwrap_or(u32::MAX);

    let mut built = Notification::new();
    built
        .appname(app_name)
        .summary(&notification.title)
        .body(&notification.body)
        .icon(notification.icon.icon_name())
        .timeout(Timeout::Milliseconds(timeout_ms));
    built
}

#[cfg(all(unix, not(target_os = "macos")))]
fn show_blocking(
    app_name: &str,
    notification: &DesktopNotification,
    dashboard_url: &str,
    last_id: &Mutex<Option<u32>>,
) -> Result<(), NotificationError> {
    let mut built = build(app_name, notification);
    built.action("default", "Open dashboard");

    let mut last_id = last_id.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(id) = *last_id {
        built.id(id);
    }

    let handle = built
        .show()
        .map_err(|e| NotificationError::SendFailed(e.to_string()))?;
    *last_id = Some(handle.id());
    drop(last_id);

    let url = dashboard_url.to_string();
    std::thread::spawn(move || {
        handle.wait_for_action(|action| {
            if action == "default" {
                log::debug!("Notification clicked, opening {}", url);
                if let Err(e) = open::that(&url) {
                    log::warn!("Failed to open dashboard: {}", e);
                }
            }
        });
    });

    Ok(())
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn show_blocking(
    app_name: &str,
    notification: &DesktopNotification,
    _dashboard_url: &str,
    _last_id: &Mutex<Option<u32>>,
) -> Result<(), NotificationError> {
    build(app_name, notification)
        .show()
        .map(|_| ())
        .map_err(|e| NotificationError::SendFailed(e.to_string()))
}
