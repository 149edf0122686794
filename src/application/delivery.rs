//! Delivery channels: audio cue and desktop notification
//!
//! Each channel fails on its own. A broken audio device never stops the
//! desktop notification and vice versa.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::notification::{Chime, NotificationItem, PermissionState};

use super::ports::{DesktopNotification, NotificationPresenter, SoundPlayer};

/// Why a channel did not fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Switched off in config
    Disabled,
    /// User turned sound off, or the item asked for silence
    Muted,
    /// Permission was never granted
    PermissionPending,
    PermissionDenied,
}

/// What happened on one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    Delivered,
    Skipped(SkipReason),
    Failed(String),
}

/// Outcome of a delivery across both channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sound: ChannelOutcome,
    pub desktop: ChannelOutcome,
}

/// Channel switches from configuration
#[derive(Debug, Clone, Copy)]
pub struct DeliveryConfig {
    pub enable_sound: bool,
    pub enable_desktop: bool,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            enable_sound: true,
            enable_desktop: true,
        }
    }
}

/// Audio and desktop delivery for new unread items
pub struct DeliveryChannels<A, P>
where
    A: SoundPlayer,
    P: NotificationPresenter,
{
    sound: A,
    presenter: P,
    config: DeliveryConfig,
    sound_preference: AtomicBool,
    permission_requested: AtomicBool,
}

impl<A, P> DeliveryChannels<A, P>
where
    A: SoundPlayer,
    P: NotificationPresenter,
{
    pub fn new(sound: A, presenter: P, config: DeliveryConfig) -> Self {
        Self {
            sound,
            presenter,
            config,
            sound_preference: AtomicBool::new(true),
            permission_requested: AtomicBool::new(false),
        }
    }

    /// Apply the user's persisted sound preference
    pub fn set_sound_enabled(&self, enabled: bool) {
        self.sound_preference.store(enabled, Ordering::SeqCst);
    }

    pub fn sound_enabled(&self) -> bool {
        self.config.enable_sound && self.sound_preference.load(Ordering::SeqCst)
    }

    /// Ask for notification permission, at most once and only from `default`.
    ///
    /// Returns the state the desktop channel will start with.
    pub async fn prepare_permission(&self) -> PermissionState {
        let current = self.presenter.permission().await;
        if !self.config.enable_desktop || !current.can_request() {
            return current;
        }
        if self.permission_requested.swap(true, Ordering::SeqCst) {
            return current;
        }

        match self.presenter.request_permission().await {
            Ok(answer) => match current.transition(answer) {
                Ok(next) => {
                    log::info!("Notification permission {}", next);
                    next
                }
                Err(e) => {
                    log::warn!("Ignoring permission answer: {}", e);
                    current
                }
            },
            Err(e) => {
                log::warn!("Notification permission request failed: {}", e);
                current
            }
        }
    }

    /// Alert the user about one item on every available channel
    pub async fn deliver(&self, item: &NotificationItem) -> DeliveryReport {
        let (sound, desktop) = tokio::join!(self.play_sound(item), self.show_desktop(item));
        DeliveryReport { sound, desktop }
    }

    async fn play_sound(&self, item: &NotificationItem) -> ChannelOutcome {
        if !self.config.enable_sound {
            return ChannelOutcome::Skipped(SkipReason::Disabled);
        }
        if !self.sound_preference.load(Ordering::SeqCst) || !item.sound_enabled {
            return ChannelOutcome::Skipped(SkipReason::Muted);
        }

        match self.sound.play(&Chime::new_notification()).await {
            Ok(()) => ChannelOutcome::Delivered,
            Err(e) => {
                log::debug!("Audio cue not played: {}", e);
                ChannelOutcome::Failed(e.to_string())
            }
        }
    }

    async fn show_desktop(&self, item: &NotificationItem) -> ChannelOutcome {
        if !self.config.enable_desktop {
            return ChannelOutcome::Skipped(SkipReason::Disabled);
        }

        match self.presenter.permission().await {
            PermissionState::Granted => {}
            PermissionState::Denied => return ChannelOutcome::Skipped(SkipReason::PermissionDenied),
            PermissionState::Default => {
                return ChannelOutcome::Skipped(SkipReason::PermissionPending)
            }
        }

        match self.presenter.show(&DesktopNotification::for_item(item)).await {
            Ok(()) => ChannelOutcome::Delivered,
            Err(e) => {
                log::warn!("Desktop notification failed: {}", e);
                ChannelOutcome::Failed(e.to_string())
            }
        }
    }
}
