//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod notifier;
pub mod sound;
pub mod source;
pub mod store;
pub mod tasks;

// Re-export common types
pub use config::ConfigStore;
pub use notifier::{
    DesktopNotification, NotificationError, NotificationIcon, NotificationPresenter,
};
pub use sound::{SoundError, SoundPlayer};
pub use source::{FetchError, NotificationSource};
pub use store::{KeyValueStore, StoreError};
pub use tasks::{
    ConfirmPrompt, Confirmer, TaskActionError, TaskActions, ToastKind, ToastPresenter,
};
