//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the dashboard API, the desktop and the audio device.

pub mod config;
mod files;
pub mod http;
pub mod notification;
pub mod sound;
pub mod storage;

// Re-export adapters
pub use config::XdgConfigStore;
pub use http::{DashboardClient, HttpNotificationSource, HttpTaskClient};
pub use notification::NotifyRustPresenter;
pub use sound::{create_sound_player, NoOpSoundPlayer, RodioSoundPlayer};
pub use storage::JsonFileStore;
