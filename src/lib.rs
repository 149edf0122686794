//! Taskbell - desktop alerts for a task dashboard
//!
//! Polls the dashboard's unread notifications, keeps an unread badge, and
//! alerts the user about the newest item with a chime and a desktop
//! notification.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, unread state, permission state and errors
//! - **Application**: Polling/reconciliation, delivery channels, task actions and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (dashboard HTTP API, rodio, notify-rust, files)
//! - **CLI**: Command-line interface, argument parsing, prompts and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
