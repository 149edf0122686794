//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod delivery;
pub mod ports;
pub mod sync;
pub mod task_actions;

// Re-export use cases
pub use delivery::{ChannelOutcome, DeliveryChannels, DeliveryConfig, DeliveryReport, SkipReason};
pub use sync::{load_preferences, NotificationSync, PollOutcome, PollTicket};
pub use task_actions::{TaskAction, TaskActionOutcome, TaskActionUseCase, TaskRef};
