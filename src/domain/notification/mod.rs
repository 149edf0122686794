//! Notification domain: items, unread bookkeeping, permission and cues

mod chime;
mod item;
mod permission;
mod unread;

pub use chime::{Chime, Tone};
pub use item::{NotificationId, NotificationItem, NotificationType};
pub use permission::PermissionState;
pub use unread::{Badge, Reconciliation, UnreadState};
