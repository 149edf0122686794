//! Unread state and reconciliation
//!
//! The server is authoritative: every successful poll replaces the local
//! count. Local acknowledgment only decrements until the next poll overwrites
//! it, so local and server state may briefly diverge.

use std::fmt;

use super::item::{NotificationId, NotificationItem};

/// Visible unread indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Badge {
    /// No badge rendered at all (never "0")
    #[default]
    Hidden,
    /// Badge showing a positive count
    Visible(u32),
}

impl Badge {
    pub fn from_count(count: u32) -> Self {
        if count == 0 {
            Self::Hidden
        } else {
            Self::Visible(count)
        }
    }

    pub fn count(&self) -> u32 {
        match self {
            Self::Hidden => 0,
            Self::Visible(n) => *n,
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden)
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => Ok(()),
            Self::Visible(n) => write!(f, "{}", n),
        }
    }
}

/// Result of reconciling one fetched result set
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub badge: Badge,
    /// Top item to deliver, present only when it was not delivered before
    pub deliver: Option<NotificationItem>,
}

/// Process-local unread bookkeeping
#[derive(Debug, Clone, Default)]
pub struct UnreadState {
    count: u32,
    last_delivered_id: Option<NotificationId>,
}

impl UnreadState {
    /// Create an empty state: count 0, nothing delivered
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn badge(&self) -> Badge {
        Badge::from_count(self.count)
    }

    pub fn last_delivered_id(&self) -> Option<&NotificationId> {
        self.last_delivered_id.as_ref()
    }

    /// Replace local state with a freshly fetched unread set.
    ///
    /// Items are expected most-recent-first. Delivery is requested only when
    /// the top id differs from the last delivered one. The caller records a
    /// finished delivery with [`UnreadState::mark_delivered`]; until then the
    /// same top item is requested again. An empty set hides the badge and
    /// leaves `last_delivered_id` untouched.
    pub fn reconcile(&mut self, items: &[NotificationItem]) -> Reconciliation {
        let Some(top) = items.first() else {
            self.count = 0;
            return Reconciliation {
                badge: Badge::Hidden,
                deliver: None,
            };
        };

        self.count = u32::try_from(items.len()).unwrap_or(u32::MAX);

        let deliver = (self.last_delivered_id.as_ref() != Some(&top.id)).then(|| top.clone());

        Reconciliation {
            badge: self.badge(),
            deliver,
        }
    }

    /// Record that the alert for `id` went out
    pub fn mark_delivered(&mut self, id: &NotificationId) {
        self.last_delivered_id = Some(id.clone());
    }

    /// Acknowledge one item locally; never goes below zero
    pub fn acknowledge(&mut self) -> Badge {
        self.count = self.count.saturating_sub(1);
        self.badge()
    }
}
