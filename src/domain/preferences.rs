//! Persisted user preferences
//!
//! Values are stored as string-encoded booleans. A missing key means the
//! default.

/// Storage key for the sound toggle
pub const SOUND_KEY: &str = "sound_notifications";

/// Storage key for the sidebar collapse flag
pub const SIDEBAR_KEY: &str = "sidebarCollapsed";

/// Storage key for the desktop notification permission
pub const PERMISSION_KEY: &str = "notification_permission";

/// Keys accepted by `prefs get/set`
pub const PREFERENCE_KEYS: &[&str] = &[SOUND_KEY, SIDEBAR_KEY, PERMISSION_KEY];

/// User preferences shared across the dashboard tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserPreferences {
    pub sound_enabled: bool,
    pub sidebar_collapsed: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            sidebar_collapsed: false,
        }
    }
}

impl UserPreferences {
    /// Build from raw stored values
    pub fn from_stored(sound: Option<&str>, sidebar: Option<&str>) -> Self {
        Self {
            // Anything but an explicit "false" keeps sound on
            sound_enabled: sound.map_or(true, |v| v.trim() != "false"),
            sidebar_collapsed: sidebar.is_some_and(|v| v.trim() == "true"),
        }
    }
}

/// Encode a boolean the way it is stored
pub fn encode_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Parse a user-supplied boolean value
pub fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(()),
    }
}
