//! Desktop notification permission state machine

use std::fmt;
use std::str::FromStr;

use crate::domain::error::{InvalidPermissionTransition, PermissionParseError};

/// Permission state for the OS notification channel.
///
/// State machine:
///   DEFAULT -> GRANTED
///   DEFAULT -> DENIED
///
/// Both targets are terminal for the session. A denial can only be lifted
/// outside the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PermissionState {
    #[default]
    Default,
    Granted,
    Denied,
}

impl PermissionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    /// Whether the pipeline may prompt for permission
    pub fn can_request(&self) -> bool {
        *self == Self::Default
    }

    /// Whether notifications may be shown
    pub fn is_granted(&self) -> bool {
        *self == Self::Granted
    }

    /// Apply the answer to a permission request
    pub fn transition(self, to: PermissionState) -> Result<Self, InvalidPermissionTransition> {
        match (self, to) {
            (Self::Default, Self::Granted | Self::Denied) => Ok(to),
            (from, to) => Err(InvalidPermissionTransition { from, to }),
        }
    }
}

impl FromStr for PermissionState {
    type Err = PermissionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            _ => Err(PermissionParseError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_can_be_granted_or_denied() {
        assert_eq!(
            PermissionState::Default.transition(PermissionState::Granted).unwrap(),
            PermissionState::Granted
        );
        assert_eq!(
            PermissionState::Default.transition(PermissionState::Denied).unwrap(),
            PermissionState::Denied
        );
    }

    #[test]
    fn terminal_states_cannot_move() {
        assert!(PermissionState::Denied.transition(PermissionState::Granted).is_err());
        assert!(PermissionState::Granted.transition(PermissionState::Denied).is_err());
        assert!(PermissionState::Denied.transition(PermissionState::Default).is_err());
    }

    #[test]
    fn default_to_default_is_rejected() {
        let err = PermissionState::Default
            .transition(PermissionState::Default)
            .unwrap_err();
        assert_eq!(err.from, PermissionState::Default);
        assert!(err.to_string().contains("default"));
    }

    #[test]
    fn only_default_can_request() {
        assert!(PermissionState::Default.can_request());
        assert!(!PermissionState::Granted.can_request());
        assert!(!PermissionState::Denied.can_request());
    }

    #[test]
    fn parses_stored_values() {
        assert_eq!("granted".parse::<PermissionState>().unwrap(), PermissionState::Granted);
        assert_eq!(" Denied ".parse::<PermissionState>().unwrap(), PermissionState::Denied);
        assert!("maybe".parse::<PermissionState>().is_err());
    }
}
