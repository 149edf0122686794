//! Preference command handler

use thiserror::Error;

use crate::application::ports::{KeyValueStore, StoreError};
use crate::domain::notification::PermissionState;
use crate::domain::preferences::{encode_bool, parse_bool, PERMISSION_KEY, PREFERENCE_KEYS};

use super::args::PrefsAction;
use super::presenter::Presenter;

/// Preference command errors
#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("Unknown preference '{key}'. Valid keys: {}", PREFERENCE_KEYS.join(", "))]
    UnknownKey { key: String },

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Handle prefs subcommand
pub async fn handle_prefs_command<K: KeyValueStore + ?Sized>(
    action: PrefsAction,
    store: &K,
    path: &str,
    presenter: &Presenter,
) -> Result<(), PrefsError> {
    match action {
        PrefsAction::List => {
            let entries = store.entries().await?;
            if entries.is_empty() {
                presenter.info("No preferences stored");
            }
            for (key, value) in entries {
                presenter.key_value(&key, &value);
            }
        }
        PrefsAction::Get { key } => {
            check_key(&key)?;
            let value = store.get(&key).await?;
            presenter.output(value.as_deref().unwrap_or("(not set)"));
        }
        PrefsAction::Set { key, value } => {
            let normalized = normalize_value(&key, &value)?;
            store.set(&key, &normalized).await?;
            presenter.success(&format!("{} = {}", key, normalized));
        }
        PrefsAction::Path => presenter.output(path),
    }
    Ok(())
}

fn check_key(key: &str) -> Result<(), PrefsError> {
    if PREFERENCE_KEYS.contains(&key) {
        Ok(())
    } else {
        Err(PrefsError::UnknownKey {
            key: key.to_string(),
        })
    }
}

/// Validate a value and convert it to its stored form
fn normalize_value(key: &str, value: &str) -> Result<String, PrefsError> {
    check_key(key)?;

    if key == PERMISSION_KEY {
        let state = value
            .parse::<PermissionState>()
            .map_err(|e| PrefsError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        return Ok(state.as_str().to_string());
    }

    parse_bool(value)
        .map(|b| encode_bool(b).to_string())
        .map_err(|_| PrefsError::InvalidValue {
            key: key.to_string(),
            message: "Value must be 'true' or 'false'".to_string(),
        })
}
