//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::error::ConfigError;
use crate::domain::preferences::parse_bool;
use crate::domain::schedule::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    validate_config_value(key, value)?;

    let mut config = store.load().await?;

    match key {
        "server_url" => config.server_url = Some(value.trim_end_matches('/').to_string()),
        "cookie" => config.cookie = Some(value.to_string()),
        "poll_interval" => config.poll_interval = Some(value.to_string()),
        "request_timeout" => config.request_timeout = Some(value.to_string()),
        "notify" => config.notify = Some(bool_value(key, value)?),
        "sound" => config.sound = Some(bool_value(key, value)?),
        _ => unreachable!(), // Already validated
    }

    store.save(&config).await?;

    let shown = if key == "cookie" {
        mask_secret(value)
    } else {
        value.to_string()
    };
    presenter.success(&format!("{} = {}", key, shown));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;

    let value = match key {
        "server_url" => config.server_url,
        "cookie" => config.cookie.map(|s| mask_secret(&s)),
        "poll_interval" => config.poll_interval,
        "request_timeout" => config.request_timeout,
        "notify" => config.notify.map(|b| b.to_string()),
        "sound" => config.sound.map(|b| b.to_string()),
        _ => unreachable!(),
    };

    presenter.output(value.as_deref().unwrap_or(NOT_SET));

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    let show_bool = |b: Option<bool>| b.map(|b| b.to_string()).unwrap_or_else(|| NOT_SET.to_string());

    presenter.key_value("server_url", config.server_url.as_deref().unwrap_or(NOT_SET));
    presenter.key_value(
        "cookie",
        &config
            .cookie
            .map(|s| mask_secret(&s))
            .unwrap_or_else(|| NOT_SET.to_string()),
    );
    presenter.key_value(
        "poll_interval",
        config.poll_interval.as_deref().unwrap_or(NOT_SET),
    );
    presenter.key_value(
        "request_timeout",
        config.request_timeout.as_deref().unwrap_or(NOT_SET),
    );
    presenter.key_value("notify", &show_bool(config.notify));
    presenter.key_value("sound", &show_bool(config.sound));

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

fn bool_value(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).map_err(|_| ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be 'true' or 'false'".to_string(),
    })
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "poll_interval" | "request_timeout" => {
            value
                .parse::<Duration>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        "notify" | "sound" => {
            bool_value(key, value)?;
        }
        "server_url" => {
            let url = value.trim();
            let has_scheme = url.starts_with("http://") || url.starts_with("https://");
            let has_host = url
                .split_once("://")
                .is_some_and(|(_, rest)| !rest.trim_matches('/').is_empty());
            if !has_scheme || !has_host {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: format!("Invalid URL '{}'. Expected http(s)://host[:port]", value),
                });
            }
        }
        _ => {} // cookie accepts any string
    }
    Ok(())
}

/// Mask a secret for display (show first 4 and last 4 chars)
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_secret_long() {
        assert_eq!(mask_secret("sessionid=abcdef1234"), "sess...1234");
    }

    #[test]
    fn mask_secret_short() {
        assert_eq!(mask_secret("short"), "*****");
    }

    #[test]
    fn validate_interval_valid() {
        assert!(validate_config_value("poll_interval", "30s").is_ok());
        assert!(validate_config_value("poll_interval", "2m30s").is_ok());
        assert!(validate_config_value("request_timeout", "5s").is_ok());
    }

    #[test]
    fn validate_interval_invalid() {
        assert!(validate_config_value("poll_interval", "soon").is_err());
        assert!(validate_config_value("request_timeout", "0s").is_err());
    }

    #[test]
    fn validate_bools() {
        assert!(validate_config_value("sound", "off").is_ok());
        assert!(validate_config_value("notify", "maybe").is_err());
    }

    #[test]
    fn validate_server_url() {
        assert!(validate_config_value("server_url", "http://127.0.0.1:8000").is_ok());
        assert!(validate_config_value("server_url", "https://tasks.example.com/").is_ok());
        assert!(validate_config_value("server_url", "tasks.example.com").is_err());
        assert!(validate_config_value("server_url", "http://").is_err());
    }

    #[test]
    fn unknown_key_lists_valid_keys() {
        let err = check_key("api_key").unwrap_err();
        assert!(err.to_string().contains("server_url"));
    }
}
