//! TOML config file under `$XDG_CONFIG_HOME/taskbell/`

use std::path::PathBuf;

use async_trait::async_trait;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::infrastructure::files;

const CONFIG_FILE: &str = "config.toml";

/// Config store reading and writing `config.toml`
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    pub fn new() -> Self {
        Self::with_path(files::app_dir(dirs::config_dir(), ".config").join(CONFIG_FILE))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a config file. Keys left out stay `None`; a blank file is empty.
fn decode(content: &str) -> Result<AppConfig, ConfigError> {
    if content.trim().is_empty() {
        return Ok(AppConfig::empty());
    }
    toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn encode(config: &AppConfig) -> Result<String, ConfigError> {
    toml::to_string_pretty(config).map_err(|e| ConfigError::WriteError(e.to_string()))
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        let content = files::read_if_present(&self.path)
            .await
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", self.path.display(), e)))?;

        match content {
            Some(content) => decode(&content),
            None => {
                log::debug!("No config file at {}", self.path.display());
                Ok(AppConfig::empty())
            }
        }
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let content = encode(config)?;
        files::write_atomic(&self.path, content.as_bytes())
            .await
            .map_err(|e| ConfigError::WriteError(format!("{}: {}", self.path.display(), e)))
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(self.path.display().to_string()));
        }
        self.save(&AppConfig::defaults()).await
    }
}
