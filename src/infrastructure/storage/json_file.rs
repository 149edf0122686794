//! JSON file preference store
//!
//! Keeps every preference in one flat JSON object of string values.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::ports::{KeyValueStore, StoreError};
use crate::infrastructure::files;

type Entries = BTreeMap<String, String>;

/// Preference store backed by `$XDG_DATA_HOME/taskbell/preferences.json`
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store at the default data path
    pub fn new() -> Self {
        Self::with_path(files::app_dir(dirs::data_dir(), ".local/share").join("preferences.json"))
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Entries, StoreError> {
        let content = match files::read_if_present(&self.path).await {
            Ok(Some(content)) => content,
            Ok(None) => return Ok(Entries::new()),
            Err(e) => return Err(StoreError::ReadFailed(e.to_string())),
        };

        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&content).map_err(|e| StoreError::ReadFailed(e.to_string()))
    }

    async fn write_all(&self, entries: &Entries) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        files::write_atomic(&self.path, content.as_bytes())
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries).await
    }

    async fn entries(&self) -> Result<Vec<(String, String)>, StoreError> {
        Ok(self.read_all().await?.into_iter().collect())
    }
}
