//! Filesystem helpers for the file-backed stores

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

const APP_DIR: &str = "taskbell";

/// Per-application directory under a platform base directory.
///
/// Without a base, falls back to `$HOME/<home_relative>` and then to the
/// system temp dir, so the result is never relative to the working directory.
pub(crate) fn app_dir(base: Option<PathBuf>, home_relative: &str) -> PathBuf {
    base.or_else(|| dirs::home_dir().map(|home| home.join(home_relative)))
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

/// Read a whole file; `None` when it does not exist
pub(crate) async fn read_if_present(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Replace `path` through a synced sibling temp file and a rename.
///
/// Readers see the old file or the new one, never a torn write.
pub(crate) async fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let staging = staging_path(path);
    let written = async {
        let mut file = fs::File::create(&staging).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        fs::rename(&staging, path).await
    }
    .await;

    if written.is_err() {
        let _ = fs::remove_file(&staging).await;
    }
    written
}

/// `preferences.json` -> `preferences.json.tmp`, in the same directory
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from(APP_DIR));
    name.push(".tmp");
    path.with_file_name(name)
}
