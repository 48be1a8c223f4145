//! File-backed storage backend.
//!
//! One file per key under an XDG-compliant cache directory. This is the
//! durable backend: contents survive process restarts.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::debug;

use super::KeyValueStorage;
use crate::error::{CacheError, Result};

/// File extension for stored values.
const FILE_EXT: &str = "kv";

/// Durable key-value store with one file per key.
///
/// Keys map directly to file names, so they must be filename-safe. All
/// keys produced by this crate (the `cache_` prefix plus a slug and a
/// radix-36 hash) satisfy that.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Directory where value files are stored
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a store under the platform cache directory
    /// (`~/.cache/sportscache/` on Linux).
    ///
    /// Returns None if the cache directory cannot be determined.
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "sportscache")?;
        Some(Self::with_dir(project_dirs.cache_dir().to_path_buf()))
    }

    /// Creates a store rooted at an explicit directory.
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, FILE_EXT))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.item_path(key)).ok()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| CacheError::WriteFailed {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        fs::write(self.item_path(key), value).map_err(|e| CacheError::WriteFailed {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    fn remove_item(&self, key: &str) {
        if let Err(e) = fs::remove_file(self.item_path(key)) {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!(key, error = %e, "failed to remove cache file");
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXT) {
                    return None;
                }
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_string())
            })
            .collect()
    }
}
