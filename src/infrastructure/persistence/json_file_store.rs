//! File-backed collection store.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::domain::repositories::{CollectionKey, CollectionStore, StoreError, StoreResult};

/// Stores each collection as a pretty-printed JSON file inside a data directory.
///
/// # Layout
///
/// - `ads` -> `<dir>/ads.json`
/// - `ad_stats` -> `<dir>/ad_stats.json`
///
/// # Atomicity
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target. A concurrent reader therefore sees either the previous or
/// the new file, never a partially written one. The directory is created on
/// first write.
///
/// Only a single process is expected to write to a directory at a time.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file path used for a collection.
    pub fn path_for(&self, key: CollectionKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }

    fn temp_path_for(&self, key: CollectionKey) -> PathBuf {
        self.dir
            .join(format!(".{}.json.{}.tmp", key.as_str(), std::process::id()))
    }
}

#[async_trait]
impl CollectionStore for JsonFileStore {
    async fn load_raw(&self, key: CollectionKey) -> StoreResult<Option<String>> {
        let path = self.path_for(key);

        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Collection file not found, using empty default");
                Ok(None)
            }
            Err(source) => Err(StoreError::Io { key, source }),
        }
    }

    async fn save_raw(&self, key: CollectionKey, contents: String) -> StoreResult<()> {
        let io_err = |source| StoreError::Io { key, source };

        fs::create_dir_all(&self.dir).await.map_err(io_err)?;

        let tmp = self.temp_path_for(key);
        let target = self.path_for(key);

        if let Err(source) = fs::write(&tmp, contents.as_bytes()).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(io_err(source));
        }

        if let Err(source) = fs::rename(&tmp, &target).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(io_err(source));
        }

        debug!(path = %target.display(), bytes = contents.len(), "Collection saved");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        match fs::metadata(&self.dir).await {
            Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
            // Created lazily on first write.
            Err(e) if e.kind() == ErrorKind::NotFound => fs::create_dir_all(&self.dir).await.is_ok(),
            Err(_) => false,
        }
    }
}
