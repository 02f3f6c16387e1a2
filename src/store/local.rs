//! File-backed key-value storage with browser local-storage semantics

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Small string-to-string store persisted as a JSON object.
/// Every mutation is flushed to disk immediately.
#[derive(Clone)]
pub struct LocalStorage {
    path: Arc<PathBuf>,
    items: Arc<Mutex<BTreeMap<String, String>>>,
}

impl LocalStorage {
    /// Storage with no items that will persist to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            items: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Open storage at `path`. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let items = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(StoreError::Parse)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::Io(e)),
        };
        debug!(path = %path.display(), "Opened local storage");

        Ok(Self {
            path: Arc::new(path),
            items: Arc::new(Mutex::new(items)),
        })
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().get(key).cloned()
    }

    pub async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.lock().insert(key.to_string(), value.to_string());
        self.flush().await
    }

    pub async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let removed = self.items.lock().remove(key).is_some();
        if removed {
            self.flush().await
        } else {
            Ok(())
        }
    }

    /// Write the current items through a temp file so a crash never leaves
    /// a half-written store behind
    async fn flush(&self) -> Result<(), StoreError> {
        let bytes = {
            let items = self.items.lock();
            serde_json::to_vec_pretty(&*items).map_err(StoreError::Parse)?
        };

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, self.path.as_path()).await?;
        Ok(())
    }
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = assert_ok!(LocalStorage::open(dir.path().join("store.json")).await);
        assert_eq!(storage.get_item("anything"), None);
    }

    #[tokio::test]
    async fn items_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let storage = LocalStorage::open(&path).await.unwrap();
        assert_ok!(storage.set_item("bestTime", "4200").await);
        assert_ok!(storage.set_item("other", "x").await);
        assert_ok!(storage.remove_item("other").await);

        let reopened = LocalStorage::open(&path).await.unwrap();
        assert_eq!(reopened.get_item("bestTime").as_deref(), Some("4200"));
        assert_eq!(reopened.get_item("other"), None);
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn removing_an_absent_key_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let storage = LocalStorage::empty(&path);
        assert_ok!(storage.remove_item("nope").await);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"{not json").unwrap();
        let err = LocalStorage::open(&path).await.err().unwrap();
        assert!(matches!(err, StoreError::Parse(_)));
    }
}
