//! File-backed implementation of [`KeyValueStore`].
//!
//! Each key maps to `<dir>/<percent-encoded key>.json`. Writes go to a
//! sibling temp file first and are renamed into place, so a reader never
//! observes a half-written value.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{KeyValueStore, StorageError};

/// Store that keeps one file per key in a directory.
///
/// The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for a key.
    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let bytes = match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        String::from_utf8(bytes)
            .map(Some)
            .map_err(|source| StorageError::NotUtf8 {
                key: key.to_string(),
                source,
            })
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(path = %path.display(), bytes = value.len(), "Wrote storage file");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_encodes_key() {
        let store = FileStore::new("/data");
        assert_eq!(
            store.path_for("@RocketShoes:cart"),
            PathBuf::from("/data/%40RocketShoes%3Acart.json")
        );
    }

    #[tokio::test]
    async fn test_roundtrip_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get("@RocketShoes:cart").await.unwrap(), None);

        store.set("@RocketShoes:cart", "[]").await.unwrap();
        assert_eq!(
            store.get("@RocketShoes:cart").await.unwrap().as_deref(),
            Some("[]")
        );

        // No temp file left behind
        let names: Vec<_> = std::fs::read_dir(store.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_a_corrupt_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        std::fs::write(store.path_for("@RocketShoes:cart"), [0xff, 0xfe, b'[', b']']).unwrap();

        let err = store.get("@RocketShoes:cart").await.unwrap_err();
        assert!(matches!(err, StorageError::NotUtf8 { ref key, .. } if key == "@RocketShoes:cart"));
        assert!(err.is_corrupt_value());
    }

    #[tokio::test]
    async fn test_overwrite_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("k", "one").await.unwrap();
        store.set("k", "two").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("two"));

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
