//! Cursor persistence
//!
//! [`CursorStore`] abstracts where the cursor lives; [`FileCursorStore`] is
//! the production implementation, a single JSON record overwritten
//! atomically (write-to-temp then rename) after each fetch cycle.

use crate::core::cursor::Cursor;
use crate::domain::errors::PersistenceError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Storage backend for the cursor
#[async_trait]
pub trait CursorStore: Send + Sync {
    /// Load the persisted cursor
    ///
    /// Returns `Ok(None)` when no cursor has ever been written. Corrupt or
    /// unreadable records surface as errors; the listener degrades those to
    /// "no cursor, start clean".
    async fn load(&self) -> Result<Option<Cursor>, PersistenceError>;

    /// Persist the cursor, replacing any previous record
    async fn save(&self, cursor: &Cursor) -> Result<(), PersistenceError>;
}

/// File-backed cursor store
pub struct FileCursorStore {
    path: PathBuf,
}

impl FileCursorStore {
    /// Create a store backed by the given file path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl CursorStore for FileCursorStore {
    async fn load(&self) -> Result<Option<Cursor>, PersistenceError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PersistenceError::Read(format!(
                    "{}: {e}",
                    self.path.display()
                )))
            }
        };

        let cursor: Cursor = serde_json::from_str(&contents).map_err(|e| {
            PersistenceError::Corrupt(format!("{}: {e}", self.path.display()))
        })?;

        Ok(Some(cursor))
    }

    async fn save(&self, cursor: &Cursor) -> Result<(), PersistenceError> {
        let json = serde_json::to_vec_pretty(cursor)
            .map_err(|e| PersistenceError::Write(e.to_string()))?;

        // Write to a sibling temp file and rename so a crash mid-write
        // never leaves a truncated record behind.
        let temp = self.temp_path();
        tokio::fs::write(&temp, &json)
            .await
            .map_err(|e| PersistenceError::Write(format!("{}: {e}", temp.display())))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| PersistenceError::Write(format!("{}: {e}", self.path.display())))?;

        tracing::debug!(
            iden = %cursor.iden,
            modified = cursor.modified,
            path = %self.path.display(),
            "Cursor persisted"
        );

        Ok(())
    }
}

/// In-memory cursor store
///
/// Used by tests and by `validate-config` dry runs; nothing survives the
/// process.
#[derive(Default)]
pub struct MemoryCursorStore {
    cursor: std::sync::Mutex<Option<Cursor>>,
}

impl MemoryCursorStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a cursor
    pub fn with_cursor(cursor: Cursor) -> Self {
        Self {
            cursor: std::sync::Mutex::new(Some(cursor)),
        }
    }
}

#[async_trait]
impl CursorStore for MemoryCursorStore {
    async fn load(&self) -> Result<Option<Cursor>, PersistenceError> {
        Ok(self.cursor.lock().expect("cursor lock").clone())
    }

    async fn save(&self, cursor: &Cursor) -> Result<(), PersistenceError> {
        *self.cursor.lock().expect("cursor lock") = Some(cursor.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_absent_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCursorStore::new(dir.path().join("cursor.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCursorStore::new(dir.path().join("cursor.json"));

        let cursor = Cursor {
            iden: "push-1".to_string(),
            modified: 100.5,
        };
        store.save(&cursor).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, Some(cursor));
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCursorStore::new(dir.path().join("cursor.json"));

        store
            .save(&Cursor {
                iden: "a".to_string(),
                modified: 100.0,
            })
            .await
            .unwrap();
        store
            .save(&Cursor {
                iden: "b".to_string(),
                modified: 200.0,
            })
            .await
            .unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.iden, "b");
        assert_eq!(loaded.modified, 200.0);
    }

    #[tokio::test]
    async fn test_load_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cursor.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let store = FileCursorStore::new(&path);
        let result = store.load().await;
        assert!(matches!(result, Err(PersistenceError::Corrupt(_))));
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCursorStore::new(dir.path().join("cursor.json"));
        store
            .save(&Cursor {
                iden: "a".to_string(),
                modified: 1.0,
            })
            .await
            .unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("cursor.json")]);
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryCursorStore::new();
        assert!(store.load().await.unwrap().is_none());

        let cursor = Cursor {
            iden: "x".to_string(),
            modified: 5.0,
        };
        store.save(&cursor).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(cursor));
    }
}
