//! File-backed local store.
//!
//! Holds templates that could not be written to the database. Each key maps
//! to `<dir>/<key>.json`; writes go through a uniquely named temporary file
//! and a rename, so a crash never leaves a half-written record behind and
//! concurrent writers of one key never share a temp file.

use std::path::{Path, PathBuf};

use domain::services::template_save::{LocalStore, LocalStoreError};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

const EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct FileLocalStore {
    dir: PathBuf,
}

impl FileLocalStore {
    /// Opens the store, creating `dir` if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, LocalStoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| LocalStoreError::Io(format!("{}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, LocalStoreError> {
        let valid = !key.is_empty()
            && key.len() <= 128
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(LocalStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", key, EXTENSION)))
    }
}

fn io_err(path: &Path, e: std::io::Error) -> LocalStoreError {
    LocalStoreError::Io(format!("{}: {}", path.display(), e))
}

#[async_trait::async_trait]
impl LocalStore for FileLocalStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(&path, e)),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        let path = self.path_for(key)?;
        let tmp = self
            .dir
            .join(format!("{}.{}.tmp", key, Uuid::new_v4().simple()));
        fs::write(&tmp, value).await.map_err(|e| io_err(&tmp, e))?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(io_err(&path, e));
        }
        debug!(key, "Local item written");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), LocalStoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(&path, e)),
        }
    }

    async fn keys(&self) -> Result<Vec<String>, LocalStoreError> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| io_err(&self.dir, e))?;
        let mut keys = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_err(&self.dir, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    async fn store() -> (tempfile::TempDir, FileLocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLocalStore::open(dir.path().join("pending")).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let (_dir, store) = store().await;

        assert_eq!(store.get_item("custom_template_local_1").await.unwrap(), None);
        assert_ok!(store.set_item("custom_template_local_1", r#"{"a":1}"#).await);
        assert_eq!(
            store.get_item("custom_template_local_1").await.unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );

        assert_ok!(store.remove_item("custom_template_local_1").await);
        assert_eq!(store.get_item("custom_template_local_1").await.unwrap(), None);
        assert_ok!(store.remove_item("custom_template_local_1").await);
    }

    #[tokio::test]
    async fn test_overwrite() {
        let (_dir, store) = store().await;
        store.set_item("k", "one").await.unwrap();
        store.set_item("k", "two").await.unwrap();
        assert_eq!(store.get_item("k").await.unwrap().as_deref(), Some("two"));
        assert_eq!(store.keys().await.unwrap(), vec!["k"]);
    }

    #[tokio::test]
    async fn test_keys_ignore_foreign_files() {
        let (_dir, store) = store().await;
        store.set_item("custom_template_local_2", "{}").await.unwrap();
        store.set_item("custom_template_local_1", "{}").await.unwrap();
        std::fs::write(store.dir().join("notes.txt"), "x").unwrap();

        assert_eq!(
            store.keys().await.unwrap(),
            vec!["custom_template_local_1", "custom_template_local_2"]
        );
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let (_dir, store) = store().await;
        assert!(matches!(
            store.set_item("../escape", "x").await,
            Err(LocalStoreError::InvalidKey(_))
        ));
        assert_err!(store.get_item("a/b").await);
        assert_err!(store.get_item("").await);
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let first = FileLocalStore::open(dir.path()).await.unwrap();
        first.set_item("custom_template_local_9", "{}").await.unwrap();

        let second = FileLocalStore::open(dir.path()).await.unwrap();
        assert_eq!(second.keys().await.unwrap(), vec!["custom_template_local_9"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_to_one_key() {
        let (_dir, store) = store().await;

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.set_item("k", &i.to_string()).await })
            })
            .collect();
        for handle in handles {
            assert_ok!(handle.await.unwrap());
        }

        let value: u32 = store.get_item("k").await.unwrap().unwrap().parse().unwrap();
        assert!(value < 20);
        assert_eq!(std::fs::read_dir(store.dir()).unwrap().count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_works_with_template_saver() {
        use domain::models::invitation::InvitationDraft;
        use domain::models::template::{CustomTemplate, NewCustomTemplate, TemplateConfig};
        use domain::services::template_save::{RemoteError, RemoteTemplateStore, TemplateSaver};
        use std::sync::Arc;

        struct Offline;

        #[async_trait::async_trait]
        impl RemoteTemplateStore for Offline {
            async fn insert_template(
                &self,
                _payload: &NewCustomTemplate,
            ) -> Result<CustomTemplate, RemoteError> {
                Err(RemoteError::new(None, "connection refused"))
            }
        }

        let (_dir, store) = store().await;
        let saver = TemplateSaver::new(Arc::new(Offline), Arc::new(store.clone()));
        let user = uuid::Uuid::new_v4();
        let payload = NewCustomTemplate::from_editor(
            user,
            "Offline",
            TemplateConfig::default(),
            chrono::Utc::now().date_naive(),
        );

        let outcome = saver.save(payload.clone(), InvitationDraft::default()).await.unwrap();
        assert!(outcome.is_local());
        assert_eq!(store.keys().await.unwrap().len(), 1);
        assert_eq!(saver.list_pending(user).await.unwrap().len(), 1);

        let handles: Vec<_> = (0..30)
            .map(|_| {
                let saver = saver.clone();
                let payload = payload.clone();
                tokio::spawn(async move { saver.save(payload, InvitationDraft::default()).await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().unwrap().is_local());
        }
        assert_eq!(store.keys().await.unwrap().len(), 31);
        assert_eq!(saver.list_pending(user).await.unwrap().len(), 31);
    }
}
