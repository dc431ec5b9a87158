use crate::{
    error::{CaptionError, Result},
    models::{journal::ring_append, JournalEntry, Settings, SettingsPatch},
    store::traits::{CaptionStore, StoreDocument},
};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// Durable backend: one JSON document on disk. Writes are whole-document,
/// with no file lock; concurrent writers race and the last one wins, which
/// is the accepted single-user behavior.
pub struct LocalJsonStore {
    path: PathBuf,
}

impl LocalJsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> StoreDocument {
        match fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(document) => document,
                Err(e) => {
                    log::warn!(
                        "Store file {} is unreadable ({}), starting from defaults",
                        self.path.display(),
                        e
                    );
                    StoreDocument::default()
                }
            },
            Err(_) => StoreDocument::default(),
        }
    }

    async fn save(&self, document: &StoreDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| CaptionError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| CaptionError::Storage(e.to_string()))?;
            }
        }

        fs::write(&self.path, json)
            .await
            .map_err(|e| CaptionError::Storage(e.to_string()))
    }
}

#[async_trait]
impl CaptionStore for LocalJsonStore {
    async fn read_settings(&self) -> Settings {
        self.load().await.settings
    }

    async fn write_settings(&self, patch: SettingsPatch) -> Result<Settings> {
        let mut document = self.load().await;
        document.settings.apply(patch);
        document.stamp();
        self.save(&document).await?;
        Ok(document.settings)
    }

    async fn append_journal(&self, entry: JournalEntry) -> Result<()> {
        let mut document = self.load().await;
        ring_append(&mut document.journal, entry);
        document.stamp();
        self.save(&document).await
    }

    async fn journal(&self) -> Result<Vec<JournalEntry>> {
        Ok(self.load().await.journal)
    }

    async fn clear_journal(&self) -> Result<()> {
        let mut document = self.load().await;
        document.journal.clear();
        document.stamp();
        self.save(&document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::journal::JOURNAL_CAP;

    fn store_in(dir: &tempfile::TempDir) -> LocalJsonStore {
        LocalJsonStore::new(dir.path().join("store.json"))
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let settings = store.read_settings().await;
        assert_eq!(settings, Settings::default());
        assert!(store.journal().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_settings_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        LocalJsonStore::new(&path)
            .write_settings(SettingsPatch::new().with_api_key("sk-live").with_model("gpt-4o"))
            .await
            .unwrap();

        let reopened = LocalJsonStore::new(&path);
        let settings = reopened.read_settings().await;
        assert_eq!(settings.api_key, "sk-live");
        assert_eq!(settings.model, "gpt-4o");
        // untouched fields keep defaults
        assert_eq!(settings.max_output_tokens, 1024);
    }

    #[tokio::test]
    async fn test_write_stamps_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store
            .write_settings(SettingsPatch::new().with_key_validated(true))
            .await
            .unwrap();

        let document = store.load().await;
        assert!(document.updated_at.is_some());
        assert_eq!(document.schema_version, crate::store::traits::SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_journal_cap_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        for i in 0..11 {
            store
                .append_journal(JournalEntry::error(format!("img-{}", i), "boom"))
                .await
                .unwrap();
        }

        let journal = store.journal().await.unwrap();
        assert_eq!(journal.len(), JOURNAL_CAP);
        assert_eq!(journal[0].image, "img-10");
        assert_eq!(journal[JOURNAL_CAP - 1].image, "img-1");
    }

    #[tokio::test]
    async fn test_clear_journal_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store
            .write_settings(SettingsPatch::new().with_api_key("sk-live"))
            .await
            .unwrap();
        store
            .append_journal(JournalEntry::error("img", "boom"))
            .await
            .unwrap();

        store.clear_journal().await.unwrap();

        assert!(store.journal().await.unwrap().is_empty());
        assert_eq!(store.read_settings().await.api_key, "sk-live");
    }

    #[tokio::test]
    async fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let store = LocalJsonStore::new(&path);
        assert_eq!(store.read_settings().await, Settings::default());
    }
}
