use crate::{
    error::Result,
    models::{journal::ring_append, JournalEntry, Settings, SettingsPatch},
    store::traits::{CaptionStore, StoreDocument},
};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// In-memory backend for tests and ephemeral sessions. Same
/// read-modify-write semantics as the durable store, nothing survives the
/// process.
#[derive(Default)]
pub struct MemoryStore {
    document: RwLock<StoreDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CaptionStore for MemoryStore {
    async fn read_settings(&self) -> Settings {
        self.document.read().await.settings.clone()
    }

    async fn write_settings(&self, patch: SettingsPatch) -> Result<Settings> {
        let mut document = self.document.write().await;
        document.settings.apply(patch);
        document.stamp();
        Ok(document.settings.clone())
    }

    async fn append_journal(&self, entry: JournalEntry) -> Result<()> {
        let mut document = self.document.write().await;
        ring_append(&mut document.journal, entry);
        document.stamp();
        Ok(())
    }

    async fn journal(&self) -> Result<Vec<JournalEntry>> {
        Ok(self.document.read().await.journal.clone())
    }

    async fn clear_journal(&self) -> Result<()> {
        let mut document = self.document.write().await;
        document.journal.clear();
        document.stamp();
        Ok(())
    }
}
