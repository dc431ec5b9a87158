use crate::{
    error::Result,
    models::{JournalEntry, Settings, SettingsPatch},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Durable settings + journal access. Settings reads never fail; every
/// write is a full read-modify-write of the backing document, so retries
/// are idempotent and no partial state is observable.
#[async_trait]
pub trait CaptionStore: Send + Sync {
    async fn read_settings(&self) -> Settings;
    async fn write_settings(&self, patch: SettingsPatch) -> Result<Settings>;
    async fn append_journal(&self, entry: JournalEntry) -> Result<()>;
    async fn journal(&self) -> Result<Vec<JournalEntry>>;
    async fn clear_journal(&self) -> Result<()>;
}

/// The single persisted document both backends operate on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub journal: Vec<JournalEntry>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl Default for StoreDocument {
    fn default() -> Self {
        StoreDocument {
            schema_version: SCHEMA_VERSION,
            updated_at: None,
            settings: Settings::default(),
            journal: Vec::new(),
        }
    }
}

impl StoreDocument {
    /// Every mutation stamps the document before it is written back.
    pub fn stamp(&mut self) {
        self.schema_version = SCHEMA_VERSION;
        self.updated_at = Some(Utc::now());
    }
}
