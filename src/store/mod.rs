pub mod local;
pub mod memory;
pub mod traits;

use crate::config::StoreConfig;
use std::path::PathBuf;
use std::sync::Arc;

pub use local::LocalJsonStore;
pub use memory::MemoryStore;
pub use traits::{CaptionStore, StoreDocument, SCHEMA_VERSION};

pub const DEFAULT_STORE_FILE: &str = "altcap-store.json";

/// Select a backend from config: an in-memory store for ephemeral sessions,
/// otherwise the durable JSON file.
pub fn open(config: &StoreConfig) -> Arc<dyn CaptionStore> {
    if config.in_memory {
        log::info!("Opening in-memory store");
        return Arc::new(MemoryStore::new());
    }

    let path = config
        .path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE));
    log::info!("Opening store at {}", path.display());
    Arc::new(LocalJsonStore::new(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    #[tokio::test]
    async fn test_open_in_memory() {
        let store = open(&StoreConfig::new().in_memory());
        assert!(store.journal().await.unwrap().is_empty());
    }
}
