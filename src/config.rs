use std::env;
use std::path::PathBuf;

/// Default chat-completions endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Longer image side after normalization, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 300;

/// JPEG re-encode quality (0.85 on the canvas scale).
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Source images above this byte count are rejected before decode.
pub const DEFAULT_MAX_SOURCE_BYTES: u64 = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub max_dimension: u32,
    pub jpeg_quality: u8,
    pub max_source_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: Option<PathBuf>,
    pub in_memory: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub normalize: NormalizeOptions,
    pub store: StoreConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            api_key: None,
            base_url: None,
            model: None,
        }
    }
}

impl ApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("ALTCAP_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .ok();
        let base_url = env::var("ALTCAP_BASE_URL").ok();
        let model = env::var("ALTCAP_MODEL").ok();

        ApiConfig {
            api_key,
            base_url,
            model,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        NormalizeOptions {
            max_dimension: DEFAULT_MAX_DIMENSION,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_source_bytes: DEFAULT_MAX_SOURCE_BYTES,
        }
    }
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub fn with_jpeg_quality(mut self, jpeg_quality: u8) -> Self {
        self.jpeg_quality = jpeg_quality;
        self
    }

    pub fn with_max_source_bytes(mut self, max_source_bytes: u64) -> Self {
        self.max_source_bytes = max_source_bytes;
        self
    }

    /// The lighter product variant: 4 MB source cap.
    pub fn lightweight() -> Self {
        Self::default().with_max_source_bytes(4 * 1024 * 1024)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            path: None,
            in_memory: false,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let path = env::var("ALTCAP_STORE_PATH").ok().map(PathBuf::from);

        StoreConfig {
            path,
            in_memory: false,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: ApiConfig::default(),
            normalize: NormalizeOptions::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            api: ApiConfig::from_env(),
            normalize: NormalizeOptions::default(),
            store: StoreConfig::from_env(),
        }
    }

    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.api = api;
        self
    }

    pub fn with_normalize(mut self, normalize: NormalizeOptions) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_defaults() {
        let options = NormalizeOptions::default();
        assert_eq!(options.max_dimension, 300);
        assert_eq!(options.jpeg_quality, 85);
        assert_eq!(options.max_source_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn test_lightweight_variant() {
        let options = NormalizeOptions::lightweight();
        assert_eq!(options.max_source_bytes, 4 * 1024 * 1024);
        assert_eq!(options.max_dimension, 300);
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_api(ApiConfig::new().with_api_key("sk-test").with_model("gpt-4o"))
            .with_store(StoreConfig::new().with_path("/tmp/altcap.json"));

        assert_eq!(config.api.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.api.model.as_deref(), Some("gpt-4o"));
        assert!(config.store.path.is_some());
        assert!(!config.store.in_memory);
    }
}
