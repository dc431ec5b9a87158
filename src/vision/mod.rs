pub mod caption_client;
pub mod key_client;

use crate::{
    config::{ApiConfig, DEFAULT_BASE_URL},
    error::Result,
    models::{Caption, NormalizedImage, Settings},
};
use async_trait::async_trait;
use reqwest::Client;

pub use caption_client::CaptionClient;
pub use key_client::{KeyCheck, KeyClient, KeyStatus};

/// Anything that can turn a normalized image plus settings into a caption.
/// The dispatcher only sees this trait, so tests can run the full pipeline
/// without a network.
#[async_trait]
pub trait Captioner: Send + Sync {
    async fn caption(&self, image: &NormalizedImage, settings: &Settings) -> Result<Caption>;
}

/// Client facade over the vision API: captioning plus credential checks,
/// sharing one HTTP client and base URL.
#[derive(Clone)]
pub struct VisionClient {
    caption_client: CaptionClient,
    key_client: KeyClient,
}

impl VisionClient {
    pub fn new(config: &ApiConfig) -> Self {
        let client = Client::new();
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            caption_client: CaptionClient::new(client.clone(), base_url.clone()),
            key_client: KeyClient::new(client, base_url),
        }
    }

    pub fn captions(&self) -> &CaptionClient {
        &self.caption_client
    }

    pub fn keys(&self) -> &KeyClient {
        &self.key_client
    }
}

#[async_trait]
impl Captioner for VisionClient {
    async fn caption(&self, image: &NormalizedImage, settings: &Settings) -> Result<Caption> {
        self.caption_client.caption(image, settings).await
    }
}
