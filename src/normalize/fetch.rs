use crate::{
    error::{CaptionError, Result},
    models::FetchedImage,
};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

/// One way of turning an image URL into bytes. Two strategies implement the
/// same contract: a direct privileged fetch and a page-context fetch
/// delegated to the presentation layer.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, url: &str) -> Result<FetchedImage>;
}

/// Direct HTTP GET from this process. Wide network access, but target sites
/// may refuse it where the embedding page would be allowed.
pub struct HttpFetcher {
    client: Client,
    max_source_bytes: u64,
}

impl HttpFetcher {
    pub fn new(max_source_bytes: u64) -> Self {
        Self {
            client: Client::new(),
            max_source_bytes,
        }
    }
}

#[async_trait]
impl FetchStrategy for HttpFetcher {
    fn name(&self) -> &'static str {
        "privileged"
    }

    async fn fetch(&self, url: &str) -> Result<FetchedImage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CaptionError::Fetch(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CaptionError::Fetch(format!("HTTP {}", status.as_u16())));
        }

        // Fail fast on a declared oversize body before downloading it.
        if let Some(length) = response.content_length() {
            if length > self.max_source_bytes {
                return Err(CaptionError::Fetch(format!(
                    "declared size {} bytes is over the {} byte limit",
                    length, self.max_source_bytes
                )));
            }
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CaptionError::Fetch(format!("reading body failed: {}", e)))?;

        Ok(FetchedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

/// The fetch-image request/response pair served by the presentation layer,
/// which fetches with the page's own permissions.
#[async_trait]
pub trait ImageDelegate: Send + Sync {
    async fn fetch_image(&self, url: &str) -> Result<FetchedImage>;
}

/// Fallback strategy used when the privileged fetch is denied.
pub struct DelegatedFetcher {
    delegate: Arc<dyn ImageDelegate>,
}

impl DelegatedFetcher {
    pub fn new(delegate: Arc<dyn ImageDelegate>) -> Self {
        Self { delegate }
    }
}

#[async_trait]
impl FetchStrategy for DelegatedFetcher {
    fn name(&self) -> &'static str {
        "page-context"
    }

    async fn fetch(&self, url: &str) -> Result<FetchedImage> {
        self.delegate.fetch_image(url).await
    }
}
