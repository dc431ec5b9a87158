pub mod fetch;

use crate::{
    config::NormalizeOptions,
    error::{CaptionError, Result},
    models::{ImageSource, NormalizedImage},
};
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

pub use fetch::{DelegatedFetcher, FetchStrategy, HttpFetcher, ImageDelegate};

/// Scale so the longer side equals `bound`, preserving aspect ratio with the
/// shorter side rounded to the nearest pixel. Images already within the
/// bound are left alone (no upscaling).
pub fn scaled_dimensions(width: u32, height: u32, bound: u32) -> (u32, u32) {
    if width <= bound && height <= bound {
        return (width, height);
    }

    if width >= height {
        let scaled = (bound as f64 * height as f64 / width as f64).round() as u32;
        (bound, scaled.max(1))
    } else {
        let scaled = (bound as f64 * width as f64 / height as f64).round() as u32;
        (scaled.max(1), bound)
    }
}

/// Turns an arbitrary image source into a bounded JPEG data URL ready for
/// the vision API.
#[derive(Debug, Clone)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Resolve a source through the given fetch strategy and normalize it.
    /// Inline data URLs never touch the network.
    pub async fn normalize(
        &self,
        source: &ImageSource,
        fetcher: &dyn FetchStrategy,
    ) -> Result<NormalizedImage> {
        match source {
            ImageSource::DataUrl(data_url) => {
                let (mime, bytes) = ImageSource::decode_data_url(data_url)?;
                self.normalize_bytes(&bytes, Some(&mime))
            }
            ImageSource::Url(url) => {
                log::debug!("Fetching image via {} strategy: {}", fetcher.name(), url);
                let fetched = fetcher.fetch(url).await?;
                self.normalize_bytes(&fetched.bytes, fetched.content_type.as_deref())
            }
        }
    }

    /// Validate, decode, downscale, and re-encode raw image bytes.
    pub fn normalize_bytes(
        &self,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Result<NormalizedImage> {
        if let Some(content_type) = content_type {
            let essence = content_type.split(';').next().unwrap_or("").trim();
            if !essence.starts_with("image/") {
                return Err(CaptionError::Fetch(format!(
                    "content type '{}' is not an image",
                    essence
                )));
            }
        }

        // Oversized sources are rejected before any decode work.
        if bytes.len() as u64 > self.options.max_source_bytes {
            return Err(CaptionError::Fetch(format!(
                "source image is {} bytes, over the {} byte limit",
                bytes.len(),
                self.options.max_source_bytes
            )));
        }

        let decoded = image::load_from_memory(bytes)
            .map_err(|e| CaptionError::Image(format!("decode failed: {}", e)))?;

        let (width, height) = (decoded.width(), decoded.height());
        let (target_width, target_height) =
            scaled_dimensions(width, height, self.options.max_dimension);

        let rgb = if (target_width, target_height) != (width, height) {
            log::debug!(
                "Resizing {}x{} -> {}x{}",
                width,
                height,
                target_width,
                target_height
            );
            decoded
                .resize_exact(target_width, target_height, FilterType::Triangle)
                .to_rgb8()
        } else {
            decoded.to_rgb8()
        };
        // `decoded` is gone by here; the full-size bitmap never outlives
        // this call on either path.

        let mut jpeg = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, self.options.jpeg_quality);
        encoder
            .encode_image(&rgb)
            .map_err(|e| CaptionError::Image(format!("JPEG encode failed: {}", e)))?;

        let payload = base64::engine::general_purpose::STANDARD.encode(&jpeg);

        Ok(NormalizedImage {
            data_url: format!("data:image/jpeg;base64,{}", payload),
            width: target_width,
            height: target_height,
        })
    }
}
