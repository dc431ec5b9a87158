use crate::error::{CaptionError, Result};
use base64::Engine;

/// Where a source image comes from: a network URL or an inline data URL.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Url(String),
    DataUrl(String),
}

impl ImageSource {
    pub fn parse(locator: &str) -> Self {
        if locator.trim_start().starts_with("data:") {
            ImageSource::DataUrl(locator.to_string())
        } else {
            ImageSource::Url(locator.to_string())
        }
    }

    /// Journal-friendly reference: URLs as-is, data URLs truncated so a
    /// multi-megabyte payload never lands in the journal.
    pub fn reference(&self) -> String {
        match self {
            ImageSource::Url(url) => url.clone(),
            ImageSource::DataUrl(data_url) => {
                let truncated: String = data_url.chars().take(64).collect();
                if truncated.len() < data_url.len() {
                    format!("{}…", truncated)
                } else {
                    truncated
                }
            }
        }
    }

    /// Decode an inline data URL to its MIME type and raw bytes, without a
    /// network round trip.
    pub fn decode_data_url(data_url: &str) -> Result<(String, Vec<u8>)> {
        let rest = data_url
            .strip_prefix("data:")
            .ok_or_else(|| CaptionError::Fetch("not a data URL".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| CaptionError::Fetch("malformed data URL: missing comma".into()))?;

        let (mime, base64_encoded) = match header.strip_suffix(";base64") {
            Some(mime) => (mime, true),
            None => (header, false),
        };
        let mime = if mime.is_empty() {
            "text/plain".to_string()
        } else {
            mime.to_string()
        };

        let bytes = if base64_encoded {
            base64::engine::general_purpose::STANDARD
                .decode(payload)
                .map_err(|e| CaptionError::Fetch(format!("invalid base64 payload: {}", e)))?
        } else {
            payload.as_bytes().to_vec()
        };

        Ok((mime, bytes))
    }
}

/// Raw bytes handed back by a fetch strategy, with the declared content type
/// when the transport had one.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// The resize + re-encode result shipped to the vision API. Ephemeral:
/// lives for a single request and is never persisted.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classifies_locators() {
        assert_eq!(
            ImageSource::parse("https://example.com/cat.png"),
            ImageSource::Url("https://example.com/cat.png".into())
        );
        assert!(matches!(
            ImageSource::parse("data:image/png;base64,AAAA"),
            ImageSource::DataUrl(_)
        ));
    }

    #[test]
    fn test_decode_data_url_base64() {
        let (mime, bytes) =
            ImageSource::decode_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_decode_data_url_rejects_malformed() {
        assert!(ImageSource::decode_data_url("data:image/png;base64").is_err());
        assert!(ImageSource::decode_data_url("https://example.com/a.png").is_err());
        assert!(ImageSource::decode_data_url("data:image/png;base64,!!!").is_err());
    }

    #[test]
    fn test_reference_truncates_data_urls() {
        let long = format!("data:image/jpeg;base64,{}", "A".repeat(200));
        let reference = ImageSource::parse(&long).reference();
        assert!(reference.len() < long.len());
        assert!(reference.ends_with('…'));

        let url = ImageSource::parse("https://example.com/dog.jpg");
        assert_eq!(url.reference(), "https://example.com/dog.jpg");
    }
}
