use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Fetch error: {0}")]
    Fetch(String),
    #[error("Image error: {0}")]
    Image(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CaptionError {
    /// Only fetch-stage failures are worth retrying through the
    /// page-context strategy; both contexts share the same codec, so a
    /// decode failure would repeat identically.
    pub fn is_fetch(&self) -> bool {
        matches!(self, CaptionError::Fetch(_))
    }
}

pub type Result<T> = std::result::Result<T, CaptionError>;
