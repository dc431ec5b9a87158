//! altcap: the image-to-caption pipeline behind right-click alt text.
//!
//! The flow: an image locator is fetched through one of two interchangeable
//! strategies (a privileged HTTP fetch with a page-context fallback),
//! downscaled to a bounded JPEG data URL, shipped to a chat-completions
//! vision API, costed from token usage, journaled, and surfaced to the
//! presentation layer as loading/result/error signals.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod logger;
pub mod models;
pub mod normalize;
pub mod store;
pub mod vision;

pub use config::{ApiConfig, Config, NormalizeOptions, StoreConfig};
pub use dispatch::{DispatchRequest, DispatchState, Dispatcher, ErrorAction, PresentationSink};
pub use error::{CaptionError, Result};
pub use models::{
    Caption, CostEstimate, FetchedImage, ImageSource, JournalEntry, JournalOutcome,
    NormalizedImage, Settings, SettingsPatch, TokenUsage,
};
pub use normalize::{DelegatedFetcher, FetchStrategy, HttpFetcher, ImageDelegate, Normalizer};
pub use store::{CaptionStore, LocalJsonStore, MemoryStore};
pub use vision::{Captioner, KeyCheck, KeyClient, KeyStatus, VisionClient};
