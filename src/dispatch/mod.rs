use crate::{
    error::{CaptionError, Result},
    models::{Caption, CostEstimate, ImageSource, JournalEntry, NormalizedImage},
    normalize::{FetchStrategy, Normalizer},
    store::CaptionStore,
    vision::Captioner,
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Per-request lifecycle: `Idle → Loading → {Success, Error}`. Both end
/// states are terminal; a regenerate starts a brand-new run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Loading,
    Success,
    Error,
}

/// A remediation link attached to an error signal, e.g. the deep link to
/// the settings surface when no credential is configured.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorAction {
    pub label: String,
    pub target: String,
}

impl ErrorAction {
    pub fn open_settings() -> Self {
        ErrorAction {
            label: "Open settings".into(),
            target: "settings".into(),
        }
    }
}

/// The presentation layer as the pipeline sees it: a recipient of loading,
/// result, and error signals.
#[async_trait]
pub trait PresentationSink: Send + Sync {
    async fn show_loading(&self);
    async fn show_result(&self, caption: &str, cost: &CostEstimate);
    async fn show_error(&self, message: &str, action: Option<&ErrorAction>);
}

#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub locator: String,
    pub prompt_override: Option<String>,
}

impl DispatchRequest {
    pub fn new(locator: impl Into<String>) -> Self {
        DispatchRequest {
            locator: locator.into(),
            prompt_override: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt_override = Some(prompt.into());
        self
    }

    /// A regenerate is just a fresh request for the same locator,
    /// optionally with an edited prompt.
    pub fn regenerate(locator: impl Into<String>, prompt: Option<String>) -> Self {
        DispatchRequest {
            locator: locator.into(),
            prompt_override: prompt,
        }
    }
}

/// Coordinates one captioning run: credentials, normalization with the
/// two-strategy fallback, the API call, the journal write, and the signals
/// to the presentation layer.
pub struct Dispatcher {
    store: Arc<dyn CaptionStore>,
    captioner: Arc<dyn Captioner>,
    normalizer: Normalizer,
    privileged: Arc<dyn FetchStrategy>,
    fallback: Option<Arc<dyn FetchStrategy>>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn CaptionStore>,
        captioner: Arc<dyn Captioner>,
        normalizer: Normalizer,
        privileged: Arc<dyn FetchStrategy>,
    ) -> Self {
        Self {
            store,
            captioner,
            normalizer,
            privileged,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn FetchStrategy>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Run one request to a terminal state. Concurrent calls are not
    /// de-duplicated or fenced; each run is fully independent.
    pub async fn dispatch(
        &self,
        sink: &dyn PresentationSink,
        request: DispatchRequest,
    ) -> DispatchState {
        let run_id = Uuid::new_v4();
        log::info!("[run {}] Captioning {}", run_id, request.locator);

        sink.show_loading().await;

        let source = ImageSource::parse(&request.locator);
        let reference = source.reference();

        match self.run(&source, request.prompt_override).await {
            Ok(caption) => {
                self.journal(JournalEntry::success(
                    &reference,
                    &caption.text,
                    caption.cost.clone(),
                ))
                .await;
                log::info!("[run {}] Success: {}", run_id, caption.text);
                sink.show_result(&caption.text, &caption.cost).await;
                DispatchState::Success
            }
            Err(e) => {
                let message = e.to_string();
                self.journal(JournalEntry::error(&reference, &message)).await;
                log::error!("[run {}] {}", run_id, message);

                let action = match e {
                    CaptionError::Config(_) => Some(ErrorAction::open_settings()),
                    _ => None,
                };
                sink.show_error(&message, action.as_ref()).await;
                DispatchState::Error
            }
        }
    }

    async fn run(&self, source: &ImageSource, prompt_override: Option<String>) -> Result<Caption> {
        let mut settings = self.store.read_settings().await;
        if !settings.has_api_key() {
            return Err(CaptionError::Config(
                "No API key configured. Open settings to add one.".into(),
            ));
        }

        if let Some(prompt) = prompt_override {
            settings.prompt = prompt;
        }

        let image = self.normalize_with_fallback(source).await?;
        self.captioner.caption(&image, &settings).await
    }

    /// Try the privileged strategy first; a fetch-stage failure gets one
    /// retry through the page-context strategy. Decode failures never fall
    /// back: both contexts share the codec and would fail the same way.
    async fn normalize_with_fallback(&self, source: &ImageSource) -> Result<NormalizedImage> {
        let primary = match self
            .normalizer
            .normalize(source, self.privileged.as_ref())
            .await
        {
            Ok(image) => return Ok(image),
            Err(e) if e.is_fetch() => e,
            Err(e) => return Err(e),
        };

        let Some(fallback) = &self.fallback else {
            return Err(primary);
        };

        log::warn!(
            "{} fetch failed ({}), retrying via {} strategy",
            self.privileged.name(),
            primary,
            fallback.name()
        );

        match self.normalizer.normalize(source, fallback.as_ref()).await {
            Ok(image) => Ok(image),
            Err(secondary) => Err(CaptionError::Fetch(format!(
                "{} fetch failed: {}; {} fetch failed: {}",
                self.privileged.name(),
                primary,
                fallback.name(),
                secondary
            ))),
        }
    }

    /// Journal writes are assumed to succeed; a failure is logged and the
    /// signal to the user still goes out.
    async fn journal(&self, entry: JournalEntry) {
        if let Err(e) = self.store.append_journal(entry).await {
            log::error!("Failed to record journal entry: {}", e);
        }
    }
}
