use altcap::{
    dispatch::{DispatchRequest, Dispatcher, ErrorAction, PresentationSink},
    models::{CostEstimate, JournalOutcome, SettingsPatch},
    normalize::{HttpFetcher, Normalizer},
    store,
    vision::VisionClient,
    Config,
};
use async_trait::async_trait;
use std::env;
use std::sync::Arc;

/// Stand-in for the extension's modal: signals go straight to the log.
struct ConsoleSink;

#[async_trait]
impl PresentationSink for ConsoleSink {
    async fn show_loading(&self) {
        log::info!("⏳ Generating caption...");
    }

    async fn show_result(&self, caption: &str, cost: &CostEstimate) {
        log::info!("📝 Caption: {}", caption);
        log::info!(
            "💰 Cost: {} ({} tokens)",
            cost.cents_display,
            cost.usage.total_tokens
        );
    }

    async fn show_error(&self, message: &str, action: Option<&ErrorAction>) {
        log::error!("❌ {}", message);
        if let Some(action) = action {
            log::info!("💡 {} ({})", action.label, action.target);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    altcap::logger::init_with_config(
        altcap::logger::LoggerConfig::development()
            .with_level(altcap::logger::LogLevel::Debug),
    )?;

    let mut args = env::args().skip(1);
    let Some(locator) = args.next() else {
        log::error!("Usage: altcap <image-url-or-data-url> [prompt override]");
        return Ok(());
    };
    let prompt_override = args.next();

    let config = Config::from_env();
    let store = store::open(&config.store);

    // Seed the credential from the environment on first run.
    let settings = store.read_settings().await;
    if !settings.has_api_key() {
        match &config.api.api_key {
            Some(api_key) => {
                log::info!("🔑 Seeding API key from environment");
                let mut patch = SettingsPatch::new().with_api_key(api_key.clone());
                if let Some(model) = &config.api.model {
                    patch = patch.with_model(model.clone());
                }
                store.write_settings(patch).await?;
            }
            None => {
                log::warn!("⚠️  No API key in store or environment (set ALTCAP_API_KEY)");
            }
        }
    }

    let vision = VisionClient::new(&config.api);

    let settings = store.read_settings().await;
    if settings.has_api_key() && !settings.key_validated {
        log::info!("🔄 Validating API key...");
        let check = vision.keys().check(&settings.api_key).await;
        log::info!("🔑 {}", check.message);
        if check.status.is_valid() {
            store
                .write_settings(SettingsPatch::new().with_key_validated(true))
                .await?;
        }
    }

    let dispatcher = Dispatcher::new(
        store.clone(),
        Arc::new(vision),
        Normalizer::new(config.normalize.clone()),
        Arc::new(HttpFetcher::new(config.normalize.max_source_bytes)),
    );

    let mut request = DispatchRequest::new(&locator);
    if let Some(prompt) = prompt_override {
        request = request.with_prompt(prompt);
    }

    let state = dispatcher.dispatch(&ConsoleSink, request).await;
    log::info!("🏁 Pipeline finished: {:?}", state);

    log::info!("📒 Recent journal entries:");
    for entry in store.journal().await? {
        match &entry.outcome {
            JournalOutcome::Success { alt_text, cost } => {
                log::info!(
                    "   ✅ {} — {} ({})",
                    entry.image,
                    alt_text,
                    cost.cents_display
                );
            }
            JournalOutcome::Error { message } => {
                log::info!("   ❌ {} — {}", entry.image, message);
            }
        }
    }

    Ok(())
}
