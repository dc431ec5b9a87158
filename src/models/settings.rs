use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;
pub const DEFAULT_DETAIL: &str = "low";
pub const DEFAULT_PROMPT: &str =
    "Describe this image in one concise sentence suitable for use as alt text.";

/// User preferences plus credential, persisted by the store. Reads always
/// succeed: missing fields fall back to these serde defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub key_validated: bool,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_prompt")]
    pub prompt: String,
    #[serde(default = "default_detail")]
    pub detail: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_output_tokens() -> u32 {
    DEFAULT_MAX_OUTPUT_TOKENS
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_detail() -> String {
    DEFAULT_DETAIL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_key: String::new(),
            key_validated: false,
            model: default_model(),
            max_output_tokens: default_max_output_tokens(),
            prompt: default_prompt(),
            detail: default_detail(),
        }
    }
}

impl Settings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Merge a partial update; unset fields keep their current values.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(api_key) = patch.api_key {
            self.api_key = api_key;
        }
        if let Some(key_validated) = patch.key_validated {
            self.key_validated = key_validated;
        }
        if let Some(model) = patch.model {
            self.model = model;
        }
        if let Some(max_output_tokens) = patch.max_output_tokens {
            self.max_output_tokens = max_output_tokens;
        }
        if let Some(prompt) = patch.prompt {
            self.prompt = prompt;
        }
        if let Some(detail) = patch.detail {
            self.detail = detail;
        }
    }
}

/// All-optional mirror of [`Settings`] for merge-style writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub api_key: Option<String>,
    pub key_validated: Option<bool>,
    pub model: Option<String>,
    pub max_output_tokens: Option<u32>,
    pub prompt: Option<String>,
    pub detail: Option<String>,
}

impl SettingsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_key_validated(mut self, key_validated: bool) -> Self {
        self.key_validated = Some(key_validated);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
