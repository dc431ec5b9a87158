use serde::{Deserialize, Serialize};

/// Fixed per-million-token prices used for the cost estimate.
pub const INPUT_USD_PER_MILLION_TOKENS: f64 = 0.05;
pub const OUTPUT_USD_PER_MILLION_TOKENS: f64 = 0.40;

/// A successful captioning result: the generated text plus what it cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    pub cost: CostEstimate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostEstimate {
    pub usage: TokenUsage,
    pub input_usd: f64,
    pub output_usd: f64,
    pub total_usd: f64,
    /// Human-readable price, e.g. "0.0008¢".
    pub cents_display: String,
}

impl CostEstimate {
    pub fn from_usage(usage: TokenUsage) -> Self {
        let input_usd = usage.prompt_tokens as f64 / 1e6 * INPUT_USD_PER_MILLION_TOKENS;
        let output_usd = usage.completion_tokens as f64 / 1e6 * OUTPUT_USD_PER_MILLION_TOKENS;
        let total_usd = input_usd + output_usd;

        CostEstimate {
            usage,
            input_usd,
            output_usd,
            total_usd,
            cents_display: format!("{:.4}¢", total_usd * 100.0),
        }
    }
}

// ---- chat-completions wire types ----

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub content: Option<MessageContent>,
}

/// The API returns content either as a plain string or as an ordered list
/// of typed parts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl MessageContent {
    /// Concatenate text-typed parts in order; non-text parts are ignored.
    pub fn joined_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter(|part| part.kind == "text")
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
                .join(""),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_from_usage() {
        let cost = CostEstimate::from_usage(TokenUsage {
            prompt_tokens: 120,
            completion_tokens: 5,
            total_tokens: 125,
        });

        let expected = 120.0 / 1e6 * 0.05 + 5.0 / 1e6 * 0.40;
        assert!((cost.total_usd - expected).abs() < 1e-12);
        assert!((cost.total_usd - 0.000008).abs() < 1e-12);
        assert_eq!(cost.cents_display, "0.0008¢");
    }

    #[test]
    fn test_cost_zero_usage() {
        let cost = CostEstimate::from_usage(TokenUsage::default());
        assert_eq!(cost.total_usd, 0.0);
        assert_eq!(cost.cents_display, "0.0000¢");
    }

    #[test]
    fn test_content_as_plain_string() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"A red bicycle."},"finish_reason":"stop"}],
                "usage":{"prompt_tokens":120,"completion_tokens":5,"total_tokens":125}}"#,
        )
        .unwrap();

        let content = response.choices[0].message.content.as_ref().unwrap();
        assert_eq!(content.joined_text(), "A red bicycle.");
        assert_eq!(response.usage.unwrap().total_tokens, 125);
    }

    #[test]
    fn test_content_as_parts_keeps_text_order_and_skips_non_text() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":[
                {"type":"text","text":"A dog "},
                {"type":"refusal","refusal":"nope"},
                {"type":"text","text":"on a beach."}
            ]},"finish_reason":"stop"}]}"#,
        )
        .unwrap();

        let content = response.choices[0].message.content.as_ref().unwrap();
        assert_eq!(content.joined_text(), "A dog on a beach.");
    }
}
