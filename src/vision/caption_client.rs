use crate::{
    error::{CaptionError, Result},
    models::{
        ApiErrorBody, Caption, ChatCompletionResponse, CostEstimate, NormalizedImage, Settings,
    },
};
use reqwest::Client;
use serde_json::json;

#[derive(Clone)]
pub struct CaptionClient {
    client: Client,
    base_url: String,
}

impl CaptionClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// One single-turn request: an instruction segment plus the image
    /// segment with its detail hint, capped by the output-token budget.
    pub async fn caption(&self, image: &NormalizedImage, settings: &Settings) -> Result<Caption> {
        if !settings.has_api_key() {
            return Err(CaptionError::Config(
                "No API key configured. Add one in settings before captioning.".into(),
            ));
        }

        let payload = json!({
            "model": settings.model,
            "max_tokens": settings.max_output_tokens,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": settings.prompt },
                    {
                        "type": "image_url",
                        "image_url": { "url": image.data_url, "detail": settings.detail }
                    }
                ]
            }]
        });

        log::info!(
            "Requesting caption: model={} detail={} image={}x{}",
            settings.model,
            settings.detail,
            image.width,
            image.height
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(settings.api_key.trim())
            .json(&payload)
            .send()
            .await
            .map_err(|e| CaptionError::Api(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CaptionError::Api(format!("reading response failed: {}", e)))?;

        if !status.is_success() {
            // Prefer the API's own error message when it sent one.
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|parsed| parsed.error)
                .and_then(|detail| detail.message)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            log::error!("Caption request failed: {}", message);
            return Err(CaptionError::Api(message));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| CaptionError::Serialization(format!("unexpected response: {}", e)))?;

        resolve_caption(parsed)
    }
}

/// Turn a parsed chat-completions response into a caption or a failure.
/// Split out so the truncation and empty-output rules are testable without
/// a live endpoint.
pub(crate) fn resolve_caption(response: ChatCompletionResponse) -> Result<Caption> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CaptionError::Api("response contained no choices".into()))?;

    // Truncation is a failure, never a partial success.
    if choice.finish_reason.as_deref() == Some("length") {
        return Err(CaptionError::Api(
            "The caption was cut off by the token limit. Raise the max output tokens setting and try again.".into(),
        ));
    }

    let text = choice
        .message
        .content
        .map(|content| content.joined_text())
        .unwrap_or_default()
        .trim()
        .to_string();

    if text.is_empty() {
        return Err(CaptionError::Api("The API returned an empty caption.".into()));
    }

    let cost = CostEstimate::from_usage(response.usage.unwrap_or_default());
    log::info!(
        "Caption received: {} tokens, {}",
        cost.usage.total_tokens,
        cost.cents_display
    );

    Ok(Caption { text, cost })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> ChatCompletionResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_string_content_success() {
        let caption = resolve_caption(parse(
            r#"{"choices":[{"message":{"content":"A red bicycle."},"finish_reason":"stop"}],
                "usage":{"prompt_tokens":120,"completion_tokens":5,"total_tokens":125}}"#,
        ))
        .unwrap();

        assert_eq!(caption.text, "A red bicycle.");
        assert_eq!(caption.cost.usage.total_tokens, 125);
        assert!((caption.cost.total_usd - 0.000008).abs() < 1e-12);
    }

    #[test]
    fn test_segment_content_joins_text_only() {
        let caption = resolve_caption(parse(
            r#"{"choices":[{"message":{"content":[
                {"type":"text","text":"Two cats "},
                {"type":"image_url","image_url":{"url":"x"}},
                {"type":"text","text":"sleeping."}
            ]},"finish_reason":"stop"}]}"#,
        ))
        .unwrap();

        assert_eq!(caption.text, "Two cats sleeping.");
    }

    #[test]
    fn test_length_finish_reason_is_never_a_success() {
        let err = resolve_caption(parse(
            r#"{"choices":[{"message":{"content":"A partial capt"},"finish_reason":"length"}],
                "usage":{"prompt_tokens":120,"completion_tokens":1024,"total_tokens":1144}}"#,
        ))
        .unwrap_err();

        assert!(matches!(err, CaptionError::Api(_)));
        assert!(err.to_string().contains("token limit"));
    }

    #[test]
    fn test_empty_caption_after_trim_fails() {
        let err = resolve_caption(parse(
            r#"{"choices":[{"message":{"content":"   \n "},"finish_reason":"stop"}]}"#,
        ))
        .unwrap_err();

        assert!(err.to_string().contains("empty caption"));
    }

    #[test]
    fn test_no_choices_fails() {
        let err = resolve_caption(parse(r#"{"choices":[]}"#)).unwrap_err();
        assert!(matches!(err, CaptionError::Api(_)));
    }

    #[test]
    fn test_missing_usage_costs_nothing() {
        let caption = resolve_caption(parse(
            r#"{"choices":[{"message":{"content":"A hat."},"finish_reason":"stop"}]}"#,
        ))
        .unwrap();

        assert_eq!(caption.cost.usage.total_tokens, 0);
        assert_eq!(caption.cost.cents_display, "0.0000¢");
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits_without_network() {
        // base URL that would fail instantly if contacted
        let client = CaptionClient::new(Client::new(), "http://127.0.0.1:1".into());
        let image = NormalizedImage {
            data_url: "data:image/jpeg;base64,AAAA".into(),
            width: 10,
            height: 10,
        };

        let err = client
            .caption(&image, &Settings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CaptionError::Config(_)));
    }
}
