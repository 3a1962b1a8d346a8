//! Anthropic completion provider.
//!
//! Direct integration with the Anthropic Messages API via `reqwest`. The
//! system prompt travels as a top-level field rather than a message, and the
//! retry shape matches the OpenAI provider.

use async_trait::async_trait;
use serde_json::Value;

use crate::llms::base::LlmProvider;
use crate::utilities::errors::{Result, XposterError};

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: f64 = 120.0;

/// Default number of retries after the initial attempt.
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Anthropic Messages API provider.
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    /// Model name (e.g. "claude-3-opus-20240229").
    pub model: String,
    /// API key.
    api_key: String,
    /// Custom base URL (defaults to the public API).
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout: f64,
    /// Maximum number of retries.
    pub max_retries: u32,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider.
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn endpoint(&self) -> String {
        let base = self
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.anthropic.com".to_string());
        format!("{}/v1/messages", base)
    }

    /// Build the Messages API request body.
    fn build_request_body(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        temperature: f64,
        max_tokens: u32,
    ) -> Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "max_tokens": max_tokens,
            "temperature": temperature,
            "messages": [{"role": "user", "content": prompt}],
        });
        if let Some(system) = system_prompt {
            body["system"] = serde_json::json!(system);
        }
        body
    }

    /// Extract the completion text from a response body.
    fn parse_response(&self, response: &Value) -> Result<String> {
        let text = response
            .get("content")
            .and_then(|c| c.get(0))
            .and_then(|block| block.get("text"))
            .and_then(|text| text.as_str())
            .ok_or_else(|| XposterError::parse("no text content in Anthropic response"))?;
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> &str {
        "anthropic"
    }

    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String> {
        let body = self.build_request_body(prompt, system_prompt, temperature, max_tokens);
        let endpoint = self.endpoint();

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs_f64(self.timeout))
            .build()
            .map_err(|e| XposterError::provider("anthropic", e.to_string()))?;

        let mut last_error: Option<XposterError> = None;
        let mut retry_delay = std::time::Duration::from_secs(1);

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                log::warn!(
                    "Anthropic API retry attempt {} after {:?}",
                    attempt,
                    retry_delay
                );
                tokio::time::sleep(retry_delay).await;
                retry_delay *= 2;
            }

            let response = match client
                .post(&endpoint)
                .header("Content-Type", "application/json")
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = Some(XposterError::provider("anthropic", e.to_string()));
                    continue;
                }
            };

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                last_error = Some(XposterError::provider(
                    "anthropic",
                    "rate limited by Anthropic API (429)",
                ));
                continue;
            }
            if status.is_server_error() {
                last_error = Some(XposterError::provider(
                    "anthropic",
                    format!("server error: {}", status),
                ));
                continue;
            }

            let response_text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    last_error = Some(XposterError::provider("anthropic", e.to_string()));
                    continue;
                }
            };

            if status.is_client_error() {
                return Err(XposterError::provider(
                    "anthropic",
                    format!("API error ({}): {}", status, response_text),
                ));
            }

            let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
                XposterError::parse(format!(
                    "failed to parse Anthropic response: {} - body: {}",
                    e,
                    body_excerpt(&response_text)
                ))
            })?;

            return self.parse_response(&response_json);
        }

        Err(last_error.unwrap_or_else(|| {
            XposterError::provider("anthropic", "call failed after all retries")
        }))
    }
}

/// First 500 characters of a response body, for error messages. Counted in
/// characters so the cut cannot land inside a multi-byte character.
fn body_excerpt(text: &str) -> String {
    text.chars().take(500).collect()
}
