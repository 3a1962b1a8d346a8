//! OpenAI completion provider.
//!
//! Direct integration with the OpenAI Chat Completions API via `reqwest`,
//! with retry and exponential backoff on 429/5xx responses.

use async_trait::async_trait;
use serde_json::Value;

use crate::llms::base::LlmProvider;
use crate::utilities::errors::{Result, XposterError};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: f64 = 120.0;

/// Default number of retries after the initial attempt.
const DEFAULT_MAX_RETRIES: u32 = 2;

/// OpenAI Chat Completions provider.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    /// Model name (e.g. "gpt-4-turbo-preview").
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

impl OpenAiProvider {
    /// Create a new OpenAI provider.
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
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string());
        format!("{}/chat/completions", base)
    }

    /// Build the Chat Completions request body.
    fn build_request_body(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        temperature: f64,
        max_tokens: u32,
    ) -> Value {
        let mut messages = Vec::new();
        if let Some(system) = system_prompt {
            messages.push(serde_json::json!({"role": "system", "content": system}));
        }
        messages.push(serde_json::json!({"role": "user", "content": prompt}));

        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": temperature,
            "max_tokens": max_tokens,
        })
    }

    /// Extract the completion text from a response body.
    fn parse_response(&self, response: &Value) -> Result<String> {
        let content = response
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or_else(|| XposterError::parse("no message content in OpenAI response"))?;
        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> &str {
        "openai"
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
            .map_err(|e| XposterError::provider("openai", e.to_string()))?;

        let mut last_error: Option<XposterError> = None;
        let mut retry_delay = std::time::Duration::from_secs(1);

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                log::warn!("OpenAI API retry attempt {} after {:?}", attempt, retry_delay);
                tokio::time::sleep(retry_delay).await;
                retry_delay *= 2;
            }

            let response = match client
                .post(&endpoint)
                .header("Content-Type", "application/json")
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(&body)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = Some(XposterError::provider("openai", e.to_string()));
                    continue;
                }
            };

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                last_error = Some(XposterError::provider(
                    "openai",
                    "rate limited by OpenAI API (429)",
                ));
                continue;
            }
            if status.is_server_error() {
                last_error = Some(XposterError::provider(
                    "openai",
                    format!("server error: {}", status),
                ));
                continue;
            }

            let response_text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    last_error = Some(XposterError::provider("openai", e.to_string()));
                    continue;
                }
            };

            if status.is_client_error() {
                return Err(XposterError::provider(
                    "openai",
                    format!("API error ({}): {}", status, response_text),
                ));
            }

            let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
                XposterError::parse(format!(
                    "failed to parse OpenAI response: {} - body: {}",
                    e,
                    body_excerpt(&response_text)
                ))
            })?;

            return self.parse_response(&response_json);
        }

        Err(last_error
            .unwrap_or_else(|| XposterError::provider("openai", "call failed after all retries")))
    }
}

/// First 500 characters of a response body, for error messages. Counted in
/// characters so the cut cannot land inside a multi-byte character.
fn body_excerpt(text: &str) -> String {
    text.chars().take(500).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_body_with_system() {
        let provider = OpenAiProvider::new("gpt-4-turbo-preview", "sk-test");
        let body = provider.build_request_body("hello", Some("be brief"), 0.8, 100);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["content"], "hello");
        assert_eq!(body["max_tokens"], 100);
    }

    #[test]
    fn test_parse_response_extracts_trimmed_content() {
        let provider = OpenAiProvider::new("gpt-4-turbo-preview", "sk-test");
        let response = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "  a tweet  "}}]
        });
        assert_eq!(provider.parse_response(&response).unwrap(), "a tweet");
    }

    #[test]
    fn test_parse_response_missing_content_is_error() {
        let provider = OpenAiProvider::new("gpt-4-turbo-preview", "sk-test");
        let response = serde_json::json!({"choices": []});
        assert!(provider.parse_response(&response).is_err());
    }

    #[test]
    fn test_body_excerpt_cuts_on_char_boundary() {
        // A 2-byte character straddling byte offset 500.
        let mut body = "a".repeat(499);
        body.push('é');
        body.push_str(&"b".repeat(100));

        let excerpt = body_excerpt(&body);
        assert_eq!(excerpt.chars().count(), 500);
        assert!(excerpt.ends_with('é'));
    }

    #[test]
    fn test_body_excerpt_short_body_unchanged() {
        assert_eq!(body_excerpt("not json"), "not json");
    }
}
