//! Base trait for LLM providers.
//!
//! Defines the seam between the style/content pipeline and a concrete
//! provider SDK. Implementations should surface failures as
//! [`XposterError::Provider`]; callers convert those into fallback behavior
//! rather than propagating them.

use std::fmt;

use async_trait::async_trait;

use crate::utilities::errors::Result;

/// System prompt used for style analysis calls.
pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are an expert writing style analyzer. \
     Provide detailed, accurate analysis in the requested format.";

/// Sampling temperature for analysis calls.
pub const ANALYSIS_TEMPERATURE: f64 = 0.3;

/// Token cap for analysis calls.
pub const ANALYSIS_MAX_TOKENS: u32 = 2000;

/// Abstract interface over a text-generation provider.
#[async_trait]
pub trait LlmProvider: Send + Sync + fmt::Debug {
    /// The model identifier in use.
    fn model(&self) -> &str;

    /// The provider name (e.g. "openai", "anthropic").
    fn provider(&self) -> &str;

    /// Generate text from a prompt.
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String>;

    /// Run an analysis call: a generate call with a fixed analyst system
    /// prompt, low temperature, and a large token budget.
    async fn analyze(&self, prompt: &str) -> Result<String> {
        self.generate(
            prompt,
            Some(ANALYSIS_SYSTEM_PROMPT),
            ANALYSIS_TEMPERATURE,
            ANALYSIS_MAX_TOKENS,
        )
        .await
    }
}
