//! LLM provider abstraction and implementations.
//!
//! [`base::LlmProvider`] is the trait seam the analyzer and generator depend
//! on; [`providers`] holds the OpenAI and Anthropic implementations.

pub mod base;
pub mod providers;

use std::sync::Arc;

use crate::config::Config;
use crate::utilities::errors::{Result, XposterError};

pub use base::LlmProvider;
pub use providers::anthropic::AnthropicProvider;
pub use providers::openai::OpenAiProvider;

/// Build the configured LLM provider.
pub fn provider_from_config(config: &Config) -> Result<Arc<dyn LlmProvider>> {
    match config.ai_provider.as_str() {
        "openai" => {
            let api_key = config
                .openai_api_key
                .clone()
                .ok_or_else(|| XposterError::configuration("OPENAI_API_KEY is not set"))?;
            let provider = OpenAiProvider::new(config.openai_model.clone(), api_key);
            log::info!("Initialized openai client with model {}", provider.model);
            Ok(Arc::new(provider))
        }
        "anthropic" => {
            let api_key = config
                .anthropic_api_key
                .clone()
                .ok_or_else(|| XposterError::configuration("ANTHROPIC_API_KEY is not set"))?;
            let provider = AnthropicProvider::new(config.anthropic_model.clone(), api_key);
            log::info!("Initialized anthropic client with model {}", provider.model);
            Ok(Arc::new(provider))
        }
        other => Err(XposterError::configuration(format!(
            "Unsupported AI provider: {}",
            other
        ))),
    }
}
