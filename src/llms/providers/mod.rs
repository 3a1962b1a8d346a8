//! Concrete LLM provider implementations.

pub mod anthropic;
pub mod openai;
