//! Error types for xposter.
//!
//! One enum covers the whole taxonomy: configuration failures are fatal at
//! startup, everything else is recovered locally (fallback text, skipped
//! firing, default profile) and logged.

use thiserror::Error;

/// Top-level error type for xposter operations.
#[derive(Debug, Error)]
pub enum XposterError {
    /// Required configuration is missing or invalid. Aborts startup.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// An LLM provider call failed.
    #[error("{provider} provider error: {message}")]
    Provider { provider: String, message: String },

    /// A platform (X/Twitter) API call failed.
    #[error("Platform error: {message}")]
    Platform { message: String },

    /// A response could not be parsed into the expected shape.
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Text failed validation.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl XposterError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a provider error tagged with the provider name.
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a platform error.
    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform {
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XposterError>;
