//! # XPoster
//!
//! Automated X/Twitter posting with a personalized writing style.
//!
//! XPoster learns a writing style from sample documents using an LLM,
//! generates tweets and replies in that style, and runs a scheduler that
//! posts on a jittered interval inside a configured daily window and
//! monitors mentions and the home timeline for reply opportunities.

pub mod app;
pub mod cli;
pub mod config;
pub mod generator;
pub mod llms;
pub mod platform;
pub mod scheduler;
pub mod style;
pub mod utilities;

pub use app::XPoster;
pub use config::{Config, Settings};
pub use generator::ContentGenerator;
pub use llms::LlmProvider;
pub use platform::{Platform, TwitterClient};
pub use scheduler::PostingScheduler;
pub use style::{StyleAnalyzer, StyleProfile};
pub use utilities::errors::{Result, XposterError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
