//! Configuration for xposter.
//!
//! Two layers: credentials and provider selection come from the environment
//! (a `.env` file is honored), behavioral settings come from
//! `config/settings.yaml`. Missing credentials are fatal at startup;
//! a missing settings file falls back to defaults.

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::utilities::errors::{Result, XposterError};

/// Automated posting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostingSettings {
    /// Whether the scheduled post job runs at all.
    pub enabled: bool,
    /// Daily post quota.
    pub max_posts_per_day: u32,
    /// Local time-of-day window in which posts may fire.
    pub posting_hours: PostingHours,
    /// Per-firing randomization of the base interval.
    pub interval_jitter: IntervalJitter,
}

impl Default for PostingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_posts_per_day: 10,
            posting_hours: PostingHours::default(),
            interval_jitter: IntervalJitter::default(),
        }
    }
}

/// The `[start, end)` posting window, in local hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostingHours {
    pub start: u32,
    pub end: u32,
}

impl Default for PostingHours {
    fn default() -> Self {
        Self { start: 9, end: 21 }
    }
}

/// Jitter factors applied to the base posting interval on every firing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalJitter {
    pub min_factor: f64,
    pub max_factor: f64,
}

impl Default for IntervalJitter {
    fn default() -> Self {
        Self {
            min_factor: 0.8,
            max_factor: 1.2,
        }
    }
}

/// Reply monitoring settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplySettings {
    /// Whether the reply-monitor job runs at all.
    pub enabled: bool,
    /// Minutes between reply-monitor firings.
    pub check_interval_minutes: u64,
    /// Probability of replying to any given timeline tweet.
    pub reply_probability: f64,
    /// If non-empty, only tweets containing one of these (case-insensitive)
    /// are eligible for a reply.
    pub keywords_to_monitor: Vec<String>,
    /// Cap on timeline replies per firing.
    pub max_replies_per_check: u32,
}

impl Default for ReplySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            check_interval_minutes: 30,
            reply_probability: 0.3,
            keywords_to_monitor: Vec::new(),
            max_replies_per_check: 5,
        }
    }
}

/// Content generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Sampling temperature for tweet/reply generation.
    pub temperature: f64,
    /// Hint the model to include hashtags.
    pub include_hashtags: bool,
    /// Upper bound passed along with the hashtag hint.
    pub max_hashtags: u32,
    /// Hint the model to include emojis (only when the learned profile
    /// actually uses them).
    pub include_emojis: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            include_hashtags: true,
            max_hashtags: 3,
            include_emojis: true,
        }
    }
}

/// Thresholds for categorizing quantitative style frequencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSettings {
    /// Emoji per-sample rate above which the style counts as emoji-using.
    pub emoji_threshold: f64,
    /// Hashtag per-sample rate above which the style counts as hashtag-using.
    pub hashtag_threshold: f64,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            emoji_threshold: 0.5,
            hashtag_threshold: 0.2,
        }
    }
}

/// All behavioral settings, loaded from `config/settings.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub posting: PostingSettings,
    pub replies: ReplySettings,
    pub content_generation: GenerationSettings,
    pub style: StyleSettings,
}

impl Settings {
    /// Parse settings from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| XposterError::configuration(format!("invalid settings.yaml: {}", e)))
    }
}

/// Application configuration: paths, settings, and credentials.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root directory.
    pub project_root: PathBuf,
    /// Path to `config/settings.yaml`.
    pub config_path: PathBuf,
    /// Data directory root.
    pub data_path: PathBuf,
    /// Directory holding raw writing samples.
    pub writing_samples_path: PathBuf,
    /// Directory holding persisted training artifacts.
    pub training_data_path: PathBuf,

    /// Behavioral settings.
    pub settings: Settings,

    // --- Twitter/X API credentials ---
    pub twitter_api_key: Option<String>,
    pub twitter_api_secret: Option<String>,
    pub twitter_access_token: Option<String>,
    pub twitter_access_token_secret: Option<String>,
    pub twitter_bearer_token: Option<String>,

    // --- AI provider settings ---
    pub ai_provider: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,

    /// Log level (consumed by the binary when initializing logging).
    pub log_level: String,
}

impl Config {
    /// Load configuration rooted at `project_root`.
    ///
    /// Reads `.env` (if present), loads `config/settings.yaml` (defaults if
    /// missing), and creates the data directories.
    pub fn load(project_root: impl Into<PathBuf>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let project_root = project_root.into();
        let config_path = project_root.join("config").join("settings.yaml");
        let data_path = project_root.join("data");
        let writing_samples_path = data_path.join("writing_samples");
        let training_data_path = data_path.join("training_data");

        fs::create_dir_all(&writing_samples_path)?;
        fs::create_dir_all(&training_data_path)?;

        let settings = if config_path.exists() {
            let yaml = fs::read_to_string(&config_path)?;
            Settings::from_yaml(&yaml)?
        } else {
            log::warn!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            Settings::default()
        };

        Ok(Self {
            project_root,
            config_path,
            data_path,
            writing_samples_path,
            training_data_path,
            settings,
            twitter_api_key: env_var("TWITTER_API_KEY"),
            twitter_api_secret: env_var("TWITTER_API_SECRET"),
            twitter_access_token: env_var("TWITTER_ACCESS_TOKEN"),
            twitter_access_token_secret: env_var("TWITTER_ACCESS_TOKEN_SECRET"),
            twitter_bearer_token: env_var("TWITTER_BEARER_TOKEN"),
            ai_provider: env_var("AI_PROVIDER").unwrap_or_else(|| "openai".to_string()),
            openai_api_key: env_var("OPENAI_API_KEY"),
            openai_model: env_var("OPENAI_MODEL")
                .unwrap_or_else(|| "gpt-4-turbo-preview".to_string()),
            anthropic_api_key: env_var("ANTHROPIC_API_KEY"),
            anthropic_model: env_var("ANTHROPIC_MODEL")
                .unwrap_or_else(|| "claude-3-opus-20240229".to_string()),
            log_level: env_var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate that all required credentials are present.
    ///
    /// Missing credentials are a fatal configuration error listing every
    /// missing variable at once.
    pub fn validate(&self) -> Result<()> {
        let mut missing: Vec<&str> = Vec::new();

        let required = [
            ("TWITTER_API_KEY", &self.twitter_api_key),
            ("TWITTER_API_SECRET", &self.twitter_api_secret),
            ("TWITTER_ACCESS_TOKEN", &self.twitter_access_token),
            (
                "TWITTER_ACCESS_TOKEN_SECRET",
                &self.twitter_access_token_secret,
            ),
        ];
        for (name, value) in required {
            if value.as_deref().map_or(true, str::is_empty) {
                missing.push(name);
            }
        }

        match self.ai_provider.as_str() {
            "openai" => {
                if self.openai_api_key.as_deref().map_or(true, str::is_empty) {
                    missing.push("OPENAI_API_KEY");
                }
            }
            "anthropic" => {
                if self
                    .anthropic_api_key
                    .as_deref()
                    .map_or(true, str::is_empty)
                {
                    missing.push("ANTHROPIC_API_KEY");
                }
            }
            other => {
                return Err(XposterError::configuration(format!(
                    "Unsupported AI provider: {}",
                    other
                )));
            }
        }

        if !missing.is_empty() {
            return Err(XposterError::configuration(format!(
                "Missing required configuration: {}",
                missing.join(", ")
            )));
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert!(settings.posting.enabled);
        assert_eq!(settings.posting.max_posts_per_day, 10);
        assert_eq!(settings.posting.posting_hours.start, 9);
        assert_eq!(settings.posting.posting_hours.end, 21);
        assert_eq!(settings.replies.check_interval_minutes, 30);
        assert_eq!(settings.replies.reply_probability, 0.3);
        assert_eq!(settings.replies.max_replies_per_check, 5);
        assert_eq!(settings.content_generation.temperature, 0.8);
        assert_eq!(settings.style.emoji_threshold, 0.5);
        assert_eq!(settings.style.hashtag_threshold, 0.2);
    }

    #[test]
    fn test_settings_partial_yaml_fills_defaults() {
        let yaml = r#"
posting:
  max_posts_per_day: 12
replies:
  keywords_to_monitor: ["ai", "rust"]
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.posting.max_posts_per_day, 12);
        assert_eq!(settings.posting.posting_hours.start, 9);
        assert_eq!(settings.replies.keywords_to_monitor, vec!["ai", "rust"]);
        assert_eq!(settings.content_generation.max_hashtags, 3);
    }

    #[test]
    fn test_settings_invalid_yaml_is_error() {
        assert!(Settings::from_yaml("posting: [not a map").is_err());
    }
}
