//! Style profile type and persistence.
//!
//! The profile is the learned description of a writing style: qualitative
//! descriptors from the LLM plus quantitative metrics computed from the
//! samples. It persists as flat JSON (`style_profile.json`) in the
//! training-data directory and is only ever replaced wholesale, never
//! partially updated.

use serde::{Deserialize, Serialize};

use crate::style::metrics::QuantitativeMetrics;
use crate::utilities::errors::Result;
use crate::utilities::file_handler::FileHandler;

/// Persisted filename for the style profile.
pub const PROFILE_FILENAME: &str = "style_profile.json";

/// A learned writing-style profile.
///
/// Descriptor fields the LLM omitted deserialize to neutral defaults;
/// the numeric fields are always overwritten from
/// [`quantitative_analysis`](crate::style::metrics::quantitative_analysis)
/// before a profile is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleProfile {
    /// Overall tone (e.g. "casual", "dry", "enthusiastic").
    pub tone: String,
    /// Voice characteristics.
    pub voice: String,
    /// "simple" / "moderate" / "advanced".
    pub vocabulary_level: String,
    /// Description of sentence patterns.
    pub sentence_style: String,
    /// Categorical emoji usage ("none" / "rare" / "moderate" / "frequent").
    pub emoji_usage: String,
    /// Hashtag style description, or "none".
    pub hashtag_style: String,

    /// Observed punctuation patterns, most relevant first.
    pub punctuation_patterns: Vec<String>,
    /// Recurring phrases or expressions.
    pub common_phrases: Vec<String>,
    /// Personality traits evident in the writing.
    pub personality_traits: Vec<String>,
    /// Topics the author returns to.
    pub topics_of_interest: Vec<String>,
    /// Distinctive writing quirks.
    pub writing_quirks: Vec<String>,

    /// Words per sentence; 0.0 if no samples.
    pub avg_sentence_length: f64,
    /// Characters per word; 0.0 if no samples.
    pub avg_word_length: f64,
    /// Emoji occurrences per sample.
    pub emoji_frequency: f64,
    /// Hashtag occurrences per sample.
    pub hashtag_frequency: f64,
    /// `!` occurrences per sample.
    pub exclamation_frequency: f64,
    /// `?` occurrences per sample.
    pub question_frequency: f64,
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self {
            tone: "neutral".to_string(),
            voice: "conversational".to_string(),
            vocabulary_level: "moderate".to_string(),
            sentence_style: "varied".to_string(),
            emoji_usage: "rare".to_string(),
            hashtag_style: "none".to_string(),
            punctuation_patterns: Vec::new(),
            common_phrases: Vec::new(),
            personality_traits: Vec::new(),
            topics_of_interest: Vec::new(),
            writing_quirks: Vec::new(),
            avg_sentence_length: 0.0,
            avg_word_length: 0.0,
            emoji_frequency: 0.0,
            hashtag_frequency: 0.0,
            exclamation_frequency: 0.0,
            question_frequency: 0.0,
        }
    }
}

impl StyleProfile {
    /// Overwrite the numeric fields from freshly computed metrics.
    ///
    /// Quantitative fields are authoritative: whatever the LLM returned for
    /// them is discarded.
    pub fn apply_metrics(&mut self, metrics: &QuantitativeMetrics) {
        self.avg_sentence_length = metrics.avg_sentence_length;
        self.avg_word_length = metrics.avg_word_length;
        self.emoji_frequency = metrics.emoji_frequency;
        self.hashtag_frequency = metrics.hashtag_frequency;
        self.exclamation_frequency = metrics.exclamation_frequency;
        self.question_frequency = metrics.question_frequency;
    }
}

/// Typed load/save of the style profile in the training-data directory.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    handler: FileHandler,
}

impl ProfileStore {
    /// Create a store rooted at the training-data directory.
    pub fn new(training_data_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            handler: FileHandler::new(training_data_dir),
        }
    }

    /// Load the persisted profile, if any.
    pub fn load(&self) -> Result<Option<StyleProfile>> {
        self.handler.load(PROFILE_FILENAME)
    }

    /// Persist a profile, replacing any previous one.
    pub fn save(&self, profile: &StyleProfile) -> Result<()> {
        self.handler.save(PROFILE_FILENAME, profile)?;
        log::info!("Saved style profile to {}", PROFILE_FILENAME);
        Ok(())
    }

    /// Whether a profile has been persisted.
    pub fn exists(&self) -> bool {
        self.handler.exists(PROFILE_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> StyleProfile {
        StyleProfile {
            tone: "witty".to_string(),
            voice: "first-person".to_string(),
            vocabulary_level: "advanced".to_string(),
            sentence_style: "short and punchy".to_string(),
            emoji_usage: "moderate".to_string(),
            hashtag_style: "topical".to_string(),
            punctuation_patterns: vec!["em dashes".to_string()],
            common_phrases: vec!["to be fair".to_string()],
            personality_traits: vec!["curious".to_string(), "direct".to_string()],
            topics_of_interest: vec!["rust".to_string()],
            writing_quirks: vec!["lowercase starts".to_string()],
            avg_sentence_length: 8.5,
            avg_word_length: 4.2,
            emoji_frequency: 0.7,
            hashtag_frequency: 0.1,
            exclamation_frequency: 1.3,
            question_frequency: 0.4,
        }
    }

    #[test]
    fn test_profile_json_round_trip() {
        let profile = sample_profile();
        let json = serde_json::to_string(&profile).unwrap();
        let restored: StyleProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, profile);
    }

    #[test]
    fn test_partial_json_fills_neutral_defaults() {
        let profile: StyleProfile =
            serde_json::from_str(r#"{"tone": "sarcastic", "common_phrases": ["lol"]}"#).unwrap();
        assert_eq!(profile.tone, "sarcastic");
        assert_eq!(profile.voice, "conversational");
        assert_eq!(profile.vocabulary_level, "moderate");
        assert_eq!(profile.common_phrases, vec!["lol"]);
        assert!(profile.topics_of_interest.is_empty());
        assert_eq!(profile.avg_sentence_length, 0.0);
    }

    #[test]
    fn test_store_save_then_load_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());

        let profile = sample_profile();
        store.save(&profile).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap().unwrap(), profile);
    }

    #[test]
    fn test_apply_metrics_overwrites_numeric_fields() {
        let mut profile = sample_profile();
        let metrics = QuantitativeMetrics {
            avg_sentence_length: 12.0,
            avg_word_length: 5.0,
            emoji_frequency: 0.0,
            hashtag_frequency: 2.0,
            exclamation_frequency: 0.0,
            question_frequency: 0.0,
        };
        profile.apply_metrics(&metrics);
        assert_eq!(profile.avg_sentence_length, 12.0);
        assert_eq!(profile.hashtag_frequency, 2.0);
        // Qualitative fields untouched.
        assert_eq!(profile.tone, "witty");
    }
}
