//! Writing style analysis.
//!
//! Combines one LLM analysis call (qualitative descriptors) with the
//! deterministic metrics from [`crate::style::metrics`] into a
//! [`StyleProfile`], and renders the current profile into a directive
//! string for the content generator. The profile lives behind a lock inside
//! the analyzer so the generator can read it through a shared `Arc`.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use serde_json::Value;

use crate::config::StyleSettings;
use crate::llms::base::LlmProvider;
use crate::style::metrics::{quantitative_analysis, QuantitativeMetrics};
use crate::style::profile::StyleProfile;

/// At most this many samples are combined into one analysis prompt.
const MAX_SAMPLES_PER_ANALYSIS: usize = 10;

/// Combined sample text is cut to this many characters before prompting.
const MAX_PROMPT_CHARS: usize = 8000;

/// Fallback directive when no profile has been learned.
const DEFAULT_STYLE_PROMPT: &str = "Write in a natural, conversational style.";

// Greedy but brace-balanced (one nesting level) JSON object matcher, for
// responses that wrap the JSON in prose.
static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\}").unwrap());

/// Analyzes writing samples into a style profile.
#[derive(Debug)]
pub struct StyleAnalyzer {
    llm: Arc<dyn LlmProvider>,
    settings: StyleSettings,
    profile: RwLock<Option<StyleProfile>>,
}

impl StyleAnalyzer {
    /// Create an analyzer with no profile loaded.
    pub fn new(llm: Arc<dyn LlmProvider>, settings: StyleSettings) -> Self {
        Self {
            llm,
            settings,
            profile: RwLock::new(None),
        }
    }

    /// A clone of the current profile, if one is loaded.
    pub fn profile(&self) -> Option<StyleProfile> {
        self.profile.read().clone()
    }

    /// Whether a profile is currently loaded.
    pub fn has_profile(&self) -> bool {
        self.profile.read().is_some()
    }

    /// Replace the current profile (e.g. with one loaded from disk).
    pub fn set_profile(&self, profile: StyleProfile) {
        *self.profile.write() = Some(profile);
    }

    /// Analyze writing samples and store the resulting profile.
    ///
    /// Returns `None` without calling the LLM when `samples` is empty. An
    /// LLM failure or unparseable response degrades to the default profile;
    /// the quantitative fields are always computed from the samples and
    /// overlaid last, so they never come from the model.
    pub async fn analyze_samples(&self, samples: &[String]) -> Option<StyleProfile> {
        if samples.is_empty() {
            log::warn!("No samples provided for analysis");
            return None;
        }

        log::info!("Analyzing {} writing samples...", samples.len());

        let count = samples.len().min(MAX_SAMPLES_PER_ANALYSIS);
        let combined: String = samples[..count].join("\n\n---\n\n");
        let excerpt: String = combined.chars().take(MAX_PROMPT_CHARS).collect();
        let prompt = build_analysis_prompt(&excerpt);

        let metrics = quantitative_analysis(samples);

        let mut profile = match self.llm.analyze(&prompt).await {
            Ok(response) => match extract_profile(&response) {
                Some(profile) => profile,
                None => {
                    log::error!("Failed to extract style profile from AI response");
                    self.default_profile(&metrics)
                }
            },
            Err(e) => {
                log::error!("Error during style analysis: {}", e);
                self.default_profile(&metrics)
            }
        };

        profile.apply_metrics(&metrics);

        *self.profile.write() = Some(profile.clone());
        log::info!("Style analysis completed successfully");
        Some(profile)
    }

    /// Neutral profile used when the LLM path fails. The emoji and hashtag
    /// categories are still derived from the quantitative frequencies.
    fn default_profile(&self, metrics: &QuantitativeMetrics) -> StyleProfile {
        log::info!("Creating default style profile from quantitative analysis");
        StyleProfile {
            tone: "neutral".to_string(),
            voice: "conversational".to_string(),
            vocabulary_level: "moderate".to_string(),
            sentence_style: "varied".to_string(),
            punctuation_patterns: vec!["standard".to_string()],
            emoji_usage: if metrics.emoji_frequency > self.settings.emoji_threshold {
                "moderate".to_string()
            } else {
                "rare".to_string()
            },
            hashtag_style: if metrics.hashtag_frequency > self.settings.hashtag_threshold {
                "occasional".to_string()
            } else {
                "none".to_string()
            },
            ..StyleProfile::default()
        }
    }

    /// Render the current profile into a single style directive for
    /// generation prompts.
    pub fn get_style_prompt(&self) -> String {
        let guard = self.profile.read();
        let profile = match guard.as_ref() {
            Some(profile) => profile,
            None => return DEFAULT_STYLE_PROMPT.to_string(),
        };

        let mut parts = vec![
            format!("Tone: {}", profile.tone),
            format!("Voice: {}", profile.voice),
            format!("Vocabulary: {}", profile.vocabulary_level),
        ];

        if !profile.personality_traits.is_empty() {
            parts.push(format!(
                "Personality: {}",
                profile.personality_traits.join(", ")
            ));
        }

        if !profile.common_phrases.is_empty() {
            let phrases: Vec<&str> = profile
                .common_phrases
                .iter()
                .take(3)
                .map(String::as_str)
                .collect();
            parts.push(format!("Common phrases: {}", phrases.join(", ")));
        }

        if profile.avg_sentence_length < 10.0 {
            parts.push("Use short, punchy sentences".to_string());
        } else if profile.avg_sentence_length > 20.0 {
            parts.push("Use longer, more detailed sentences".to_string());
        }

        if profile.emoji_frequency > self.settings.emoji_threshold {
            parts.push("Include emojis occasionally".to_string());
        }

        if profile.hashtag_frequency > self.settings.hashtag_threshold {
            parts.push("Use relevant hashtags".to_string());
        }

        format!("{}.", parts.join(". "))
    }
}

/// Build the analysis prompt around the combined sample excerpt.
fn build_analysis_prompt(excerpt: &str) -> String {
    format!(
        r#"Analyze the following writing samples and extract detailed style characteristics. Focus on:

1. Tone and voice (formal, casual, humorous, serious, etc.)
2. Vocabulary level and word choice patterns
3. Sentence structure (short/long sentences, complexity)
4. Punctuation style
5. Use of emojis, if any
6. Use of hashtags and their style
7. Common phrases or expressions
8. Writing rhythm and flow
9. Topic preferences
10. Personality traits evident in writing

Writing samples:
{excerpt}

Provide a detailed JSON analysis with the following structure:
{{
    "tone": "description of overall tone",
    "voice": "description of voice characteristics",
    "vocabulary_level": "simple/moderate/advanced",
    "sentence_style": "description of sentence patterns",
    "punctuation_patterns": ["pattern1", "pattern2"],
    "emoji_usage": "none/rare/moderate/frequent",
    "hashtag_style": "description or none",
    "common_phrases": ["phrase1", "phrase2"],
    "personality_traits": ["trait1", "trait2"],
    "topics_of_interest": ["topic1", "topic2"],
    "writing_quirks": ["quirk1", "quirk2"]
}}"#
    )
}

/// Pull a JSON object out of an LLM response that may wrap it in prose.
///
/// Tries a brace-balanced match first, then the whole response.
fn extract_json(text: &str) -> Option<Value> {
    if let Some(m) = JSON_OBJECT.find(text) {
        if let Ok(value) = serde_json::from_str::<Value>(m.as_str()) {
            return Some(value);
        }
    }

    match serde_json::from_str::<Value>(text) {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Could not extract JSON from AI response");
            None
        }
    }
}

/// Parse an analysis response into a profile, defaulting omitted fields.
fn extract_profile(response: &str) -> Option<StyleProfile> {
    let value = extract_json(response)?;
    serde_json::from_value(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::utilities::errors::{Result, XposterError};

    /// Scripted LLM that returns a fixed response and counts calls.
    #[derive(Debug)]
    struct ScriptedLlm {
        response: Option<String>,
        calls: AtomicUsize,
    }

    impl ScriptedLlm {
        fn returning(response: &str) -> Self {
            Self {
                response: Some(response.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                response: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        fn model(&self) -> &str {
            "scripted"
        }

        fn provider(&self) -> &str {
            "test"
        }

        async fn generate(
            &self,
            _prompt: &str,
            _system_prompt: Option<&str>,
            _temperature: f64,
            _max_tokens: u32,
        ) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Some(response) => Ok(response.clone()),
                None => Err(XposterError::provider("test", "scripted failure")),
            }
        }
    }

    fn analyzer_with(llm: ScriptedLlm) -> (Arc<ScriptedLlm>, StyleAnalyzer) {
        let llm = Arc::new(llm);
        let analyzer = StyleAnalyzer::new(llm.clone(), StyleSettings::default());
        (llm, analyzer)
    }

    #[test]
    fn test_extract_json_embedded_in_prose() {
        let text = r#"Here is my analysis: {"tone": "dry", "voice": "terse"} hope it helps"#;
        let value = extract_json(text).unwrap();
        assert_eq!(value["tone"], "dry");
    }

    #[test]
    fn test_extract_json_whole_response() {
        let value = extract_json(r#"{"tone": "warm"}"#).unwrap();
        assert_eq!(value["tone"], "warm");
    }

    #[test]
    fn test_extract_json_garbage_is_none() {
        assert!(extract_json("no json here at all").is_none());
    }

    #[tokio::test]
    async fn test_analyze_empty_samples_skips_llm() {
        let (llm, analyzer) = analyzer_with(ScriptedLlm::returning("{}"));
        let result = analyzer.analyze_samples(&[]).await;
        assert!(result.is_none());
        assert!(!analyzer.has_profile());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_overlays_quantitative_metrics() {
        let response = r#"{"tone": "playful", "avg_sentence_length": 999.0}"#;
        let (_, analyzer) = analyzer_with(ScriptedLlm::returning(response));

        let samples = vec!["Short one. Also short!".to_string()];
        let profile = analyzer.analyze_samples(&samples).await.unwrap();

        assert_eq!(profile.tone, "playful");
        // The model's claimed value is discarded for the computed one.
        assert!(profile.avg_sentence_length < 10.0);
        assert!(analyzer.has_profile());
    }

    #[tokio::test]
    async fn test_analyze_llm_failure_yields_default_profile() {
        let (_, analyzer) = analyzer_with(ScriptedLlm::failing());
        let samples = vec!["Great stuff! 🚀 #rust".to_string()];
        let profile = analyzer.analyze_samples(&samples).await.unwrap();

        assert_eq!(profile.tone, "neutral");
        assert_eq!(profile.punctuation_patterns, vec!["standard"]);
        // 1 emoji / 1 sample = 1.0 > 0.5, 1 hashtag / 1 sample > 0.2.
        assert_eq!(profile.emoji_usage, "moderate");
        assert_eq!(profile.hashtag_style, "occasional");
        assert_eq!(profile.emoji_frequency, 1.0);
    }

    #[tokio::test]
    async fn test_analyze_unparseable_response_yields_default_profile() {
        let (_, analyzer) = analyzer_with(ScriptedLlm::returning("I cannot produce JSON"));
        let samples = vec!["plain text".to_string()];
        let profile = analyzer.analyze_samples(&samples).await.unwrap();
        assert_eq!(profile.tone, "neutral");
        assert_eq!(profile.emoji_usage, "rare");
        assert_eq!(profile.hashtag_style, "none");
    }

    #[test]
    fn test_style_prompt_without_profile() {
        let (_, analyzer) = analyzer_with(ScriptedLlm::failing());
        assert_eq!(
            analyzer.get_style_prompt(),
            "Write in a natural, conversational style."
        );
    }

    #[test]
    fn test_style_prompt_clause_order_and_guidance() {
        let (_, analyzer) = analyzer_with(ScriptedLlm::failing());
        analyzer.set_profile(StyleProfile {
            tone: "dry".to_string(),
            personality_traits: vec!["curious".to_string()],
            common_phrases: vec![
                "tbh".to_string(),
                "imo".to_string(),
                "fwiw".to_string(),
                "extra".to_string(),
            ],
            avg_sentence_length: 7.0,
            emoji_frequency: 0.9,
            hashtag_frequency: 0.5,
            ..StyleProfile::default()
        });

        let prompt = analyzer.get_style_prompt();
        assert_eq!(
            prompt,
            "Tone: dry. Voice: conversational. Vocabulary: moderate. \
             Personality: curious. Common phrases: tbh, imo, fwiw. \
             Use short, punchy sentences. Include emojis occasionally. \
             Use relevant hashtags."
        );
    }

    #[test]
    fn test_style_prompt_midrange_sentence_length_has_no_guidance() {
        let (_, analyzer) = analyzer_with(ScriptedLlm::failing());
        analyzer.set_profile(StyleProfile {
            avg_sentence_length: 15.0,
            ..StyleProfile::default()
        });
        let prompt = analyzer.get_style_prompt();
        assert!(!prompt.contains("punchy"));
        assert!(!prompt.contains("detailed"));
    }
}
