//! Quantitative text metrics.
//!
//! Pure functions over raw text samples. These feed the style profile's
//! numeric fields and are always computed deterministically, never
//! LLM-derived.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").unwrap());
static HASHTAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\w+").unwrap());
// Misc symbols & pictographs, emoticons, transport & map symbols.
static EMOJI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\u{1F300}-\u{1F5FF}\u{1F600}-\u{1F64F}\u{1F680}-\u{1F6FF}]").unwrap()
});

/// Quantitative style metrics computed over a batch of samples.
///
/// Frequencies are average per-sample rates (count across all samples
/// divided by sample count), not proportions, so they can exceed 1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantitativeMetrics {
    pub avg_sentence_length: f64,
    pub avg_word_length: f64,
    pub emoji_frequency: f64,
    pub hashtag_frequency: f64,
    pub exclamation_frequency: f64,
    pub question_frequency: f64,
}

/// Average sentence length in words.
///
/// Sentences are split on runs of `.`, `!`, `?`; empty segments are
/// dropped. Returns `0.0` for text with no sentences.
pub fn average_sentence_length(text: &str) -> f64 {
    let sentences: Vec<&str> = SENTENCE_SPLIT
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if sentences.is_empty() {
        return 0.0;
    }

    let total_words: usize = sentences
        .iter()
        .map(|s| s.split_whitespace().count())
        .sum();
    total_words as f64 / sentences.len() as f64
}

/// Average word length in characters. Returns `0.0` for text with no words.
pub fn average_word_length(text: &str) -> f64 {
    let mut word_count = 0usize;
    let mut char_count = 0usize;
    for word in WORD.find_iter(text) {
        word_count += 1;
        char_count += word.as_str().chars().count();
    }

    if word_count == 0 {
        return 0.0;
    }
    char_count as f64 / word_count as f64
}

/// Compute all quantitative metrics for a batch of samples.
///
/// Samples are concatenated with single spaces for the length metrics;
/// frequencies are raw counts divided by the sample count. An empty batch
/// yields all zeros.
pub fn quantitative_analysis(samples: &[String]) -> QuantitativeMetrics {
    if samples.is_empty() {
        return QuantitativeMetrics::default();
    }

    let total_text = samples.join(" ");
    let n = samples.len() as f64;

    QuantitativeMetrics {
        avg_sentence_length: average_sentence_length(&total_text),
        avg_word_length: average_word_length(&total_text),
        emoji_frequency: EMOJI.find_iter(&total_text).count() as f64 / n,
        hashtag_frequency: HASHTAG.find_iter(&total_text).count() as f64 / n,
        exclamation_frequency: total_text.matches('!').count() as f64 / n,
        question_frequency: total_text.matches('?').count() as f64 / n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_sentence_length_empty_text() {
        assert_eq!(average_sentence_length(""), 0.0);
        assert_eq!(average_sentence_length("..."), 0.0);
    }

    #[test]
    fn test_average_sentence_length_counts_words_per_segment() {
        // Two sentences, 3 + 5 words.
        let text = "This is short. This one has five words!";
        assert_eq!(average_sentence_length(text), 4.0);
    }

    #[test]
    fn test_average_sentence_length_consecutive_terminators() {
        let text = "Wait... what?! Really?";
        // Segments: "Wait", "what", "Really" -> 3 words / 3 segments.
        assert_eq!(average_sentence_length(text), 1.0);
    }

    #[test]
    fn test_average_word_length() {
        assert_eq!(average_word_length(""), 0.0);
        // "ab cdef" -> (2 + 4) / 2 = 3.0
        assert_eq!(average_word_length("ab cdef"), 3.0);
    }

    #[test]
    fn test_quantitative_analysis_empty_batch_is_all_zero() {
        let metrics = quantitative_analysis(&[]);
        assert_eq!(metrics, QuantitativeMetrics::default());
    }

    #[test]
    fn test_quantitative_analysis_frequencies_are_per_sample_rates() {
        let samples = vec![
            "Great day! #rust #coding 🚀".to_string(),
            "Why not? 🚀🚀".to_string(),
        ];
        let metrics = quantitative_analysis(&samples);
        assert_eq!(metrics.emoji_frequency, 1.5);
        assert_eq!(metrics.hashtag_frequency, 1.0);
        assert_eq!(metrics.exclamation_frequency, 0.5);
        assert_eq!(metrics.question_frequency, 0.5);
    }

    #[test]
    fn test_quantitative_analysis_non_negative() {
        let samples = vec!["plain text without punctuation".to_string()];
        let metrics = quantitative_analysis(&samples);
        assert!(metrics.avg_sentence_length >= 0.0);
        assert!(metrics.avg_word_length >= 0.0);
        assert!(metrics.emoji_frequency >= 0.0);
        assert!(metrics.hashtag_frequency >= 0.0);
        assert!(metrics.exclamation_frequency >= 0.0);
        assert!(metrics.question_frequency >= 0.0);
    }
}
