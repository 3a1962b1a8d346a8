//! Content generation for tweets and replies.
//!
//! Builds generation prompts from the learned style directive, calls the
//! LLM, and sanitizes the output. LLM failures degrade silently to a
//! fallback pool; callers never see an error from the generate paths.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::Settings;
use crate::llms::base::LlmProvider;
use crate::style::analyzer::StyleAnalyzer;

/// Token cap for single tweet/reply generations.
const GENERATION_MAX_TOKENS: u32 = 100;

/// Sampling temperature for idea brainstorming.
const IDEAS_TEMPERATURE: f64 = 0.9;

/// Token cap for idea brainstorming.
const IDEAS_MAX_TOKENS: u32 = 300;

/// Label prefixes models like to prepend, longest first.
const LABEL_PREFIXES: &[&str] = &[
    "here's the tweet:",
    "here is the tweet:",
    "response:",
    "tweet:",
    "reply:",
];

/// Neutral statements used when tweet generation fails.
const FALLBACK_TWEETS: &[&str] = &[
    "Thinking about innovation and the future of technology.",
    "Excited about what's next!",
    "Just sharing some thoughts today.",
    "Interesting times we're living in.",
    "Always learning, always growing.",
];

/// Short acknowledgements used when reply generation fails.
const FALLBACK_REPLIES: &[&str] = &[
    "Interesting perspective!",
    "Thanks for sharing this!",
    "Great point!",
    "This is thought-provoking.",
    "Appreciate the insights!",
];

/// Generates tweets and replies in the learned writing style.
#[derive(Debug)]
pub struct ContentGenerator {
    llm: Arc<dyn LlmProvider>,
    style: Arc<StyleAnalyzer>,
    settings: Settings,
}

impl ContentGenerator {
    /// Create a generator over the given LLM and style analyzer.
    pub fn new(llm: Arc<dyn LlmProvider>, style: Arc<StyleAnalyzer>, settings: Settings) -> Self {
        Self {
            llm,
            style,
            settings,
        }
    }

    /// Generate a new tweet, optionally about a topic and/or seeded with
    /// context. Never fails: an LLM error yields a fallback statement.
    pub async fn generate_tweet(&self, topic: Option<&str>, context: Option<&str>) -> String {
        let style_prompt = self.style.get_style_prompt();

        let mut parts = vec![
            "Generate a single tweet (max 280 characters) that sounds natural and authentic."
                .to_string(),
            format!("\nWriting style requirements: {}", style_prompt),
        ];

        if let Some(topic) = topic {
            parts.push(format!("\nTopic: {}", topic));
        }
        if let Some(context) = context {
            parts.push(format!("\nContext/Inspiration: {}", context));
        }

        let generation = &self.settings.content_generation;
        if generation.include_hashtags {
            parts.push(format!(
                "\nInclude up to {} relevant hashtags if appropriate.",
                generation.max_hashtags
            ));
        }
        if generation.include_emojis {
            let uses_emoji = self
                .style
                .profile()
                .map(|p| p.emoji_frequency > self.settings.style.emoji_threshold)
                .unwrap_or(false);
            if uses_emoji {
                parts.push("\nInclude emojis where they feel natural.".to_string());
            }
        }

        parts.push(
            "\nIMPORTANT: Return ONLY the tweet text, nothing else. No quotes, no explanations."
                .to_string(),
        );

        let prompt = parts.join("\n");
        match self
            .llm
            .generate(&prompt, None, generation.temperature, GENERATION_MAX_TOKENS)
            .await
        {
            Ok(text) => {
                let tweet = clean_tweet(&text);
                log::info!("Generated tweet: {}...", excerpt(&tweet));
                tweet
            }
            Err(e) => {
                log::error!("Failed to generate tweet: {}", e);
                fallback_tweet()
            }
        }
    }

    /// Generate a reply to an existing tweet. Never fails: an LLM error
    /// yields a fallback acknowledgement.
    pub async fn generate_reply(
        &self,
        original_tweet: &str,
        original_author: Option<&str>,
    ) -> String {
        let style_prompt = self.style.get_style_prompt();

        let mut parts = vec![
            "Generate a thoughtful and engaging reply to the following tweet.".to_string(),
            format!("\nOriginal tweet: {}", original_tweet),
        ];

        if let Some(author) = original_author {
            parts.push(format!("\nReplying to: @{}", author));
        }

        parts.push(format!("\nWriting style requirements: {}", style_prompt));
        parts.push("\nThe reply should:".to_string());
        parts.push("- Be relevant and add value to the conversation".to_string());
        parts.push("- Sound natural and authentic".to_string());
        parts.push("- Be max 280 characters".to_string());
        parts.push("- Not be overly promotional or spammy".to_string());
        parts.push(
            "\nIMPORTANT: Return ONLY the reply text, nothing else. No quotes, no explanations."
                .to_string(),
        );

        let prompt = parts.join("\n");
        let temperature = self.settings.content_generation.temperature;
        match self
            .llm
            .generate(&prompt, None, temperature, GENERATION_MAX_TOKENS)
            .await
        {
            Ok(text) => {
                let reply = clean_tweet(&text);
                log::info!("Generated reply: {}...", excerpt(&reply));
                reply
            }
            Err(e) => {
                log::error!("Failed to generate reply: {}", e);
                fallback_reply()
            }
        }
    }

    /// Brainstorm up to `count` tweet topic ideas, seeded with topics of
    /// interest from the profile when available. Returns an empty list on
    /// failure.
    pub async fn generate_tweet_ideas(&self, count: usize) -> Vec<String> {
        let mut parts = vec![format!(
            "Generate {} interesting and engaging tweet topic ideas.",
            count
        )];

        if let Some(profile) = self.style.profile() {
            if !profile.topics_of_interest.is_empty() {
                let topics: Vec<&str> = profile
                    .topics_of_interest
                    .iter()
                    .take(5)
                    .map(String::as_str)
                    .collect();
                parts.push(format!("\nPreferred topics: {}", topics.join(", ")));
            }
        }

        parts.push("\nProvide diverse topics that would make for engaging tweets.".to_string());
        parts.push("Return as a numbered list, one topic per line.".to_string());

        let prompt = parts.join("\n");
        match self
            .llm
            .generate(&prompt, None, IDEAS_TEMPERATURE, IDEAS_MAX_TOKENS)
            .await
        {
            Ok(response) => {
                let ideas = parse_ideas(&response, count);
                log::info!("Generated {} tweet ideas", ideas.len());
                ideas
            }
            Err(e) => {
                log::error!("Failed to generate tweet ideas: {}", e);
                Vec::new()
            }
        }
    }

    /// Decide whether to reply to a timeline tweet: a stochastic gate on
    /// `reply_probability`, then a keyword filter when one is configured.
    pub fn should_reply_to_tweet(&self, tweet_text: &str) -> bool {
        let roll = rand::thread_rng().gen::<f64>();
        self.should_reply_with_roll(tweet_text, roll)
    }

    /// The reply gate with the random draw injected (`roll` in `[0, 1)`).
    fn should_reply_with_roll(&self, tweet_text: &str, roll: f64) -> bool {
        if roll > self.settings.replies.reply_probability {
            return false;
        }

        let keywords = &self.settings.replies.keywords_to_monitor;
        if keywords.is_empty() {
            return true;
        }

        let lowered = tweet_text.to_lowercase();
        for keyword in keywords {
            if lowered.contains(&keyword.to_lowercase()) {
                log::info!("Tweet matches keyword '{}'", keyword);
                return true;
            }
        }
        false
    }
}

/// Sanitize raw model output into postable tweet text.
///
/// Strips surrounding whitespace, one layer of quotes, and a leading label
/// prefix, then truncates to the 280-character limit.
pub fn clean_tweet(text: &str) -> String {
    let mut text = text.trim();

    // One layer of surrounding quotes.
    if let Some(stripped) = text.strip_prefix(['"', '\'']) {
        text = stripped;
    }
    if let Some(stripped) = text.strip_suffix(['"', '\'']) {
        text = stripped;
    }
    text = text.trim();

    // Leading "Tweet:"-style labels, longest match first, stripped once.
    for prefix in LABEL_PREFIXES {
        let matches = text
            .get(..prefix.len())
            .map(|head| head.eq_ignore_ascii_case(prefix))
            .unwrap_or(false);
        if matches {
            text = text[prefix.len()..].trim();
            break;
        }
    }

    if text.chars().count() > 280 {
        let mut truncated: String = text.chars().take(277).collect();
        truncated.push_str("...");
        return truncated;
    }

    text.to_string()
}

/// Parse a numbered/bulleted ideas response into at most `count` topics.
fn parse_ideas(response: &str, count: usize) -> Vec<String> {
    let mut ideas = Vec::new();
    for line in response.lines() {
        let line = line.trim();
        let is_list_item = line
            .chars()
            .next()
            .map(|c| c.is_ascii_digit() || c == '-' || c == '*')
            .unwrap_or(false);
        if !is_list_item {
            continue;
        }

        let idea = line
            .trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '.' | '-' | '*' | ' '))
            .trim();
        if !idea.is_empty() {
            ideas.push(idea.to_string());
        }
        if ideas.len() == count {
            break;
        }
    }
    ideas
}

fn fallback_tweet() -> String {
    FALLBACK_TWEETS
        .choose(&mut rand::thread_rng())
        .unwrap_or(&FALLBACK_TWEETS[0])
        .to_string()
}

fn fallback_reply() -> String {
    FALLBACK_REPLIES
        .choose(&mut rand::thread_rng())
        .unwrap_or(&FALLBACK_REPLIES[0])
        .to_string()
}

fn excerpt(text: &str) -> String {
    text.chars().take(50).collect()
}
