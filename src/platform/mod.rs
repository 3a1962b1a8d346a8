//! Platform collaborator: the social-platform API surface.
//!
//! The scheduler and app depend only on the [`Platform`] trait;
//! [`twitter::TwitterClient`] is the production implementation against the
//! X API v2.

pub mod twitter;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utilities::errors::Result;

pub use twitter::TwitterClient;

/// Hard platform limit on post length, in characters.
pub const MAX_TWEET_CHARS: usize = 280;

/// A tweet this account successfully posted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostedTweet {
    /// Platform-assigned tweet id.
    pub id: String,
    /// The text that was actually sent (post-truncation).
    pub text: String,
    /// When the post was made.
    pub created_at: DateTime<Utc>,
}

/// A mention of the automated account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mention {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A tweet from the home timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineTweet {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub author_id: String,
    /// Author handle, when the platform returned it.
    #[serde(default)]
    pub author_handle: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Interface to the social platform.
///
/// Implementations truncate outgoing text to [`MAX_TWEET_CHARS`] before
/// sending; mention listings are ordered newest first.
#[async_trait]
pub trait Platform: Send + Sync {
    /// The authenticated account's user id.
    fn user_id(&self) -> &str;

    /// The authenticated account's handle.
    fn screen_name(&self) -> &str;

    /// Post a new tweet.
    async fn post_tweet(&self, text: &str) -> Result<PostedTweet>;

    /// Reply to an existing tweet.
    async fn reply_to_tweet(&self, tweet_id: &str, text: &str) -> Result<PostedTweet>;

    /// Fetch recent mentions, newest first, optionally only those newer
    /// than `since_id`.
    async fn get_mentions(&self, since_id: Option<&str>, max_results: u32) -> Result<Vec<Mention>>;

    /// Fetch recent tweets from the home timeline.
    async fn get_home_timeline(&self, max_results: u32) -> Result<Vec<TimelineTweet>>;
}

/// Truncate text to the platform limit, keeping the first 277 characters
/// and appending `"..."` when it runs over.
pub fn enforce_tweet_length(text: &str) -> String {
    if text.chars().count() > MAX_TWEET_CHARS {
        log::warn!(
            "Tweet too long ({} chars), truncating...",
            text.chars().count()
        );
        let mut truncated: String = text.chars().take(MAX_TWEET_CHARS - 3).collect();
        truncated.push_str("...");
        truncated
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enforce_tweet_length_short_text_unchanged() {
        assert_eq!(enforce_tweet_length("hello"), "hello");
    }

    #[test]
    fn test_enforce_tweet_length_truncates_to_280() {
        let long = "a".repeat(400);
        let result = enforce_tweet_length(&long);
        assert_eq!(result.chars().count(), 280);
        assert!(result.ends_with("..."));
        assert!(result.starts_with(&"a".repeat(277)));
    }

    #[test]
    fn test_enforce_tweet_length_counts_chars_not_bytes() {
        let long = "é".repeat(300);
        let result = enforce_tweet_length(&long);
        assert_eq!(result.chars().count(), 280);
    }
}
