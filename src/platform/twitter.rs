//! X API v2 client.
//!
//! Authenticates with a user-context bearer token; `connect` verifies the
//! credentials up front so a bad token fails at startup rather than on the
//! first scheduled firing.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::platform::{enforce_tweet_length, Mention, Platform, PostedTweet, TimelineTweet};
use crate::utilities::errors::{Result, XposterError};

/// X API v2 client.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
    user_id: String,
    screen_name: String,
}

impl TwitterClient {
    /// Connect and verify credentials via `GET /2/users/me`.
    pub async fn connect(access_token: impl Into<String>) -> Result<Self> {
        Self::connect_to("https://api.twitter.com", access_token).await
    }

    /// Connect against a custom base URL (used by integration tests).
    pub async fn connect_to(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        let mut client = Self {
            client: reqwest::Client::new(),
            access_token: access_token.into(),
            base_url: base_url.into(),
            user_id: String::new(),
            screen_name: String::new(),
        };

        let me = client.get_json("/2/users/me", &[]).await?;
        let data = me
            .get("data")
            .ok_or_else(|| XposterError::platform("no data in /2/users/me response"))?;
        client.user_id = json_str(data, "id")
            .ok_or_else(|| XposterError::platform("no user id in /2/users/me response"))?;
        client.screen_name = json_str(data, "username").unwrap_or_default();

        log::info!("Authenticated as @{}", client.screen_name);
        Ok(client)
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| XposterError::platform(e.to_string()))?;
        Self::decode(response).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| XposterError::platform(e.to_string()))?;
        Self::decode(response).await
    }

    async fn decode(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| XposterError::platform(e.to_string()))?;
        if !status.is_success() {
            return Err(XposterError::platform(format!(
                "X API error ({}): {}",
                status, text
            )));
        }
        serde_json::from_str(&text)
            .map_err(|e| XposterError::parse(format!("invalid X API response: {}", e)))
    }

    fn parse_created_tweet(&self, response: &Value, text: String) -> Result<PostedTweet> {
        let id = response
            .get("data")
            .and_then(|d| json_str(d, "id"))
            .ok_or_else(|| XposterError::platform("no tweet id in create response"))?;
        Ok(PostedTweet {
            id,
            text,
            created_at: Utc::now(),
        })
    }
}

#[async_trait]
impl Platform for TwitterClient {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn screen_name(&self) -> &str {
        &self.screen_name
    }

    async fn post_tweet(&self, text: &str) -> Result<PostedTweet> {
        let text = enforce_tweet_length(text);
        let body = serde_json::json!({ "text": text });
        let response = self.post_json("/2/tweets", &body).await?;
        let posted = self.parse_created_tweet(&response, text)?;
        log::info!("Posted tweet: {}...", truncate_for_log(&posted.text));
        Ok(posted)
    }

    async fn reply_to_tweet(&self, tweet_id: &str, text: &str) -> Result<PostedTweet> {
        let text = enforce_tweet_length(text);
        let body = serde_json::json!({
            "text": text,
            "reply": { "in_reply_to_tweet_id": tweet_id },
        });
        let response = self.post_json("/2/tweets", &body).await?;
        let posted = self.parse_created_tweet(&response, text)?;
        log::info!(
            "Posted reply to {}: {}...",
            tweet_id,
            truncate_for_log(&posted.text)
        );
        Ok(posted)
    }

    async fn get_mentions(&self, since_id: Option<&str>, max_results: u32) -> Result<Vec<Mention>> {
        let path = format!("/2/users/{}/mentions", self.user_id);
        // The mentions endpoint accepts 5..=100 results per page.
        let mut query = vec![
            ("max_results", max_results.clamp(5, 100).to_string()),
            ("tweet.fields", "created_at,author_id".to_string()),
        ];
        if let Some(since) = since_id {
            query.push(("since_id", since.to_string()));
        }

        let response = self.get_json(&path, &query).await?;
        let mentions: Vec<Mention> = match response.get("data").and_then(Value::as_array) {
            Some(items) => items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
            None => Vec::new(),
        };
        log::info!("Retrieved {} mentions", mentions.len());
        Ok(mentions)
    }

    async fn get_home_timeline(&self, max_results: u32) -> Result<Vec<TimelineTweet>> {
        let path = format!("/2/users/{}/timelines/reverse_chronological", self.user_id);
        let query = vec![
            ("max_results", max_results.clamp(1, 100).to_string()),
            ("tweet.fields", "created_at,author_id".to_string()),
            ("expansions", "author_id".to_string()),
            ("user.fields", "username".to_string()),
        ];

        let response = self.get_json(&path, &query).await?;

        // Map author_id -> username from the expansion payload.
        let mut handles = std::collections::HashMap::new();
        if let Some(users) = response
            .pointer("/includes/users")
            .and_then(Value::as_array)
        {
            for user in users {
                if let (Some(id), Some(name)) = (json_str(user, "id"), json_str(user, "username")) {
                    handles.insert(id, name);
                }
            }
        }

        let tweets: Vec<TimelineTweet> = match response.get("data").and_then(Value::as_array) {
            Some(items) => items
                .iter()
                .filter_map(|item| {
                    let mut tweet: TimelineTweet = serde_json::from_value(item.clone()).ok()?;
                    tweet.author_handle = handles.get(&tweet.author_id).cloned();
                    Some(tweet)
                })
                .collect(),
            None => Vec::new(),
        };
        log::info!("Retrieved {} tweets from home timeline", tweets.len());
        Ok(tweets)
    }
}

fn json_str(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(String::from)
}

fn truncate_for_log(text: &str) -> String {
    text.chars().take(50).collect()
}
