//! Automated posting and reply scheduling.
//!
//! Three background jobs: a post job firing on a jittered interval inside
//! the configured posting window, a midnight reset of the daily counter,
//! and a reply monitor polling mentions and the home timeline. Job-body
//! failures are logged and never escape; a single firing cannot take the
//! scheduler down.

pub mod clock;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveTime;
use parking_lot::Mutex;
use rand::Rng;
use tokio::task::JoinHandle;

use crate::config::Settings;
use crate::generator::ContentGenerator;
use crate::platform::{Platform, PostedTweet};
use crate::utilities::errors::Result;

pub use clock::{Clock, SystemClock};

/// Mentions fetched per reply-monitor firing.
const MENTIONS_PER_CHECK: u32 = 10;

/// Timeline tweets fetched per reply-monitor firing.
const TIMELINE_PER_CHECK: u32 = 20;

/// Topic ideas brainstormed per post firing.
const IDEAS_PER_POST: usize = 3;

/// In-memory job state, process-lifetime only.
///
/// A restart loses the counter and cursor; that only loosens the quota and
/// de-dup heuristics, never the content of what gets posted.
#[derive(Debug, Default)]
pub struct SchedulerState {
    /// Posts made since the last midnight reset.
    pub posts_today: u32,
    /// Newest mention id already processed.
    pub last_mention_id: Option<String>,
}

/// Shared innards of the scheduler, cloned into each background task.
struct SchedulerCore {
    platform: Arc<dyn Platform>,
    generator: Arc<ContentGenerator>,
    settings: Settings,
    clock: Arc<dyn Clock>,
    state: Mutex<SchedulerState>,
}

/// Scheduler for automated posting and replying.
pub struct PostingScheduler {
    core: Arc<SchedulerCore>,
    handles: Vec<JoinHandle<()>>,
}

impl PostingScheduler {
    /// Create a stopped scheduler using wall-clock time.
    pub fn new(
        platform: Arc<dyn Platform>,
        generator: Arc<ContentGenerator>,
        settings: Settings,
    ) -> Self {
        Self::with_clock(platform, generator, settings, Arc::new(SystemClock))
    }

    /// Create a stopped scheduler with an explicit clock.
    pub fn with_clock(
        platform: Arc<dyn Platform>,
        generator: Arc<ContentGenerator>,
        settings: Settings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            core: Arc::new(SchedulerCore {
                platform,
                generator,
                settings,
                clock,
                state: Mutex::new(SchedulerState::default()),
            }),
            handles: Vec::new(),
        }
    }

    /// Start the background jobs. Idempotent only across a `stop`.
    pub fn start(&mut self) {
        if self.core.settings.posting.enabled {
            let core = Arc::clone(&self.core);
            self.handles.push(tokio::spawn(core.run_post_loop()));

            let core = Arc::clone(&self.core);
            self.handles.push(tokio::spawn(core.run_reset_loop()));
        }

        if self.core.settings.replies.enabled {
            let core = Arc::clone(&self.core);
            self.handles.push(tokio::spawn(core.run_monitor_loop()));
        }

        log::info!("Scheduler started");
    }

    /// Stop all background jobs.
    pub fn stop(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        log::info!("Scheduler stopped");
    }

    /// Post immediately, outside the timer cadence.
    ///
    /// Exempt from the posting-hours and daily-quota checks; still counts
    /// against `posts_today` on success.
    pub async fn post_now(&self, topic: Option<&str>) -> Result<PostedTweet> {
        match topic {
            Some(topic) => log::info!("Manual post triggered with topic: {}", topic),
            None => log::info!("Manual post triggered"),
        }

        let text = self.core.generator.generate_tweet(topic, None).await;
        let posted = self.core.platform.post_tweet(&text).await?;
        self.core.state.lock().posts_today += 1;
        log::info!("Manual post successful");
        Ok(posted)
    }

    /// Posts made since the last midnight reset.
    pub fn posts_today(&self) -> u32 {
        self.core.state.lock().posts_today
    }
}

impl Drop for PostingScheduler {
    fn drop(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl SchedulerCore {
    /// Post job: sleep a jittered interval, then attempt one post.
    async fn run_post_loop(self: Arc<Self>) {
        let posting = &self.settings.posting;
        let base = match base_interval_minutes(
            posting.posting_hours.start,
            posting.posting_hours.end,
            posting.max_posts_per_day,
        ) {
            Some(base) => base,
            None => {
                log::warn!("Invalid posting hours configuration");
                return;
            }
        };

        log::info!(
            "Scheduling posts: {}/day, base interval: {} minutes, hours: {}-{}",
            posting.max_posts_per_day,
            base,
            posting.posting_hours.start,
            posting.posting_hours.end
        );

        loop {
            let roll = rand::thread_rng().gen::<f64>();
            let delay = jittered_interval(
                base,
                posting.interval_jitter.min_factor,
                posting.interval_jitter.max_factor,
                roll,
            );
            tokio::time::sleep(delay).await;
            self.post_tweet_job().await;
        }
    }

    /// One post-job firing: window check, quota check, generate, post.
    async fn post_tweet_job(&self) {
        let posting = &self.settings.posting;

        let now = self.clock.time_of_day();
        if !within_posting_hours(now, posting.posting_hours.start, posting.posting_hours.end) {
            log::debug!("Outside posting hours, skipping");
            return;
        }

        {
            let state = self.state.lock();
            if state.posts_today >= posting.max_posts_per_day {
                log::info!("Daily post limit reached, skipping");
                return;
            }
        }

        let ideas = self.generator.generate_tweet_ideas(IDEAS_PER_POST).await;
        let topic = if ideas.is_empty() {
            log::warn!("No tweet ideas generated, posting without a topic");
            None
        } else {
            let index = rand::thread_rng().gen_range(0..ideas.len());
            Some(ideas[index].clone())
        };

        let text = self.generator.generate_tweet(topic.as_deref(), None).await;
        match self.platform.post_tweet(&text).await {
            Ok(_) => {
                let mut state = self.state.lock();
                state.posts_today += 1;
                log::info!(
                    "Posted tweet ({}/{} today)",
                    state.posts_today,
                    posting.max_posts_per_day
                );
            }
            Err(e) => log::error!("Error in post tweet job: {}", e),
        }
    }

    /// Midnight job: reset the daily counter once per local day.
    async fn run_reset_loop(self: Arc<Self>) {
        loop {
            let wait = clock::duration_until_midnight(self.clock.now());
            tokio::time::sleep(wait).await;

            let mut state = self.state.lock();
            log::info!("Resetting daily counter (was {})", state.posts_today);
            state.posts_today = 0;
        }
    }

    /// Reply monitor: poll mentions and the timeline on a fixed interval.
    async fn run_monitor_loop(self: Arc<Self>) {
        let interval =
            Duration::from_secs(self.settings.replies.check_interval_minutes.max(1) * 60);
        log::info!(
            "Scheduling reply monitoring: every {} minutes",
            self.settings.replies.check_interval_minutes
        );

        loop {
            tokio::time::sleep(interval).await;
            self.monitor_and_reply_job().await;
        }
    }

    /// One reply-monitor firing.
    async fn monitor_and_reply_job(&self) {
        self.reply_to_mentions().await;
        self.monitor_timeline().await;
    }

    /// Reply to every mention newer than the cursor. Each mention is
    /// isolated: one failed reply is logged and the rest still go out.
    async fn reply_to_mentions(&self) {
        let since_id = self.state.lock().last_mention_id.clone();

        let mentions = match self
            .platform
            .get_mentions(since_id.as_deref(), MENTIONS_PER_CHECK)
            .await
        {
            Ok(mentions) => mentions,
            Err(e) => {
                log::error!("Error fetching mentions: {}", e);
                return;
            }
        };

        if mentions.is_empty() {
            return;
        }

        // Mentions arrive newest first; advance the cursor to the newest.
        self.state.lock().last_mention_id = Some(mentions[0].id.clone());

        for mention in &mentions {
            let reply = self.generator.generate_reply(&mention.text, None).await;
            match self.platform.reply_to_tweet(&mention.id, &reply).await {
                Ok(_) => log::info!("Replied to mention {}", mention.id),
                Err(e) => log::error!("Error replying to mention {}: {}", mention.id, e),
            }
        }
    }

    /// Reply to eligible timeline tweets, up to the per-firing cap.
    async fn monitor_timeline(&self) {
        let max_replies = self.settings.replies.max_replies_per_check;

        let tweets = match self.platform.get_home_timeline(TIMELINE_PER_CHECK).await {
            Ok(tweets) => tweets,
            Err(e) => {
                log::error!("Error monitoring timeline: {}", e);
                return;
            }
        };

        let mut replies_sent = 0u32;
        for tweet in &tweets {
            if replies_sent >= max_replies {
                break;
            }
            // Never reply to our own tweets.
            if tweet.author_id == self.platform.user_id() {
                continue;
            }
            if !self.generator.should_reply_to_tweet(&tweet.text) {
                continue;
            }

            let reply = self
                .generator
                .generate_reply(&tweet.text, tweet.author_handle.as_deref())
                .await;
            match self.platform.reply_to_tweet(&tweet.id, &reply).await {
                Ok(_) => {
                    replies_sent += 1;
                    log::info!("Replied to tweet {}", tweet.id);
                }
                Err(e) => log::error!("Error replying to tweet {}: {}", tweet.id, e),
            }
        }
    }
}

/// Base minutes between posts: the posting window divided by the daily
/// quota. `None` when the window or quota is degenerate.
pub fn base_interval_minutes(start_hour: u32, end_hour: u32, max_posts_per_day: u32) -> Option<u64> {
    if end_hour <= start_hour || max_posts_per_day == 0 {
        return None;
    }
    let active_minutes = u64::from(end_hour - start_hour) * 60;
    Some(active_minutes / u64::from(max_posts_per_day))
}

/// A jittered firing interval: `base` scaled by a factor drawn between
/// `min_factor` and `max_factor` (`roll` in `[0, 1)` selects the point).
pub fn jittered_interval(
    base_minutes: u64,
    min_factor: f64,
    max_factor: f64,
    roll: f64,
) -> Duration {
    let base = base_minutes as f64;
    let low = base * min_factor;
    let high = base * max_factor;
    let minutes = low + (high - low).max(0.0) * roll;
    Duration::from_secs((minutes * 60.0).round().max(1.0) as u64)
}

/// Whether `now` falls inside the `[start_hour, end_hour)` posting window.
pub fn within_posting_hours(now: NaiveTime, start_hour: u32, end_hour: u32) -> bool {
    let start = match NaiveTime::from_hms_opt(start_hour, 0, 0) {
        Some(start) => start,
        None => return false,
    };
    if end_hour >= 24 {
        return now >= start;
    }
    let end = match NaiveTime::from_hms_opt(end_hour, 0, 0) {
        Some(end) => end,
        None => return false,
    };
    now >= start && now < end
}
