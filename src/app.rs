//! Application wiring: builds every component from [`Config`] and exposes
//! the command-level flows (train, post, automate, add samples).

use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::generator::ContentGenerator;
use crate::llms::provider_from_config;
use crate::platform::{Platform, PostedTweet, TwitterClient};
use crate::scheduler::PostingScheduler;
use crate::style::{DocumentProcessor, ProfileStore, StyleAnalyzer, StyleProfile};
use crate::utilities::errors::{Result, XposterError};

/// The assembled application.
pub struct XPoster {
    config: Config,
    documents: DocumentProcessor,
    profiles: ProfileStore,
    style: Arc<StyleAnalyzer>,
    generator: Arc<ContentGenerator>,
    platform: Arc<dyn Platform>,
    scheduler: PostingScheduler,
}

impl XPoster {
    /// Build every component from a validated configuration.
    ///
    /// Fails fast on missing credentials, an unsupported provider, or a
    /// platform connection the API rejects.
    pub async fn initialize(config: Config) -> Result<Self> {
        log::info!("Initializing XPoster...");
        config.validate()?;

        let llm = provider_from_config(&config)?;

        let documents = DocumentProcessor::new(&config.writing_samples_path)?;
        let profiles = ProfileStore::new(&config.training_data_path);
        let style = Arc::new(StyleAnalyzer::new(
            Arc::clone(&llm),
            config.settings.style.clone(),
        ));

        let access_token = config
            .twitter_access_token
            .clone()
            .ok_or_else(|| XposterError::configuration("TWITTER_ACCESS_TOKEN is not set"))?;
        let platform: Arc<dyn Platform> = Arc::new(TwitterClient::connect(access_token).await?);

        let generator = Arc::new(ContentGenerator::new(
            llm,
            Arc::clone(&style),
            config.settings.clone(),
        ));
        let scheduler = PostingScheduler::new(
            Arc::clone(&platform),
            Arc::clone(&generator),
            config.settings.clone(),
        );

        log::info!("XPoster initialized successfully");
        Ok(Self {
            config,
            documents,
            profiles,
            style,
            generator,
            platform,
            scheduler,
        })
    }

    /// The loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze the writing samples on disk and persist the resulting
    /// profile. Errors when no samples exist yet.
    pub async fn train_style(&self) -> Result<StyleProfile> {
        log::info!("Loading writing samples...");
        let samples = self.documents.load_samples()?;

        if samples.is_empty() {
            return Err(XposterError::validation(format!(
                "No writing samples found. Add text files to: {}",
                self.config.writing_samples_path.display()
            )));
        }

        log::info!("Training on {} samples...", samples.len());
        let profile = self
            .style
            .analyze_samples(&samples)
            .await
            .ok_or_else(|| XposterError::validation("Style analysis produced no profile"))?;

        self.profiles.save(&profile)?;
        log::info!("Style training completed");
        Ok(profile)
    }

    /// Load a previously trained profile from disk, if one exists.
    pub fn load_style(&self) -> Result<bool> {
        match self.profiles.load()? {
            Some(profile) => {
                self.style.set_profile(profile);
                log::info!("Loaded existing style profile");
                Ok(true)
            }
            None => {
                log::warn!("No saved style profile found");
                Ok(false)
            }
        }
    }

    /// Make sure a profile is in memory: already loaded, loadable from
    /// disk, or freshly trained, in that order.
    pub async fn ensure_style(&self) -> Result<()> {
        if self.style.has_profile() {
            return Ok(());
        }
        log::info!("No style profile loaded, attempting to load or train...");
        if self.load_style()? {
            return Ok(());
        }
        log::info!("No saved profile found, training new one...");
        self.train_style().await?;
        Ok(())
    }

    /// Run the scheduler until Ctrl+C.
    pub async fn start_automation(&mut self) -> Result<()> {
        self.ensure_style().await?;

        log::info!("Starting automation...");
        self.scheduler.start();
        log::info!("Automation started. Press Ctrl+C to stop.");

        tokio::signal::ctrl_c().await?;

        log::info!("Stopping automation...");
        self.scheduler.stop();
        log::info!("Automation stopped");
        Ok(())
    }

    /// Generate and post one tweet immediately.
    ///
    /// Without a topic, brainstorms topic ideas first and takes the top one.
    pub async fn post_now(&self, topic: Option<&str>) -> Result<PostedTweet> {
        self.ensure_style().await?;

        log::info!("Generating and posting tweet...");
        let resolved = match topic {
            Some(topic) => Some(topic.to_string()),
            None => {
                let ideas = self.generator.generate_tweet_ideas(3).await;
                ideas.into_iter().next()
            }
        };

        let posted = self.scheduler.post_now(resolved.as_deref()).await?;
        log::info!("Posted: {}", posted.text);
        Ok(posted)
    }

    /// Copy a writing sample file into the samples directory.
    pub fn add_sample(&self, file_path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(file_path)?;
        let filename = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);

        self.documents.add_sample(&content, filename.as_deref())?;
        log::info!("Added sample: {}", filename.as_deref().unwrap_or("(unnamed)"));
        log::info!("Run the train command to update the style profile");
        Ok(())
    }

    /// Direct access to the platform client (used by integration checks).
    pub fn platform(&self) -> &Arc<dyn Platform> {
        &self.platform
    }
}
