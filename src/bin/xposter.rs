//! xposter binary.
//!
//! Automated X/Twitter posting with a personalized, LLM-learned writing
//! style.
//!
//! # Environment Variables
//!
//! - `TWITTER_ACCESS_TOKEN` (and the other `TWITTER_*` credentials)
//! - `AI_PROVIDER` — "openai" (default) or "anthropic"
//! - `OPENAI_API_KEY` / `ANTHROPIC_API_KEY`
//! - `LOG_LEVEL` — log filter (default: "info")
//!
//! # Usage
//!
//! ```bash
//! xposter init
//! xposter train
//! xposter post --topic "rust async"
//! xposter start
//! ```

use std::path::Path;

use anyhow::Context;

use xposter::cli::{parse_args, usage, CliCommand};
use xposter::{Config, XPoster};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        log::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // .env loading is owned by Config::load; the logger starts from the
    // process environment.
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n\n{}", e, usage());
            std::process::exit(2);
        }
    };

    let config = Config::load(std::env::current_dir()?).context("failed to load configuration")?;

    match args.command {
        CliCommand::Init => {
            let app = XPoster::initialize(config).await?;
            log::info!("Initialization successful");
            log::info!(
                "Add writing samples to: {}",
                app.config().writing_samples_path.display()
            );
        }
        CliCommand::Train => {
            let app = XPoster::initialize(config).await?;
            app.train_style().await.context("style training failed")?;
            log::info!("Style training successful");
        }
        CliCommand::Start => {
            let mut app = XPoster::initialize(config).await?;
            app.start_automation().await?;
        }
        CliCommand::Post => {
            let app = XPoster::initialize(config).await?;
            app.post_now(args.topic.as_deref())
                .await
                .context("failed to post tweet")?;
        }
        CliCommand::AddSample => {
            let app = XPoster::initialize(config).await?;
            let file = args.file.as_deref().unwrap_or_default();
            app.add_sample(Path::new(file))
                .with_context(|| format!("failed to add sample from {}", file))?;
        }
    }

    Ok(())
}
