use anyhow::{Context, Result};
use std::env;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shora_bot::bot::{self, BotState};
use shora_bot::catalog::Catalog;
use shora_bot::config::{load_token, AppPaths, BotConfig, TOKEN_ENV_VAR};
use shora_bot::event_log::EventLog;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("shora_bot=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(false)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging();
    info!("Starting Shora Telegram Bot");

    let paths = AppPaths::from_env();

    let token = load_token(env::var(TOKEN_ENV_VAR).ok(), &paths.token_file)
        .context("Failed to load bot token")?;
    let config = BotConfig::load(&paths.config_file).context("Failed to load config.json")?;
    let catalog = Catalog::load(&paths).context("Failed to load resource catalog")?;

    let state = Arc::new(BotState::new(config, catalog, EventLog::stderr()));

    // Initialize the bot
    let bot = Bot::new(token);

    bot::run(bot, state).await
}
