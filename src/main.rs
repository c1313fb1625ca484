//! triggerbot - Keyword auto-responder for Telegram
//!
//! Users reply to a message with `/filterr <trigger>` to register it as the
//! automatic reply for `<trigger>`, optionally followed by link buttons.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `store` - In-memory filters and button setup state
//! - `bot` - Dispatcher, runtime (with Throttle for API rate limiting), liveness endpoint
//! - `plugins` - Command handlers
//! - `events` - Text message handlers (button setup, trigger matching)

mod bot;
mod config;
mod error;
mod events;
mod plugins;
mod store;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bot::dispatcher::AppState;
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("triggerbot=info,teloxide=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting triggerbot...");

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");
    info!("Bot mode: {:?}", config.bot_mode);
    match config.setup_timeout {
        Some(timeout) => info!("Button setup expires after {:?} of inactivity", timeout),
        None => info!("Button setup never expires"),
    }

    // Liveness endpoint runs on its own task for the whole process lifetime
    tokio::spawn(bot::liveness::serve(config.port));

    // Initialize bot with Throttle for automatic rate limiting
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());
    info!("Bot initialized with rate limiting (Throttle)");

    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    let state = AppState::new(config.setup_timeout);
    let dispatcher = bot::build_dispatcher(bot.clone(), state);

    bot::run(&config, dispatcher, bot).await
}
