//! Webhook update delivery.
//!
//! Telegram pushes updates to `WEBHOOK_URL`; teloxide's axum listener
//! receives them on `WEBHOOK_PORT` and removes the webhook again when the
//! dispatcher stops. `PORT` stays with the liveness endpoint.

use std::net::SocketAddr;

use anyhow::Context;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::update_listeners::webhooks::{self, Options};
use tracing::info;
use url::Url;

use super::dispatcher::{BotDispatcher, ThrottledBot};
use crate::config::Config;

/// Register the webhook and feed pushed updates to the dispatcher.
///
/// Returns once the dispatcher shuts down (Ctrl+C).
pub async fn start_webhook(
    config: &Config,
    mut dispatcher: BotDispatcher,
    bot: ThrottledBot,
) -> anyhow::Result<()> {
    let webhook_url = config
        .webhook_url
        .as_deref()
        .context("WEBHOOK_URL must be set when using webhook mode")?;

    let url = Url::parse(webhook_url).context("Invalid WEBHOOK_URL format")?;

    let address = SocketAddr::from(([0, 0, 0, 0], config.webhook_port));

    let mut options = Options::new(address, url.clone());

    if let Some(ref secret) = config.webhook_secret {
        options = options.secret_token(secret.clone());
        info!("Webhook secret token configured");
    }

    info!(%url, %address, "Registering webhook");

    // setWebhook only needs the plain Bot, not the Throttle wrapper.
    let listener = webhooks::axum(bot.inner().clone(), options)
        .await
        .context("Failed to setup webhook")?;

    info!("Webhook registered, waiting for updates...");

    dispatcher
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("Webhook listener error"),
        )
        .await;

    Ok(())
}
