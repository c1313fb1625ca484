//! Configuration module for triggerbot.
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Default port for the liveness endpoint.
const DEFAULT_PORT: u16 = 5000;

/// Default port for the webhook listener.
const DEFAULT_WEBHOOK_PORT: u16 = 8443;

/// Default idle time before an unfinished button setup expires.
const DEFAULT_SETUP_TIMEOUT_SECS: u64 = 600;

/// Bot running mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub bot_mode: BotMode,
    pub webhook_url: Option<String>,
    pub webhook_port: u16,
    pub webhook_secret: Option<String>,

    /// Port the liveness endpoint listens on.
    pub port: u16,

    /// Idle time after which button setup is abandoned.
    /// `None` keeps users in setup mode until they send "done".
    pub setup_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("BOT_TOKEN")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let bot_mode = match lookup("BOT_MODE")
            .unwrap_or_else(|| "polling".to_string())
            .to_lowercase()
            .as_str()
        {
            "polling" => BotMode::Polling,
            "webhook" => BotMode::Webhook,
            other => {
                return Err(ConfigError::Invalid {
                    var: "BOT_MODE",
                    value: other.to_string(),
                });
            }
        };

        let webhook_url = lookup("WEBHOOK_URL").filter(|s| !s.is_empty());

        // Validate webhook URL is set if mode is webhook
        if bot_mode == BotMode::Webhook && webhook_url.is_none() {
            return Err(ConfigError::Missing("WEBHOOK_URL"));
        }

        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let webhook_port = parse_or(&lookup, "WEBHOOK_PORT", DEFAULT_WEBHOOK_PORT)?;

        if bot_mode == BotMode::Webhook && webhook_port == port {
            return Err(ConfigError::PortConflict(port));
        }

        let setup_timeout = match parse_or(&lookup, "SETUP_TIMEOUT_SECS", DEFAULT_SETUP_TIMEOUT_SECS)? {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(Self {
            bot_token,
            bot_mode,
            webhook_url,
            webhook_port,
            webhook_secret: lookup("WEBHOOK_SECRET").filter(|s| !s.is_empty()),
            port,
            setup_timeout,
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}
