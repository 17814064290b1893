//! Application configuration loaded from environment variables.

use std::time::Duration;

use crate::errors::{GatewayError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the REST API server
    pub api_port: u16,
    /// Gemini API key; AI screens degrade to fallbacks without it
    pub gemini_api_key: Option<String>,
    /// Base URL of the Generative Language API
    pub gemini_api_url: String,
    /// Model behind the Lumina chat screen
    pub chat_model: String,
    /// Model behind the home-screen charity assistant
    pub bot_model: String,
    /// Model behind the image studio
    pub image_model: String,
    /// Simulated payment settlement delay
    pub settlement_delay_ms: u64,
    /// How often the detail screen's donor ticker rotates
    pub ticker_interval_secs: u64,
    /// Outbound HTTP timeout
    pub request_timeout_secs: u64,
    /// Idle sessions are dropped after this long
    pub session_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_port: 3001,
            gemini_api_key: None,
            gemini_api_url: "https://generativelanguage.googleapis.com".to_string(),
            chat_model: "gemini-3-pro-preview".to_string(),
            bot_model: "gemini-3-flash-preview".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            settlement_delay_ms: 1500,
            ticker_interval_secs: 4,
            request_timeout_secs: 30,
            session_ttl_secs: 1800,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        let text = |key: &str, default: String| lookup(key).unwrap_or(default);

        Ok(Config {
            api_port: parse_or(&lookup, "API_PORT", defaults.api_port)?,
            gemini_api_key: lookup("GEMINI_API_KEY")
                .or_else(|| lookup("API_KEY"))
                .filter(|k| !k.trim().is_empty()),
            gemini_api_url: text("GEMINI_API_URL", defaults.gemini_api_url)
                .trim_end_matches('/')
                .to_string(),
            chat_model: text("CHAT_MODEL", defaults.chat_model),
            bot_model: text("BOT_MODEL", defaults.bot_model),
            image_model: text("IMAGE_MODEL", defaults.image_model),
            settlement_delay_ms: parse_or(&lookup, "SETTLEMENT_DELAY_MS", defaults.settlement_delay_ms)?,
            ticker_interval_secs: parse_or(&lookup, "TICKER_INTERVAL_SECS", defaults.ticker_interval_secs)?,
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            session_ttl_secs: parse_or(&lookup, "SESSION_TTL_SECS", defaults.session_ttl_secs)?,
        })
    }

    pub fn settlement_delay(&self) -> Duration {
        Duration::from_millis(self.settlement_delay_ms)
    }

    pub fn ticker_interval(&self) -> Duration {
        Duration::from_secs(self.ticker_interval_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| GatewayError::Config(format!("Invalid {key}"))),
    }
}
