//! Runtime configuration from the environment

use crate::speech::DEFAULT_DEEPGRAM_ENDPOINT;
use crate::telegram::DEFAULT_API_BASE;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub telegram_token: String,
    pub deepgram_token: String,
    /// Human-readable logs instead of JSON
    pub dev: bool,
    pub scratch_dir: PathBuf,
    pub journal_path: PathBuf,
    pub ffmpeg: String,
    /// JSON lexicon overriding the built-in one
    pub lexicon_path: Option<PathBuf>,
    pub poll_timeout: Duration,
    pub telegram_api_base: String,
    pub deepgram_endpoint: String,
}

impl BotConfig {
    /// Load `.env` (or `.env.dev` when `ENV=dev`) into the process
    /// environment. Variables that are already set win.
    pub fn load_env_file() -> Result<PathBuf, dotenvy::Error> {
        let env_file = if std::env::var("ENV").is_ok_and(|v| v == "dev") {
            ".env.dev"
        } else {
            ".env"
        };
        dotenvy::from_filename(env_file)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let dev = match get("DEV") {
            None => false,
            Some(value) => parse_bool(&value).ok_or(ConfigError::Invalid { name: "DEV", value })?,
        };

        let poll_timeout = match get("MOOD_BOT_POLL_TIMEOUT_SECS") {
            None => Duration::from_secs(60),
            Some(value) => value.parse().map(Duration::from_secs).map_err(|_| ConfigError::Invalid {
                name: "MOOD_BOT_POLL_TIMEOUT_SECS",
                value,
            })?,
        };

        Ok(Self {
            telegram_token: required("TELEGRAM_TOKEN")?,
            deepgram_token: required("DEEPGRAM_TOKEN")?,
            dev,
            scratch_dir: get("MOOD_BOT_SCRATCH_DIR").unwrap_or_else(|| "temp".to_string()).into(),
            journal_path: get("MOOD_BOT_JOURNAL_PATH")
                .unwrap_or_else(|| "logs/bot.log".to_string())
                .into(),
            ffmpeg: get("MOOD_BOT_FFMPEG").unwrap_or_else(|| "ffmpeg".to_string()),
            lexicon_path: get("MOOD_BOT_LEXICON").map(PathBuf::from),
            poll_timeout,
            telegram_api_base: get("TELEGRAM_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            deepgram_endpoint: get("DEEPGRAM_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_DEEPGRAM_ENDPOINT.to_string()),
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
