//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

use super::source::Source;
use super::strategy::Strategy;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Check cadence settings
    #[serde(default)]
    pub poller: PollerConfig,

    /// HTTP and fallback behavior settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Notification pacing and caps
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Error suppression settings
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Telegram channel settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Regional sources, in preference order
    #[serde(default = "defaults::sources")]
    pub sources: Vec<Source>,

    /// Strategy catalog override; empty means the built-in catalog
    #[serde(default)]
    pub strategies: Vec<Strategy>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply environment overrides for channel credentials.
    ///
    /// Credentials belong in the environment, not the config file; file
    /// values only serve local testing.
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("LOTWATCH_BOT_TOKEN") {
            self.telegram.bot_token = token;
        }
        if let Ok(chat_id) = std::env::var("LOTWATCH_CHAT_ID") {
            self.telegram.chat_id = chat_id;
        }
    }

    /// Validate configuration values for basic sanity.
    ///
    /// Missing channel credentials are fatal: a tracker that cannot
    /// deliver anything has no reason to run.
    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(AppError::validation(
                "telegram.bot_token is empty (set LOTWATCH_BOT_TOKEN)",
            ));
        }
        if self.telegram.chat_id.trim().is_empty() {
            return Err(AppError::validation(
                "telegram.chat_id is empty (set LOTWATCH_CHAT_ID)",
            ));
        }
        if self.poller.period_secs == 0 {
            return Err(AppError::validation("poller.period_secs must be > 0"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::validation("fetch.timeout_secs must be > 0"));
        }
        if self.fetch.source_attempts == 0 {
            return Err(AppError::validation("fetch.source_attempts must be > 0"));
        }
        if self.fetch.attempt_delay_min_ms > self.fetch.attempt_delay_max_ms {
            return Err(AppError::validation(
                "fetch.attempt_delay_min_ms must be <= fetch.attempt_delay_max_ms",
            ));
        }
        if self.tracker.suppress_minutes == 0 {
            return Err(AppError::validation("tracker.suppress_minutes must be > 0"));
        }
        if self.sources.is_empty() {
            return Err(AppError::validation("No sources defined"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poller: PollerConfig::default(),
            fetch: FetchConfig::default(),
            notify: NotifyConfig::default(),
            tracker: TrackerConfig::default(),
            telegram: TelegramConfig::default(),
            logging: LoggingConfig::default(),
            sources: defaults::sources(),
            strategies: Vec::new(),
        }
    }
}

/// Check cadence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Seconds between checks
    #[serde(default = "defaults::period_secs")]
    pub period_secs: u64,

    /// Extra random delay added per check, in seconds, so the cadence
    /// itself is not a fixed fingerprint
    #[serde(default = "defaults::jitter_secs")]
    pub jitter_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            period_secs: defaults::period_secs(),
            jitter_secs: defaults::jitter_secs(),
        }
    }
}

/// HTTP client and fallback behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "defaults::timeout_secs")]
    pub timeout_secs: u64,

    /// Result page size requested from the endpoint
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,

    /// Minimum randomized delay between strategy attempts, milliseconds
    #[serde(default = "defaults::attempt_delay_min")]
    pub attempt_delay_min_ms: u64,

    /// Maximum randomized delay between strategy attempts, milliseconds
    #[serde(default = "defaults::attempt_delay_max")]
    pub attempt_delay_max_ms: u64,

    /// Full strategy sweeps per source before demoting to the next one
    #[serde(default = "defaults::source_attempts")]
    pub source_attempts: u32,

    /// Backoff unit between sweeps; sweep n waits n × unit, milliseconds
    #[serde(default = "defaults::backoff_unit_ms")]
    pub backoff_unit_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::timeout_secs(),
            page_size: defaults::page_size(),
            attempt_delay_min_ms: defaults::attempt_delay_min(),
            attempt_delay_max_ms: defaults::attempt_delay_max(),
            source_attempts: defaults::source_attempts(),
            backoff_unit_ms: defaults::backoff_unit_ms(),
        }
    }
}

/// Notification pacing and per-cycle caps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Minimum delay between consecutive messages, milliseconds
    #[serde(default = "defaults::pace_ms")]
    pub pace_ms: u64,

    /// Delay between per-vehicle detail messages, milliseconds
    #[serde(default = "defaults::detail_pace_ms")]
    pub detail_pace_ms: u64,

    /// Per-vehicle detail messages sent per cycle; the rest collapse
    /// into one "N more" summary
    #[serde(default = "defaults::max_details")]
    pub max_details: usize,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            pace_ms: defaults::pace_ms(),
            detail_pace_ms: defaults::detail_pace_ms(),
            max_details: defaults::max_details(),
        }
    }
}

/// Error suppression settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Minimum minutes between repeated "still failing" notifications
    #[serde(default = "defaults::suppress_minutes")]
    pub suppress_minutes: i64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            suppress_minutes: defaults::suppress_minutes(),
        }
    }
}

/// Telegram channel settings. Credentials normally come from the
/// environment via [`Config::apply_env`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,

    #[serde(default)]
    pub chat_id: String,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter: error, warn, info, debug, trace
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use crate::models::source::Source;

    // Poller defaults
    pub fn period_secs() -> u64 {
        300
    }
    pub fn jitter_secs() -> u64 {
        60
    }

    // Fetch defaults
    pub fn timeout_secs() -> u64 {
        15
    }
    pub fn page_size() -> usize {
        24
    }
    pub fn attempt_delay_min() -> u64 {
        1_000
    }
    pub fn attempt_delay_max() -> u64 {
        4_000
    }
    pub fn source_attempts() -> u32 {
        2
    }
    pub fn backoff_unit_ms() -> u64 {
        10_000
    }

    // Notify defaults
    pub fn pace_ms() -> u64 {
        500
    }
    pub fn detail_pace_ms() -> u64 {
        1_500
    }
    pub fn max_details() -> usize {
        5
    }

    // Tracker defaults
    pub fn suppress_minutes() -> i64 {
        30
    }

    pub fn log_level() -> String {
        "info".to_string()
    }

    // Source defaults: home market first, then neighboring markets whose
    // listings are comparable even though prices switch currency.
    pub fn sources() -> Vec<Source> {
        vec![
            Source {
                market: "TR".to_string(),
                language: "tr".to_string(),
                super_region: "europe".to_string(),
                base_url: "https://www.tesla.com".to_string(),
                model: "my".to_string(),
            },
            Source {
                market: "DE".to_string(),
                language: "de".to_string(),
                super_region: "europe".to_string(),
                base_url: "https://www.tesla.com".to_string(),
                model: "my".to_string(),
            },
            Source {
                market: "NL".to_string(),
                language: "nl".to_string(),
                super_region: "europe".to_string(),
                base_url: "https://www.tesla.com".to_string(),
                model: "my".to_string(),
            },
        ]
    }
}
