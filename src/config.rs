//! Application configuration.
//!
//! Values are resolved with priority config.toml > environment (.env) > default.
//! Constants that are not meant to be tuned per deployment live at the bottom.

use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::flashcard::PracticePolicy;

// ==================== File Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerSection>,
    pub database: Option<DatabaseSection>,
    pub media: Option<MediaSection>,
    pub deck_source: Option<DeckSourceSection>,
    pub practice: Option<PracticeSection>,
    pub session: Option<SessionSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerSection {
    pub addr: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DatabaseSection {
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MediaSection {
    pub dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeckSourceSection {
    pub api_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PracticeSection {
    pub completion_delay_ms: Option<u64>,
    pub practice_on_wrap: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionSection {
    pub expiry_hours: Option<i64>,
}

// ==================== Resolved Settings ====================

/// Where decks come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckSourceSettings {
    /// The local SQLite database
    Local,
    /// A REST backend
    Remote { base_url: String, timeout: Duration },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_addr: String,
    pub server_port: u16,
    pub database_path: PathBuf,
    pub media_dir: PathBuf,
    pub deck_source: DeckSourceSettings,
    pub completion_delay: Duration,
    pub practice_policy: PracticePolicy,
    pub session_expiry_hours: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            media_dir: PathBuf::from(DEFAULT_MEDIA_DIR),
            deck_source: DeckSourceSettings::Local,
            completion_delay: Duration::from_millis(DEFAULT_COMPLETION_DELAY_MS),
            practice_policy: PracticePolicy::default(),
            session_expiry_hours: DEFAULT_SESSION_EXPIRY_HOURS,
        }
    }
}

impl Settings {
    /// Load from config.toml (or `$CONFIG_PATH`), the process environment and .env
    pub fn load() -> Self {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let file = match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<FileConfig>(&contents) {
                Ok(config) => {
                    tracing::info!("Using configuration from {}", path);
                    config
                }
                Err(e) => {
                    tracing::warn!("Ignoring unparsable {}: {}", path, e);
                    FileConfig::default()
                }
            },
            Err(_) => FileConfig::default(),
        };

        let settings = Self::resolve(file, |key| std::env::var(key).ok());
        tracing::info!("Using database: {}", settings.database_path.display());
        settings
    }

    /// Merge file values, environment lookups and defaults.
    pub fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let server = file.server.unwrap_or_default();
        let database = file.database.unwrap_or_default();
        let media = file.media.unwrap_or_default();
        let deck_source = file.deck_source.unwrap_or_default();
        let practice = file.practice.unwrap_or_default();
        let session = file.session.unwrap_or_default();

        let server_addr = server
            .addr
            .or_else(|| env("SERVER_ADDR"))
            .unwrap_or(defaults.server_addr);
        let server_port = server
            .port
            .or_else(|| parse_env(&env, "PORT").and_then(|p: u64| u16::try_from(p).ok()))
            .unwrap_or(defaults.server_port);
        let database_path = database
            .path
            .or_else(|| env("DATABASE_PATH"))
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);
        let media_dir = media
            .dir
            .or_else(|| env("MEDIA_DIR"))
            .map(PathBuf::from)
            .unwrap_or(defaults.media_dir);

        let timeout_secs = deck_source
            .timeout_secs
            .or_else(|| parse_env(&env, "DECK_API_TIMEOUT_SECS"))
            .unwrap_or(DEFAULT_DECK_API_TIMEOUT_SECS);
        let deck_source = match deck_source
            .api_base_url
            .or_else(|| env("DECK_API_URL"))
            .filter(|url| !url.trim().is_empty())
        {
            Some(url) => DeckSourceSettings::Remote {
                base_url: url.trim_end_matches('/').to_string(),
                timeout: Duration::from_secs(timeout_secs),
            },
            None => DeckSourceSettings::Local,
        };

        let completion_delay = practice
            .completion_delay_ms
            .or_else(|| parse_env(&env, "PRACTICE_COMPLETION_DELAY_MS"))
            .map(Duration::from_millis)
            .unwrap_or(defaults.completion_delay);
        let practice_on_wrap = practice
            .practice_on_wrap
            .or_else(|| env("PRACTICE_ON_WRAP").map(|v| parse_flag(&v)))
            .unwrap_or(false);

        let session_expiry_hours = session
            .expiry_hours
            .or_else(|| parse_env(&env, "SESSION_EXPIRY_HOURS"))
            .filter(|h| *h > 0)
            .unwrap_or(defaults.session_expiry_hours);

        Self {
            server_addr,
            server_port,
            database_path,
            media_dir,
            deck_source,
            completion_delay,
            practice_policy: PracticePolicy { practice_on_wrap },
            session_expiry_hours,
        }
    }

    /// Get the full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_addr, self.server_port)
    }
}

fn parse_env<T: FromStr>(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    env(key).and_then(|v| v.trim().parse().ok())
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

// ==================== Defaults ====================

pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0";

pub const DEFAULT_SERVER_PORT: u16 = 3000;

pub const DEFAULT_DATABASE_PATH: &str = "data/signdeck.db";

pub const DEFAULT_MEDIA_DIR: &str = "data/media";

pub const DEFAULT_DECK_API_TIMEOUT_SECS: u64 = 10;

/// Time the "passed" indicator stays up before learning resumes
pub const DEFAULT_COMPLETION_DELAY_MS: u64 = 1500;

pub const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 1;

// ==================== Session Store ====================

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each session access
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

/// Cookie carrying the flashcard session id
pub const SESSION_COOKIE: &str = "flashcard_session";

// ==================== Practice ====================

/// Number of distractor choices in a practice question
pub const DISTRACTOR_COUNT: usize = 3;

/// Practice interval is deck length divided by this
pub const PRACTICE_INTERVAL_DIVISOR: usize = 3;
