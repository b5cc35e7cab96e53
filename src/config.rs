//! Configuration types.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Placeholder sample-message endpoint. It never resolves, so the fixed
/// fallback list is what the service actually serves.
pub const DEFAULT_SAMPLES_URL: &str =
    "https://gist.githubusercontent.com/your-username/your-gist-id/raw/sms_spam_10.json";

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server binds on.
    pub port: u16,
    /// Path to the versioned JSON model artifact.
    pub model_path: PathBuf,
    /// Where the sample message list is fetched from.
    pub samples_url: String,
    /// Timeout for the sample message fetch.
    pub fetch_timeout: Duration,
    /// Flat `SPAM:` / `NOT_SPAM:` log, rewritten after every classification.
    pub classification_log: PathBuf,
    /// Directory for daily rolling diagnostic logs (stderr only when unset).
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            model_path: PathBuf::from("./models/demo.json"),
            samples_url: DEFAULT_SAMPLES_URL.to_string(),
            fetch_timeout: Duration::from_secs(5),
            classification_log: PathBuf::from("./spam_log.txt"),
            log_dir: None,
        }
    }
}

impl Config {
    /// Build configuration from `SPAM_SIFT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = parse_var(&lookup, "SPAM_SIFT_PORT")?.unwrap_or(defaults.port);

        let model_path = lookup("SPAM_SIFT_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.model_path);

        let samples_url = lookup("SPAM_SIFT_SAMPLES_URL").unwrap_or(defaults.samples_url);

        let fetch_timeout = parse_var::<u64, _>(&lookup, "SPAM_SIFT_FETCH_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.fetch_timeout);

        let classification_log = lookup("SPAM_SIFT_CLASSIFICATION_LOG")
            .map(PathBuf::from)
            .unwrap_or(defaults.classification_log);

        let log_dir = lookup("SPAM_SIFT_LOG_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            port,
            model_path,
            samples_url,
            fetch_timeout,
            classification_log,
            log_dir,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{raw:?}: {e}"),
            }),
    }
}
