use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use extractor_core::Timings;
use extractor_engine::{BackendSettings, DEFAULT_API_URL};
use extractor_logging::extractor_warn;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

const CONFIG_FILENAME: &str = "extractor.ron";
const CONFIG_PATH_ENV: &str = "EXTRACTOR_CONFIG";
const API_URL_ENV: &str = "EXTRACTOR_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub preload_debounce_ms: u64,
    pub preview_debounce_ms: u64,
    pub notification_ms: u64,
    pub log: LogDestination,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let backend = BackendSettings::default();
        let timings = Timings::default();
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: backend.request_timeout.as_secs(),
            connect_timeout_secs: backend.connect_timeout.as_secs(),
            max_response_bytes: backend.max_bytes,
            preload_debounce_ms: millis(timings.preload_debounce),
            preview_debounce_ms: millis(timings.preview_debounce),
            notification_ms: millis(timings.notification_dismiss),
            log: LogDestination::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn timings(&self) -> Timings {
        Timings {
            preload_debounce: Duration::from_millis(self.preload_debounce_ms),
            preview_debounce: Duration::from_millis(self.preview_debounce_ms),
            notification_dismiss: Duration::from_millis(self.notification_ms),
        }
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.api_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_response_bytes,
        }
    }

    /// Unknown level names fall back to `Info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    fn apply_api_url_override(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// Reads a config file. A missing file is `Ok(None)`.
pub fn load_from(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Loads `$EXTRACTOR_CONFIG` (or `./extractor.ron`), then applies
/// `$EXTRACTOR_API_URL`. Problems are reported once logging is up, so they
/// are returned alongside the config instead of being logged here.
pub fn load() -> (AppConfig, Option<ConfigError>) {
    let path = std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

    let (mut config, problem) = match load_from(&path) {
        Ok(Some(config)) => (config, None),
        Ok(None) => (AppConfig::default(), None),
        Err(err) => (AppConfig::default(), Some(err)),
    };
    config.apply_api_url_override(std::env::var(API_URL_ENV).ok());
    (config, problem)
}

/// Logs a config problem; the app keeps running on defaults.
pub fn report(problem: &ConfigError) {
    extractor_warn!("Using default configuration: {}", problem);
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
