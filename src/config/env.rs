use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub refresh: RefreshConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub timezone: Tz,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub status_path: String,
    pub health_path: String,
    pub request_timeout: Duration,
}

impl ApiConfig {
    pub fn status_url(&self) -> Result<Url, url::ParseError> {
        self.base_url.join(&self.status_path)
    }

    pub fn health_url(&self) -> Result<Url, url::ParseError> {
        self.base_url.join(&self.health_path)
    }
}

#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub interval: Duration,
    /// Delay between a fetch completing and the refresh indicator being hidden.
    pub indicator_min_visible: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(10_000),
            indicator_min_visible: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
    pub output_dir: String,
    pub output_filename: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
