use std::{env, time::Duration};

use chrono_tz::Tz;
use url::Url;

use super::env::{
    ApiConfig, AppConfig, ConfigError, DirectoryConfig, LoggingConfig, RefreshConfig,
};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_base = env::var("DASHBOARD_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw_base).map_err(|_| ConfigError::Invalid {
            key: "DASHBOARD_BASE_URL",
            value: raw_base.clone(),
        })?;

        let api = ApiConfig {
            base_url,
            status_path: env::var("DASHBOARD_STATUS_PATH")
                .unwrap_or_else(|_| "/api/status".to_string()),
            health_path: env::var("DASHBOARD_HEALTH_PATH")
                .unwrap_or_else(|_| "/api/health".to_string()),
            request_timeout: parse_millis("DASHBOARD_REQUEST_TIMEOUT", 30_000),
        };

        let defaults = RefreshConfig::default();
        let refresh = RefreshConfig {
            interval: parse_millis(
                "DASHBOARD_REFRESH_INTERVAL",
                defaults.interval.as_millis() as u64,
            ),
            indicator_min_visible: parse_millis(
                "DASHBOARD_INDICATOR_MIN_MS",
                defaults.indicator_min_visible.as_millis() as u64,
            ),
        };

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
            output_dir: env::var("OUTPUT_DIR").unwrap_or_else(|_| "output".to_string()),
            output_filename: env::var("OUTPUT_FILENAME")
                .unwrap_or_else(|_| "dashboard.html".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        let raw_tz = env::var("DASHBOARD_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        let timezone: Tz = raw_tz.parse().map_err(|_| ConfigError::Invalid {
            key: "DASHBOARD_TIMEZONE",
            value: raw_tz.clone(),
        })?;

        Ok(Self {
            api,
            refresh,
            directories,
            logging,
            timezone,
        })
    }
}

fn parse_millis(key: &str, default: u64) -> Duration {
    Duration::from_millis(
        env::var(key)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(default),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls_join_onto_base() {
        let api = ApiConfig {
            base_url: Url::parse("http://monitor.local:5000").unwrap(),
            status_path: "/api/status".into(),
            health_path: "/api/health".into(),
            request_timeout: Duration::from_secs(30),
        };
        assert_eq!(
            api.status_url().unwrap().as_str(),
            "http://monitor.local:5000/api/status"
        );
        assert_eq!(
            api.health_url().unwrap().as_str(),
            "http://monitor.local:5000/api/health"
        );
    }

    #[test]
    fn refresh_defaults_match_dashboard_timings() {
        let defaults = RefreshConfig::default();
        assert_eq!(defaults.interval, Duration::from_secs(10));
        assert_eq!(defaults.indicator_min_visible, Duration::from_millis(500));
    }

    #[test]
    fn unparseable_millis_fall_back_to_default() {
        assert_eq!(
            parse_millis("DASHBOARD_TEST_UNSET_MILLIS_KEY", 1234),
            Duration::from_millis(1234)
        );
    }
}
