/// Runtime configuration, read from the environment.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Endpoint the reference detection server listens on
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/detect-objects";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid DETECT_ENDPOINT {value:?}: {reason}")]
    InvalidEndpoint { value: String, reason: String },

    #[error("invalid DETECT_TIMEOUT_SECS {0:?}: expected a positive integer")]
    InvalidTimeout(String),

    #[error("invalid DETECT_RESPONSE_ORDER {0:?}: expected last-arrival or latest-request")]
    InvalidResponseOrder(String),
}

/// Which completed detection gets to update the displayed result when
/// several requests overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseOrder {
    /// Every success is applied in the order it arrives
    #[default]
    LastArrival,
    /// A success older than the newest applied one is dropped
    LatestRequest,
}

impl FromStr for ResponseOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last-arrival" => Ok(ResponseOrder::LastArrival),
            "latest-request" => Ok(ResponseOrder::LatestRequest),
            _ => Err(ConfigError::InvalidResponseOrder(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Full URL detection requests are posted to
    pub endpoint: Url,
    /// Request timeout; `None` waits forever
    pub timeout: Option<Duration>,
    pub response_order: ResponseOrder,
    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            timeout: None,
            response_order: ResponseOrder::default(),
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("DETECT_ENDPOINT") {
            config.endpoint = parse_endpoint(&value)?;
        }

        if let Some(value) = lookup("DETECT_TIMEOUT_SECS") {
            let secs: u64 = value
                .trim()
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout(value.clone()))?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        if let Some(value) = lookup("DETECT_RESPONSE_ORDER") {
            config.response_order = value.parse()?;
        }

        config.log_json = lookup("LOG_FORMAT")
            .map(|v| v.to_lowercase() == "json")
            .unwrap_or(false);

        Ok(config)
    }
}

fn parse_endpoint(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|e| ConfigError::InvalidEndpoint {
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEndpoint {
            value: value.to_string(),
            reason: format!("unsupported scheme {}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, None);
        assert_eq!(config.response_order, ResponseOrder::LastArrival);
        assert!(!config.log_json);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DETECT_ENDPOINT", "https://detector.local:8443/detect-objects"),
            ("DETECT_TIMEOUT_SECS", "30"),
            ("DETECT_RESPONSE_ORDER", "Latest-Request"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint.host_str(), Some("detector.local"));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.response_order, ResponseOrder::LatestRequest);
        assert!(config.log_json);
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        let err = AppConfig::from_lookup(lookup_from(&[("DETECT_ENDPOINT", "not a url")]));
        assert!(matches!(err, Err(ConfigError::InvalidEndpoint { .. })));

        let err = AppConfig::from_lookup(lookup_from(&[("DETECT_ENDPOINT", "ftp://host/x")]));
        assert!(matches!(err, Err(ConfigError::InvalidEndpoint { .. })));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = AppConfig::from_lookup(lookup_from(&[("DETECT_TIMEOUT_SECS", "0")]));
        assert_eq!(err, Err(ConfigError::InvalidTimeout("0".to_string())));
    }

    #[test]
    fn test_rejects_unknown_order() {
        let err = AppConfig::from_lookup(lookup_from(&[("DETECT_RESPONSE_ORDER", "fifo")]));
        assert_eq!(err, Err(ConfigError::InvalidResponseOrder("fifo".to_string())));
    }
}
