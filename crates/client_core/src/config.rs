use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE: &str = "https://groviq.shop/wp-json/custom-api/v1";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: Url,
    /// `None` lets a request hang for as long as the server keeps the socket open.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_base: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: parse_api_base(api_base)?,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        })
    }

    pub fn with_request_timeout(mut self, request_timeout: Option<Duration>) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub poll_interval: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

pub fn parse_api_base(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::OpaqueBaseUrl(raw.to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_base_with_path() {
        let config = ClientConfig::new("http://127.0.0.1:8080/wp-json/custom-api/v1/")
            .expect("config");
        assert_eq!(config.api_base.path(), "/wp-json/custom-api/v1/");
        assert_eq!(config.request_timeout, Some(DEFAULT_REQUEST_TIMEOUT));
    }

    #[test]
    fn rejects_garbage_and_opaque_urls() {
        assert!(matches!(
            parse_api_base("not a url"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            parse_api_base("mailto:vendor@example.com"),
            Err(ConfigError::OpaqueBaseUrl(_))
        ));
    }

    #[test]
    fn default_points_at_production_api() {
        let config = ClientConfig::new(DEFAULT_API_BASE).expect("config");
        assert_eq!(config.api_base.as_str(), DEFAULT_API_BASE);
        assert_eq!(
            ControllerSettings::default().poll_interval,
            Duration::from_secs(15)
        );
    }
}
