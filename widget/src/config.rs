//! Widget configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::{Result, WidgetError};

pub const DEFAULT_STATE_FILE: &str = "notion-widget-state.json";

/// Where the relay lives and how to authenticate against it.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub proxy_url: String,
    /// Shared secret sent as `x-widget-key`. Always supplied by the host.
    pub widget_key: String,
    pub state_path: PathBuf,
    /// Request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl WidgetConfig {
    pub fn new(
        proxy_url: impl Into<String>,
        widget_key: impl Into<String>,
        state_path: impl Into<PathBuf>,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        let proxy_url = proxy_url.into();
        let widget_key = widget_key.into();

        if !(proxy_url.starts_with("http://") || proxy_url.starts_with("https://")) {
            return Err(WidgetError::Config(format!(
                "Relay URL must be http(s), got '{}'",
                proxy_url
            )));
        }
        if widget_key.trim().is_empty() {
            return Err(WidgetError::Config("Widget key must not be empty".to_string()));
        }

        Ok(Self {
            proxy_url,
            widget_key,
            state_path: state_path.into(),
            timeout: timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = WidgetConfig::new(
            "https://relay.example.com/api/notion",
            "key",
            DEFAULT_STATE_FILE,
            Some(10),
        )
        .unwrap();
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.state_path, PathBuf::from(DEFAULT_STATE_FILE));
    }

    #[test]
    fn test_rejects_bad_url_and_blank_key() {
        assert!(WidgetConfig::new("relay.example.com", "key", "s.json", None).is_err());
        assert!(WidgetConfig::new("http://localhost:3000/api/notion", " ", "s.json", None).is_err());
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let config =
            WidgetConfig::new("http://localhost:3000/api/notion", "k", "s.json", Some(0)).unwrap();
        assert!(config.timeout.is_none());
    }
}
