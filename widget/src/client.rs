//! Relay client used by the widget to fetch records.

use async_trait::async_trait;
use shared::{RelayResponse, WIDGET_KEY_HEADER};
use tracing::{debug, info};

use crate::config::WidgetConfig;
use crate::{Result, WidgetError};

/// Anything that can produce a relay payload.
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    async fn fetch(&self) -> Result<RelayResponse>;
}

/// Calls the relay endpoint over HTTP.
pub struct RelayClient {
    http_client: reqwest::Client,
    proxy_url: String,
    widget_key: String,
}

impl RelayClient {
    pub fn new(config: &WidgetConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            proxy_url: config.proxy_url.clone(),
            widget_key: config.widget_key.clone(),
        })
    }
}

#[async_trait]
impl RecordFetcher for RelayClient {
    async fn fetch(&self) -> Result<RelayResponse> {
        debug!("POST {}", self.proxy_url);

        let response = self
            .http_client
            .post(&self.proxy_url)
            .header(WIDGET_KEY_HEADER, &self.widget_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let body: RelayResponse =
            serde_json::from_slice(&bytes).map_err(|e| WidgetError::Parse(e.to_string()))?;

        info!(
            "Relay returned {} records",
            body.results.as_ref().map_or(0, Vec::len)
        );

        Ok(body)
    }
}
