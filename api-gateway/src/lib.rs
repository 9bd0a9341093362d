//! Notion relay - Handles the /api/notion endpoint.
//!
//! Endpoints:
//! - POST /api/notion - Query the configured database (requires `x-widget-key`)
//! - GET /api/notion - Informational message
//! - OPTIONS /api/notion - CORS preflight
//!
//! The handler is generic over the upstream source so tests can run it
//! without touching the network.

use lambda_http::{Body, Error, Request, Response};
use shared::http::{empty_response, error_response, json_response};
use shared::{
    verify_widget_key, DatabaseSource, Error as RelayError, InfoBody, NormalizedRecord,
    NotionClient, RelayConfig, RelayResponse,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Body of the `GET` response.
pub const INFO_MESSAGE: &str =
    "Notion API proxy is running. Use POST with x-widget-key to fetch data.";

/// Application state shared across requests.
pub struct AppState<S> {
    pub config: RelayConfig,
    pub source: S,
}

impl<S: DatabaseSource> AppState<S> {
    pub fn new(config: RelayConfig, source: S) -> Self {
        Self { config, source }
    }
}

impl AppState<NotionClient> {
    /// Build state from the Lambda environment.
    pub fn from_env() -> Result<Self, RelayError> {
        let config = RelayConfig::from_env()?;
        let source = NotionClient::new(
            reqwest::Client::new(),
            config.api_base.clone(),
            config.notion_version.clone(),
        );

        let schedule_fields: Vec<String> = config
            .mapping
            .schedule_fields
            .iter()
            .map(ToString::to_string)
            .collect();
        info!(
            "Relay configured: titles={:?}, schedule_fields={:?}, credentials_present={}",
            config.mapping.title_properties,
            schedule_fields,
            config.credentials().is_ok()
        );

        Ok(Self::new(config, source))
    }
}

fn is_relay_path(path: &str) -> bool {
    matches!(path, "" | "/" | "/notion" | "/notion/")
}

pub async fn handler<S: DatabaseSource>(
    state: Arc<AppState<S>>,
    event: Request,
) -> Result<Response<Body>, Error> {
    let raw_path = event.uri().path();
    // Strip /api prefix if present (deployments mount the route under /api)
    let path = raw_path.strip_prefix("/api").unwrap_or(raw_path);
    let method = event.method().as_str();

    info!("Received request: method={}, path={} (raw: {})", method, path, raw_path);

    if !is_relay_path(path) {
        return error_response(404, "Not found");
    }

    match method {
        "OPTIONS" => empty_response(204),

        "GET" => json_response(
            200,
            &InfoBody {
                message: INFO_MESSAGE.to_string(),
            },
        ),

        "POST" => match fetch_records(&state, &event).await {
            Ok(records) => {
                info!("Returning {} records", records.len());
                json_response(200, &RelayResponse::new(records))
            }
            Err(RelayError::Auth) => {
                warn!("Rejected request with missing or invalid widget key");
                error_response(401, RelayError::Auth.to_string())
            }
            Err(e) => {
                error!("Notion relay error: {}", e);
                error_response(e.status_code(), e.to_string())
            }
        },

        _ => error_response(405, "Method not allowed"),
    }
}

/// Authenticate, query the database once, and normalize the rows.
async fn fetch_records<S: DatabaseSource>(
    state: &AppState<S>,
    event: &Request,
) -> shared::Result<Vec<NormalizedRecord>> {
    verify_widget_key(event.headers(), &state.config.widget_secret)?;

    let credentials = state.config.credentials()?;
    let page = state.source.query_database(&credentials).await?;

    Ok(state.config.mapping.normalize_all(&page.results))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_paths() {
        assert!(is_relay_path("/notion"));
        assert!(is_relay_path("/"));
        assert!(!is_relay_path("/notion/extra"));
        assert!(!is_relay_path("/tags"));
    }
}
