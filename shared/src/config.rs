//! Configuration management for the relay Lambda.

use std::env;

use crate::mapping::FieldMapping;
use crate::notion::{DEFAULT_API_BASE, DEFAULT_NOTION_VERSION};
use crate::{Error, Result};

/// Relay configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Shared secret expected in `x-widget-key`
    pub widget_secret: String,
    /// Notion integration token
    pub notion_token: Option<String>,
    /// Target database id
    pub database_id: Option<String>,
    /// Notion API base URL
    pub api_base: String,
    /// Value of the `Notion-Version` header
    pub notion_version: String,
    /// Property mapping for title/status extraction
    pub mapping: FieldMapping,
}

/// Credentials needed for a database query.
#[derive(Debug, Clone)]
pub struct NotionCredentials {
    pub token: String,
    pub database_id: String,
}

impl RelayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let widget_secret = var("WIDGET_SECRET_KEY")
            .ok_or_else(|| Error::Config("WIDGET_SECRET_KEY not set".to_string()))?;

        let mut mapping = FieldMapping::default();
        if let Some(raw) = var("NOTION_TITLE_PROPERTIES") {
            mapping.title_properties = FieldMapping::parse_title_properties(&raw)?;
        }
        if let Some(raw) = var("NOTION_SCHEDULE_FIELDS") {
            mapping.schedule_fields = FieldMapping::parse_schedule_fields(&raw)?;
        }
        if let Some(placeholder) = var("NOTION_TITLE_PLACEHOLDER") {
            mapping.title_placeholder = placeholder;
        }
        if let Some(placeholder) = var("NOTION_STATUS_PLACEHOLDER") {
            mapping.status_placeholder = placeholder;
        }

        Ok(Self {
            widget_secret,
            notion_token: var("NOTION_TOKEN"),
            database_id: var("DATABASE_ID"),
            api_base: var("NOTION_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            notion_version: var("NOTION_VERSION")
                .unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string()),
            mapping,
        })
    }

    /// Credentials for the upstream query, checked on every request.
    pub fn credentials(&self) -> Result<NotionCredentials> {
        match (&self.notion_token, &self.database_id) {
            (Some(token), Some(database_id)) => Ok(NotionCredentials {
                token: token.clone(),
                database_id: database_id.clone(),
            }),
            _ => Err(Error::Config(
                "Missing Notion integration credentials.".to_string(),
            )),
        }
    }
}
