//! Notion database client.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::NotionCredentials;
use crate::{Error, Result};

pub const DEFAULT_API_BASE: &str = "https://api.notion.com";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// One page of a database query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryPage {
    #[serde(default)]
    pub results: Vec<NotionPage>,
    #[serde(default)]
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// A database row.
#[derive(Debug, Clone, Deserialize)]
pub struct NotionPage {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

/// Property values the relay knows how to read.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    Select {
        select: Option<SelectOption>,
    },
    Status {
        status: Option<SelectOption>,
    },
    Date {
        date: Option<DateValue>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateValue {
    pub start: String,
    pub end: Option<String>,
}

impl DateValue {
    /// `"<start> ~ <end>"`, or `"<start>"` for single dates.
    pub fn to_schedule_string(&self) -> String {
        match &self.end {
            Some(end) => format!("{} ~ {}", self.start, end),
            None => self.start.clone(),
        }
    }
}

/// Source of database rows. Only the first page is ever requested.
#[async_trait]
pub trait DatabaseSource: Send + Sync {
    async fn query_database(&self, credentials: &NotionCredentials) -> Result<QueryPage>;
}

/// HTTP client for the Notion REST API.
pub struct NotionClient {
    http_client: reqwest::Client,
    api_base: String,
    notion_version: String,
}

impl NotionClient {
    pub fn new(
        http_client: reqwest::Client,
        api_base: impl Into<String>,
        notion_version: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            notion_version: notion_version.into(),
        }
    }

    fn query_url(&self, database_id: &str) -> String {
        format!("{}/v1/databases/{}/query", self.api_base, database_id)
    }
}

#[async_trait]
impl DatabaseSource for NotionClient {
    async fn query_database(&self, credentials: &NotionCredentials) -> Result<QueryPage> {
        let response = self
            .http_client
            .post(self.query_url(&credentials.database_id))
            .bearer_auth(&credentials.token)
            .header("Notion-Version", &self.notion_version)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let page: QueryPage = serde_json::from_slice(&bytes)?;

        if page.has_more {
            warn!(
                "Database {} has more rows than one page; only the first {} are returned",
                credentials.database_id,
                page.results.len()
            );
        }
        info!("Fetched {} rows from Notion", page.results.len());

        Ok(page)
    }
}
