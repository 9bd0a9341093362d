//! Shared data models.

use serde::{Deserialize, Serialize};

/// One database row as handed to the widget, decoupled from the Notion schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub id: String,
    pub title: String,
    pub status: String,
}

/// Successful relay payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayResponse {
    /// Absent on malformed payloads; the widget keeps its data in that case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<NormalizedRecord>>,
}

impl RelayResponse {
    pub fn new(results: Vec<NormalizedRecord>) -> Self {
        Self {
            results: Some(results),
        }
    }
}

/// Error payload returned for 4xx/5xx responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Informational payload returned by `GET`.
#[derive(Debug, Serialize, Deserialize)]
pub struct InfoBody {
    pub message: String,
}
