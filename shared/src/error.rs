//! Error types for the Notion relay.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving a relay request.
#[derive(Error, Debug)]
pub enum Error {
    /// Authentication error (missing or wrong widget key)
    #[error("Unauthorized")]
    Auth,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Notion answered with a non-success status
    #[error("Notion API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// Transport failure talking to Notion
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Notion answered 2xx with a body that is not a query page
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Auth => 401,
            _ => 500,
        }
    }
}
