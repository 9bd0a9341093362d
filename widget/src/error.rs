//! Error types for the canvas widget.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, WidgetError>;

/// Errors that can occur in the widget.
///
/// Fetch failures (`Network`, `Status`, `Parse`) are shown to the user
/// verbatim through `errorMsg`; the others abort the host command.
#[derive(Error, Debug)]
pub enum WidgetError {
    /// The relay could not be reached
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// The relay answered with a non-success status
    #[error("Error: {0}")]
    Status(u16),

    /// The relay body was not the expected JSON
    #[error("Invalid relay response: {0}")]
    Parse(String),

    /// Persisted state could not be read or written
    #[error("State store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The requested month cannot be represented
    #[error("Month offset {0} is out of range")]
    MonthOutOfRange(i32),
}

impl From<std::io::Error> for WidgetError {
    fn from(e: std::io::Error) -> Self {
        WidgetError::Store(e.to_string())
    }
}
