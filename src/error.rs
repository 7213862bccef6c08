//! Error types for boardline
//!
//! Defines an error enum covering all failure modes across the system.
//! Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Result type alias for boardline operations
pub type Result<T> = std::result::Result<T, BoardlineError>;

/// Error type for boardline operations
#[derive(Error, Debug)]
pub enum BoardlineError {
    /// Configuration errors (missing token, bad config file values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors reported by the platform API (GraphQL errors, non-auth HTTP failures)
    #[error("API error: {0}")]
    Api(String),

    /// Authentication failures (HTTP 401/403)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Board not found or empty
    #[error("Board error: {0}")]
    Board(String),

    /// Date strings that cannot be parsed into calendar dates
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),

    /// Anyhow errors (for more context)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = BoardlineError::Config("MONDAY_API_TOKEN is not set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: MONDAY_API_TOKEN is not set"
        );

        let err = BoardlineError::Auth("HTTP 401".to_string());
        assert_eq!(err.to_string(), "Authentication error: HTTP 401");
    }

    #[test]
    fn test_json_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: BoardlineError = json_err.into();
        assert!(matches!(err, BoardlineError::Json(_)));
    }
}
