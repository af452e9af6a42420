//! Error types for querybox.
//!
//! Defines the main error enum used throughout the application. The widget
//! itself never fails; these errors come from the ambient layers (config,
//! schema files, the terminal).

use thiserror::Error;

/// Main error type for querybox operations.
#[derive(Error, Debug)]
pub enum QueryBoxError {
    /// Configuration errors (invalid config file, bad CLI arguments, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Schema file errors (unreadable file, invalid JSON, duplicate tables)
    #[error("Schema error: {0}")]
    Schema(String),

    /// Terminal errors (raw mode, drawing, event polling)
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueryBoxError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a schema error with the given message.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Creates a terminal error with the given message.
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Schema(_) => "Schema Error",
            Self::Terminal(_) => "Terminal Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using QueryBoxError.
pub type Result<T> = std::result::Result<T, QueryBoxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config() {
        let err = QueryBoxError::config("unknown field 'max_tabels' in [completion]");
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown field 'max_tabels' in [completion]"
        );
        assert_eq!(err.category(), "Configuration Error");
    }

    #[test]
    fn test_error_display_schema() {
        let err = QueryBoxError::schema("duplicate table 'reclamos'");
        assert_eq!(err.to_string(), "Schema error: duplicate table 'reclamos'");
        assert_eq!(err.category(), "Schema Error");
    }

    #[test]
    fn test_error_display_terminal() {
        let err = QueryBoxError::terminal("Failed to enable raw mode");
        assert_eq!(err.to_string(), "Terminal error: Failed to enable raw mode");
        assert_eq!(err.category(), "Terminal Error");
    }

    #[test]
    fn test_error_display_internal() {
        let err = QueryBoxError::internal("unexpected state");
        assert_eq!(err.to_string(), "Internal error: unexpected state");
        assert_eq!(err.category(), "Internal Error");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QueryBoxError>();
    }
}
