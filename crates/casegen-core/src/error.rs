//! Application error types with rich context

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ─────────────────────────────────────────────────────────────
    // Validation Errors (raised before any network activity)
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Test case at position {index} is missing an id")]
    MissingId { index: usize },

    // ─────────────────────────────────────────────────────────────
    // Transport Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Server returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    // ─────────────────────────────────────────────────────────────
    // Streaming Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Script generation stream error: {message}")]
    Stream { message: String },

    // ─────────────────────────────────────────────────────────────
    // Lookup Errors
    // ─────────────────────────────────────────────────────────────
    #[error("No test case found with id: {id}")]
    NotFound { id: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn missing_id(index: usize) -> Self {
        Self::MissingId { index }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream {
            message: message.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Check if this error was raised by input validation, before any
    /// request went out.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidInput { .. } | Error::MissingId { .. })
    }

    /// Check if this is a recoverable error (the caller may simply retry
    /// the operation)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Transport { .. } | Error::HttpStatus { .. } | Error::Stream { .. }
        )
    }

    /// The failure text without the variant's display prefix. Variants
    /// that carry no message field keep their full display form.
    pub fn detail(&self) -> String {
        match self {
            Error::Config { message }
            | Error::InvalidInput { message }
            | Error::Transport { message }
            | Error::Stream { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::transport("connection refused");
        assert_eq!(err.to_string(), "Transport error: connection refused");

        let err = Error::missing_id(2);
        assert_eq!(err.to_string(), "Test case at position 2 is missing an id");

        let err = Error::not_found("tc-9");
        assert!(err.to_string().contains("tc-9"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{broken").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_error_is_validation() {
        assert!(Error::invalid_input("empty batch").is_validation());
        assert!(Error::missing_id(0).is_validation());
        assert!(!Error::transport("timeout").is_validation());
        assert!(!Error::not_found("tc-1").is_validation());
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::transport("connection reset").is_recoverable());
        assert!(Error::http_status(502, "bad gateway").is_recoverable());
        assert!(Error::stream("malformed event").is_recoverable());
        assert!(!Error::invalid_input("bad batch").is_recoverable());
        assert!(!Error::not_found("tc-1").is_recoverable());
    }

    #[test]
    fn test_error_detail_is_the_bare_message() {
        assert_eq!(Error::stream("generator crashed").detail(), "generator crashed");
        assert_eq!(Error::transport("connection reset").detail(), "connection reset");
        assert_eq!(Error::invalid_input("no test cases").detail(), "no test cases");
        // No message field to strip down to.
        let err = Error::missing_id(3);
        assert_eq!(err.detail(), err.to_string());
    }

    #[test]
    fn test_http_status_error_carries_body() {
        let err = Error::http_status(500, "internal error text");
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("internal error text"));
    }

    #[test]
    fn test_error_constructors() {
        let _ = Error::config("bad base url");
        let _ = Error::invalid_input("test");
        let _ = Error::missing_id(1);
        let _ = Error::transport("test");
        let _ = Error::http_status(404, "not found");
        let _ = Error::stream("test");
        let _ = Error::not_found("id");
    }
}
