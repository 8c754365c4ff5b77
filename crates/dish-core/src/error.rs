//! Error types for the dish dashboard

use thiserror::Error;

/// Main error type for dashboard operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP error: {status}")]
    Status { status: u16 },

    #[error("Push channel error: {0}")]
    Channel(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Error::Transport(msg.into())
    }

    /// Create a push channel error
    pub fn channel(msg: impl Into<String>) -> Self {
        Error::Channel(msg.into())
    }

    /// Create a malformed payload error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedPayload(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = Error::Status { status: 503 };
        assert_eq!(err.to_string(), "HTTP error: 503");
    }

    #[test]
    fn test_serde_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
