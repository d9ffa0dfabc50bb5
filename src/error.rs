//! Error types for callbot.

use thiserror::Error;

/// Library-level error type for callbot operations.
#[derive(Error, Debug)]
pub enum CallbotError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{service} returned HTTP {status}: {message}")]
    Upstream {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
impl CallbotError {
    /// HTTP status of an upstream failure, if this is one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            CallbotError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for callbot operations.
pub type Result<T> = std::result::Result<T, CallbotError>;
