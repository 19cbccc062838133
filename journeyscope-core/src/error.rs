//! Error types for journeyscope-core
//!
//! The journey algorithms themselves never fail; these errors only come from
//! the edges (configuration, file IO, JSON payloads and the query API).

use thiserror::Error;

/// Main error type for the journeyscope-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Query API error
    #[error("API error: {0}")]
    Api(String),

    /// Journey query rejected before it was sent
    #[error("invalid journey query: {0}")]
    InvalidQuery(String),
}

/// Result type alias for journeyscope-core
pub type Result<T> = std::result::Result<T, Error>;
