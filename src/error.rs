//! Error types for the Seraph client

use thiserror::Error;

/// Errors that can occur when talking to the graph store
#[derive(Error, Debug)]
pub enum SeraphError {
    /// A self-reference in a store response did not end in a numeric id
    #[error("Malformed reference: {0}")]
    MalformedReference(String),

    /// Caller input rejected before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Index target kind other than `node` or `relationship`
    #[error("Invalid index target: {0} (expected \"node\" or \"relationship\")")]
    InvalidIndexTarget(String),

    /// Response was missing a field the mapper needs
    #[error("Decode error: {0}")]
    Decode(String),

    /// Store rejected or failed to execute a query
    #[error("Query error: {0}")]
    Query(String),

    /// Non-2xx response, or a failed item inside a batch
    #[error(
        "Request failed{}: {message}",
        .status.map(|s| format!(" with status {}", s)).unwrap_or_default()
    )]
    Request {
        status: Option<u16>,
        message: String,
    },

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SeraphError {
    pub fn malformed_reference<T: Into<String>>(msg: T) -> Self {
        SeraphError::MalformedReference(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        SeraphError::Validation(msg.into())
    }

    pub fn decode<T: Into<String>>(msg: T) -> Self {
        SeraphError::Decode(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        SeraphError::Config(msg.into())
    }

    pub fn request<T: Into<String>>(status: Option<u16>, msg: T) -> Self {
        SeraphError::Request {
            status,
            message: msg.into(),
        }
    }

    /// True for errors raised on caller input, before any network traffic
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SeraphError::Validation(_) | SeraphError::InvalidIndexTarget(_)
        )
    }

    /// HTTP status attached to the error, if the store produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            SeraphError::Request { status, .. } => *status,
            SeraphError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type SeraphResult<T> = Result<T, SeraphError>;
