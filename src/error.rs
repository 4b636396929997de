//! Error types for the migration tool

use thiserror::Error;

/// Main error type for migration operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An object the migration depends on is absent from the cluster
    #[error("not found: {0}")]
    NotFound(String),

    /// Any non-success response from the cluster API server
    #[error("cluster API error: {0}")]
    Server(String),

    /// A bounded wait was exhausted without the awaited condition holding
    #[error("timed out waiting for {what} after {attempts} attempts")]
    Timeout {
        /// What was being waited for
        what: String,
        /// How many probe attempts were made
        attempts: u32,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a not-found error for the given object description
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a server error with the given message
    pub fn server(msg: impl Into<String>) -> Self {
        Self::Server(msg.into())
    }

    /// Create a timeout error for an exhausted wait
    pub fn timeout(what: impl Into<String>, attempts: u32) -> Self {
        Self::Timeout {
            what: what.into(),
            attempts,
        }
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

impl From<kube::Error> for Error {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(e) if e.code == 404 => Self::NotFound(e.message),
            other => Self::Server(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
