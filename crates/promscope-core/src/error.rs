//! Error types for remote metadata lookups.
//!
//! # Error Handling Strategy
//!
//! [`RemoteError`] is the only error the completion engine ever sees. It is
//! produced by a [`crate::MetadataClient`] implementation when a query against
//! the monitoring server fails, and it is always recovered inside the engine:
//! a failed lookup turns into an empty candidate list for the matched context.
//! Nothing in [`crate::QueryCompleter::complete`] returns an error to the
//! line editor.
//!
//! Callers outside the engine (the CLI executing user queries) receive the
//! same type and decide how to report it.

use thiserror::Error;

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failure talking to the monitoring server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The request never produced an HTTP response (connect, TLS, timeout).
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success HTTP status and no API error body.
    #[error("server returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The server answered with `"status": "error"`.
    #[error("query rejected ({error_type}): {message}")]
    Api {
        /// Prometheus `errorType` field (e.g. `bad_data`).
        error_type: String,
        /// Prometheus `error` field.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Creates an API error from the response envelope fields.
    pub fn api(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            error_type: error_type.into(),
            message: message.into(),
        }
    }
}
