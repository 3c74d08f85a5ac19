//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the client expects from the Mr. White
//! backend. They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `reqwest` types in any signature
//! - Streams are exposed as boxed `futures` streams of domain chunks
//! - Every port is `Send + Sync` so it can be shared behind `Arc<dyn _>`

pub mod account;
pub mod chat_history;
pub mod chat_stream;
pub mod event_emitter;
pub mod speech;

use std::sync::Arc;

use thiserror::Error;

pub use account::{CreditsPort, DocumentPort, DogProfilePort};
pub use chat_history::ChatHistoryPort;
pub use chat_stream::{ChatStreamPort, ChunkStream};
pub use event_emitter::{AppEventEmitter, ChannelEmitter, NoopEmitter};
pub use speech::SpeechSynthesisPort;

/// Errors reported by backend ports.
///
/// This abstracts away the HTTP client so the controller can classify
/// failures without depending on transport types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, reset, ...).
    #[error("Network error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Missing or rejected credentials.
    #[error("Not authorized, check MRWHITE_API_TOKEN")]
    Unauthorized,

    /// A response body or stream frame could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The response was well-formed but not what the contract promises.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Local I/O failure (reading an upload, ...).
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Core error type for semantic domain errors.
///
/// Adapters map this to their own error types (CLI exit codes, ...).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Settings validation error.
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),

    /// Path resolution error.
    #[error(transparent)]
    Path(#[from] crate::paths::PathError),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error (unexpected condition).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Container for all backend port trait objects.
///
/// Built once at the composition root and handed to the services that need
/// them, instead of module-level singletons.
#[derive(Clone)]
pub struct Backend {
    pub chat: Arc<dyn ChatStreamPort>,
    pub history: Arc<dyn ChatHistoryPort>,
    pub speech: Arc<dyn SpeechSynthesisPort>,
    pub credits: Arc<dyn CreditsPort>,
    pub dogs: Arc<dyn DogProfilePort>,
    pub documents: Arc<dyn DocumentPort>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message() {
        let err = ApiError::Status {
            status: 402,
            message: "Payment required".to_string(),
        };
        assert_eq!(err.to_string(), "Server returned 402: Payment required");
    }

    #[test]
    fn io_errors_convert() {
        let err: ApiError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ApiError::Io(_)));
    }

    #[test]
    fn core_error_is_transparent_over_api() {
        let err: CoreError = ApiError::Unauthorized.into();
        assert_eq!(err.to_string(), ApiError::Unauthorized.to_string());
    }
}
