//! Internal error types for HTTP operations.
//!
//! These errors are internal to `mrwhite-client` and are mapped to
//! [`ApiError`] at the port boundary.

use mrwhite_core::ApiError;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("API request to {path} failed with status {status}: {message}")]
    Status {
        status: u16,
        path: String,
        message: String,
    },

    /// 401 or 403.
    #[error("API request to {path} was not authorized")]
    Unauthorized { path: String },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Base URL or endpoint path could not be joined.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Reading a local file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Status {
                status, message, ..
            } => Self::Status { status, message },
            ClientError::Unauthorized { .. } => Self::Unauthorized,
            ClientError::Network(e) if e.is_decode() => Self::Decode(e.to_string()),
            ClientError::Network(e) => Self::Transport(e.to_string()),
            ClientError::InvalidUrl(e) => Self::InvalidResponse(format!("invalid URL: {e}")),
            ClientError::JsonParse(e) => Self::Decode(e.to_string()),
            ClientError::Io(e) => Self::Io(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_to_port_error() {
        let err = ClientError::Status {
            status: 402,
            path: "api/v1/chat/stream".to_string(),
            message: "Insufficient credits".to_string(),
        };
        assert_eq!(
            ApiError::from(err),
            ApiError::Status {
                status: 402,
                message: "Insufficient credits".to_string()
            }
        );
    }

    #[test]
    fn unauthorized_maps_to_port_error() {
        let err = ClientError::Unauthorized {
            path: "api/v1/dogs".to_string(),
        };
        assert_eq!(ApiError::from(err), ApiError::Unauthorized);
    }

    #[test]
    fn json_errors_are_decode_errors() {
        let err: ClientError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(ApiError::from(err), ApiError::Decode(_)));
    }
}
