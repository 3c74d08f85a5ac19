//! CLI-specific error types and exit codes.

use mrwhite_chat::SessionError;
use mrwhite_core::{ApiError, CoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Backend reported a failure.
    #[error("{0}")]
    Api(String),

    /// Token missing, expired or rejected.
    #[error("{0}")]
    Unauthorized(String),

    /// Backend could not be reached.
    #[error("{0}")]
    Unavailable(String),

    #[error("Invalid arguments: {0}")]
    Arguments(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Internal(String),
}

impl CliError {
    /// Process exit code, following sysexits.h where one fits.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Api(_) | Self::Internal(_) => 1,
            Self::Arguments(_) => 64,   // EX_USAGE
            Self::Unavailable(_) => 69, // EX_UNAVAILABLE
            Self::Io(_) => 74,          // EX_IOERR
            Self::Unauthorized(_) => 77, // EX_NOPERM
            Self::Config(_) => 78,      // EX_CONFIG
        }
    }
}

/// Exit code for an error returned by a handler.
///
/// Handlers propagate port and session errors through `anyhow`, so the
/// chain is searched for the first error that carries a classification.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(cli) = cause.downcast_ref::<CliError>() {
            return cli.exit_code();
        }
        if let Some(api) = cause.downcast_ref::<ApiError>() {
            return CliError::from(api.clone()).exit_code();
        }
        if let Some(session) = cause.downcast_ref::<SessionError>() {
            return CliError::from(session.clone()).exit_code();
        }
        if let Some(core) = cause.downcast_ref::<CoreError>() {
            return match core {
                CoreError::Api(api) => CliError::from(api.clone()).exit_code(),
                CoreError::Settings(_) | CoreError::Path(_) => 78,
                CoreError::Validation(_) => 64,
                CoreError::Internal(_) => 1,
            };
        }
    }
    1
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => Self::Unauthorized(err.to_string()),
            ApiError::Transport(_) => Self::Unavailable(err.to_string()),
            ApiError::Io(msg) => Self::Io(msg),
            ApiError::Status { .. } | ApiError::Decode(_) | ApiError::InvalidResponse(_) => {
                Self::Api(err.to_string())
            }
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(api) => api.into(),
            CoreError::Settings(e) => Self::Config(e.to_string()),
            CoreError::Path(e) => Self::Config(e.to_string()),
            CoreError::Validation(msg) => Self::Arguments(msg),
            CoreError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Api(api) => api.into(),
            SessionError::EmptyMessage => Self::Arguments(err.to_string()),
            SessionError::AlreadyStreaming | SessionError::Busy | SessionError::Closed => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
