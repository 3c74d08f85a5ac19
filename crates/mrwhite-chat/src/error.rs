//! Errors returned to callers of the session handle.
//!
//! Stream, transport and narration failures never show up here: they are
//! handled inside the session and surface as chat messages or log lines.

use mrwhite_core::ApiError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("A reply is already streaming")]
    AlreadyStreaming,

    #[error("Message is empty and has no documents attached")]
    EmptyMessage,

    #[error("Session is busy with a reply")]
    Busy,

    #[error("Chat session is closed")]
    Closed,

    #[error(transparent)]
    Api(#[from] ApiError),
}
