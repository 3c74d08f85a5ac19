//! Session state machine.

use serde::{Deserialize, Serialize};

/// Where a chat session is in its request/response cycle.
///
/// `Streaming` and `AwaitingSpeechFlush` belong to a running turn. A turn
/// always ends back in `Idle`; an aborted one passes through `Cancelled`
/// first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No reply in progress.
    #[default]
    Idle,

    /// Consuming the streamed reply.
    Streaming,

    /// Stream ended; narrating whatever was not spoken yet.
    AwaitingSpeechFlush,

    /// The user stopped the reply.
    Cancelled,
}

impl SessionState {
    /// Whether a turn is running.
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(self, Self::Streaming | Self::AwaitingSpeechFlush)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Streaming => "streaming",
            Self::AwaitingSpeechFlush => "awaiting-speech-flush",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
