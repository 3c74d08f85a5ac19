//! Chat domain types.
//!
//! These types represent chat messages as the client holds them in memory,
//! independent of the wire DTOs used by the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::DocumentRef;

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Parse a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }

    /// Convert role to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A chat message in the controller's message list.
///
/// Assistant messages are extended in place while their response streams
/// and are never touched again once the stream has finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Locally generated UUID, or the server id for hydrated messages.
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<DocumentRef>,
    /// Synthetic assistant message carrying a stream or transport error.
    #[serde(default)]
    pub is_error: bool,
}

impl ChatMessage {
    /// Create a user message stamped with the current time.
    #[must_use]
    pub fn user(content: impl Into<String>, documents: Vec<DocumentRef>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: MessageRole::User,
            content: content.into(),
            timestamp: Utc::now(),
            documents,
            is_error: false,
        }
    }

    /// Create an assistant message stamped with the current time.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            documents: Vec::new(),
            is_error: false,
        }
    }

    /// Create the synthetic assistant message shown for a failed response.
    #[must_use]
    pub fn assistant_error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::assistant(text)
        }
    }
}

/// Body of a streamed chat request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Assistant mode selected in the UI (e.g. a specialised persona).
    pub active_mode: Option<String>,
    pub dog_profile_id: Option<i64>,
    #[serde(default)]
    pub document_ids: Vec<i64>,
}
