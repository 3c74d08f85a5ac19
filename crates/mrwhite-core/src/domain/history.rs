//! Conversation status and history DTOs.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::DocumentRef;
use super::chat::{ChatMessage, MessageRole};

/// Response of the chat status endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatStatus {
    #[serde(default)]
    pub has_conversation: bool,
    #[serde(default)]
    pub conversation_id: Option<i64>,
}

impl ChatStatus {
    /// The conversation to hydrate, if the server reports one.
    #[must_use]
    pub const fn existing_conversation(&self) -> Option<i64> {
        if self.has_conversation {
            self.conversation_id
        } else {
            None
        }
    }
}

/// One message as returned by the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub id: i64,
    pub role: MessageRole,
    pub content: String,
    pub created_at: String,
    #[serde(default)]
    pub documents: Option<Vec<DocumentRef>>,
}

impl HistoryMessage {
    /// Map into the controller's message type, keeping the server id and
    /// timestamp. An unparseable timestamp falls back to the Unix epoch so
    /// ordering stays stable.
    #[must_use]
    pub fn into_chat_message(self) -> ChatMessage {
        let timestamp = parse_timestamp(&self.created_at).unwrap_or_else(|| {
            tracing::debug!(created_at = %self.created_at, "Unparseable history timestamp");
            DateTime::<Utc>::UNIX_EPOCH
        });

        ChatMessage {
            id: self.id.to_string(),
            role: self.role,
            content: self.content,
            timestamp,
            documents: self.documents.unwrap_or_default(),
            is_error: false,
        }
    }
}

/// History endpoint envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub messages: Vec<HistoryMessage>,
}

/// Body of the clear-chat endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearChatRequest {
    pub conversation_id: i64,
    pub clear_memory: bool,
}

/// Parse a server timestamp: RFC 3339 first, then naive ISO-8601 as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
