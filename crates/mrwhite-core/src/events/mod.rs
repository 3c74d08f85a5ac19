//! Application-level events.
//!
//! These are notifications for the surrounding application (credit display,
//! conversation bookkeeping). Per-message UI updates travel on the chat
//! session's own event channel instead.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag:
//!
//! ```json
//! { "type": "conversation_cleared", "conversationId": 42, "memoryCleared": true }
//! ```

use serde::{Deserialize, Serialize};

/// Canonical application events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// A chat turn ended (successfully or not); credit displays should refetch.
    CreditsRefreshRequested,

    /// The server assigned or confirmed the active conversation.
    ConversationIdentified {
        #[serde(rename = "conversationId")]
        conversation_id: i64,
    },

    /// The active conversation was cleared.
    ConversationCleared {
        #[serde(rename = "conversationId")]
        conversation_id: i64,
        #[serde(rename = "memoryCleared")]
        memory_cleared: bool,
    },
}
