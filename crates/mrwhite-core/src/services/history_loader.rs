//! Conversation history loader.
//!
//! Hydrates the message list when a chat session starts: fetch the chat
//! status, and if the server has a conversation, fetch its latest page of
//! messages. Read-only; nothing is written back.

use std::sync::Arc;

use crate::domain::ChatMessage;
use crate::ports::{ApiError, ChatHistoryPort};

/// Result of hydrating a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hydration {
    pub conversation_id: Option<i64>,
    pub messages: Vec<ChatMessage>,
}

impl Hydration {
    /// Cold start: no prior conversation.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Loads prior conversation state through the [`ChatHistoryPort`].
#[derive(Clone)]
pub struct ConversationHistoryLoader {
    port: Arc<dyn ChatHistoryPort>,
}

impl ConversationHistoryLoader {
    /// Create a new loader.
    pub fn new(port: Arc<dyn ChatHistoryPort>) -> Self {
        Self { port }
    }

    /// Hydrate, treating any failure as "no prior conversation".
    pub async fn load(&self, limit: u32) -> Hydration {
        match self.load_or_error(limit).await {
            Ok(hydration) => hydration,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load chat history, starting empty");
                Hydration::empty()
            }
        }
    }

    /// Hydrate, surfacing the error to the caller.
    pub async fn load_or_error(&self, limit: u32) -> Result<Hydration, ApiError> {
        let status = self.port.status().await?;
        let Some(conversation_id) = status.existing_conversation() else {
            tracing::debug!("No existing conversation");
            return Ok(Hydration::empty());
        };

        let history = self.port.history(limit).await?;
        let messages: Vec<ChatMessage> = history
            .into_iter()
            .map(crate::domain::HistoryMessage::into_chat_message)
            .collect();

        tracing::debug!(conversation_id, count = messages.len(), "Loaded chat history");

        Ok(Hydration {
            conversation_id: Some(conversation_id),
            messages,
        })
    }
}
