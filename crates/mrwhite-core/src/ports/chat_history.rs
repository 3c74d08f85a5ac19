//! Chat status/history port definition.
//!
//! The conversation itself lives on the server; the client only reads it
//! back to hydrate the message list and can ask for it to be cleared.

use async_trait::async_trait;

use super::ApiError;
use crate::domain::{ChatStatus, ClearChatRequest, HistoryMessage};

/// Port for the conversation status, history and clear endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatHistoryPort: Send + Sync {
    /// Current chat status for the signed-in user.
    async fn status(&self) -> Result<ChatStatus, ApiError>;

    /// Most recent messages of the current conversation, oldest first.
    async fn history(&self, limit: u32) -> Result<Vec<HistoryMessage>, ApiError>;

    /// Clear the conversation, optionally wiping the assistant's memory too.
    async fn clear(&self, request: ClearChatRequest) -> Result<(), ApiError>;
}
