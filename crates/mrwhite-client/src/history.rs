//! Chat status, history and clear adapters.

use async_trait::async_trait;
use mrwhite_core::domain::HistoryPage;
use mrwhite_core::{ApiError, ChatHistoryPort, ChatStatus, ClearChatRequest, HistoryMessage};

use crate::MrWhiteApi;
use crate::endpoints::{CHAT_CLEAR, CHAT_HISTORY, CHAT_STATUS};

#[async_trait]
impl ChatHistoryPort for MrWhiteApi {
    async fn status(&self) -> Result<ChatStatus, ApiError> {
        Ok(self.client.get_json(CHAT_STATUS, &[]).await?)
    }

    async fn history(&self, limit: u32) -> Result<Vec<HistoryMessage>, ApiError> {
        let page: HistoryPage = self
            .client
            .get_json(CHAT_HISTORY, &[("limit", limit.to_string())])
            .await?;
        Ok(page.messages)
    }

    async fn clear(&self, request: ClearChatRequest) -> Result<(), ApiError> {
        self.client.post_unit(CHAT_CLEAR, &request).await?;
        tracing::info!(
            conversation_id = request.conversation_id,
            clear_memory = request.clear_memory,
            "Conversation cleared"
        );
        Ok(())
    }
}
