//! Streamed chat endpoint adapter.

use async_trait::async_trait;
use mrwhite_core::{ApiError, ChatRequest, ChatStreamPort, ChunkStream};

use crate::MrWhiteApi;
use crate::endpoints::CHAT_STREAM;
use crate::stream::decode_chunks;

#[async_trait]
impl ChatStreamPort for MrWhiteApi {
    async fn open_stream(&self, request: ChatRequest) -> Result<ChunkStream, ApiError> {
        tracing::debug!(
            chars = request.message.chars().count(),
            documents = request.document_ids.len(),
            "Opening chat stream"
        );
        let response = self.client.post_streaming(CHAT_STREAM, &request).await?;
        Ok(decode_chunks(response.bytes_stream()))
    }
}
