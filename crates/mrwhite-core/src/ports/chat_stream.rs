//! Streamed chat endpoint port.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use super::ApiError;
use crate::domain::{ChatRequest, StreamChunk};

/// Ordered chunks of one assistant response.
///
/// The stream ends after a `done` chunk or when the connection closes.
pub type ChunkStream = BoxStream<'static, Result<StreamChunk, ApiError>>;

/// Port for the streaming chat inference endpoint.
#[async_trait]
pub trait ChatStreamPort: Send + Sync {
    /// Open a streamed response for one user message.
    ///
    /// Dropping the returned stream aborts the underlying request.
    async fn open_stream(&self, request: ChatRequest) -> Result<ChunkStream, ApiError>;
}
