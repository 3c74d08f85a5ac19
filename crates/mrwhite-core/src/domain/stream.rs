//! Streamed chat response chunks.

use serde::{Deserialize, Serialize};

/// Metadata attached to `metadata` and `done` chunks.
///
/// Only `conversation_id` is interpreted by the client; everything else the
/// backend sends is kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One discrete unit of a streamed chat response.
///
/// Chunks are consumed one at a time in arrival order and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamChunk {
    /// Incremental assistant text.
    Token { content: String },

    /// Out-of-band metadata (conversation id, usage, ...).
    Metadata { metadata: ChunkMetadata },

    /// End of the response.
    Done {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<ChunkMetadata>,
    },

    /// Backend-reported failure.
    Error { error: String },
}

impl StreamChunk {
    /// Conversation id carried by a `metadata` or `done` chunk, if any.
    #[must_use]
    pub fn conversation_id(&self) -> Option<i64> {
        match self {
            Self::Metadata { metadata } => metadata.conversation_id,
            Self::Done { metadata } => metadata.as_ref().and_then(|m| m.conversation_id),
            Self::Token { .. } | Self::Error { .. } => None,
        }
    }

    /// Short name of the chunk type, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Token { .. } => "token",
            Self::Metadata { .. } => "metadata",
            Self::Done { .. } => "done",
            Self::Error { .. } => "error",
        }
    }
}
