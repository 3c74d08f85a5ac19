//! Domain types for the Mr. White client.
//!
//! Pure data: no I/O and no adapter types in any signature.

pub mod account;
pub mod chat;
pub mod history;
pub mod stream;

pub use account::{CreditBalance, DocumentRef, DogProfile};
pub use chat::{ChatMessage, ChatRequest, MessageRole};
pub use history::{ChatStatus, ClearChatRequest, HistoryMessage, HistoryPage, parse_timestamp};
pub use stream::{ChunkMetadata, StreamChunk};
