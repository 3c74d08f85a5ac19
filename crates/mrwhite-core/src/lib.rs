#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    ChatMessage, ChatRequest, ChatStatus, ChunkMetadata, ClearChatRequest, CreditBalance,
    DocumentRef, DogProfile, HistoryMessage, MessageRole, StreamChunk,
};
pub use events::AppEvent;
pub use paths::{PathError, config_root, ensure_directory, settings_path};
pub use ports::{
    ApiError, AppEventEmitter, Backend, ChannelEmitter, ChatHistoryPort, ChatStreamPort,
    ChunkStream, CoreError, CreditsPort, DocumentPort, DogProfilePort, NoopEmitter,
    SpeechSynthesisPort,
};
pub use services::{ConversationHistoryLoader, Hydration};
pub use settings::{
    DEFAULT_API_BASE_URL, DEFAULT_HISTORY_PAGE_SIZE, Settings, SettingsError, SettingsUpdate,
    validate_settings,
};
