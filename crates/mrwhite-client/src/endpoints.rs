//! Endpoint paths, relative to the configured base URL.

pub const CHAT_STREAM: &str = "api/v1/chat/stream";
pub const CHAT_STATUS: &str = "api/v1/chat/status";
pub const CHAT_HISTORY: &str = "api/v1/chat/history";
pub const CHAT_CLEAR: &str = "api/v1/chat/clear";
pub const TTS_SPEAK: &str = "api/v1/tts/speak";
pub const CREDITS_BALANCE: &str = "api/v1/credits/balance";
pub const DOGS: &str = "api/v1/dogs";
pub const DOCUMENTS: &str = "api/v1/documents";
pub const DOCUMENTS_UPLOAD: &str = "api/v1/documents/upload";
