//! Core services.
//!
//! Services orchestrate ports; they never touch HTTP or audio directly.

pub mod history_loader;

pub use history_loader::{ConversationHistoryLoader, Hydration};
