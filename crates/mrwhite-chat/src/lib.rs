#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use async_trait as _;

pub mod config;
pub mod error;
pub mod events;
pub mod session;
pub mod state;

pub use config::SessionConfig;
pub use error::SessionError;
pub use events::ChatEvent;
pub use session::{ChatSession, ChatSessionHandle, SendRequest, SessionDeps, SessionSnapshot};
pub use state::SessionState;
