//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Validate CLI-specific input
//!   2. Call backend ports or the chat session
//!   3. Format output for the terminal
//!
//! `config` is the exception: it works on the settings file alone so a
//! broken configuration can still be repaired.

pub mod account;
pub mod chat;
pub mod clear;
pub mod config;
pub mod history;
pub mod say;
