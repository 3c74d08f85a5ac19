//! History command handler.
//!
//! Prints the current conversation as stored on the server.

use std::sync::Arc;

use anyhow::Result;
use mrwhite_core::ConversationHistoryLoader;

use crate::bootstrap::CliContext;
use crate::presentation::{format_timestamp, print_separator, role_label};

/// Execute the history command.
///
/// `limit` defaults to the `history_page_size` setting.
pub async fn execute(ctx: &CliContext, limit: Option<u32>) -> Result<()> {
    let limit = limit.unwrap_or_else(|| ctx.settings().effective_history_page_size());
    if limit == 0 {
        return Err(crate::CliError::Arguments("--limit must be at least 1".to_string()).into());
    }

    let loader = ConversationHistoryLoader::new(Arc::clone(&ctx.backend().history));
    let hydration = loader.load_or_error(limit).await?;

    let Some(conversation_id) = hydration.conversation_id else {
        println!("No conversation yet.");
        println!("Use 'mrwhite chat' to start one.");
        return Ok(());
    };

    println!(
        "Conversation #{conversation_id} ({} message(s)):",
        hydration.messages.len()
    );
    print_separator(60);

    for message in &hydration.messages {
        println!(
            "[{}] {}:",
            format_timestamp(&message.timestamp),
            role_label(message.role)
        );
        println!("{}", message.content);
        if !message.documents.is_empty() {
            let names: Vec<&str> = message
                .documents
                .iter()
                .map(|d| d.filename.as_str())
                .collect();
            println!("  attached: {}", names.join(", "));
        }
        println!();
    }

    Ok(())
}
