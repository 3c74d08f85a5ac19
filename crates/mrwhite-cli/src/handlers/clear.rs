//! Clear command handler.

use anyhow::Result;
use mrwhite_core::ClearChatRequest;

use crate::bootstrap::CliContext;
use crate::utils::input::prompt_confirmation;

/// Execute the clear command.
///
/// Looks up the active conversation first; there is nothing to clear
/// without one.
pub async fn execute(ctx: &CliContext, memory: bool, force: bool) -> Result<()> {
    let history = &ctx.backend().history;
    let status = history.status().await?;

    let Some(conversation_id) = status.existing_conversation() else {
        println!("No conversation to clear.");
        return Ok(());
    };

    if !force {
        let prompt = if memory {
            "Clear the conversation and everything Mr. White remembers about you?"
        } else {
            "Clear the current conversation?"
        };
        if !prompt_confirmation(prompt)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    history
        .clear(ClearChatRequest {
            conversation_id,
            clear_memory: memory,
        })
        .await?;

    if memory {
        println!("✓ Conversation and memory cleared.");
    } else {
        println!("✓ Conversation cleared.");
    }
    Ok(())
}
