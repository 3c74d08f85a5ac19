//! Say command handler.
//!
//! Narrates arbitrary text through the same speaker and playback gate the
//! chat session uses, one sentence at a time.

use std::sync::Arc;

use anyhow::{Context, Result};
use mrwhite_voice::{NarrationOutcome, PlaybackGate, flush_spans};

use crate::bootstrap::CliContext;
use crate::presentation::{spinner, truncate_string};

/// Execute the say command.
pub async fn execute(ctx: &CliContext, words: &[String]) -> Result<()> {
    let text = words.join(" ");
    let spans = flush_spans(&text);
    if spans.is_empty() {
        return Err(crate::CliError::Arguments("Nothing to say".to_string()).into());
    }

    let mut gate = PlaybackGate::new(Arc::clone(&ctx.speaker));
    let pb = spinner("Speaking...");

    for span in spans {
        let consumed = span.len();
        pb.set_message(truncate_string(text[span.clone()].trim(), 60));
        gate.try_narrate(&text[span], consumed);

        if let NarrationOutcome::Failed(e) = gate.finished().await {
            pb.finish_and_clear();
            return Err(e).context("Narration failed");
        }
    }

    pb.finish_and_clear();
    tracing::debug!(spoken = gate.last_spoken_offset(), "Narration complete");
    println!("✓ Narrated to {}", ctx.audio_sink);
    Ok(())
}
