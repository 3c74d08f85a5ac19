//! One request/response cycle.
//!
//! A turn runs inside the session task: it appends the user message, opens
//! the reply stream and applies chunks strictly in arrival order. The loop
//! races the stream against the cancellation token, incoming commands, the
//! playback gate and the typing delay. Every branch is cancel-safe, so
//! losing a race never drops a chunk or a narration result.
//!
//! Cancellation is checked at the top of every iteration, which covers both
//! "before a chunk" and "after the typing delay". Once the token fires,
//! the message list is not touched again for this turn.

use std::collections::VecDeque;
use std::ops::Range;
use std::sync::Arc;

use futures_util::StreamExt;
use mrwhite_core::{AppEvent, ChatMessage, ChatRequest, ChunkStream, StreamChunk};
use mrwhite_voice::{
    NarrationOutcome, find_speakable_segment, flush_spans, next_narration_span, spoken_len,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::{Command, SendRequest, SessionActor};
use crate::error::SessionError;
use crate::events::ChatEvent;
use crate::state::SessionState;

/// Per-turn scratch state, dropped when the turn ends.
struct Turn {
    /// Replaced for every turn so a stale stop cannot reach a new reply.
    token: CancellationToken,
    voice: bool,
    buffer: String,
    assistant_id: Option<String>,
    /// End of the current typing pause.
    resume_at: Option<Instant>,
    /// Buffer end of the span being narrated.
    narrating_to: Option<usize>,
    /// Buffer end of the last span that failed to play. Until the flush,
    /// it is only retried together with the next complete sentence.
    retry_after: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnOutcome {
    Completed,
    Failed,
    Cancelled,
}

impl SessionActor {
    pub(super) async fn run_turn(&mut self, request: SendRequest) {
        let mut turn = Turn {
            token: CancellationToken::new(),
            voice: request.voice.unwrap_or(self.config.voice_mode),
            buffer: String::new(),
            assistant_id: None,
            resume_at: None,
            narrating_to: None,
            retry_after: None,
        };
        self.gate.reset();
        self.sync_speaking();

        let chat_request = self.chat_request(&request);
        tracing::info!(
            chars = request.content.chars().count(),
            documents = chat_request.document_ids.len(),
            voice = turn.voice,
            "Sending chat message"
        );

        self.push_message(ChatMessage::user(request.content, request.attachments));
        self.set_state(SessionState::Streaming);
        self.set_waiting(true);

        let outcome = self.stream_reply(&mut turn, chat_request).await;
        self.finish_turn(outcome, &turn);
    }

    async fn stream_reply(
        &mut self,
        turn: &mut Turn,
        request: ChatRequest,
    ) -> TurnOutcome {
        let chat = Arc::clone(&self.deps.chat);
        let opening = chat.open_stream(request);
        tokio::pin!(opening);

        let mut stream: ChunkStream = loop {
            tokio::select! {
                biased;
                () = turn.token.cancelled() => return TurnOutcome::Cancelled,
                command = self.commands.recv() => self.handle_during_turn(command, turn),
                opened = &mut opening => match opened {
                    Ok(stream) => break stream,
                    Err(e) => {
                        tracing::error!(error = %e, "Chat request failed");
                        self.push_message(ChatMessage::assistant_error(e.to_string()));
                        return TurnOutcome::Failed;
                    }
                },
            }
        };

        loop {
            if turn.token.is_cancelled() {
                return TurnOutcome::Cancelled;
            }

            let narrating = self.gate.is_busy();
            let paused = turn.resume_at.is_some();
            let resume_at = turn.resume_at.unwrap_or_else(Instant::now);

            tokio::select! {
                biased;
                () = turn.token.cancelled() => return TurnOutcome::Cancelled,
                command = self.commands.recv() => self.handle_during_turn(command, turn),
                outcome = self.gate.finished(), if narrating => {
                    if matches!(outcome, NarrationOutcome::Failed(_)) {
                        turn.retry_after = turn.narrating_to;
                    }
                    turn.narrating_to = None;
                    self.sync_speaking();
                    self.narrate_ready(turn);
                }
                () = tokio::time::sleep_until(resume_at), if paused => turn.resume_at = None,
                chunk = stream.next(), if !paused => match chunk {
                    Some(Ok(StreamChunk::Token { content })) => self.apply_token(turn, &content),
                    Some(Ok(chunk @ StreamChunk::Metadata { .. })) => {
                        if let Some(id) = chunk.conversation_id() {
                            self.identify_conversation(id);
                        }
                    }
                    Some(Ok(chunk @ StreamChunk::Done { .. })) => {
                        if let Some(id) = chunk.conversation_id() {
                            self.identify_conversation(id);
                        }
                        break;
                    }
                    Some(Ok(StreamChunk::Error { error })) => {
                        tracing::error!(error = %error, "Chat stream reported an error");
                        self.push_message(ChatMessage::assistant_error(error));
                        return TurnOutcome::Failed;
                    }
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Chat stream failed");
                        self.push_message(ChatMessage::assistant_error(e.to_string()));
                        return TurnOutcome::Failed;
                    }
                    None => {
                        tracing::debug!("Chat stream closed without done");
                        break;
                    }
                },
            }
        }

        drop(stream);
        tracing::debug!(chars = turn.buffer.len(), "Reply complete");
        self.flush_speech(turn).await
    }

    /// Append a token to the reply and narrate what became speakable.
    fn apply_token(&mut self, turn: &mut Turn, content: &str) {
        self.set_waiting(false);
        turn.buffer.push_str(content);

        if let Some(id) = turn.assistant_id.clone() {
            if let Some(message) = self.messages.iter_mut().rev().find(|m| m.id == id) {
                message.content.clone_from(&turn.buffer);
            }
            self.emit(ChatEvent::MessageUpdated {
                id,
                content: turn.buffer.clone(),
                delta: content.to_string(),
            });
        } else {
            let message = ChatMessage::assistant(turn.buffer.clone());
            turn.assistant_id = Some(message.id.clone());
            self.push_message(message);
        }

        self.narrate_ready(turn);

        if !self.config.typing_delay.is_zero() {
            turn.resume_at = Some(Instant::now() + self.config.typing_delay);
        }
    }

    /// Start narrating the next complete span, if the gate is free.
    ///
    /// A span that already failed is not sent again on its own: it waits
    /// until another sentence completes after it, or for the flush.
    fn narrate_ready(&mut self, turn: &mut Turn) {
        if !turn.voice {
            return;
        }

        while !self.gate.is_busy() {
            let offset = self.gate.last_spoken_offset();
            let unspoken = &turn.buffer[offset..];
            let Some(mut end) = next_narration_span(unspoken, self.config.min_narration_chars)
            else {
                break;
            };

            if let Some(failed_to) = turn.retry_after.filter(move |&to| offset + end <= to) {
                let Some(next) = find_speakable_segment(&turn.buffer[failed_to..]) else {
                    tracing::trace!(failed_to, "Waiting for a new sentence before retrying");
                    break;
                };
                end = failed_to + next - offset;
                tracing::debug!(failed_to, "Retrying failed narration with the next sentence");
            }

            turn.narrating_to = Some(offset + end);
            if self.gate.try_narrate(&turn.buffer[offset..offset + end], end)
                && !self.gate.is_busy()
            {
                turn.narrating_to = None;
            }
        }
        self.sync_speaking();
    }

    /// Narrate the unspoken remainder once the stream has ended.
    ///
    /// Waits for the narration in flight, then speaks the remainder one
    /// sentence at a time. Stops at the first failed sentence.
    async fn flush_speech(&mut self, turn: &mut Turn) -> TurnOutcome {
        if !turn.voice {
            return TurnOutcome::Completed;
        }
        self.set_state(SessionState::AwaitingSpeechFlush);

        let min_flush = self.config.min_flush_chars;
        let mut queue: Option<VecDeque<Range<usize>>> = None;

        loop {
            if turn.token.is_cancelled() {
                return TurnOutcome::Cancelled;
            }
            if !turn.voice {
                return TurnOutcome::Completed;
            }

            if !self.gate.is_busy() {
                let offset = self.gate.last_spoken_offset();
                let spans = queue.get_or_insert_with(|| {
                    let remainder = &turn.buffer[offset..];
                    if spoken_len(remainder) < min_flush {
                        tracing::debug!(remainder, "Remainder too short to narrate");
                        return VecDeque::new();
                    }
                    flush_spans(remainder)
                        .into_iter()
                        .map(|span| span.start + offset..span.end + offset)
                        .collect()
                });

                let Some(span) = spans.pop_front() else {
                    return TurnOutcome::Completed;
                };
                let consumed = span.len();
                self.gate.try_narrate(&turn.buffer[span], consumed);
                self.sync_speaking();
                continue;
            }

            tokio::select! {
                biased;
                () = turn.token.cancelled() => return TurnOutcome::Cancelled,
                command = self.commands.recv() => self.handle_during_turn(command, turn),
                outcome = self.gate.finished() => {
                    self.sync_speaking();
                    if matches!(outcome, NarrationOutcome::Failed(_)) && queue.is_some() {
                        tracing::warn!("Narration failed, rest of the reply left unspoken");
                        return TurnOutcome::Completed;
                    }
                }
            }
        }
    }

    /// Serve a command that arrived while a turn is running.
    fn handle_during_turn(&mut self, command: Option<Command>, turn: &mut Turn) {
        match command {
            Some(Command::Stop) => {
                tracing::info!("Reply stopped by user");
                turn.token.cancel();
            }
            Some(Command::Send { ack, .. }) => {
                ack.send(Err(SessionError::AlreadyStreaming)).ok();
            }
            Some(Command::Clear { ack, .. }) => {
                ack.send(Err(SessionError::Busy)).ok();
            }
            Some(Command::SetVoice(on)) => {
                self.set_voice_mode(on);
                // Switching on mid-reply takes effect with the next message.
                if !on {
                    turn.voice = false;
                }
            }
            Some(Command::SetMode(mode)) => self.config.active_mode = mode,
            Some(Command::SetProfile(id)) => self.config.dog_profile_id = id,
            Some(Command::Snapshot(tx)) => {
                tx.send(self.snapshot()).ok();
            }
            Some(Command::Shutdown) | None => {
                tracing::debug!("Session shutting down mid-reply");
                self.shutting_down = true;
                turn.token.cancel();
            }
        }
    }

    /// Settle the flags after a turn, whatever its outcome.
    fn finish_turn(&mut self, outcome: TurnOutcome, turn: &Turn) {
        if outcome == TurnOutcome::Cancelled {
            self.set_state(SessionState::Cancelled);
        }

        // Narration still playing keeps going but stops counting as ours.
        self.gate.detach();
        self.sync_speaking();
        self.set_waiting(false);

        tracing::debug!(
            ?outcome,
            chars = turn.buffer.len(),
            spoken = self.gate.last_spoken_offset(),
            "Turn finished"
        );
        self.deps.events.emit(AppEvent::CreditsRefreshRequested);
        self.set_state(SessionState::Idle);
    }
}
