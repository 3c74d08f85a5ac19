//! Chat session actor.
//!
//! One tokio task owns a chat session: the message list, the conversation
//! id, the state flags and the playback gate. Callers talk to it through a
//! [`ChatSessionHandle`] (commands in) and an unbounded [`ChatEvent`]
//! receiver (changes out). Nothing else mutates session state.
//!
//! ```text
//!  ChatSessionHandle ──Command──► SessionActor ──ChatEvent──► UI
//!                                     │
//!                         ChatStreamPort / ChatHistoryPort
//!                                     │
//!                               PlaybackGate ──► Speaker
//! ```

mod turn;

use std::sync::Arc;

use mrwhite_core::{
    AppEvent, AppEventEmitter, Backend, ChatHistoryPort, ChatMessage, ChatRequest, ChatStreamPort,
    ClearChatRequest, ConversationHistoryLoader, DocumentRef,
};
use mrwhite_voice::{PlaybackGate, Speaker};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::events::ChatEvent;
use crate::state::SessionState;

// ── Dependencies ───────────────────────────────────────────────────

/// Collaborators injected into a session.
#[derive(Clone)]
pub struct SessionDeps {
    pub chat: Arc<dyn ChatStreamPort>,
    pub history: Arc<dyn ChatHistoryPort>,
    pub speaker: Arc<dyn Speaker>,
    pub events: Arc<dyn AppEventEmitter>,
}

impl SessionDeps {
    /// Take the chat ports from an assembled backend.
    pub fn new(
        backend: &Backend,
        speaker: Arc<dyn Speaker>,
        events: Arc<dyn AppEventEmitter>,
    ) -> Self {
        Self {
            chat: Arc::clone(&backend.chat),
            history: Arc::clone(&backend.history),
            speaker,
            events,
        }
    }
}

// ── Requests and snapshots ─────────────────────────────────────────

/// One user message to send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendRequest {
    pub content: String,
    /// Documents shown on the user message and sent along.
    pub attachments: Vec<DocumentRef>,
    /// Extra document ids to send without displaying them.
    pub document_ids: Vec<i64>,
    /// Override the session's voice mode for this reply only.
    pub voice: Option<bool>,
}

impl SendRequest {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<DocumentRef>) -> Self {
        self.attachments = attachments;
        self
    }

    #[must_use]
    pub fn with_document_ids(mut self, ids: Vec<i64>) -> Self {
        self.document_ids = ids;
        self
    }

    #[must_use]
    pub const fn with_voice(mut self, on: bool) -> Self {
        self.voice = Some(on);
        self
    }

    fn has_documents(&self) -> bool {
        !self.attachments.is_empty() || !self.document_ids.is_empty()
    }

    /// Attachment ids first, then the extra ids, without duplicates.
    fn all_document_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = Vec::with_capacity(self.attachments.len() + self.document_ids.len());
        for id in self
            .attachments
            .iter()
            .map(|d| d.id)
            .chain(self.document_ids.iter().copied())
        {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

/// Point-in-time copy of the session's observable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub conversation_id: Option<i64>,
    pub messages: Vec<ChatMessage>,
    pub is_waiting: bool,
    pub is_speaking: bool,
    pub voice_mode: bool,
}

impl SessionSnapshot {
    pub const fn is_streaming(&self) -> bool {
        self.state.is_busy()
    }
}

// ── Commands ───────────────────────────────────────────────────────

enum Command {
    Send {
        request: SendRequest,
        ack: oneshot::Sender<Result<(), SessionError>>,
    },
    Stop,
    SetVoice(bool),
    SetMode(Option<String>),
    SetProfile(Option<i64>),
    Clear {
        clear_memory: bool,
        ack: oneshot::Sender<Result<(), SessionError>>,
    },
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

// ── Handle ─────────────────────────────────────────────────────────

/// Caller side of a running chat session.
///
/// Dropping the handle without [`shutdown`](Self::shutdown) also ends the
/// session once its current turn stops.
pub struct ChatSessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl ChatSessionHandle {
    /// Send a user message and start streaming the reply.
    ///
    /// Resolves once the message has been accepted, not when the reply ends;
    /// follow the event stream for progress.
    pub async fn send_message(&self, request: SendRequest) -> Result<(), SessionError> {
        let (ack, rx) = oneshot::channel();
        self.command(Command::Send { request, ack })?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    /// Stop the reply in progress. A no-op when nothing is streaming.
    pub fn stop(&self) {
        if self.command(Command::Stop).is_err() {
            tracing::debug!("Stop ignored, chat session closed");
        }
    }

    pub fn set_voice_mode(&self, on: bool) -> Result<(), SessionError> {
        self.command(Command::SetVoice(on))
    }

    /// Assistant mode sent with the next message.
    pub fn set_active_mode(&self, mode: Option<String>) -> Result<(), SessionError> {
        self.command(Command::SetMode(mode))
    }

    /// Dog profile sent with the next message.
    pub fn set_dog_profile(&self, id: Option<i64>) -> Result<(), SessionError> {
        self.command(Command::SetProfile(id))
    }

    /// Clear the conversation on the server and empty the message list.
    ///
    /// Refused with [`SessionError::Busy`] while a reply is running.
    pub async fn clear(&self, clear_memory: bool) -> Result<(), SessionError> {
        let (ack, rx) = oneshot::channel();
        self.command(Command::Clear { clear_memory, ack })?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.command(Command::Snapshot(tx))?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop any running turn, end the session task and wait for it.
    pub async fn shutdown(self) {
        if self.commands.send(Command::Shutdown).is_err() {
            tracing::debug!("Chat session already closed");
        }
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Chat session task ended abnormally");
        }
    }

    fn command(&self, command: Command) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .map_err(|_| SessionError::Closed)
    }
}

// ── Session ────────────────────────────────────────────────────────

/// Entry point for starting chat sessions.
pub struct ChatSession;

impl ChatSession {
    /// Start a session task.
    ///
    /// The task first hydrates the message list from the server, then serves
    /// commands until shut down. Must be called from within a tokio runtime.
    pub fn spawn(
        deps: SessionDeps,
        config: SessionConfig,
    ) -> (ChatSessionHandle, mpsc::UnboundedReceiver<ChatEvent>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let actor = SessionActor {
            gate: PlaybackGate::new(Arc::clone(&deps.speaker)),
            deps,
            config,
            commands: command_rx,
            event_tx,
            state: SessionState::Idle,
            messages: Vec::new(),
            conversation_id: None,
            waiting: false,
            speaking: false,
            shutting_down: false,
        };
        let task = tokio::spawn(actor.run());

        (
            ChatSessionHandle {
                commands: command_tx,
                task,
            },
            event_rx,
        )
    }
}

/// Task-owned session state.
struct SessionActor {
    deps: SessionDeps,
    config: SessionConfig,
    commands: mpsc::UnboundedReceiver<Command>,
    event_tx: mpsc::UnboundedSender<ChatEvent>,
    gate: PlaybackGate,
    state: SessionState,
    messages: Vec<ChatMessage>,
    conversation_id: Option<i64>,
    waiting: bool,
    speaking: bool,
    shutting_down: bool,
}

impl SessionActor {
    async fn run(mut self) {
        self.hydrate().await;

        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Send { request, ack } => {
                    if let Err(e) = validate(&request) {
                        ack.send(Err(e)).ok();
                        continue;
                    }
                    ack.send(Ok(())).ok();
                    self.run_turn(request).await;
                }
                Command::Stop => tracing::debug!("Nothing streaming, stop ignored"),
                Command::SetVoice(on) => self.set_voice_mode(on),
                Command::SetMode(mode) => self.config.active_mode = mode,
                Command::SetProfile(id) => self.config.dog_profile_id = id,
                Command::Clear { clear_memory, ack } => {
                    let result = self.clear(clear_memory).await;
                    ack.send(result).ok();
                }
                Command::Snapshot(tx) => {
                    tx.send(self.snapshot()).ok();
                }
                Command::Shutdown => break,
            }

            if self.shutting_down {
                break;
            }
        }

        self.gate.detach();
        tracing::info!("Chat session closed");
    }

    async fn hydrate(&mut self) {
        let loader = ConversationHistoryLoader::new(Arc::clone(&self.deps.history));
        let hydration = loader.load(self.config.history_page_size).await;

        self.messages = hydration.messages;
        self.conversation_id = hydration.conversation_id;
        if let Some(conversation_id) = self.conversation_id {
            self.deps
                .events
                .emit(AppEvent::ConversationIdentified { conversation_id });
        }

        tracing::info!(
            conversation_id = ?self.conversation_id,
            count = self.messages.len(),
            "Chat session ready"
        );
        self.emit(ChatEvent::HistoryLoaded {
            conversation_id: self.conversation_id,
            messages: self.messages.clone(),
        });
    }

    async fn clear(&mut self, clear_memory: bool) -> Result<(), SessionError> {
        let memory_cleared = match self.conversation_id {
            Some(conversation_id) => {
                self.deps
                    .history
                    .clear(ClearChatRequest {
                        conversation_id,
                        clear_memory,
                    })
                    .await?;
                self.deps.events.emit(AppEvent::ConversationCleared {
                    conversation_id,
                    memory_cleared: clear_memory,
                });
                clear_memory
            }
            None => {
                tracing::debug!("No conversation on the server, clearing locally");
                false
            }
        };

        self.messages.clear();
        tracing::info!(memory_cleared, "Conversation cleared");
        self.emit(ChatEvent::Cleared { memory_cleared });
        Ok(())
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            conversation_id: self.conversation_id,
            messages: self.messages.clone(),
            is_waiting: self.waiting,
            is_speaking: self.speaking,
            voice_mode: self.config.voice_mode,
        }
    }

    fn set_voice_mode(&mut self, on: bool) {
        if self.config.voice_mode != on {
            tracing::debug!(on, "Voice mode changed");
            self.config.voice_mode = on;
        }
    }

    fn chat_request(&self, request: &SendRequest) -> ChatRequest {
        ChatRequest {
            message: request.content.clone(),
            active_mode: self.config.active_mode.clone(),
            dog_profile_id: self.config.dog_profile_id,
            document_ids: request.all_document_ids(),
        }
    }

    /// Record a conversation id carried by a stream chunk.
    fn identify_conversation(&mut self, conversation_id: i64) {
        if self.conversation_id == Some(conversation_id) {
            return;
        }
        tracing::debug!(conversation_id, "Conversation identified");
        self.conversation_id = Some(conversation_id);
        self.deps
            .events
            .emit(AppEvent::ConversationIdentified { conversation_id });
        self.emit(ChatEvent::ConversationIdentified(conversation_id));
    }

    fn push_message(&mut self, message: ChatMessage) {
        self.messages.push(message.clone());
        self.emit(ChatEvent::MessageAppended(message));
    }

    // ── Flags ──────────────────────────────────────────────────────

    /// Transition to a new state and emit a state-change event.
    fn set_state(&mut self, new_state: SessionState) {
        if self.state != new_state {
            tracing::debug!(old = %self.state, new = %new_state, "Chat state transition");
            self.state = new_state;
            self.emit(ChatEvent::StateChanged(new_state));
        }
    }

    fn set_waiting(&mut self, waiting: bool) {
        if self.waiting != waiting {
            self.waiting = waiting;
            self.emit(ChatEvent::WaitingChanged(waiting));
        }
    }

    /// Mirror the gate's speaking flag into the session.
    fn sync_speaking(&mut self) {
        let speaking = self.gate.is_speaking();
        if self.speaking != speaking {
            self.speaking = speaking;
            self.emit(ChatEvent::SpeakingChanged(speaking));
        }
    }

    /// Emit a chat event (best-effort: a dropped receiver is logged and ignored).
    fn emit(&self, event: ChatEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::debug!("Chat event receiver dropped");
        }
    }
}

fn validate(request: &SendRequest) -> Result<(), SessionError> {
    if request.content.trim().is_empty() && !request.has_documents() {
        return Err(SessionError::EmptyMessage);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: i64) -> DocumentRef {
        DocumentRef {
            id,
            filename: format!("doc-{id}.pdf"),
            file_type: None,
            url: None,
        }
    }

    #[test]
    fn blank_text_without_documents_is_rejected() {
        assert_eq!(
            validate(&SendRequest::text("  \n")),
            Err(SessionError::EmptyMessage)
        );
        assert_eq!(validate(&SendRequest::text("Hi")), Ok(()));
    }

    #[test]
    fn documents_alone_are_enough() {
        assert_eq!(
            validate(&SendRequest::text("").with_document_ids(vec![3])),
            Ok(())
        );
        assert_eq!(
            validate(&SendRequest::text("").with_attachments(vec![doc(1)])),
            Ok(())
        );
    }

    #[test]
    fn document_ids_are_merged_in_order_without_duplicates() {
        let request = SendRequest::text("See attached")
            .with_attachments(vec![doc(4), doc(2)])
            .with_document_ids(vec![2, 9, 4, 7]);
        assert_eq!(request.all_document_ids(), vec![4, 2, 9, 7]);
    }
}
