//! Change notifications for the presentation layer.
//!
//! The session owns the message list; views subscribe to these events and
//! mirror whatever they need.

use mrwhite_core::ChatMessage;

use crate::state::SessionState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Session state transition.
    StateChanged(SessionState),

    /// Prior conversation restored on start. Empty on a cold start.
    HistoryLoaded {
        conversation_id: Option<i64>,
        messages: Vec<ChatMessage>,
    },

    /// A message was added to the end of the list.
    MessageAppended(ChatMessage),

    /// The streaming assistant message grew by `delta`.
    MessageUpdated {
        id: String,
        content: String,
        delta: String,
    },

    /// "Waiting for the first token" indicator.
    WaitingChanged(bool),

    /// Narration audio started or stopped.
    SpeakingChanged(bool),

    /// The server assigned or confirmed the conversation id.
    ConversationIdentified(i64),

    /// The message list was emptied.
    Cleared { memory_cleared: bool },
}
