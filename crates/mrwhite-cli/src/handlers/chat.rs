//! Chat command handler.
//!
//! Runs an interactive session against a [`ChatSession`]: lines typed at the
//! prompt become messages, and the session's events are rendered as the
//! reply streams in. Ctrl-C while a reply is streaming stops it; at the
//! prompt it just clears the line.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Result, anyhow};
use indicatif::ProgressBar;
use mrwhite_chat::{
    ChatEvent, ChatSession, ChatSessionHandle, SendRequest, SessionConfig, SessionDeps,
    SessionState,
};
use mrwhite_core::{AppEvent, ChannelEmitter, ChatMessage, MessageRole};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;

use crate::bootstrap::CliContext;
use crate::presentation::{role_label, spinner, truncate_string};

const PROMPT: &str = "you> ";

/// Messages of a restored conversation echoed on start.
const HISTORY_PREVIEW: usize = 4;

/// Arguments for the chat command.
#[derive(Debug, Clone, Default)]
pub struct ChatArgs {
    pub voice: bool,
    pub mode: Option<String>,
    pub dog: Option<i64>,
    /// Sent with the first message only.
    pub docs: Vec<i64>,
}

/// Execute the chat command.
pub async fn execute(ctx: &CliContext, args: ChatArgs) -> Result<()> {
    let mut config = SessionConfig::from(ctx.settings());
    if args.voice {
        config = config.with_voice_mode(true);
    }
    if args.mode.is_some() {
        config = config.with_active_mode(args.mode);
    }
    if args.dog.is_some() {
        config = config.with_dog_profile(args.dog);
    }
    let voice = config.voice_mode;

    let (emitter, mut app_events) = ChannelEmitter::new();
    let deps = SessionDeps::new(ctx.backend(), Arc::clone(&ctx.speaker), Arc::new(emitter));
    let (session, mut events) = ChatSession::spawn(deps, config);

    let loading = spinner("Loading conversation...");
    let restored = wait_for_history(&mut events).await;
    loading.finish_and_clear();
    print_welcome(&restored, voice, &ctx.audio_sink);

    let mut reader = LineReader::spawn();
    let mut pending_docs = args.docs;

    loop {
        let line = match reader.read_line().await {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Interrupted => continue,
            ReadOutcome::Eof => break,
            ReadOutcome::Failed(e) => {
                session.shutdown().await;
                return Err(anyhow!("Failed to read input: {e}"));
            }
        };

        match parse_repl(&line) {
            ReplInput::Empty => {}
            ReplInput::Quit => break,
            ReplInput::Help => print_help(),
            ReplInput::Invalid(message) => eprintln!("{message}"),
            ReplInput::Voice(on) => {
                session.set_voice_mode(on)?;
                println!("Voice {}.", if on { "on" } else { "off" });
            }
            ReplInput::Clear { memory } => match session.clear(memory).await {
                Ok(()) if memory => println!("✓ Conversation and memory cleared."),
                Ok(()) => println!("✓ Conversation cleared."),
                Err(e) => eprintln!("Could not clear: {e}"),
            },
            ReplInput::Message(text) => {
                drain(&mut events);
                let request =
                    SendRequest::text(text).with_document_ids(std::mem::take(&mut pending_docs));
                if let Err(e) = session.send_message(request).await {
                    eprintln!("Could not send: {e}");
                    continue;
                }
                render_turn(&session, &mut events).await?;
                report_app_events(ctx, &mut app_events).await;
            }
        }
    }

    session.shutdown().await;
    println!("Bye!");
    Ok(())
}

// ── REPL input ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplInput {
    Empty,
    Message(String),
    Voice(bool),
    Clear { memory: bool },
    Help,
    Quit,
    Invalid(String),
}

fn parse_repl(line: &str) -> ReplInput {
    let line = line.trim();
    if line.is_empty() {
        return ReplInput::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return ReplInput::Message(line.to_string());
    };

    let mut words = command.split_whitespace();
    let name = words.next().unwrap_or_default();
    let rest: Vec<&str> = words.collect();

    match (name, rest.as_slice()) {
        ("quit" | "exit", []) => ReplInput::Quit,
        ("help" | "?", []) => ReplInput::Help,
        ("voice", ["on"]) => ReplInput::Voice(true),
        ("voice", ["off"]) => ReplInput::Voice(false),
        ("voice", _) => ReplInput::Invalid("Usage: /voice on|off".to_string()),
        ("clear", []) => ReplInput::Clear { memory: false },
        ("clear", ["--memory"]) => ReplInput::Clear { memory: true },
        ("clear", _) => ReplInput::Invalid("Usage: /clear [--memory]".to_string()),
        _ => ReplInput::Invalid(format!("Unknown command /{name}. Type /help for commands.")),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /voice on|off      narrate replies aloud");
    println!("  /clear [--memory]  start a new conversation");
    println!("  /help              show this help");
    println!("  /quit              leave the chat");
    println!("Press Ctrl-C while Mr. White is answering to stop the reply.");
}

// ── Line reader ────────────────────────────────────────────────────

enum ReadOutcome {
    Line(String),
    Interrupted,
    Eof,
    Failed(String),
}

/// Line editor on its own thread.
///
/// The thread only prompts when asked, so replies rendered in between are
/// never interleaved with the prompt.
struct LineReader {
    ready: std::sync::mpsc::Sender<()>,
    lines: mpsc::UnboundedReceiver<ReadOutcome>,
}

impl LineReader {
    fn spawn() -> Self {
        let (ready_tx, ready_rx) = std::sync::mpsc::channel::<()>();
        let (line_tx, line_rx) = mpsc::unbounded_channel();

        std::thread::spawn(move || {
            let mut editor = match DefaultEditor::new() {
                Ok(editor) => editor,
                Err(e) => {
                    line_tx.send(ReadOutcome::Failed(e.to_string())).ok();
                    return;
                }
            };

            while ready_rx.recv().is_ok() {
                let outcome = match editor.readline(PROMPT) {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            editor.add_history_entry(line.as_str()).ok();
                        }
                        ReadOutcome::Line(line)
                    }
                    Err(ReadlineError::Interrupted) => ReadOutcome::Interrupted,
                    Err(ReadlineError::Eof) => ReadOutcome::Eof,
                    Err(e) => ReadOutcome::Failed(e.to_string()),
                };
                if line_tx.send(outcome).is_err() {
                    break;
                }
            }
        });

        Self {
            ready: ready_tx,
            lines: line_rx,
        }
    }

    async fn read_line(&mut self) -> ReadOutcome {
        // A dead thread has already queued its failure.
        self.ready.send(()).ok();
        self.lines.recv().await.unwrap_or(ReadOutcome::Eof)
    }
}

// ── Rendering ──────────────────────────────────────────────────────

/// Wait for the session to finish hydrating.
async fn wait_for_history(events: &mut mpsc::UnboundedReceiver<ChatEvent>) -> Vec<ChatMessage> {
    while let Some(event) = events.recv().await {
        if let ChatEvent::HistoryLoaded { messages, .. } = event {
            return messages;
        }
    }
    Vec::new()
}

fn print_welcome(restored: &[ChatMessage], voice: bool, audio_sink: &str) {
    println!("Mr. White is ready. Type /help for commands.");
    if voice {
        println!("Voice on, narration goes to {audio_sink}.");
    }
    if restored.is_empty() {
        println!();
        return;
    }

    println!("Continuing your conversation ({} messages):", restored.len());
    let skip = restored.len().saturating_sub(HISTORY_PREVIEW);
    for message in &restored[skip..] {
        println!(
            "  {}: {}",
            role_label(message.role),
            truncate_string(&message.content.replace('\n', " "), 100)
        );
    }
    println!();
}

/// Print one reply as it streams, until the session is idle again.
async fn render_turn(
    session: &ChatSessionHandle,
    events: &mut mpsc::UnboundedReceiver<ChatEvent>,
) -> Result<()> {
    let mut thinking: Option<ProgressBar> = None;
    let mut printing = false;
    let mut stdout = io::stdout();

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);
    let mut listening = true;

    loop {
        tokio::select! {
            result = &mut interrupt, if listening => match result {
                Ok(()) => {
                    session.stop();
                    interrupt.set(tokio::signal::ctrl_c());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Ctrl-C handler unavailable");
                    listening = false;
                }
            },
            event = events.recv() => {
                let Some(event) = event else {
                    if let Some(pb) = thinking.take() {
                        pb.finish_and_clear();
                    }
                    return Err(anyhow!("Chat session ended unexpectedly"));
                };

                match event {
                    ChatEvent::WaitingChanged(true) => {
                        thinking = Some(spinner("Mr. White is thinking..."));
                    }
                    ChatEvent::WaitingChanged(false) => {
                        if let Some(pb) = thinking.take() {
                            pb.finish_and_clear();
                        }
                    }
                    ChatEvent::MessageAppended(message) if message.role == MessageRole::Assistant => {
                        if let Some(pb) = thinking.take() {
                            pb.finish_and_clear();
                        }
                        if message.is_error {
                            eprintln!("! {}", message.content);
                        } else {
                            print!("{}: {}", role_label(message.role), message.content);
                            stdout.flush().ok();
                            printing = true;
                        }
                    }
                    ChatEvent::MessageUpdated { delta, .. } => {
                        print!("{delta}");
                        stdout.flush().ok();
                    }
                    ChatEvent::StateChanged(SessionState::Cancelled) => {
                        if let Some(pb) = thinking.take() {
                            pb.finish_and_clear();
                        }
                        print!(" [stopped]");
                        stdout.flush().ok();
                        printing = true;
                    }
                    ChatEvent::StateChanged(SessionState::Idle) => break,
                    other => tracing::trace!(?other, "Chat event"),
                }
            }
        }
    }

    if printing {
        println!();
    }
    println!();
    Ok(())
}

/// Discard events left over from earlier commands.
fn drain(events: &mut mpsc::UnboundedReceiver<ChatEvent>) {
    while let Ok(event) = events.try_recv() {
        tracing::trace!(?event, "Skipping stale chat event");
    }
}

/// React to application events raised during the last turn.
async fn report_app_events(ctx: &CliContext, app_events: &mut mpsc::UnboundedReceiver<AppEvent>) {
    let mut refresh_credits = false;
    while let Ok(event) = app_events.try_recv() {
        match event {
            AppEvent::CreditsRefreshRequested => refresh_credits = true,
            AppEvent::ConversationIdentified { conversation_id } => {
                tracing::debug!(conversation_id, "Conversation identified");
            }
            AppEvent::ConversationCleared { .. } => {}
        }
    }

    if !refresh_credits {
        return;
    }
    match ctx.backend().credits.balance().await {
        Ok(balance) if balance.is_subscribed => {}
        Ok(balance) if balance.can_chat() => {
            println!("({} credits left)", balance.credits);
        }
        Ok(_) => eprintln!("You are out of credits. Top up to keep chatting."),
        Err(e) => tracing::debug!(error = %e, "Credit refresh failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(
            parse_repl("  Can my dog eat grapes?  "),
            ReplInput::Message("Can my dog eat grapes?".to_string())
        );
        assert_eq!(parse_repl("   "), ReplInput::Empty);
    }

    #[test]
    fn slash_commands() {
        assert_eq!(parse_repl("/voice on"), ReplInput::Voice(true));
        assert_eq!(parse_repl("/voice off"), ReplInput::Voice(false));
        assert_eq!(parse_repl("/clear"), ReplInput::Clear { memory: false });
        assert_eq!(parse_repl("/clear --memory"), ReplInput::Clear { memory: true });
        assert_eq!(parse_repl("/quit"), ReplInput::Quit);
        assert_eq!(parse_repl("/exit"), ReplInput::Quit);
        assert_eq!(parse_repl("/help"), ReplInput::Help);
    }

    #[test]
    fn bad_commands_explain_themselves() {
        assert!(matches!(parse_repl("/voice"), ReplInput::Invalid(m) if m.contains("/voice on|off")));
        assert!(matches!(parse_repl("/clear all"), ReplInput::Invalid(m) if m.contains("--memory")));
        assert!(matches!(parse_repl("/fetch"), ReplInput::Invalid(m) if m.contains("/fetch")));
        assert!(matches!(parse_repl("/"), ReplInput::Invalid(_)));
    }
}
