//! Playback gate: at most one narration at a time, in order.
//!
//! The gate tracks how much of the current assistant message has been
//! spoken. `last_spoken_offset` moves forward only when an utterance has
//! *finished* playing, never when it starts, so a boundary found while audio
//! is still playing cannot speak the same span twice, and a failed utterance
//! leaves its text eligible for the next attempt.
//!
//! Each accepted narration runs on its own tokio task so audio keeps playing
//! while the owner goes back to consuming the stream. The owner observes
//! completion through [`PlaybackGate::finished`], which is cancel-safe and
//! can sit in a `tokio::select!` loop.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::error::VoiceError;
use crate::narrator::Speaker;
use crate::text::clean_for_speech;

/// Observable playback state of the current message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub is_speaking: bool,
    /// Byte offset into the message content spoken so far.
    pub last_spoken_offset: usize,
}

/// What [`PlaybackGate::finished`] observed.
#[derive(Debug)]
pub enum NarrationOutcome {
    /// Nothing was in flight.
    Idle,
    /// The utterance played to the end; the offset advanced by `consumed`.
    Completed { consumed: usize },
    /// The utterance failed; the offset did not move.
    Failed(VoiceError),
}

struct InFlight {
    consumed: usize,
    handle: JoinHandle<Result<(), VoiceError>>,
}

/// Single-slot narration guard.
pub struct PlaybackGate {
    speaker: Arc<dyn Speaker>,
    state: PlaybackState,
    in_flight: Option<InFlight>,
    /// Narration left running after its turn was cancelled. It no longer
    /// counts as speaking but still blocks new narration until it ends.
    detached: Option<JoinHandle<()>>,
}

impl PlaybackGate {
    pub fn new(speaker: Arc<dyn Speaker>) -> Self {
        Self {
            speaker,
            state: PlaybackState::default(),
            in_flight: None,
            detached: None,
        }
    }

    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    pub const fn is_speaking(&self) -> bool {
        self.state.is_speaking
    }

    pub const fn last_spoken_offset(&self) -> usize {
        self.state.last_spoken_offset
    }

    /// Whether any narration, owned or detached, is still running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some() || self.detached.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start narrating `text`, which covers `consumed` bytes of the message.
    ///
    /// Returns `false` without doing anything while another narration is
    /// running. A span that is empty once cleaned for speech has nothing to
    /// play, so it counts as spoken immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn try_narrate(&mut self, text: &str, consumed: usize) -> bool {
        if self.is_busy() {
            tracing::trace!("Playback gate busy, narration deferred");
            return false;
        }
        self.detached = None;

        let spoken = clean_for_speech(text);
        if spoken.is_empty() {
            self.state.last_spoken_offset += consumed;
            tracing::debug!(consumed, "Nothing speakable in span, skipped");
            return true;
        }

        tracing::debug!(chars = spoken.chars().count(), consumed, "Narration started");
        let speaker = Arc::clone(&self.speaker);
        let handle = tokio::spawn(async move { speaker.speak(&spoken).await });

        self.in_flight = Some(InFlight { consumed, handle });
        self.state.is_speaking = true;
        true
    }

    /// Wait for the running narration to end and settle the state.
    ///
    /// Cancel-safe: dropping this future before it resolves leaves the
    /// narration in flight.
    pub async fn finished(&mut self) -> NarrationOutcome {
        if let Some(in_flight) = self.in_flight.as_mut() {
            let joined = (&mut in_flight.handle).await;
            let consumed = in_flight.consumed;
            self.in_flight = None;
            self.state.is_speaking = false;

            let result = joined.unwrap_or_else(|e| Err(VoiceError::Playback(e.to_string())));
            return match result {
                Ok(()) => {
                    self.state.last_spoken_offset += consumed;
                    tracing::debug!(
                        offset = self.state.last_spoken_offset,
                        "Narration finished"
                    );
                    NarrationOutcome::Completed { consumed }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Narration failed, text stays unspoken");
                    NarrationOutcome::Failed(e)
                }
            };
        }

        if let Some(handle) = self.detached.as_mut() {
            if let Err(e) = handle.await {
                tracing::debug!(error = %e, "Detached narration task ended abnormally");
            }
            self.detached = None;
        }

        NarrationOutcome::Idle
    }

    /// Wait until no narration is running at all.
    pub async fn wait_idle(&mut self) {
        while self.is_busy() {
            let _ = self.finished().await;
        }
    }

    /// Stop tracking the running narration without interrupting it.
    ///
    /// The audio plays out in the background; the offset does not move and
    /// `is_speaking` is cleared. New narration stays blocked until the
    /// detached one ends.
    pub fn detach(&mut self) {
        let Some(InFlight { handle, .. }) = self.in_flight.take() else {
            return;
        };
        self.state.is_speaking = false;

        self.detached = Some(tokio::spawn(async move {
            match handle.await {
                Ok(Ok(())) => tracing::debug!("Detached narration finished"),
                Ok(Err(e)) => tracing::warn!(error = %e, "Detached narration failed"),
                Err(e) => tracing::debug!(error = %e, "Detached narration task ended abnormally"),
            }
        }));
        tracing::debug!("Narration detached");
    }

    /// Start tracking a new message from offset zero.
    pub fn reset(&mut self) {
        self.detach();
        self.state = PlaybackState::default();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::Semaphore;
    use tokio_test::{assert_pending, assert_ready};

    use super::*;

    /// Speaks instantly; fails every text listed in `failing`.
    #[derive(Default)]
    struct InstantSpeaker {
        spoken: Mutex<Vec<String>>,
        failing: Vec<&'static str>,
    }

    #[async_trait]
    impl Speaker for InstantSpeaker {
        async fn speak(&self, text: &str) -> Result<(), VoiceError> {
            self.spoken.lock().unwrap().push(text.to_string());
            if self.failing.contains(&text) {
                return Err(VoiceError::Playback("device lost".to_string()));
            }
            Ok(())
        }
    }

    /// Plays until the test adds a permit.
    struct HeldSpeaker(Arc<Semaphore>);

    #[async_trait]
    impl Speaker for HeldSpeaker {
        async fn speak(&self, _text: &str) -> Result<(), VoiceError> {
            self.0.acquire().await.unwrap().forget();
            Ok(())
        }
    }

    #[tokio::test]
    async fn finished_can_be_dropped_while_audio_plays() {
        let hold = Arc::new(Semaphore::new(0));
        let mut gate = PlaybackGate::new(Arc::new(HeldSpeaker(hold.clone())));
        assert!(gate.try_narrate("Sit. Stay. ", 11));

        {
            let mut finished = tokio_test::task::spawn(gate.finished());
            assert_pending!(finished.poll());
            tokio::task::yield_now().await;
            assert_pending!(finished.poll());
        }
        assert!(gate.is_speaking());
        assert!(gate.is_busy());
        assert_eq!(gate.last_spoken_offset(), 0);

        hold.add_permits(1);
        assert!(matches!(
            gate.finished().await,
            NarrationOutcome::Completed { consumed: 11 }
        ));
        assert_eq!(gate.last_spoken_offset(), 11);
    }

    #[tokio::test]
    async fn idle_gate_reports_idle_at_once() {
        let mut gate = PlaybackGate::new(Arc::new(InstantSpeaker::default()));
        {
            let mut finished = tokio_test::task::spawn(gate.finished());
            assert!(matches!(
                assert_ready!(finished.poll()),
                NarrationOutcome::Idle
            ));
        }
        assert_eq!(gate.state(), PlaybackState::default());
    }

    #[tokio::test]
    async fn offset_moves_only_after_completion() {
        let speaker = Arc::new(InstantSpeaker::default());
        let mut gate = PlaybackGate::new(speaker.clone());

        assert!(gate.try_narrate("Good dog. ", 10));
        assert!(gate.is_speaking());
        assert_eq!(gate.last_spoken_offset(), 0);

        assert!(matches!(
            gate.finished().await,
            NarrationOutcome::Completed { consumed: 10 }
        ));
        assert!(!gate.is_speaking());
        assert_eq!(gate.last_spoken_offset(), 10);
        assert_eq!(*speaker.spoken.lock().unwrap(), vec!["Good dog.".to_string()]);
    }

    #[tokio::test]
    async fn second_narration_is_refused_while_speaking() {
        let speaker = Arc::new(InstantSpeaker::default());
        let mut gate = PlaybackGate::new(speaker.clone());

        assert!(gate.try_narrate("First one. ", 11));
        assert!(!gate.try_narrate("Second one. ", 12));
        gate.finished().await;

        assert_eq!(speaker.spoken.lock().unwrap().len(), 1);
        assert_eq!(gate.last_spoken_offset(), 11);
    }

    #[tokio::test]
    async fn failure_keeps_offset() {
        let speaker = Arc::new(InstantSpeaker {
            failing: vec!["Bad."],
            ..Default::default()
        });
        let mut gate = PlaybackGate::new(speaker);

        assert!(gate.try_narrate("Bad.", 4));
        assert!(matches!(gate.finished().await, NarrationOutcome::Failed(_)));
        assert!(!gate.is_speaking());
        assert_eq!(gate.last_spoken_offset(), 0);
    }

    #[tokio::test]
    async fn unspeakable_span_counts_as_spoken() {
        let speaker = Arc::new(InstantSpeaker::default());
        let mut gate = PlaybackGate::new(speaker.clone());

        assert!(gate.try_narrate("--- ", 4));
        assert!(!gate.is_speaking());
        assert_eq!(gate.last_spoken_offset(), 4);
        assert!(speaker.spoken.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn reset_starts_from_zero() {
        let mut gate = PlaybackGate::new(Arc::new(InstantSpeaker::default()));
        gate.try_narrate("Hello there. ", 13);
        gate.finished().await;
        gate.reset();
        assert_eq!(gate.state(), PlaybackState::default());
    }
}
