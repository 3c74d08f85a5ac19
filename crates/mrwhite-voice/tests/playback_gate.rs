//! Integration tests for `PlaybackGate` ordering guarantees.
//!
//! A scripted speaker holds each utterance open until the test releases it,
//! standing in for audio that takes time to play.
//!
//! # What is tested
//!
//! - The spoken offset never decreases and only grows by completed spans
//! - Never more than one utterance playing at once
//! - Detached narration keeps blocking new narration until it ends
//! - Segmenting a streamed reply and narrating through the gate speaks every
//!   sentence exactly once

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mrwhite_voice::{
    NarrationOutcome, PlaybackGate, Speaker, VoiceError, flush_spans, next_narration_span,
};
use tokio::sync::Semaphore;

// ── Scripted speaker ───────────────────────────────────────────────

#[derive(Default)]
struct Log {
    events: Vec<String>,
    playing: usize,
    max_playing: usize,
}

struct ScriptedSpeaker {
    log: Mutex<Log>,
    release: Semaphore,
    fail_next: Mutex<bool>,
}

impl ScriptedSpeaker {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            log: Mutex::new(Log::default()),
            release: Semaphore::new(0),
            fail_next: Mutex::new(false),
        })
    }

    fn events(&self) -> Vec<String> {
        self.log.lock().unwrap().events.clone()
    }

    fn max_playing(&self) -> usize {
        self.log.lock().unwrap().max_playing
    }
}

#[async_trait]
impl Speaker for ScriptedSpeaker {
    async fn speak(&self, text: &str) -> Result<(), VoiceError> {
        {
            let mut log = self.log.lock().unwrap();
            log.events.push(format!("start:{text}"));
            log.playing += 1;
            log.max_playing = log.max_playing.max(log.playing);
        }

        self.release.acquire().await.unwrap().forget();

        let failed = std::mem::take(&mut *self.fail_next.lock().unwrap());
        let mut log = self.log.lock().unwrap();
        log.playing -= 1;
        log.events.push(format!("end:{text}"));
        if failed {
            Err(VoiceError::Playback("scripted failure".to_string()))
        } else {
            Ok(())
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn offset_is_monotonic_and_counts_completed_spans() {
    let speaker = ScriptedSpeaker::new();
    let mut gate = PlaybackGate::new(speaker.clone());
    let mut offsets = vec![gate.last_spoken_offset()];

    assert!(gate.try_narrate("One sentence here. ", 19));
    tokio::task::yield_now().await;
    offsets.push(gate.last_spoken_offset());
    assert_eq!(gate.last_spoken_offset(), 0, "offset must not move at start");

    speaker.release.add_permits(1);
    gate.finished().await;
    offsets.push(gate.last_spoken_offset());

    *speaker.fail_next.lock().unwrap() = true;
    assert!(gate.try_narrate("Broken speaker. ", 16));
    speaker.release.add_permits(1);
    assert!(matches!(gate.finished().await, NarrationOutcome::Failed(_)));
    offsets.push(gate.last_spoken_offset());

    assert!(gate.try_narrate("Broken speaker. ", 16));
    speaker.release.add_permits(1);
    gate.finished().await;
    offsets.push(gate.last_spoken_offset());

    assert_eq!(offsets, vec![0, 0, 19, 19, 35]);
}

#[tokio::test]
async fn never_two_utterances_at_once() {
    let speaker = ScriptedSpeaker::new();
    let mut gate = PlaybackGate::new(speaker.clone());

    assert!(gate.try_narrate("First. ", 7));
    tokio::task::yield_now().await;
    for _ in 0..5 {
        assert!(!gate.try_narrate("Second. ", 8));
        assert!(gate.is_speaking());
    }

    speaker.release.add_permits(1);
    gate.finished().await;
    assert!(gate.try_narrate("Second. ", 8));
    speaker.release.add_permits(1);
    gate.finished().await;

    assert_eq!(speaker.max_playing(), 1);
    assert_eq!(
        speaker.events(),
        vec!["start:First.", "end:First.", "start:Second.", "end:Second."]
    );
}

#[tokio::test]
async fn finished_is_cancel_safe() {
    let speaker = ScriptedSpeaker::new();
    let mut gate = PlaybackGate::new(speaker.clone());
    assert!(gate.try_narrate("Patience. ", 10));

    let timed_out = tokio::time::timeout(std::time::Duration::from_millis(20), gate.finished())
        .await
        .is_err();
    assert!(timed_out);
    assert!(gate.is_speaking(), "dropping finished() must keep the narration");

    speaker.release.add_permits(1);
    assert!(matches!(
        gate.finished().await,
        NarrationOutcome::Completed { consumed: 10 }
    ));
}

#[tokio::test]
async fn detached_narration_blocks_until_it_ends() {
    let speaker = ScriptedSpeaker::new();
    let mut gate = PlaybackGate::new(speaker.clone());

    assert!(gate.try_narrate("Cancelled turn. ", 16));
    tokio::task::yield_now().await;
    gate.reset();

    assert!(!gate.is_speaking());
    assert_eq!(gate.last_spoken_offset(), 0);
    assert!(gate.is_busy());
    assert!(!gate.try_narrate("Next turn. ", 11));

    speaker.release.add_permits(1);
    gate.wait_idle().await;
    assert!(gate.try_narrate("Next turn. ", 11));
    speaker.release.add_permits(1);
    gate.finished().await;

    assert_eq!(speaker.max_playing(), 1);
    assert_eq!(gate.last_spoken_offset(), 11);
}

#[tokio::test]
async fn streamed_reply_is_spoken_once_in_order() {
    let speaker = ScriptedSpeaker::new();
    speaker.release.add_permits(100);
    let mut gate = PlaybackGate::new(speaker.clone());

    let tokens = [
        "Chocolate is ",
        "toxic to dogs. ",
        "Call your vet ",
        "right away! Ok",
        ". Bye.",
    ];
    let mut content = String::new();
    for token in tokens {
        content.push_str(token);
        if gate.is_speaking() {
            continue;
        }
        let unspoken = &content[gate.last_spoken_offset()..];
        if let Some(end) = next_narration_span(unspoken, 20) {
            let span = unspoken[..end].to_string();
            gate.try_narrate(&span, end);
            gate.finished().await;
        }
    }

    gate.wait_idle().await;
    let remainder = content[gate.last_spoken_offset()..].to_string();
    for span in flush_spans(&remainder) {
        let len = span.len();
        assert!(gate.try_narrate(&remainder[span], len));
        gate.finished().await;
    }

    assert_eq!(gate.last_spoken_offset(), content.len());
    assert_eq!(
        speaker.events(),
        vec![
            "start:Chocolate is toxic to dogs.",
            "end:Chocolate is toxic to dogs.",
            "start:Call your vet right away!",
            "end:Call your vet right away!",
            "start:Ok.",
            "end:Ok.",
            "start:Bye.",
            "end:Bye.",
        ]
    );
}
