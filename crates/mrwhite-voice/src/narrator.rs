//! Narration: synthesize a span, then play it to the end.

use std::sync::Arc;

use async_trait::async_trait;
use mrwhite_core::SpeechSynthesisPort;

use crate::error::VoiceError;
use crate::player::AudioPlayerPort;

/// Something that can speak a piece of text.
///
/// `speak` resolves only once the utterance has finished playing (or
/// failed). The playback gate relies on this to advance its offset.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str) -> Result<(), VoiceError>;
}

/// Speaker backed by the text-to-speech proxy and an audio player.
#[derive(Clone)]
pub struct Narrator {
    synth: Arc<dyn SpeechSynthesisPort>,
    player: Arc<dyn AudioPlayerPort>,
}

impl Narrator {
    pub fn new(synth: Arc<dyn SpeechSynthesisPort>, player: Arc<dyn AudioPlayerPort>) -> Self {
        Self { synth, player }
    }
}

#[async_trait]
impl Speaker for Narrator {
    async fn speak(&self, text: &str) -> Result<(), VoiceError> {
        let audio = self.synth.synthesize(text).await?;
        if audio.is_empty() {
            return Err(VoiceError::EmptyAudio);
        }

        tracing::debug!(chars = text.chars().count(), bytes = audio.len(), "Playing narration");
        self.player.play(audio).await
    }
}
