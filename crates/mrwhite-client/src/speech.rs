//! Text-to-speech proxy adapter.

use async_trait::async_trait;
use mrwhite_core::{ApiError, SpeechSynthesisPort};
use serde::Serialize;

use crate::MrWhiteApi;
use crate::endpoints::TTS_SPEAK;

#[derive(Serialize)]
struct SpeakRequest<'a> {
    text: &'a str,
}

#[async_trait]
impl SpeechSynthesisPort for MrWhiteApi {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ApiError> {
        let audio = self
            .client
            .post_for_bytes(TTS_SPEAK, &SpeakRequest { text })
            .await?;
        tracing::debug!(bytes = audio.len(), "Speech synthesized");
        Ok(audio)
    }
}
