//! Text-to-speech port.

use async_trait::async_trait;

use super::ApiError;

/// Port for the backend text-to-speech proxy.
///
/// Returns encoded audio (MP3 from the production proxy). Playback is the
/// caller's job.
#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ApiError>;
}
