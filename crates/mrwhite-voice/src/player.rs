//! Audio players for synthesized narration.
//!
//! Every player resolves `play` only when the clip is done: drained from the
//! output device, written to disk, or discarded.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::error::VoiceError;

/// Port for playing one encoded audio clip (MP3 or WAV).
#[async_trait]
pub trait AudioPlayerPort: Send + Sync {
    /// Play `audio` and resolve at the natural end of playback.
    async fn play(&self, audio: Vec<u8>) -> Result<(), VoiceError>;
}

/// Discards audio. Narration still goes through the gate, which keeps the
/// ordering behaviour identical in headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPlayer;

#[async_trait]
impl AudioPlayerPort for NullPlayer {
    async fn play(&self, audio: Vec<u8>) -> Result<(), VoiceError> {
        tracing::trace!(bytes = audio.len(), "Discarding narration clip");
        Ok(())
    }
}

/// Writes each clip to `<dir>/narration-NNNN.mp3`.
#[derive(Debug)]
pub struct FilePlayer {
    dir: PathBuf,
    next_clip: AtomicU64,
}

impl FilePlayer {
    /// Create a player writing into `dir`; the directory is created on the
    /// first clip.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            next_clip: AtomicU64::new(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl AudioPlayerPort for FilePlayer {
    async fn play(&self, audio: Vec<u8>) -> Result<(), VoiceError> {
        if self.dir.exists() && !self.dir.is_dir() {
            return Err(VoiceError::NotADirectory(self.dir.clone()));
        }
        tokio::fs::create_dir_all(&self.dir).await?;

        let clip = self.next_clip.fetch_add(1, Ordering::SeqCst);
        let path = self.dir.join(format!("narration-{clip:04}.mp3"));
        tokio::fs::write(&path, &audio).await?;

        tracing::debug!(path = %path.display(), bytes = audio.len(), "Narration clip written");
        Ok(())
    }
}

#[cfg(feature = "playback")]
pub use rodio_player::RodioPlayer;

#[cfg(feature = "playback")]
mod rodio_player {
    use std::io::Cursor;

    use async_trait::async_trait;
    use rodio::{Decoder, OutputStream, Sink};

    use super::AudioPlayerPort;
    use crate::error::VoiceError;

    /// Plays clips on the default output device via `rodio`.
    ///
    /// `rodio::OutputStream` is not `Send`, so each clip opens the device on
    /// a blocking thread and holds it until the sink drains.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RodioPlayer;

    impl RodioPlayer {
        /// Check that an output device can be opened.
        pub fn probe() -> Result<Self, VoiceError> {
            let (_stream, _handle) = OutputStream::try_default()
                .map_err(|e| VoiceError::OutputStreamError(e.to_string()))?;
            tracing::info!("Audio playback initialized on default output device");
            Ok(Self)
        }
    }

    #[async_trait]
    impl AudioPlayerPort for RodioPlayer {
        async fn play(&self, audio: Vec<u8>) -> Result<(), VoiceError> {
            tokio::task::spawn_blocking(move || {
                let (_stream, handle) = OutputStream::try_default()
                    .map_err(|e| VoiceError::OutputStreamError(e.to_string()))?;
                let sink = Sink::try_new(&handle)
                    .map_err(|e| VoiceError::OutputStreamError(e.to_string()))?;
                let source =
                    Decoder::new(Cursor::new(audio)).map_err(|e| VoiceError::Decode(e.to_string()))?;

                sink.append(source);
                tracing::debug!("Audio playback started");
                sink.sleep_until_end();
                tracing::debug!("Playback finished naturally");
                Ok(())
            })
            .await
            .map_err(|e| VoiceError::Playback(e.to_string()))?
        }
    }
}
