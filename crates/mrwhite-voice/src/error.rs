//! Voice mode error types.

use std::path::PathBuf;

use mrwhite_core::ApiError;

/// Errors that can occur while narrating assistant text.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// The text-to-speech proxy failed.
    #[error("Speech synthesis failed: {0}")]
    Synthesis(#[from] ApiError),

    /// The synthesized clip was empty.
    #[error("Speech synthesis returned no audio")]
    EmptyAudio,

    /// Failed to open the audio output device.
    #[error("Failed to open audio output stream: {0}")]
    OutputStreamError(String),

    /// The audio bytes could not be decoded for playback.
    #[error("Failed to decode audio: {0}")]
    Decode(String),

    /// Playback stopped before the clip finished.
    #[error("Playback interrupted: {0}")]
    Playback(String),

    /// Clip output directory is unusable.
    #[error("Audio output directory {0} is not a directory")]
    NotADirectory(PathBuf),

    /// IO error (writing clips).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
