#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod error;
pub mod gate;
pub mod narrator;
pub mod player;
pub mod segment;
pub mod text;

// Re-export key types for convenience
pub use error::VoiceError;
pub use gate::{NarrationOutcome, PlaybackGate, PlaybackState};
pub use narrator::{Narrator, Speaker};
pub use player::{AudioPlayerPort, FilePlayer, NullPlayer};
#[cfg(feature = "playback")]
pub use player::RodioPlayer;
pub use segment::{find_speakable_segment, flush_spans, next_narration_span, spoken_len};
pub use text::clean_for_speech;
