//! Session configuration.

use std::time::Duration;

use mrwhite_core::Settings;
use mrwhite_core::settings::{DEFAULT_MIN_FLUSH_CHARS, DEFAULT_MIN_NARRATION_CHARS};
use mrwhite_core::DEFAULT_HISTORY_PAGE_SIZE;

/// Per-session options.
///
/// `voice_mode`, `active_mode` and `dog_profile_id` can be changed on a live
/// session through the handle; the rest are fixed at spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub voice_mode: bool,
    pub active_mode: Option<String>,
    pub dog_profile_id: Option<i64>,
    /// Messages fetched when hydrating history.
    pub history_page_size: u32,
    /// Pause after each applied token. Zero disables the typing effect.
    pub typing_delay: Duration,
    /// Shortest span narrated while the reply is still streaming.
    pub min_narration_chars: usize,
    /// Shortest remainder narrated once the reply has ended.
    pub min_flush_chars: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            voice_mode: false,
            active_mode: None,
            dog_profile_id: None,
            history_page_size: DEFAULT_HISTORY_PAGE_SIZE,
            typing_delay: Duration::ZERO,
            min_narration_chars: DEFAULT_MIN_NARRATION_CHARS,
            min_flush_chars: DEFAULT_MIN_FLUSH_CHARS,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub const fn with_voice_mode(mut self, on: bool) -> Self {
        self.voice_mode = on;
        self
    }

    #[must_use]
    pub fn with_active_mode(mut self, mode: Option<String>) -> Self {
        self.active_mode = mode;
        self
    }

    #[must_use]
    pub const fn with_dog_profile(mut self, id: Option<i64>) -> Self {
        self.dog_profile_id = id;
        self
    }

    #[must_use]
    pub const fn with_typing_delay(mut self, delay: Duration) -> Self {
        self.typing_delay = delay;
        self
    }
}

impl From<&Settings> for SessionConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            voice_mode: settings.voice_mode.unwrap_or(false),
            active_mode: settings.active_mode.clone(),
            dog_profile_id: settings.default_dog_profile_id,
            history_page_size: settings.effective_history_page_size(),
            typing_delay: settings.typing_delay(),
            min_narration_chars: settings.effective_min_narration_chars(),
            min_flush_chars: settings.effective_min_flush_chars(),
        }
    }
}
