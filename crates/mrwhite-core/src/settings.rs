//! Settings domain types and validation.
//!
//! These are pure domain types with no infrastructure dependencies. The CLI
//! persists them as JSON; secrets (the API token) never live here.

use serde::{Deserialize, Serialize};

/// Default base URL of the Mr. White API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.mrwhite.ai";

/// Default number of history messages fetched on session start.
pub const DEFAULT_HISTORY_PAGE_SIZE: u32 = 50;

/// Minimum segment length narrated while a response is still streaming.
pub const DEFAULT_MIN_NARRATION_CHARS: usize = 20;

/// Minimum remainder length narrated when a response finishes.
pub const DEFAULT_MIN_FLUSH_CHARS: usize = 10;

/// Client settings structure.
///
/// All fields are optional to support partial updates and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the Mr. White API.
    pub api_base_url: Option<String>,

    /// Number of history messages loaded on session start (1-200).
    pub history_page_size: Option<u32>,

    /// Whether assistant replies are narrated by default.
    pub voice_mode: Option<bool>,

    /// Delay after each token append, for a typing effect (0-1000 ms).
    pub typing_delay_ms: Option<u64>,

    /// Minimum characters before a sentence is narrated mid-stream.
    pub min_narration_chars: Option<usize>,

    /// Minimum characters for the end-of-response narration flush.
    pub min_flush_chars: Option<usize>,

    /// Dog profile selected for new chats.
    pub default_dog_profile_id: Option<i64>,

    /// Assistant mode sent with each message.
    pub active_mode: Option<String>,

    /// Directory narration clips are written to when no audio device is used.
    pub audio_output_dir: Option<String>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: Some(DEFAULT_API_BASE_URL.to_string()),
            history_page_size: Some(DEFAULT_HISTORY_PAGE_SIZE),
            voice_mode: Some(false),
            typing_delay_ms: Some(0),
            min_narration_chars: Some(DEFAULT_MIN_NARRATION_CHARS),
            min_flush_chars: Some(DEFAULT_MIN_FLUSH_CHARS),
            default_dog_profile_id: None,
            active_mode: None,
            audio_output_dir: None,
        }
    }

    /// Get the effective API base URL (with default fallback).
    #[must_use]
    pub fn effective_api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    /// Get the effective history page size (with default fallback).
    #[must_use]
    pub const fn effective_history_page_size(&self) -> u32 {
        match self.history_page_size {
            Some(size) => size,
            None => DEFAULT_HISTORY_PAGE_SIZE,
        }
    }

    /// Get the effective mid-stream narration minimum.
    #[must_use]
    pub const fn effective_min_narration_chars(&self) -> usize {
        match self.min_narration_chars {
            Some(n) => n,
            None => DEFAULT_MIN_NARRATION_CHARS,
        }
    }

    /// Get the effective end-of-response flush minimum.
    #[must_use]
    pub const fn effective_min_flush_chars(&self) -> usize {
        match self.min_flush_chars {
            Some(n) => n,
            None => DEFAULT_MIN_FLUSH_CHARS,
        }
    }

    /// Get the effective typing delay.
    #[must_use]
    pub const fn typing_delay(&self) -> std::time::Duration {
        match self.typing_delay_ms {
            Some(ms) => std::time::Duration::from_millis(ms),
            None => std::time::Duration::ZERO,
        }
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref url) = other.api_base_url {
            self.api_base_url.clone_from(url);
        }
        if let Some(size) = other.history_page_size {
            self.history_page_size = size;
        }
        if let Some(voice) = other.voice_mode {
            self.voice_mode = voice;
        }
        if let Some(delay) = other.typing_delay_ms {
            self.typing_delay_ms = delay;
        }
        if let Some(n) = other.min_narration_chars {
            self.min_narration_chars = n;
        }
        if let Some(n) = other.min_flush_chars {
            self.min_flush_chars = n;
        }
        if let Some(id) = other.default_dog_profile_id {
            self.default_dog_profile_id = id;
        }
        if let Some(ref mode) = other.active_mode {
            self.active_mode.clone_from(mode);
        }
        if let Some(ref dir) = other.audio_output_dir {
            self.audio_output_dir.clone_from(dir);
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = set field to None/null
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub api_base_url: Option<Option<String>>,
    pub history_page_size: Option<Option<u32>>,
    pub voice_mode: Option<Option<bool>>,
    pub typing_delay_ms: Option<Option<u64>>,
    pub min_narration_chars: Option<Option<usize>>,
    pub min_flush_chars: Option<Option<usize>>,
    pub default_dog_profile_id: Option<Option<i64>>,
    pub active_mode: Option<Option<String>>,
    pub audio_output_dir: Option<Option<String>>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("API base URL must start with http:// or https://, got {0:?}")]
    InvalidApiUrl(String),

    #[error("History page size must be between 1 and 200, got {0}")]
    InvalidPageSize(u32),

    #[error("Typing delay must be at most 1000 ms, got {0}")]
    InvalidTypingDelay(u64),

    #[error("Flush minimum ({flush}) cannot exceed narration minimum ({narration})")]
    InvalidNarrationThresholds { narration: usize, flush: usize },

    #[error("Audio output directory cannot be empty")]
    EmptyAudioDir,
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(ref url) = settings.api_base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SettingsError::InvalidApiUrl(url.clone()));
        }
    }

    if let Some(size) = settings.history_page_size {
        if !(1..=200).contains(&size) {
            return Err(SettingsError::InvalidPageSize(size));
        }
    }

    if let Some(delay) = settings.typing_delay_ms {
        if delay > 1000 {
            return Err(SettingsError::InvalidTypingDelay(delay));
        }
    }

    let narration = settings.effective_min_narration_chars();
    let flush = settings.effective_min_flush_chars();
    if flush > narration {
        return Err(SettingsError::InvalidNarrationThresholds { narration, flush });
    }

    if settings
        .audio_output_dir
        .as_ref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(SettingsError::EmptyAudioDir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::with_defaults();
        assert_eq!(settings.history_page_size, Some(50));
        assert_eq!(settings.effective_min_narration_chars(), 20);
        assert_eq!(settings.effective_min_flush_chars(), 10);
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_empty_settings_fall_back() {
        let settings = Settings::default();
        assert_eq!(settings.effective_api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(settings.effective_history_page_size(), DEFAULT_HISTORY_PAGE_SIZE);
        assert_eq!(settings.typing_delay(), std::time::Duration::ZERO);
    }

    #[test]
    fn test_merge_partial() {
        let mut settings = Settings::with_defaults();
        settings.merge(&SettingsUpdate {
            history_page_size: Some(Some(20)),
            default_dog_profile_id: Some(Some(3)),
            ..Default::default()
        });
        assert_eq!(settings.history_page_size, Some(20));
        assert_eq!(settings.default_dog_profile_id, Some(3));
        assert_eq!(settings.voice_mode, Some(false));
    }

    #[test]
    fn test_merge_clears_with_some_none() {
        let mut settings = Settings::with_defaults();
        settings.active_mode = Some("health".to_string());
        settings.merge(&SettingsUpdate {
            active_mode: Some(None),
            ..Default::default()
        });
        assert_eq!(settings.active_mode, None);
    }

    #[test]
    fn test_invalid_url() {
        let settings = Settings {
            api_base_url: Some("ftp://example.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidApiUrl(_))
        ));
    }

    #[test]
    fn test_invalid_page_size() {
        for size in [0, 201] {
            let settings = Settings {
                history_page_size: Some(size),
                ..Default::default()
            };
            assert!(validate_settings(&settings).is_err());
        }
    }

    #[test]
    fn test_flush_threshold_above_narration() {
        let settings = Settings {
            min_narration_chars: Some(5),
            min_flush_chars: Some(10),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidNarrationThresholds { .. })
        ));
    }

    #[test]
    fn test_serde_defaults_missing_fields() {
        let settings: Settings = serde_json::from_str(r#"{"voice_mode":true}"#).unwrap();
        assert_eq!(settings.voice_mode, Some(true));
        assert_eq!(settings.api_base_url, None);
    }
}
