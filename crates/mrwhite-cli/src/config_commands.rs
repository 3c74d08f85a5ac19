//! Settings management subcommands.

use clap::{Subcommand, ValueEnum};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show all current settings
    Show,
    /// Update settings
    Set {
        /// API base URL (http:// or https://)
        #[arg(long)]
        api_url: Option<String>,
        /// Messages loaded when a chat starts (1-200)
        #[arg(long)]
        history_page_size: Option<u32>,
        /// Narrate replies by default
        #[arg(long)]
        voice_mode: Option<bool>,
        /// Pause after each streamed token, in milliseconds (0-1000)
        #[arg(long)]
        typing_delay_ms: Option<u64>,
        /// Shortest sentence run narrated while a reply streams
        #[arg(long)]
        min_narration_chars: Option<usize>,
        /// Shortest remainder narrated when a reply ends
        #[arg(long)]
        min_flush_chars: Option<usize>,
        /// Dog profile used when none is given
        #[arg(long)]
        default_dog: Option<i64>,
        /// Assistant mode used when none is given
        #[arg(long)]
        active_mode: Option<String>,
        /// Directory narration clips are written to
        #[arg(long)]
        audio_output_dir: Option<String>,
    },
    /// Reset one setting to its default
    Unset {
        #[arg(value_enum)]
        key: SettingKey,
    },
    /// Reset all settings to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Print the settings file location
    Path,
}

/// Settings that `config unset` can clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SettingKey {
    ApiUrl,
    HistoryPageSize,
    VoiceMode,
    TypingDelayMs,
    MinNarrationChars,
    MinFlushChars,
    DefaultDog,
    ActiveMode,
    AudioOutputDir,
}
