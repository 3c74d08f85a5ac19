//! CLI bootstrap - the composition root.
//!
//! This is the only place where concrete adapters are chosen:
//! - Settings file (via [`crate::settings_file`])
//! - HTTP backend (via mrwhite-client)
//! - Narration speaker and audio player (via mrwhite-voice)
//!
//! Handlers receive the composed [`CliContext`] and never build their own.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use mrwhite_client::{ApiClientConfig, MrWhiteApi};
use mrwhite_core::{Backend, Settings, config_root, settings_path};
use mrwhite_voice::{AudioPlayerPort, FilePlayer, Narrator, Speaker};

use crate::error::CliError;
use crate::settings_file::load_settings;

/// Bootstrap options gathered from global flags and the environment.
#[derive(Clone, Default)]
pub struct CliConfig {
    /// Overrides the `api_base_url` setting.
    pub api_url: Option<String>,
    pub token: Option<String>,
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    pub settings: Settings,
    /// Every backend port, all served by the HTTP adapter.
    pub backend: Backend,
    /// Narration path: text-to-speech proxy, then the chosen player.
    pub speaker: Arc<dyn Speaker>,
    /// Where narration ends up, for messages to the user.
    pub audio_sink: String,
}

impl CliContext {
    pub const fn backend(&self) -> &Backend {
        &self.backend
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }
}

/// Bootstrap the CLI application.
///
/// 1. Load settings from the config root
/// 2. Build the HTTP backend with the effective base URL and token
/// 3. Pick an audio player and wrap it in a narrator
pub fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let path = settings_path().map_err(|e| CliError::Config(e.to_string()))?;
    let settings = load_settings(&path)?;

    let CliConfig { api_url, token } = config;
    let base_url = api_url.unwrap_or_else(|| settings.effective_api_base_url().to_string());
    let mut api_config = ApiClientConfig::new(base_url);
    if let Some(token) = token {
        api_config = api_config.with_token(token);
    } else {
        tracing::warn!("No API token set; most commands will be rejected (set MRWHITE_API_TOKEN)");
    }
    tracing::debug!(?api_config, "Building API client");

    let api = MrWhiteApi::new(&api_config).map_err(|e| CliError::Config(e.to_string()))?;
    let backend = api.into_backend();

    let (player, audio_sink) = select_player(&settings)?;
    let speaker: Arc<dyn Speaker> = Arc::new(Narrator::new(Arc::clone(&backend.speech), player));

    Ok(CliContext {
        settings,
        backend,
        speaker,
        audio_sink,
    })
}

/// Choose where narration audio goes.
///
/// An explicit `audio_output_dir` always wins. Otherwise builds with the
/// `playback` feature use the default output device when one opens, and
/// everything else writes clips under the config root.
fn select_player(settings: &Settings) -> Result<(Arc<dyn AudioPlayerPort>, String)> {
    if let Some(ref dir) = settings.audio_output_dir {
        return Ok(file_player(PathBuf::from(dir)));
    }

    #[cfg(feature = "playback")]
    match mrwhite_voice::RodioPlayer::probe() {
        Ok(player) => return Ok((Arc::new(player), "speakers".to_string())),
        Err(e) => tracing::warn!(error = %e, "No audio output device, writing clips instead"),
    }

    let root = config_root().map_err(|e| CliError::Config(e.to_string()))?;
    Ok(file_player(root.join("narration")))
}

fn file_player(dir: PathBuf) -> (Arc<dyn AudioPlayerPort>, String) {
    let sink = dir.display().to_string();
    (Arc::new(FilePlayer::new(dir)), sink)
}
