//! Settings persistence.
//!
//! Settings live as pretty-printed JSON in `settings.json` under the config
//! root. A missing file means defaults; a file that fails validation is an
//! error rather than being silently replaced.

use std::path::Path;

use mrwhite_core::{Settings, ensure_directory, validate_settings};

use crate::error::CliError;

/// Load settings from `path`, falling back to defaults when it is absent.
pub fn load_settings(path: &Path) -> Result<Settings, CliError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No settings file, using defaults");
        return Ok(Settings::with_defaults());
    }

    let raw = std::fs::read_to_string(path)?;
    let settings: Settings = serde_json::from_str(&raw).map_err(|e| {
        CliError::Config(format!("{} is not valid settings JSON: {e}", path.display()))
    })?;
    validate_settings(&settings).map_err(|e| CliError::Config(e.to_string()))?;
    Ok(settings)
}

/// Validate and write settings to `path`, creating its directory.
///
/// Writes to a sibling temp file first so a crash never leaves a
/// truncated settings file behind.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), CliError> {
    validate_settings(settings).map_err(|e| CliError::Config(e.to_string()))?;

    if let Some(parent) = path.parent() {
        ensure_directory(parent).map_err(|e| CliError::Config(e.to_string()))?;
    }

    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| CliError::Internal(format!("Failed to serialize settings: {e}")))?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;

    tracing::debug!(path = %path.display(), "Settings saved");
    Ok(())
}
