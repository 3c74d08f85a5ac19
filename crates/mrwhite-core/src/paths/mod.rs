//! Config directory resolution.
//!
//! Resolution order for the config root:
//! 1. `MRWHITE_CONFIG_DIR` environment variable
//! 2. Platform config directory joined with `mrwhite`
//!    (e.g. `~/.config/mrwhite`)

mod error;

use std::path::{Path, PathBuf};

pub use error::PathError;

/// Environment variable that overrides the config root.
pub const CONFIG_DIR_ENV: &str = "MRWHITE_CONFIG_DIR";

const SETTINGS_FILE: &str = "settings.json";

/// Root directory for client configuration.
pub fn config_root() -> Result<PathBuf, PathError> {
    resolve_config_root(std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from))
}

/// Location of the persisted settings file.
pub fn settings_path() -> Result<PathBuf, PathError> {
    Ok(config_root()?.join(SETTINGS_FILE))
}

fn resolve_config_root(override_dir: Option<PathBuf>) -> Result<PathBuf, PathError> {
    match override_dir {
        Some(dir) if dir.as_os_str().is_empty() => Err(PathError::EmptyPath),
        Some(dir) => Ok(dir),
        None => dirs::config_dir()
            .map(|dir| dir.join("mrwhite"))
            .ok_or(PathError::NoConfigDir),
    }
}

/// Create `path` (and parents) if missing; fail if it exists as a file.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.exists() {
        if path.is_dir() {
            return Ok(());
        }
        return Err(PathError::NotADirectory(path.to_path_buf()));
    }

    std::fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
