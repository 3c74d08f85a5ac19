//! Config command handler.
//!
//! Reads and writes the settings file directly rather than going through
//! [`CliContext`](crate::CliContext), so a file that fails validation can
//! still be reset.

use anyhow::{Result, bail};
use mrwhite_core::{Settings, SettingsUpdate, settings_path};

use crate::config_commands::{ConfigCommand, SettingKey};
use crate::error::CliError;
use crate::presentation::format_optional;
use crate::settings_file::{load_settings, save_settings};
use crate::utils::input::prompt_confirmation;

/// Execute the config command.
pub fn execute(command: ConfigCommand) -> Result<()> {
    let path = settings_path().map_err(|e| CliError::Config(e.to_string()))?;

    match command {
        ConfigCommand::Show => {
            let settings = load_settings(&path)?;
            print_settings(&settings);
        }
        ConfigCommand::Path => println!("{}", path.display()),
        ConfigCommand::Set {
            api_url,
            history_page_size,
            voice_mode,
            typing_delay_ms,
            min_narration_chars,
            min_flush_chars,
            default_dog,
            active_mode,
            audio_output_dir,
        } => {
            let update = SettingsUpdate {
                api_base_url: api_url.map(Some),
                history_page_size: history_page_size.map(Some),
                voice_mode: voice_mode.map(Some),
                typing_delay_ms: typing_delay_ms.map(Some),
                min_narration_chars: min_narration_chars.map(Some),
                min_flush_chars: min_flush_chars.map(Some),
                default_dog_profile_id: default_dog.map(Some),
                active_mode: active_mode.map(Some),
                audio_output_dir: audio_output_dir.map(Some),
            };
            if is_empty_update(&update) {
                bail!(CliError::Arguments(
                    "Nothing to set. See 'mrwhite config set --help'.".to_string()
                ));
            }

            let mut settings = load_settings(&path)?;
            settings.merge(&update);
            save_settings(&path, &settings)?;
            println!("✓ Settings updated.");
        }
        ConfigCommand::Unset { key } => {
            let mut settings = load_settings(&path)?;
            settings.merge(&reset_update(key));
            save_settings(&path, &settings)?;
            println!("✓ {} reset to default.", key_name(key));
        }
        ConfigCommand::Reset { force } => {
            if !force && !prompt_confirmation("Reset all settings to defaults?")? {
                println!("Cancelled.");
                return Ok(());
            }
            save_settings(&path, &Settings::with_defaults())?;
            println!("✓ Settings reset to defaults.");
        }
    }
    Ok(())
}

fn print_settings(settings: &Settings) {
    println!("api_url:             {}", settings.effective_api_base_url());
    println!(
        "history_page_size:   {}",
        settings.effective_history_page_size()
    );
    println!(
        "voice_mode:          {}",
        settings.voice_mode.unwrap_or(false)
    );
    println!("typing_delay_ms:     {}", settings.typing_delay().as_millis());
    println!(
        "min_narration_chars: {}",
        settings.effective_min_narration_chars()
    );
    println!(
        "min_flush_chars:     {}",
        settings.effective_min_flush_chars()
    );
    println!(
        "default_dog:         {}",
        format_optional(settings.default_dog_profile_id.as_ref(), "(none)")
    );
    println!(
        "active_mode:         {}",
        format_optional(settings.active_mode.as_ref(), "(none)")
    );
    println!(
        "audio_output_dir:    {}",
        format_optional(settings.audio_output_dir.as_ref(), "(default)")
    );
}

const fn is_empty_update(update: &SettingsUpdate) -> bool {
    update.api_base_url.is_none()
        && update.history_page_size.is_none()
        && update.voice_mode.is_none()
        && update.typing_delay_ms.is_none()
        && update.min_narration_chars.is_none()
        && update.min_flush_chars.is_none()
        && update.default_dog_profile_id.is_none()
        && update.active_mode.is_none()
        && update.audio_output_dir.is_none()
}

/// Update that puts one setting back to its default value.
fn reset_update(key: SettingKey) -> SettingsUpdate {
    let defaults = Settings::with_defaults();
    let mut update = SettingsUpdate::default();
    match key {
        SettingKey::ApiUrl => update.api_base_url = Some(defaults.api_base_url),
        SettingKey::HistoryPageSize => update.history_page_size = Some(defaults.history_page_size),
        SettingKey::VoiceMode => update.voice_mode = Some(defaults.voice_mode),
        SettingKey::TypingDelayMs => update.typing_delay_ms = Some(defaults.typing_delay_ms),
        SettingKey::MinNarrationChars => {
            update.min_narration_chars = Some(defaults.min_narration_chars);
        }
        SettingKey::MinFlushChars => update.min_flush_chars = Some(defaults.min_flush_chars),
        SettingKey::DefaultDog => {
            update.default_dog_profile_id = Some(defaults.default_dog_profile_id);
        }
        SettingKey::ActiveMode => update.active_mode = Some(defaults.active_mode),
        SettingKey::AudioOutputDir => update.audio_output_dir = Some(defaults.audio_output_dir),
    }
    update
}

const fn key_name(key: SettingKey) -> &'static str {
    match key {
        SettingKey::ApiUrl => "api_url",
        SettingKey::HistoryPageSize => "history_page_size",
        SettingKey::VoiceMode => "voice_mode",
        SettingKey::TypingDelayMs => "typing_delay_ms",
        SettingKey::MinNarrationChars => "min_narration_chars",
        SettingKey::MinFlushChars => "min_flush_chars",
        SettingKey::DefaultDog => "default_dog",
        SettingKey::ActiveMode => "active_mode",
        SettingKey::AudioOutputDir => "audio_output_dir",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_restores_default_value() {
        let mut settings = Settings {
            history_page_size: Some(120),
            default_dog_profile_id: Some(7),
            ..Settings::with_defaults()
        };

        settings.merge(&reset_update(SettingKey::HistoryPageSize));
        settings.merge(&reset_update(SettingKey::DefaultDog));

        assert_eq!(settings, Settings::with_defaults());
    }

    #[test]
    fn unset_touches_only_its_key() {
        let update = reset_update(SettingKey::VoiceMode);
        assert_eq!(update.voice_mode, Some(Some(false)));
        assert!(update.api_base_url.is_none());
        assert!(!is_empty_update(&update));
    }

    #[test]
    fn empty_update_detected() {
        assert!(is_empty_update(&SettingsUpdate::default()));
    }
}
