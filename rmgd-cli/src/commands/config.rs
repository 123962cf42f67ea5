use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rmgd_lib::settings::{
    self, ENV_API_URL, ENV_DATABASE, ENV_PUBLIC_URL, ENV_STORAGE_ROOT, SETTING_KEYS,
};
use rmgd_lib::{Settings, SettingsOverrides};

use crate::CliError;

/// Where a resolved value came from.
fn source_label(from_flag: bool, env_key: &str, in_file: bool) -> String {
    let env_set = std::env::var(env_key).is_ok_and(|v| !v.trim().is_empty());
    if from_flag {
        "command line".to_string()
    } else if env_set {
        format!("env {}", env_key)
    } else if in_file {
        "settings file".to_string()
    } else {
        "default".to_string()
    }
}

/// Show resolved settings and their sources.
pub(crate) fn run_config_show(overrides: &SettingsOverrides) -> Result<(), CliError> {
    let path = settings::settings_path();
    let file = settings::read_settings_file(&path)?;
    let resolved = Settings::load(overrides.clone())?;

    log::info!("{}", "RMGD Settings".if_supports_color(Stdout, |t| t.bold()));
    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let rows = [
        (
            "store.database",
            resolved.database.display().to_string(),
            source_label(
                overrides.database.is_some(),
                ENV_DATABASE,
                file.store.database.is_some(),
            ),
        ),
        (
            "store.api_url",
            resolved.api_url.clone().unwrap_or_else(|| "(local database)".into()),
            source_label(
                overrides.api_url.is_some(),
                ENV_API_URL,
                file.store.api_url.is_some(),
            ),
        ),
        (
            "storage.root",
            resolved.storage_root.display().to_string(),
            source_label(false, ENV_STORAGE_ROOT, file.storage.root.is_some()),
        ),
        (
            "storage.public_base_url",
            resolved.public_base_url.clone(),
            source_label(false, ENV_PUBLIC_URL, file.storage.public_base_url.is_some()),
        ),
    ];
    for (key, value, source) in &rows {
        log::info!(
            "  {:<24} {} {}",
            key,
            value,
            format!("({})", source).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    log::info!("{}", settings::settings_path().display());
    Ok(())
}

/// Set or clear one key in the settings file.
pub(crate) fn run_config_set(key: &str, value: &str) -> Result<(), CliError> {
    let path = settings::settings_path();
    settings::set_setting(&path, key, value)?;
    if value.trim().is_empty() {
        log::info!("Cleared {} in {}", key, path.display());
    } else {
        log::info!(
            "Set {} = {} in {}",
            key.if_supports_color(Stdout, |t| t.bold()),
            value,
            path.display()
        );
    }
    log::debug!("Known keys: {}", SETTING_KEYS.join(", "));
    Ok(())
}
