//! Reads toolbox settings from `composer.json`.

use std::path::Path;

use serde_json::Value;

use super::{
    ConfigError,
    ToolboxSettings,
};

/// JSON pointer of the settings block inside `composer.json`.
const SETTINGS_POINTER: &str = "/extra/contao/transifex";

/// Loads settings from `<workspace_root>/composer.json`.
///
/// # Returns
/// - `Ok(Some(settings))`: the file has an `extra.contao.transifex` block
/// - `Ok(None)`: no `composer.json`, or no settings block in it
/// - `Err(ConfigError)`: read or JSON parse failure
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<ToolboxSettings>, ConfigError> {
    let config_path = workspace_root.join("composer.json");

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let composer: Value = serde_json::from_str(&content)?;
    let Some(section) = composer.pointer(SETTINGS_POINTER) else {
        tracing::debug!("No {SETTINGS_POINTER} section in {:?}", config_path);
        return Ok(None);
    };

    let settings: ToolboxSettings = serde_json::from_value(section.clone())?;
    Ok(Some(settings))
}
