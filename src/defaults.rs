//! Default values for graphmize settings.
//!
//! Centralized so the CLI flags, the settings file and the tests agree.

use std::path::PathBuf;

/// File name of the per-user settings file
pub const SETTINGS_FILE_NAME: &str = ".graphmize.yaml";

/// Log level used when neither `--log-level` nor the settings file set one
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Color mode used when neither `--color` nor the settings file set one
pub const DEFAULT_COLOR: &str = "auto";

/// Returns the default settings file location, `$HOME/.graphmize.yaml`.
///
/// `None` when the home directory cannot be determined; settings are then
/// only read from an explicit `--config`.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(SETTINGS_FILE_NAME))
}
