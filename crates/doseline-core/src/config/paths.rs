//! Where config files live by default

use std::path::PathBuf;

/// Directory holding doseline config files
///
/// `$XDG_CONFIG_HOME/doseline` on Linux, the platform equivalent elsewhere,
/// or `./doseline` when no config dir can be determined.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("doseline")
}

/// Full path of a config file in [`default_config_dir`]
pub fn default_config_path(filename: &str) -> PathBuf {
    default_config_dir().join(filename)
}
