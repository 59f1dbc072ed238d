//! Default paths for soundcue
//!
//! - Config: `$SOUNDCUE_CONFIG`, `$XDG_CONFIG_HOME/soundcue/config.toml`
//!   or `~/.config/soundcue/config.toml`

use std::path::PathBuf;

/// Environment variable for overriding the config file path
pub const SOUNDCUE_CONFIG_ENV: &str = "SOUNDCUE_CONFIG";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Application subdirectory name
const APP_DIR: &str = "soundcue";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$SOUNDCUE_CONFIG` environment variable (if set)
/// 2. `$XDG_CONFIG_HOME/soundcue/config.toml` (if XDG_CONFIG_HOME is set)
/// 3. `~/.config/soundcue/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(SOUNDCUE_CONFIG_ENV) {
        return PathBuf::from(path);
    }

    config_path_without_env()
}

/// Get the config path without checking SOUNDCUE_CONFIG.
pub fn config_path_without_env() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    // Last resort
    PathBuf::from("/etc").join(APP_DIR).join(CONFIG_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_contains_soundcue() {
        let path = config_path_without_env();
        assert!(path.to_string_lossy().contains("soundcue"));
        assert!(path.ends_with(CONFIG_FILENAME));
    }
}
