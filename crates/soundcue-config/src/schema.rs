//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Player settings
    #[serde(default)]
    pub player: RawPlayerConfig,
}

/// Player settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawPlayerConfig {
    /// Volume used when a caller does not pass one (0.0 to 1.0, default 0.5)
    pub default_volume: Option<f64>,

    /// Player family to use (default: detect from the host)
    pub platform: Option<RawPlatform>,

    /// macOS player program (default: afplay)
    pub afplay_program: Option<String>,

    /// Windows scripting host (default: powershell)
    pub powershell_program: Option<String>,
}

/// Raw platform selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RawPlatform {
    #[default]
    Auto,
    Macos,
    Windows,
}
