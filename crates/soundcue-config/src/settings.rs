//! Validated settings

use crate::schema::{RawConfig, RawPlatform, RawPlayerConfig};
use soundcue_host_api::{DEFAULT_AFPLAY_PROGRAM, DEFAULT_POWERSHELL_PROGRAM, HostPlatform};

/// Volume used when none is given
pub const DEFAULT_VOLUME: f64 = 0.5;

/// Validated settings ready for use by the player
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub player: PlayerSettings,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            player: PlayerSettings::from_raw(raw.player),
        }
    }
}

/// Player settings
#[derive(Debug, Clone)]
pub struct PlayerSettings {
    pub default_volume: f64,
    pub platform: HostPlatform,
    pub afplay_program: String,
    pub powershell_program: String,
}

impl PlayerSettings {
    fn from_raw(raw: RawPlayerConfig) -> Self {
        let platform = match raw.platform.unwrap_or_default() {
            RawPlatform::Auto => HostPlatform::detect(),
            RawPlatform::Macos => HostPlatform::MacOs,
            RawPlatform::Windows => HostPlatform::Windows,
        };

        Self {
            default_volume: raw.default_volume.unwrap_or(DEFAULT_VOLUME),
            platform,
            afplay_program: raw
                .afplay_program
                .unwrap_or_else(|| DEFAULT_AFPLAY_PROGRAM.to_string()),
            powershell_program: raw
                .powershell_program
                .unwrap_or_else(|| DEFAULT_POWERSHELL_PROGRAM.to_string()),
        }
    }
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self::from_raw(RawPlayerConfig::default())
    }
}
