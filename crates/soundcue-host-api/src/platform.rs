//! Host platform model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default macOS player program
pub const DEFAULT_AFPLAY_PROGRAM: &str = "afplay";

/// Default Windows scripting host
pub const DEFAULT_POWERSHELL_PROGRAM: &str = "powershell";

/// Which family of player the host offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    /// Native command-line player (`afplay`)
    MacOs,
    /// Scripting host driving a media-playback API (`powershell`)
    Windows,
}

impl HostPlatform {
    /// Detect the platform this binary was built for.
    ///
    /// Anything that is not macOS gets the scripting-host player.
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Windows
        }
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostPlatform::MacOs => write!(f, "macos"),
            HostPlatform::Windows => write!(f, "windows"),
        }
    }
}
