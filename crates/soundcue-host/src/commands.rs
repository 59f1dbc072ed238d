//! Platform player command lines

use soundcue_host_api::{
    CommandBuilder, DEFAULT_AFPLAY_PROGRAM, DEFAULT_POWERSHELL_PROGRAM, HostPlatform,
    PlayerCommand,
};
use std::path::Path;
use std::sync::Arc;

/// Loudest volume `afplay` accepts
const AFPLAY_MAX_VOLUME: f64 = 2.0;

/// `afplay <path> -v <volume>`
#[derive(Debug, Clone)]
pub struct AfplayCommand {
    program: String,
}

impl AfplayCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for AfplayCommand {
    fn default() -> Self {
        Self::new(DEFAULT_AFPLAY_PROGRAM)
    }
}

impl CommandBuilder for AfplayCommand {
    fn platform(&self) -> HostPlatform {
        HostPlatform::MacOs
    }

    fn adjust_volume(&self, volume: f64) -> f64 {
        (volume * 2.0).min(AFPLAY_MAX_VOLUME)
    }

    fn build(&self, file_path: &Path, volume: f64) -> PlayerCommand {
        PlayerCommand::new(&self.program)
            .arg(file_path.to_string_lossy())
            .arg("-v")
            .arg(volume.to_string())
    }
}

/// `powershell -c <script>` driving `System.Windows.Media.MediaPlayer`
///
/// The script sleeps for the clip's natural duration so the host process
/// lives exactly as long as playback does.
#[derive(Debug, Clone)]
pub struct PowerShellCommand {
    program: String,
}

impl PowerShellCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Inline script playing `file_path` at `volume`.
    ///
    /// Only single quotes are escaped. Other characters with meaning inside a
    /// PowerShell single-quoted string are passed through as-is.
    pub fn script(file_path: &Path, volume: f64) -> String {
        let path = escape_single_quotes(&file_path.to_string_lossy());
        format!(
            "Add-Type -AssemblyName presentationCore; \
             $player = New-Object system.windows.media.mediaplayer; \
             $player.open('{path}'); \
             $player.Volume = {volume}; \
             $player.Play(); \
             Start-Sleep 1; \
             Start-Sleep -s $player.NaturalDuration.TimeSpan.TotalSeconds;Exit;"
        )
    }
}

impl Default for PowerShellCommand {
    fn default() -> Self {
        Self::new(DEFAULT_POWERSHELL_PROGRAM)
    }
}

impl CommandBuilder for PowerShellCommand {
    fn platform(&self) -> HostPlatform {
        HostPlatform::Windows
    }

    fn adjust_volume(&self, volume: f64) -> f64 {
        volume
    }

    fn build(&self, file_path: &Path, volume: f64) -> PlayerCommand {
        PlayerCommand::new(&self.program)
            .arg("-c")
            .arg(Self::script(file_path, volume))
    }
}

/// Pick the command builder for `platform`, using the given program names.
pub fn builder_for_platform(
    platform: HostPlatform,
    afplay_program: &str,
    powershell_program: &str,
) -> Arc<dyn CommandBuilder> {
    match platform {
        HostPlatform::MacOs => Arc::new(AfplayCommand::new(afplay_program)),
        HostPlatform::Windows => Arc::new(PowerShellCommand::new(powershell_program)),
    }
}

fn escape_single_quotes(s: &str) -> String {
    s.replace('\'', "''")
}
