//! soundcue - play short audio files through the host's native player
//!
//! Wires together configuration loading, logging and the `Player`. Every file
//! given on the command line is started at once; the process exits when all
//! of them have finished. SIGINT/SIGTERM stop whatever is still playing.

use anyhow::{Context, Result};
use clap::Parser;
use soundcue_config::{Settings, load_config, load_config_or_default};
use soundcue_core::Player;
use soundcue_util::default_config_path;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// soundcue - play audio files through the host's native player
#[derive(Parser, Debug)]
#[command(name = "soundcue")]
#[command(about = "Play short audio files through the host's native player", long_about = None)]
struct Args {
    /// Audio files to play, all at once
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Volume from 0.0 to 1.0 (default: from config, else 0.5)
    #[arg(short, long, value_parser = parse_volume)]
    volume: Option<f64>,

    /// Configuration file path (default: ~/.config/soundcue/config.toml)
    #[arg(short, long, env = "SOUNDCUE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn parse_volume(s: &str) -> Result<f64, String> {
    let volume: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if (0.0..=1.0).contains(&volume) {
        Ok(volume)
    } else {
        Err(format!("{} is outside 0.0..=1.0", volume))
    }
}

fn load_settings(args: &Args) -> Result<Settings> {
    match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => {
            let path = default_config_path();
            load_config_or_default(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))
        }
    }
}

/// Resolves on SIGINT, or SIGTERM on Unix
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.context("Failed to listen for SIGINT")?,
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    Ok(())
}

async fn run(args: Args) -> Result<ExitCode> {
    let settings = load_settings(&args)?;
    let player = Player::new(&settings.player);
    let volume = args.volume.unwrap_or(player.default_volume());

    info!(
        platform = %player.platform(),
        volume = volume,
        files = args.files.len(),
        "Starting playback"
    );

    let mut pending = JoinSet::new();
    for file in &args.files {
        let playback = player.play_tracked(file, volume);
        let file = file.clone();
        pending.spawn(async move { (playback.id, file, playback.finished.await) });
    }

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    let mut shutting_down = false;
    let mut all_clean = true;

    loop {
        tokio::select! {
            result = &mut shutdown, if !shutting_down => {
                shutting_down = true;
                match result {
                    Ok(()) => info!("Received shutdown signal, stopping playback"),
                    Err(e) => warn!(error = %e, "Signal handling failed, stopping playback"),
                }
                let stopped = player.stop_all();
                debug!(stopped, "Stop requested for active playbacks");
            }
            joined = pending.join_next() => {
                let Some(joined) = joined else { break };
                let (id, file, outcome) = joined.context("Playback task panicked")?;
                if !outcome.is_clean() {
                    warn!(id = %id, file = %file.display(), outcome = ?outcome, "Playback did not complete cleanly");
                    all_clean = false;
                }
            }
        }
    }

    info!("All playback finished");

    Ok(if all_clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    if args.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    info!(version = env!("CARGO_PKG_VERSION"), "soundcue starting");

    run(args).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_parser_bounds() {
        assert_eq!(parse_volume("0.5"), Ok(0.5));
        assert_eq!(parse_volume("1"), Ok(1.0));
        assert!(parse_volume("1.5").is_err());
        assert!(parse_volume("-0.1").is_err());
        assert!(parse_volume("loud").is_err());
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from(["soundcue", "-v", "0.3", "a.wav", "b.wav"]).unwrap();
        assert_eq!(args.volume, Some(0.3));
        assert_eq!(args.files, vec![PathBuf::from("a.wav"), PathBuf::from("b.wav")]);
        assert!(!args.json_logs);

        assert!(Args::try_parse_from(["soundcue"]).is_err());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let args = Args::try_parse_from([
            "soundcue".into(),
            "-c".into(),
            missing.into_os_string(),
            "a.wav".into(),
        ])
        .unwrap();

        assert!(load_settings(&args).is_err());
    }
}
