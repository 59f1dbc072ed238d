//! Integration tests for soundcue
//!
//! These tests drive `Player` end to end: configuration into a player, and
//! on Unix real child processes standing in for the audio player.

use soundcue_config::{PlayerSettings, parse_config};
use soundcue_core::{Player, PlaybackOutcome};
use soundcue_host_api::{CommandBuilder, HostPlatform, MockLauncher, PlayerCommand};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[test]
fn config_selects_platform() {
    let settings = parse_config(
        r#"
        config_version = 1
        [player]
        platform = "macos"
        default_volume = 0.2
        "#,
    )
    .unwrap();

    let player = Player::new(&settings.player);
    assert_eq!(player.platform(), HostPlatform::MacOs);
    assert_eq!(player.default_volume(), 0.2);
}

#[tokio::test]
async fn configured_builder_feeds_launcher() {
    let settings = parse_config(
        r#"
        config_version = 1
        [player]
        platform = "windows"
        powershell_program = "pwsh"
        "#,
    )
    .unwrap();

    let builder = soundcue_host::builder_for_platform(
        settings.player.platform,
        &settings.player.afplay_program,
        &settings.player.powershell_program,
    );
    let launcher = Arc::new(MockLauncher::new());
    let player = Player::with_parts(builder, launcher.clone(), settings.player.default_volume);

    player.play_default("C:\\sounds\\ding.wav");

    let commands = launcher.commands();
    assert_eq!(commands[0].program, "pwsh");
    assert!(commands[0].args[1].contains("$player.Volume = 0.5;"));
}

#[tokio::test]
async fn missing_player_program_finishes_with_spawn_error() {
    let settings = PlayerSettings {
        platform: HostPlatform::MacOs,
        afplay_program: "/nonexistent/soundcue-afplay".into(),
        ..Default::default()
    };
    let player = Player::new(&settings);

    let playback = player.play_tracked("ding.wav", 0.5);

    assert!(!player.is_active(&playback.id));
    assert!(!player.stop(&playback.id));
    assert!(matches!(playback.finished.await, PlaybackOutcome::SpawnError(_)));
}

/// Runs a fixed command instead of an audio player
#[cfg(unix)]
struct FixedCommand(&'static [&'static str]);

#[cfg(unix)]
impl CommandBuilder for FixedCommand {
    fn platform(&self) -> HostPlatform {
        HostPlatform::detect()
    }

    fn adjust_volume(&self, volume: f64) -> f64 {
        volume
    }

    fn build(&self, _file_path: &Path, _volume: f64) -> PlayerCommand {
        self.0[1..]
            .iter()
            .fold(PlayerCommand::new(self.0[0]), |cmd, arg| cmd.arg(*arg))
    }
}

#[cfg(unix)]
fn real_player(argv: &'static [&'static str]) -> Player {
    Player::with_parts(
        Arc::new(FixedCommand(argv)),
        Arc::new(soundcue_host::SystemLauncher::new()),
        0.5,
    )
}

#[cfg(unix)]
#[tokio::test]
async fn play_does_not_wait_for_player() {
    let player = real_player(&["sleep", "30"]);

    let started = Instant::now();
    let playback = player.play_tracked("ding.wav", 0.5);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(player.is_active(&playback.id));

    let active = player.active();
    assert_eq!(active.len(), 1);
    assert!(active[0].pid.is_some());
    assert!(active[0].file_path.is_absolute());

    assert!(player.stop(&playback.id));
    assert!(!player.stop(&playback.id));

    let outcome = tokio::time::timeout(Duration::from_secs(5), playback.finished)
        .await
        .expect("stopped player should finish");
    assert_eq!(outcome, PlaybackOutcome::Stopped);
    assert_eq!(player.active_count(), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn natural_exit_removes_entry() {
    let player = real_player(&["true"]);

    let playback = player.play_tracked("ding.wav", 0.5);
    let id = playback.id.clone();

    let outcome = tokio::time::timeout(Duration::from_secs(5), playback.finished)
        .await
        .expect("player should exit");
    assert!(matches!(outcome, PlaybackOutcome::Exited(ref status) if status.is_success()));
    assert!(!player.is_active(&id));
    assert!(!player.stop(&id));
}

#[cfg(unix)]
#[tokio::test]
async fn stop_all_terminates_real_players() {
    let player = real_player(&["sleep", "30"]);
    let playbacks: Vec<_> = (0..3).map(|_| player.play_tracked("ding.wav", 0.5)).collect();
    assert_eq!(player.active_count(), 3);

    player.stop_all();
    assert_eq!(player.active_count(), 0);

    for playback in playbacks {
        let outcome = tokio::time::timeout(Duration::from_secs(5), playback.finished)
            .await
            .expect("stopped player should finish");
        assert_eq!(outcome, PlaybackOutcome::Stopped);
    }
}
