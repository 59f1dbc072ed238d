//! Configuration validation

use crate::schema::{RawConfig, RawPlayerConfig};
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("default_volume {0} is outside 0.0..=1.0")]
    VolumeOutOfRange(f64),

    #[error("{field} cannot be empty")]
    EmptyProgram { field: &'static str },
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    validate_player(&config.player)
}

fn validate_player(player: &RawPlayerConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(volume) = player.default_volume {
        if !volume.is_finite() || !(0.0..=1.0).contains(&volume) {
            errors.push(ValidationError::VolumeOutOfRange(volume));
        }
    }

    let programs = [
        ("afplay_program", &player.afplay_program),
        ("powershell_program", &player.powershell_program),
    ];
    for (field, program) in programs {
        if program.as_deref().is_some_and(|p| p.trim().is_empty()) {
            errors.push(ValidationError::EmptyProgram { field });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(player: RawPlayerConfig) -> RawConfig {
        RawConfig {
            config_version: 1,
            player,
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&config(RawPlayerConfig::default())).is_empty());
    }

    #[test]
    fn volume_bounds() {
        for ok in [0.0, 0.5, 1.0] {
            let raw = config(RawPlayerConfig {
                default_volume: Some(ok),
                ..Default::default()
            });
            assert!(validate_config(&raw).is_empty(), "{ok} should be accepted");
        }

        for bad in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            let raw = config(RawPlayerConfig {
                default_volume: Some(bad),
                ..Default::default()
            });
            let errors = validate_config(&raw);
            assert!(matches!(errors.as_slice(), [ValidationError::VolumeOutOfRange(_)]));
        }
    }

    #[test]
    fn all_errors_are_collected() {
        let raw = config(RawPlayerConfig {
            default_volume: Some(3.0),
            afplay_program: Some("".into()),
            powershell_program: Some("   ".into()),
            ..Default::default()
        });

        let errors = validate_config(&raw);
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::EmptyProgram { field: "powershell_program" }
        )));
    }
}
