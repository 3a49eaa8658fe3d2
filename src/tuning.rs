//! Data-driven game balance
//!
//! Every knob of the difficulty ramp, spawner and upgrade economy. Loaded
//! from JSON with missing fields falling back to the shipped defaults.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance values for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Spawn interval at session start (ms)
    pub spawn_interval_start_ms: f64,
    /// Spawn interval never drops below this (ms)
    pub spawn_interval_floor_ms: f64,
    /// Spawn interval reduction per frame (ms)
    pub spawn_interval_step_ms: f64,
    /// Enemy base speed at session start (units/frame)
    pub enemy_base_speed: f32,
    /// Base speed gained per frame
    pub enemy_speed_increment: f32,
    /// Minimum time between fire actions (ms)
    pub fire_rate_ms: f64,
    /// Upgrade points consumed per upgrade
    pub upgrade_threshold: u32,
    /// Chance the first draw picks a fast enemy
    pub fast_chance: f32,
    /// Chance the second draw picks a large enemy
    pub large_chance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_interval_start_ms: SPAWN_INTERVAL_START_MS,
            spawn_interval_floor_ms: SPAWN_INTERVAL_FLOOR_MS,
            spawn_interval_step_ms: SPAWN_INTERVAL_STEP_MS,
            enemy_base_speed: ENEMY_BASE_SPEED,
            enemy_speed_increment: ENEMY_SPEED_INCREMENT,
            fire_rate_ms: FIRE_RATE_MS,
            upgrade_threshold: UPGRADE_THRESHOLD,
            fast_chance: 0.1,
            large_chance: 0.1,
        }
    }
}

/// Why a tuning document was rejected
#[derive(Debug)]
pub enum TuningError {
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "tuning is not valid JSON: {err}"),
            Self::Invalid { field, reason } => write!(f, "tuning field `{field}` {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// `x > min`, false for NaN
fn above<T: PartialOrd>(x: T, min: T) -> bool {
    matches!(x.partial_cmp(&min), Some(Ordering::Greater))
}

/// `x >= min`, false for NaN
fn at_least<T: PartialOrd>(x: T, min: T) -> bool {
    matches!(x.partial_cmp(&min), Some(Ordering::Greater | Ordering::Equal))
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Check the ramp and economy are internally consistent
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |field, reason| Err(TuningError::Invalid { field, reason });

        if !above(self.spawn_interval_floor_ms, 0.0) {
            return invalid("spawn_interval_floor_ms", "must be positive");
        }
        if !at_least(self.spawn_interval_start_ms, self.spawn_interval_floor_ms) {
            return invalid("spawn_interval_start_ms", "must not be below the floor");
        }
        if !at_least(self.spawn_interval_step_ms, 0.0) {
            return invalid("spawn_interval_step_ms", "must not be negative");
        }
        if !above(self.enemy_base_speed, 0.0) {
            return invalid("enemy_base_speed", "must be positive");
        }
        if !at_least(self.enemy_speed_increment, 0.0) {
            return invalid("enemy_speed_increment", "must not be negative");
        }
        if !at_least(self.fire_rate_ms, 0.0) {
            return invalid("fire_rate_ms", "must not be negative");
        }
        if self.upgrade_threshold == 0 {
            return invalid("upgrade_threshold", "must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.fast_chance) {
            return invalid("fast_chance", "must be within [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.large_chance) {
            return invalid("large_chance", "must be within [0, 1]");
        }
        Ok(())
    }

    /// Load from JSON, logging and falling back to defaults on any problem
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(err) => {
                log::warn!("Ignoring tuning overrides: {err}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "upgrade_threshold": 10 }"#).unwrap();
        assert_eq!(tuning.upgrade_threshold, 10);
        assert_eq!(tuning.spawn_interval_floor_ms, 500.0);
        assert_eq!(tuning.fire_rate_ms, 200.0);
    }

    #[test]
    fn test_rejects_start_below_floor() {
        let err = Tuning::from_json(
            r#"{ "spawn_interval_start_ms": 100.0, "spawn_interval_floor_ms": 500.0 }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid { field: "spawn_interval_start_ms", .. }
        ));
    }

    #[test]
    fn test_rejects_nan() {
        let tuning = Tuning {
            enemy_base_speed: f32::NAN,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid { field: "enemy_base_speed", .. })
        ));

        let tuning = Tuning {
            fire_rate_ms: f64::NAN,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid { field: "fire_rate_ms", .. })
        ));
    }

    #[test]
    fn test_zero_step_is_allowed() {
        let tuning = Tuning {
            spawn_interval_step_ms: 0.0,
            ..Tuning::default()
        };
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Tuning::from_json("{ nope").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(err.to_string().starts_with("tuning is not valid JSON"));
    }

    #[test]
    fn test_fallback_on_invalid() {
        let tuning = Tuning::from_json_or_default(r#"{ "fast_chance": 3.0 }"#);
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_json_roundtrip_shape() {
        let json = Tuning::default().to_json();
        assert!(json.contains("\"upgrade_threshold\": 50"));
    }
}
