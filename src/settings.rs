//! Game settings and rules
//!
//! Loaded from an optional JSON file; anything missing keeps its default.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::consts::{BRICK_POINTS, FAST_TICK_HZ, STARTING_LIVES, TICK_HZ};

/// How the ball is pushed back out after crossing a side wall or the ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WallResponse {
    /// Point the velocity away from the wall and sit the ball flush against it
    #[default]
    Clamp,
    /// Same bounce as against a brick: flip and mirror the overshoot
    Mirror,
}

/// Gameplay rules the simulation reads every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub starting_lives: u8,
    /// Score for each brick broken
    pub brick_points: u32,
    pub wall_response: WallResponse,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            brick_points: BRICK_POINTS,
            wall_response: WallResponse::Clamp,
        }
    }
}

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation rate in normal mode
    pub tick_hz: u32,
    /// Simulation rate in fast mode
    pub fast_tick_hz: u32,
    /// Start in fast mode
    pub start_fast: bool,
    /// Frames the headless demo runs before quitting
    pub demo_frames: u64,
    pub rules: Rules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_hz: TICK_HZ,
            fast_tick_hz: FAST_TICK_HZ,
            start_fast: false,
            demo_frames: 30 * 60,
            rules: Rules::default(),
        }
    }
}

impl Settings {
    /// Sleep between ticks for the given speed mode
    pub fn tick_interval(&self, fast: bool) -> Duration {
        let hz = if fast { self.fast_tick_hz } else { self.tick_hz };
        Duration::from_secs_f64(1.0 / f64::from(hz.max(1)))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings = Self::from_json(&json)
            .with_context(|| format!("invalid settings in {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.tick_hz, 60);
        assert_eq!(settings.fast_tick_hz, 125);
        assert_eq!(settings.rules.starting_lives, 3);
        assert_eq!(settings.rules.brick_points, 50);
        assert_eq!(settings.rules.wall_response, WallResponse::Clamp);
    }

    #[test]
    fn test_tick_interval() {
        let settings = Settings::default();
        assert_eq!(settings.tick_interval(true), Duration::from_millis(8));
        assert!(settings.tick_interval(false) > settings.tick_interval(true));

        let stalled = Settings {
            tick_hz: 0,
            ..Default::default()
        };
        assert_eq!(stalled.tick_interval(false), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "fast_tick_hz": 200, "rules": { "wall_response": "mirror" } }"#)
                .unwrap();
        assert_eq!(settings.fast_tick_hz, 200);
        assert_eq!(settings.tick_hz, 60);
        assert_eq!(settings.rules.wall_response, WallResponse::Mirror);
        assert_eq!(settings.rules.starting_lives, 3);
    }

    #[test]
    fn test_json_survives_save_and_load() {
        let settings = Settings {
            start_fast: true,
            rules: Rules {
                starting_lives: 5,
                ..Default::default()
            },
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json(r#"{ "tick_hz": "fast" }"#).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("failed to read settings"));
    }
}
