//! Settings snapshot supplied by the driver
//!
//! `Settings` is the full snapshot; `SettingsUpdate` carries a partial
//! override where omitted fields keep their prior values.

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use super::controller::ControlMode;
use super::detection::DEFAULT_DETECTOR_DISTANCE;
use super::fixed_timer::{DEFAULT_ALL_RED_DURATION, DEFAULT_GREEN_DURATION, DEFAULT_YELLOW_DURATION};

/// Cars per ten seconds, per direction
pub const DEFAULT_SPAWN_RATE: f32 = 4.0;

/// Cruise speed in units per second
pub const DEFAULT_CAR_SPEED: f32 = 25.0;

/// Percentage of vehicles that turn, split between left and right
pub const DEFAULT_TURN_RATE: f32 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub mode: ControlMode,
    pub green_duration: f32,
    pub yellow_duration: f32,
    /// All-red clearance duration
    pub red_duration: f32,
    pub car_spawn_rate: f32,
    pub car_speed: f32,
    pub turn_rate: f32,
    pub detector_distance: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: ControlMode::Fixed,
            green_duration: DEFAULT_GREEN_DURATION,
            yellow_duration: DEFAULT_YELLOW_DURATION,
            red_duration: DEFAULT_ALL_RED_DURATION,
            car_spawn_rate: DEFAULT_SPAWN_RATE,
            car_speed: DEFAULT_CAR_SPEED,
            turn_rate: DEFAULT_TURN_RATE,
            detector_distance: DEFAULT_DETECTOR_DISTANCE,
        }
    }
}

impl Settings {
    /// Reject values the simulation cannot run with
    ///
    /// The detector distance is not checked here; out-of-range values are
    /// clamped by the detection zones.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("greenDuration", self.green_duration),
            ("yellowDuration", self.yellow_duration),
            ("redDuration", self.red_duration),
        ] {
            ensure!(
                value.is_finite() && value >= 0.0,
                "{name} must be a non-negative number of seconds, got {value}"
            );
        }
        ensure!(
            self.car_spawn_rate.is_finite() && self.car_spawn_rate >= 0.0,
            "carSpawnRate must be non-negative, got {}",
            self.car_spawn_rate
        );
        ensure!(
            self.car_speed.is_finite() && self.car_speed > 0.0,
            "carSpeed must be positive, got {}",
            self.car_speed
        );
        ensure!(
            (0.0..=100.0).contains(&self.turn_rate),
            "turnRate must be a percentage in 0..=100, got {}",
            self.turn_rate
        );
        ensure!(
            !self.detector_distance.is_nan(),
            "detectorDistance must be a number"
        );
        Ok(())
    }

    /// Seconds between spawns on one approach, `None` when spawning is off
    pub fn spawn_interval(&self) -> Option<f32> {
        (self.car_spawn_rate > 0.0).then(|| 10.0 / self.car_spawn_rate)
    }

    /// Copy of these settings with `update` applied and validated
    pub fn merged(&self, update: &SettingsUpdate) -> Result<Settings> {
        let mut merged = self.clone();
        update.apply_to(&mut merged);
        merged.validate().context("invalid settings override")?;
        Ok(merged)
    }
}

/// Partial settings override
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ControlMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub green_duration: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yellow_duration: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub red_duration: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_spawn_rate: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_rate: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detector_distance: Option<f32>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self == &SettingsUpdate::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse settings override JSON")
    }

    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(mode) = self.mode {
            settings.mode = mode;
        }
        if let Some(value) = self.green_duration {
            settings.green_duration = value;
        }
        if let Some(value) = self.yellow_duration {
            settings.yellow_duration = value;
        }
        if let Some(value) = self.red_duration {
            settings.red_duration = value;
        }
        if let Some(value) = self.car_spawn_rate {
            settings.car_spawn_rate = value;
        }
        if let Some(value) = self.car_speed {
            settings.car_speed = value;
        }
        if let Some(value) = self.turn_rate {
            settings.turn_rate = value;
        }
        if let Some(value) = self.detector_distance {
            settings.detector_distance = value;
        }
    }
}
