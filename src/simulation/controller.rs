//! Signal controller dispatch
//!
//! Holds both controllers and forwards each tick to the one selected by the
//! current mode.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use log::info;
use serde::{Deserialize, Serialize};

use super::adaptive::{AdaptiveConfig, AdaptiveController};
use super::detection::DetectionZones;
use super::fixed_timer::{FixedTimerController, PhaseDurations};
use super::signals::SignalBank;

/// Which controller drives the signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    #[default]
    Fixed,
    Adaptive,
}

impl ControlMode {
    pub fn name(self) -> &'static str {
        match self {
            ControlMode::Fixed => "fixed",
            ControlMode::Adaptive => "adaptive",
        }
    }
}

impl FromStr for ControlMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(ControlMode::Fixed),
            "adaptive" => Ok(ControlMode::Adaptive),
            other => bail!("unknown control mode '{other}'"),
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display data for the running phase
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseInfo {
    pub name: String,
    /// Seconds left before the phase must end
    pub remaining: f32,
    /// Fraction of the phase elapsed
    pub progress: f32,
}

#[derive(Debug, Clone, Default)]
pub struct TrafficController {
    mode: ControlMode,
    fixed: FixedTimerController,
    adaptive: AdaptiveController,
}

impl TrafficController {
    /// Build a controller for `mode` and put `signals` in its starting state
    pub fn new(mode: ControlMode, signals: &mut SignalBank) -> Self {
        let mut controller = Self {
            mode,
            ..Self::default()
        };
        controller.reset(signals);
        controller
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn fixed(&self) -> &FixedTimerController {
        &self.fixed
    }

    pub fn adaptive(&self) -> &AdaptiveController {
        &self.adaptive
    }

    /// Switch controllers; both restart and the signals go to a safe state
    pub fn set_mode(&mut self, mode: ControlMode, signals: &mut SignalBank) {
        if mode == self.mode {
            return;
        }
        info!("Signal control switched from {} to {}", self.mode, mode);
        self.mode = mode;
        self.reset(signals);
    }

    /// Timings shared by both controllers
    pub fn set_timings(&mut self, green: f32, yellow: f32, all_red: f32) {
        self.fixed.set_durations(PhaseDurations {
            green,
            yellow,
            all_red,
        });
        self.adaptive.set_transition_durations(yellow, all_red);
    }

    pub fn set_adaptive_config(&mut self, config: AdaptiveConfig) -> Result<()> {
        self.adaptive.set_config(config)
    }

    pub fn update(&mut self, delta_secs: f32, zones: &DetectionZones, signals: &mut SignalBank) {
        match self.mode {
            ControlMode::Fixed => self.fixed.update(delta_secs, signals),
            ControlMode::Adaptive => self.adaptive.update(delta_secs, &zones.priority_data(), signals),
        }
    }

    /// Restart both controllers, leaving the active one's starting colors
    pub fn reset(&mut self, signals: &mut SignalBank) {
        match self.mode {
            ControlMode::Fixed => {
                self.adaptive.reset(signals);
                self.fixed.reset(signals);
            }
            ControlMode::Adaptive => {
                self.fixed.reset(signals);
                self.adaptive.reset(signals);
            }
        }
    }

    pub fn current_info(&self) -> PhaseInfo {
        match self.mode {
            ControlMode::Fixed => self.fixed.current_info(),
            ControlMode::Adaptive => self.adaptive.current_info(),
        }
    }
}
