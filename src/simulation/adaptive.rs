//! Adaptive priority signal controller
//!
//! Gives green to one direction at a time, chosen by a priority score built
//! from the detection zones. Minimum and maximum green times bound each
//! phase and a hysteresis margin keeps the controller from flapping.
//!
//! Every transition is driven from `update`, so the controller can be stepped
//! at any time granularity.

use anyhow::{ensure, Result};
use log::debug;

use super::controller::PhaseInfo;
use super::detection::PriorityData;
use super::fixed_timer::{DEFAULT_ALL_RED_DURATION, DEFAULT_YELLOW_DURATION};
use super::signals::{SignalBank, SignalColor};
use super::types::Direction;

/// Tuning for the adaptive controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveConfig {
    pub min_green: f32,
    pub max_green: f32,
    pub car_weight: f32,
    pub time_weight: f32,
    /// Seconds between priority checks
    pub check_interval: f32,
    /// Advantage a direction needs over the current one to take the green
    pub hysteresis: f32,
    pub yellow: f32,
    pub all_red: f32,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            min_green: 5.0,
            max_green: 30.0,
            car_weight: 1.0,
            time_weight: 0.5,
            check_interval: 1.0,
            hysteresis: 1.0,
            yellow: DEFAULT_YELLOW_DURATION,
            all_red: DEFAULT_ALL_RED_DURATION,
        }
    }
}

impl AdaptiveConfig {
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.min_green,
            self.max_green,
            self.car_weight,
            self.time_weight,
            self.check_interval,
            self.hysteresis,
            self.yellow,
            self.all_red,
        ];
        ensure!(
            values.iter().all(|v| v.is_finite() && *v >= 0.0),
            "adaptive timings and weights must be finite and non-negative"
        );
        ensure!(
            self.min_green <= self.max_green,
            "minimum green ({}) exceeds maximum green ({})",
            self.min_green,
            self.max_green
        );
        ensure!(self.check_interval > 0.0, "check interval must be positive");
        Ok(())
    }

    /// Score for one direction's zone data
    pub fn priority(&self, data: &PriorityData) -> f32 {
        data.waiting_count as f32 * self.car_weight + data.average_wait * self.time_weight
    }
}

/// Where the adaptive state machine is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaptivePhase {
    /// Every signal red, waiting for demand
    Idle,
    Green(Direction),
    Yellow(Direction),
    AllRed,
}

#[derive(Debug, Clone)]
pub struct AdaptiveController {
    config: AdaptiveConfig,
    phase: AdaptivePhase,
    /// Time spent in the current phase
    phase_timer: f32,
    /// Time since the last priority check
    check_timer: f32,
    next_direction: Option<Direction>,
    /// Scores from the most recent check
    priorities: [f32; 4],
}

impl Default for AdaptiveController {
    fn default() -> Self {
        Self::new(AdaptiveConfig::default())
    }
}

impl AdaptiveController {
    pub fn new(config: AdaptiveConfig) -> Self {
        Self {
            config,
            phase: AdaptivePhase::Idle,
            phase_timer: 0.0,
            check_timer: 0.0,
            next_direction: None,
            priorities: [0.0; 4],
        }
    }

    pub fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AdaptiveConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Yellow and all-red follow the signal timing settings
    pub fn set_transition_durations(&mut self, yellow: f32, all_red: f32) {
        self.config.yellow = yellow;
        self.config.all_red = all_red;
    }

    pub fn phase(&self) -> AdaptivePhase {
        self.phase
    }

    pub fn phase_timer(&self) -> f32 {
        self.phase_timer
    }

    pub fn next_direction(&self) -> Option<Direction> {
        self.next_direction
    }

    pub fn green_direction(&self) -> Option<Direction> {
        match self.phase {
            AdaptivePhase::Green(direction) => Some(direction),
            _ => None,
        }
    }

    /// Priorities from the last check in North, East, South, West order
    pub fn priorities(&self) -> [f32; 4] {
        self.priorities
    }

    pub fn update(&mut self, delta_secs: f32, sensors: &[PriorityData; 4], signals: &mut SignalBank) {
        self.phase_timer += delta_secs;
        self.check_timer += delta_secs;

        match self.phase {
            AdaptivePhase::Idle | AdaptivePhase::Green(_) => {
                if self.check_timer >= self.config.check_interval {
                    self.check_timer = 0.0;
                    self.check_priorities(sensors, signals);
                }

                if let AdaptivePhase::Green(direction) = self.phase {
                    if self.phase_timer >= self.config.max_green {
                        debug!("{direction} reached maximum green");
                        self.start_yellow(direction, signals);
                    }
                }
            }
            AdaptivePhase::Yellow(direction) => {
                if self.phase_timer >= self.config.yellow {
                    signals.set(direction, SignalColor::Red);
                    self.enter(AdaptivePhase::AllRed);
                }
            }
            AdaptivePhase::AllRed => {
                if self.phase_timer >= self.config.all_red {
                    match self.next_direction.take() {
                        Some(direction) => self.start_green(direction, signals),
                        None => self.enter(AdaptivePhase::Idle),
                    }
                }
            }
        }
    }

    fn check_priorities(&mut self, sensors: &[PriorityData; 4], signals: &mut SignalBank) {
        let current = self.green_direction();
        if current.is_some() && self.phase_timer < self.config.min_green {
            return;
        }

        self.priorities = self.compute_priorities(sensors, current);

        let Some(best) = self.best_direction() else {
            return;
        };
        if Some(best) == current {
            return;
        }

        let current_priority = current.map_or(0.0, |d| self.priorities[d.index()]);
        let best_priority = self.priorities[best.index()];
        if best_priority <= current_priority + self.config.hysteresis {
            return;
        }

        debug!("Adaptive switch to {best} (priority {best_priority:.2})");
        self.next_direction = Some(best);
        match current {
            None => self.start_green(best, signals),
            Some(direction) => self.start_yellow(direction, signals),
        }
    }

    /// The green direction always scores 0 so it cannot reselect itself
    fn compute_priorities(&self, sensors: &[PriorityData; 4], current: Option<Direction>) -> [f32; 4] {
        Direction::ALL.map(|direction| {
            if Some(direction) == current {
                0.0
            } else {
                self.config.priority(&sensors[direction.index()])
            }
        })
    }

    /// Highest positive score, earliest direction on ties
    fn best_direction(&self) -> Option<Direction> {
        let mut best = None;
        let mut max_priority = 0.0;
        for direction in Direction::ALL {
            let priority = self.priorities[direction.index()];
            if priority > max_priority {
                max_priority = priority;
                best = Some(direction);
            }
        }
        best
    }

    fn start_green(&mut self, direction: Direction, signals: &mut SignalBank) {
        signals.set_all(SignalColor::Red);
        signals.set(direction, SignalColor::Green);
        self.next_direction = None;
        self.enter(AdaptivePhase::Green(direction));
    }

    fn start_yellow(&mut self, direction: Direction, signals: &mut SignalBank) {
        signals.set(direction, SignalColor::Yellow);
        self.enter(AdaptivePhase::Yellow(direction));
    }

    fn enter(&mut self, phase: AdaptivePhase) {
        debug!("Adaptive phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.phase_timer = 0.0;
    }

    /// Back to idle with every signal red
    pub fn reset(&mut self, signals: &mut SignalBank) {
        self.phase = AdaptivePhase::Idle;
        self.phase_timer = 0.0;
        self.check_timer = 0.0;
        self.next_direction = None;
        self.priorities = [0.0; 4];
        signals.set_all(SignalColor::Red);
    }

    pub fn current_info(&self) -> PhaseInfo {
        let (name, duration) = match self.phase {
            AdaptivePhase::Idle => {
                return PhaseInfo {
                    name: "Adaptive - Waiting".to_string(),
                    remaining: 0.0,
                    progress: 0.0,
                }
            }
            AdaptivePhase::Green(d) => (format!("{d} Green"), self.config.max_green),
            AdaptivePhase::Yellow(d) => (format!("{d} Yellow"), self.config.yellow),
            AdaptivePhase::AllRed => ("All Red".to_string(), self.config.all_red),
        };

        PhaseInfo {
            name,
            remaining: (duration - self.phase_timer).max(0.0),
            progress: if duration > 0.0 {
                self.phase_timer / duration
            } else {
                0.0
            },
        }
    }
}
