//! Fixed-timer signal controller
//!
//! Runs a six-phase cycle forever: East-West green, yellow, all red, then
//! North-South green, yellow, all red.

use log::debug;

use super::controller::PhaseInfo;
use super::signals::{SignalBank, SignalColor};
use SignalColor::{Green as G, Red as R, Yellow as Y};

pub const DEFAULT_GREEN_DURATION: f32 = 10.0;
pub const DEFAULT_YELLOW_DURATION: f32 = 3.0;
pub const DEFAULT_ALL_RED_DURATION: f32 = 3.0;

pub const PHASE_COUNT: usize = 6;

/// Color of every direction (N, E, S, W) in each phase
const PHASE_COLORS: [[SignalColor; 4]; PHASE_COUNT] = [
    [R, G, R, G],
    [R, Y, R, Y],
    [R, R, R, R],
    [G, R, G, R],
    [Y, R, Y, R],
    [R, R, R, R],
];

const PHASE_NAMES: [&str; PHASE_COUNT] = [
    "East-West Green",
    "East-West Yellow",
    "All Red",
    "North-South Green",
    "North-South Yellow",
    "All Red",
];

/// Which duration setting a phase uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Green,
    Yellow,
    AllRed,
}

impl PhaseKind {
    pub fn of(phase: usize) -> PhaseKind {
        match phase % 3 {
            0 => PhaseKind::Green,
            1 => PhaseKind::Yellow,
            _ => PhaseKind::AllRed,
        }
    }
}

/// Green, yellow and all-red durations in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseDurations {
    pub green: f32,
    pub yellow: f32,
    pub all_red: f32,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            green: DEFAULT_GREEN_DURATION,
            yellow: DEFAULT_YELLOW_DURATION,
            all_red: DEFAULT_ALL_RED_DURATION,
        }
    }
}

impl PhaseDurations {
    pub fn for_phase(&self, phase: usize) -> f32 {
        match PhaseKind::of(phase) {
            PhaseKind::Green => self.green,
            PhaseKind::Yellow => self.yellow,
            PhaseKind::AllRed => self.all_red,
        }
    }

    /// Length of one full six-phase cycle
    pub fn cycle_length(&self) -> f32 {
        2.0 * (self.green + self.yellow + self.all_red)
    }
}

#[derive(Debug, Clone)]
pub struct FixedTimerController {
    phase: usize,
    phase_timer: f32,
    durations: PhaseDurations,
}

impl Default for FixedTimerController {
    fn default() -> Self {
        Self::new(PhaseDurations::default())
    }
}

impl FixedTimerController {
    pub fn new(durations: PhaseDurations) -> Self {
        Self {
            phase: 0,
            phase_timer: 0.0,
            durations,
        }
    }

    pub fn phase(&self) -> usize {
        self.phase
    }

    pub fn phase_timer(&self) -> f32 {
        self.phase_timer
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    /// New durations apply from the next threshold check
    pub fn set_durations(&mut self, durations: PhaseDurations) {
        self.durations = durations;
    }

    /// Colors for a phase index
    pub fn phase_colors(phase: usize) -> [SignalColor; 4] {
        PHASE_COLORS[phase % PHASE_COUNT]
    }

    pub fn update(&mut self, delta_secs: f32, signals: &mut SignalBank) {
        self.phase_timer += delta_secs;

        if self.phase_timer >= self.durations.for_phase(self.phase) {
            self.advance_phase(signals);
        }
    }

    fn advance_phase(&mut self, signals: &mut SignalBank) {
        self.phase_timer = 0.0;
        self.phase = (self.phase + 1) % PHASE_COUNT;
        self.apply(signals);
        debug!("Fixed timer entered phase {} ({})", self.phase, PHASE_NAMES[self.phase]);
    }

    fn apply(&self, signals: &mut SignalBank) {
        *signals = SignalBank::from_colors(Self::phase_colors(self.phase));
    }

    /// Back to East-West green with a fresh timer
    pub fn reset(&mut self, signals: &mut SignalBank) {
        self.phase = 0;
        self.phase_timer = 0.0;
        self.apply(signals);
    }

    pub fn current_info(&self) -> PhaseInfo {
        let duration = self.durations.for_phase(self.phase);
        PhaseInfo {
            name: PHASE_NAMES[self.phase].to_string(),
            remaining: (duration - self.phase_timer).max(0.0),
            progress: if duration > 0.0 {
                self.phase_timer / duration
            } else {
                0.0
            },
        }
    }
}
