//! Simulation engine
//!
//! Owns every component of one intersection and advances them in a fixed
//! order each tick: detection zones, signal controller, then the fleet.

use anyhow::{Context, Result};
use log::{debug, info};

use super::controller::{ControlMode, PhaseInfo, TrafficController};
use super::detection::DetectionZones;
use super::fleet::FleetManager;
use super::settings::{Settings, SettingsUpdate};
use super::signals::{SignalBank, SignalColor};
use super::stats::Stats;
use super::types::{Direction, TurnIntent, VehicleId};
use super::vehicle::Vehicle;

/// Longest step a single tick will simulate
pub const MAX_TICK_SECS: f32 = 1.0 / 30.0;

/// A self-contained four-way intersection simulation
#[derive(Debug, Clone)]
pub struct Simulation {
    settings: Settings,
    signals: SignalBank,
    zones: DetectionZones,
    controller: TrafficController,
    fleet: FleetManager,
    /// Simulated seconds since construction or the last reset
    time: f32,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    fn new_internal(settings: Settings, fleet: FleetManager) -> Self {
        let mut signals = SignalBank::all_red();
        let mut controller = TrafficController::new(settings.mode, &mut signals);
        controller.set_timings(
            settings.green_duration,
            settings.yellow_duration,
            settings.red_duration,
        );

        Self {
            zones: DetectionZones::new(settings.detector_distance),
            settings,
            signals,
            controller,
            fleet,
            time: 0.0,
        }
    }

    /// Create a simulation with default settings
    pub fn new() -> Self {
        Self::new_internal(Settings::default(), FleetManager::new())
    }

    /// Create a simulation whose random draws are reproducible
    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_internal(Settings::default(), FleetManager::new_with_seed(seed))
    }

    /// Create a simulation from a full settings snapshot
    pub fn with_settings(settings: Settings, seed: Option<u64>) -> Result<Self> {
        settings.validate().context("invalid initial settings")?;
        let fleet = match seed {
            Some(seed) => FleetManager::new_with_seed(seed),
            None => FleetManager::new(),
        };
        Ok(Self::new_internal(settings, fleet))
    }

    /// Merge a partial override into the current settings
    ///
    /// The override is validated as a whole; on error nothing changes.
    pub fn apply_settings(&mut self, update: &SettingsUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }

        let merged = self.settings.merged(update)?;

        if merged.mode != self.settings.mode {
            self.controller.set_mode(merged.mode, &mut self.signals);
        }
        self.controller.set_timings(
            merged.green_duration,
            merged.yellow_duration,
            merged.red_duration,
        );
        if merged.detector_distance != self.settings.detector_distance {
            self.zones.set_detector_distance(merged.detector_distance);
        }

        debug!("Settings updated: {merged:?}");
        self.settings = merged;
        Ok(())
    }

    /// Apply `update` and then advance by `delta_secs`
    ///
    /// A rejected override leaves the previous settings in force and skips
    /// the tick.
    pub fn update(&mut self, delta_secs: f32, update: &SettingsUpdate) -> Result<()> {
        self.apply_settings(update)?;
        self.tick(delta_secs);
        Ok(())
    }

    /// Advance the simulation by one step
    pub fn tick(&mut self, delta_secs: f32) {
        let delta_secs = if delta_secs.is_finite() {
            delta_secs.clamp(0.0, MAX_TICK_SECS)
        } else {
            0.0
        };

        self.zones.scan(self.fleet.vehicles());
        self.controller
            .update(delta_secs, &self.zones, &mut self.signals);
        self.fleet.update(delta_secs, &self.signals, &self.settings);

        self.time += delta_secs;
    }

    /// Start over with the current settings
    pub fn reset(&mut self) {
        info!("Simulation reset ({} mode)", self.settings.mode);
        self.fleet.reset();
        self.zones.reset();
        self.controller.reset(&mut self.signals);
        self.time = 0.0;
    }

    /// Switch the signal controller; both controllers restart
    pub fn set_mode(&mut self, mode: ControlMode) {
        self.controller.set_mode(mode, &mut self.signals);
        self.settings.mode = mode;
    }

    /// Place a vehicle directly, bypassing the spawn timers
    pub fn spawn_vehicle(&mut self, origin: Direction, turn: TurnIntent) -> VehicleId {
        self.fleet
            .spawn_vehicle(origin, turn, self.settings.car_speed)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn signal_color(&self, direction: Direction) -> SignalColor {
        self.signals.color(direction)
    }

    pub fn signals(&self) -> &SignalBank {
        &self.signals
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        self.fleet.vehicles()
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.fleet.vehicle(id)
    }

    pub fn stats(&self) -> &Stats {
        self.fleet.stats()
    }

    pub fn zones(&self) -> &DetectionZones {
        &self.zones
    }

    pub fn controller(&self) -> &TrafficController {
        &self.controller
    }

    pub fn phase_info(&self) -> PhaseInfo {
        self.controller.current_info()
    }

    /// Log a summary of the simulation state
    pub fn print_summary(&self) {
        let phase = self.phase_info();
        let stats = self.stats();
        info!("=== Intersection Summary ===");
        info!("Time: {:.2}s", self.time);
        info!(
            "Mode: {}, Phase: {} ({:.1}s left)",
            self.settings.mode, phase.name, phase.remaining
        );
        info!("Signals: {}", self.signals.summary());
        info!(
            "Vehicles: {}, passed: {}, average wait: {:.2}s",
            self.vehicles().len(),
            stats.total_cars_passed,
            stats.average_wait_time()
        );
        for zone in self.zones.zones() {
            let counts = zone.counts();
            debug!(
                "  {} zone: detected={}, waiting={}",
                zone.direction, counts.detected, counts.waiting
            );
        }
    }
}
