//! Vehicle spawning and fleet management
//!
//! The fleet owns every live vehicle. Each approach has its own spawn timer;
//! vehicles are updated in spawn order and removed once they leave the map,
//! at which point their wait time is folded into the statistics.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::intersection::spawn_point;
use super::settings::Settings;
use super::signals::SignalBank;
use super::stats::Stats;
use super::types::{Direction, TurnIntent, VehicleId, SAFE_FOLLOWING_DISTANCE};
use super::vehicle::Vehicle;

#[derive(Debug, Clone)]
pub struct FleetManager {
    vehicles: Vec<Vehicle>,
    /// Seconds since the last spawn on each approach
    spawn_timers: [f32; 4],
    stats: Stats,
    next_id: usize,
    /// Seeded RNG for reproducible runs; `None` uses the thread RNG
    rng: Option<StdRng>,
}

impl Default for FleetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FleetManager {
    fn new_internal(rng: Option<StdRng>) -> Self {
        Self {
            vehicles: Vec::new(),
            spawn_timers: [0.0; 4],
            stats: Stats::new(),
            next_id: 0,
            rng,
        }
    }

    pub fn new() -> Self {
        Self::new_internal(None)
    }

    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_internal(Some(StdRng::seed_from_u64(seed)))
    }

    fn random_unit(&mut self) -> f32 {
        match &mut self.rng {
            Some(rng) => rng.random_range(0.0..1.0),
            None => rand::rng().random_range(0.0..1.0),
        }
    }

    fn next_vehicle_id(&mut self) -> VehicleId {
        let id = VehicleId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// A vehicle of this approach still sits on the spawn point
    pub fn is_spawn_blocked(&self, direction: Direction) -> bool {
        let spawn = spawn_point(direction);
        self.vehicles
            .iter()
            .filter(|v| v.origin == direction)
            .any(|v| v.position.distance(&spawn) < SAFE_FOLLOWING_DISTANCE)
    }

    /// Add a vehicle at the spawn point of `origin`
    pub fn spawn_vehicle(&mut self, origin: Direction, turn: TurnIntent, target_speed: f32) -> VehicleId {
        let id = self.next_vehicle_id();
        debug!("Spawned vehicle {} from {} going {:?}", id.0, origin, turn);
        self.vehicles.push(Vehicle::new(id, origin, turn, target_speed));
        id
    }

    pub fn update(&mut self, delta_secs: f32, signals: &SignalBank, settings: &Settings) {
        self.update_spawning(delta_secs, settings);
        self.update_vehicles(delta_secs, signals);
        self.remove_departed();
    }

    fn update_spawning(&mut self, delta_secs: f32, settings: &Settings) {
        let Some(interval) = settings.spawn_interval() else {
            return;
        };

        for direction in Direction::ALL {
            let timer = &mut self.spawn_timers[direction.index()];
            *timer += delta_secs;
            if *timer < interval {
                continue;
            }

            if self.is_spawn_blocked(direction) {
                debug!("Spawn held on {direction}: spawn point occupied");
                continue;
            }

            self.spawn_timers[direction.index()] = 0.0;
            let draw = self.random_unit();
            let turn = TurnIntent::from_draw(draw, settings.turn_rate);
            self.spawn_vehicle(direction, turn, settings.car_speed);
        }
    }

    /// Vehicles are updated one after another; later vehicles see the
    /// positions earlier ones moved to this tick
    fn update_vehicles(&mut self, delta_secs: f32, signals: &SignalBank) {
        for i in 0..self.vehicles.len() {
            let leader_distance = self.vehicles[i].distance_to_leader(&self.vehicles);
            let signal = signals.color(self.vehicles[i].origin);
            self.vehicles[i].update(delta_secs, signal, leader_distance);
        }
    }

    fn remove_departed(&mut self) {
        let stats = &mut self.stats;
        self.vehicles.retain(|vehicle| {
            if vehicle.is_off_screen() {
                stats.record_passed(vehicle.origin, vehicle.total_wait_time);
                debug!("Vehicle {} left the map", vehicle.id.0);
                false
            } else {
                true
            }
        });
    }

    /// Drop every vehicle and clear timers and statistics
    ///
    /// The RNG keeps its state so a seeded run stays reproducible across
    /// resets.
    pub fn reset(&mut self) {
        self.vehicles.clear();
        self.spawn_timers = [0.0; 4];
        self.stats.reset();
        self.next_id = 0;
    }
}
