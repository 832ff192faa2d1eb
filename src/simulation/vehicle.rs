//! Vehicle movement logic for the intersection simulation
//!
//! A vehicle decides each tick whether it must stop (for its signal or for
//! the vehicle ahead), integrates its speed, then walks its precomputed path.

use ordered_float::OrderedFloat;

use super::intersection::{distance_to_stop_line, in_footprint, is_off_screen, spawn_point};
use super::path::{generate_path, Waypoint};
use super::signals::SignalColor;
use super::types::{
    Direction, Position, TurnIntent, VehicleId, ACCELERATION, COMMITTED_DISTANCE, DECELERATION,
    SAFE_FOLLOWING_DISTANCE, STOPPED_SPEED, STOP_LINE_BUFFER, VEHICLE_LENGTH,
    YELLOW_DECISION_DISTANCE,
};

/// Lifecycle of a vehicle; states only advance forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VehicleState {
    /// Upstream of the stop line
    Approaching,
    /// Past the stop line, inside the intersection footprint
    Crossing,
    /// Out of the footprint, heading for the edge of the map
    Exiting,
}

impl VehicleState {
    pub fn name(self) -> &'static str {
        match self {
            VehicleState::Approaching => "approaching",
            VehicleState::Crossing => "crossing",
            VehicleState::Exiting => "exiting",
        }
    }
}

/// A vehicle in the simulation
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub origin: Direction,
    pub turn: TurnIntent,
    pub position: Position,
    pub heading: f32,
    pub speed: f32,
    pub target_speed: f32,
    pub state: VehicleState,
    /// Time spent stopped since the vehicle last moved
    pub wait_time: f32,
    /// Time spent stopped over the vehicle's whole life
    pub total_wait_time: f32,
    path: Vec<Waypoint>,
    path_index: usize,
    /// Distance already covered inside the segment starting at `path_index`
    segment_progress: f32,
}

impl Vehicle {
    pub fn new(id: VehicleId, origin: Direction, turn: TurnIntent, target_speed: f32) -> Self {
        Self {
            id,
            origin,
            turn,
            position: spawn_point(origin),
            heading: origin.heading(),
            speed: 0.0,
            target_speed: target_speed.max(0.0),
            state: VehicleState::Approaching,
            wait_time: 0.0,
            total_wait_time: 0.0,
            path: generate_path(origin, turn),
            path_index: 0,
            segment_progress: 0.0,
        }
    }

    pub fn path(&self) -> &[Waypoint] {
        &self.path
    }

    pub fn path_index(&self) -> usize {
        self.path_index
    }

    /// The final waypoint has been reached
    pub fn is_path_exhausted(&self) -> bool {
        self.path_index + 1 >= self.path.len()
    }

    /// Signed distance to this vehicle's stop line; positive before the line
    pub fn distance_to_stop_line(&self) -> f32 {
        distance_to_stop_line(self.origin, &self.position)
    }

    pub fn is_off_screen(&self) -> bool {
        is_off_screen(&self.position)
    }

    /// Stopped at or before the stop line
    pub fn is_waiting(&self) -> bool {
        self.state == VehicleState::Approaching && self.speed < STOPPED_SPEED
    }

    /// Distance to the nearest vehicle ahead in the same lane, if any
    pub fn distance_to_leader<'a, I>(&self, others: I) -> Option<f32>
    where
        I: IntoIterator<Item = &'a Vehicle>,
    {
        others
            .into_iter()
            .filter(|other| other.id != self.id && other.origin == self.origin)
            .filter(|other| self.origin.is_ahead(&self.position, &other.position))
            .map(|other| OrderedFloat(self.position.distance(&other.position)))
            .min()
            .map(OrderedFloat::into_inner)
    }

    /// Whether the signal asks this vehicle to stop
    pub fn signal_demands_stop(&self, signal: SignalColor) -> bool {
        if self.state == VehicleState::Exiting {
            return false;
        }

        let distance = self.distance_to_stop_line();
        let demanded = match signal {
            SignalColor::Red => true,
            SignalColor::Yellow => distance < YELLOW_DECISION_DISTANCE,
            SignalColor::Green => false,
        };

        demanded && distance > -COMMITTED_DISTANCE
    }

    /// Distance needed to come to rest from the current speed
    pub fn braking_distance(&self) -> f32 {
        self.speed * self.speed / (2.0 * DECELERATION)
    }

    /// Update the vehicle for one tick
    ///
    /// `leader_distance` is the distance to the nearest same-lane vehicle
    /// ahead, as returned by [`Vehicle::distance_to_leader`].
    pub fn update(&mut self, delta_secs: f32, signal: SignalColor, leader_distance: Option<f32>) {
        if self.speed < STOPPED_SPEED {
            self.wait_time += delta_secs;
            self.total_wait_time += delta_secs;
        } else {
            self.wait_time = 0.0;
        }

        let stop_line = self.distance_to_stop_line();
        let signal_stop = self.signal_demands_stop(signal);

        // Upstream of the line a stop demand holds the vehicle at the line:
        // keep rolling until braking is due, never cross it.
        let brake_for_signal =
            signal_stop && (stop_line <= 0.0 || stop_line <= self.braking_distance() + STOP_LINE_BUFFER);
        let brake_for_leader = leader_distance.is_some_and(|gap| gap < SAFE_FOLLOWING_DISTANCE);

        if brake_for_signal || brake_for_leader {
            self.speed = (self.speed - DECELERATION * delta_secs).max(0.0);
        } else {
            self.speed = (self.speed + ACCELERATION * delta_secs).min(self.target_speed);
        }
        self.speed = self.speed.clamp(0.0, self.target_speed);

        let mut budget = self.speed * delta_secs;
        if signal_stop && stop_line > 0.0 {
            budget = budget.min(stop_line);
        }
        if let Some(gap) = leader_distance {
            budget = budget.min((gap - VEHICLE_LENGTH).max(0.0));
        }

        self.advance(budget);
        self.update_state();
    }

    /// Walk `distance` units forward along the path
    ///
    /// Whole segments are consumed while they fit in the budget, snapping to
    /// each waypoint; the remainder interpolates inside the next segment.
    pub fn advance(&mut self, distance: f32) {
        let mut remaining = distance;

        while remaining > 0.0 && self.path_index + 1 < self.path.len() {
            let from = self.path[self.path_index];
            let to = self.path[self.path_index + 1];
            let segment_length = from.position.distance(&to.position);
            let segment_left = segment_length - self.segment_progress;

            if segment_left <= remaining {
                remaining -= segment_left;
                self.path_index += 1;
                self.segment_progress = 0.0;
                self.position = to.position;
                self.heading = to.heading;
            } else {
                self.segment_progress += remaining;
                let t = self.segment_progress / segment_length;
                self.position = from.position.lerp(&to.position, t);
                self.heading = to.heading;
                remaining = 0.0;
            }
        }
    }

    fn update_state(&mut self) {
        match self.state {
            VehicleState::Approaching if self.distance_to_stop_line() <= 0.0 => {
                self.state = VehicleState::Crossing;
            }
            VehicleState::Crossing if !in_footprint(&self.position) => {
                self.state = VehicleState::Exiting;
            }
            _ => {}
        }
    }
}
