//! Detection zones upstream of each stop line
//!
//! Zones are rescanned every tick and feed the adaptive controller's
//! priority scoring.

use log::debug;
use serde::Serialize;

use super::intersection::{lane_point, Rect};
use super::types::{Direction, VehicleId, LANE_WIDTH, ROAD_WIDTH, STOP_LINE_DISTANCE};
use super::vehicle::Vehicle;

pub const DEFAULT_DETECTOR_DISTANCE: f32 = 80.0;
pub const MIN_DETECTOR_DISTANCE: f32 = 30.0;
pub const MAX_DETECTOR_DISTANCE: f32 = 150.0;

/// Depth of a zone along the direction of travel
pub const ZONE_DEPTH: f32 = 20.0;

/// A vehicle seen by a zone during the last scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedVehicle {
    pub id: VehicleId,
    pub waiting: bool,
    pub wait_time: f32,
}

/// Waiting-vehicle data the adaptive controller scores
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriorityData {
    pub waiting_count: usize,
    /// Mean idle time of the waiting vehicles, 0 when none wait
    pub average_wait: f32,
    pub detected: usize,
}

/// Detected and waiting counts for one zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ZoneCounts {
    pub detected: usize,
    pub waiting: usize,
}

/// A single direction's detection zone
#[derive(Debug, Clone)]
pub struct DetectionZone {
    pub direction: Direction,
    pub rect: Rect,
    detected: Vec<DetectedVehicle>,
}

impl DetectionZone {
    pub fn new(direction: Direction, detector_distance: f32) -> Self {
        Self {
            direction,
            rect: zone_rect(direction, detector_distance),
            detected: Vec::new(),
        }
    }

    /// Depends only on the vehicle's origin and position
    pub fn sees(&self, vehicle: &Vehicle) -> bool {
        vehicle.origin == self.direction && self.rect.contains(&vehicle.position)
    }

    pub fn scan(&mut self, vehicles: &[Vehicle]) {
        let (direction, rect) = (self.direction, self.rect);
        self.detected.clear();
        self.detected.extend(
            vehicles
                .iter()
                .filter(|vehicle| vehicle.origin == direction && rect.contains(&vehicle.position))
                .map(|vehicle| DetectedVehicle {
                    id: vehicle.id,
                    waiting: vehicle.is_waiting(),
                    wait_time: vehicle.wait_time,
                }),
        );
    }

    pub fn detected(&self) -> &[DetectedVehicle] {
        &self.detected
    }

    pub fn detected_count(&self) -> usize {
        self.detected.len()
    }

    pub fn waiting(&self) -> impl Iterator<Item = &DetectedVehicle> {
        self.detected.iter().filter(|vehicle| vehicle.waiting)
    }

    pub fn priority_data(&self) -> PriorityData {
        let (waiting_count, total_wait) = self
            .waiting()
            .fold((0usize, 0.0f32), |(count, total), v| (count + 1, total + v.wait_time));

        PriorityData {
            waiting_count,
            average_wait: if waiting_count > 0 {
                total_wait / waiting_count as f32
            } else {
                0.0
            },
            detected: self.detected.len(),
        }
    }

    pub fn counts(&self) -> ZoneCounts {
        ZoneCounts {
            detected: self.detected.len(),
            waiting: self.waiting().count(),
        }
    }

    fn clear(&mut self) {
        self.detected.clear();
    }
}

/// Rectangle spanning the road, its near edge `detector_distance` upstream
/// of the stop line
fn zone_rect(direction: Direction, detector_distance: f32) -> Rect {
    let near = -(STOP_LINE_DISTANCE + detector_distance);
    let far = near - ZONE_DEPTH;
    // lane_point sits on the lane center; shift back onto the road axis
    let half_width = ROAD_WIDTH / 2.0;
    let axis_shift = -LANE_WIDTH / 2.0;
    let left = direction.left();

    let a = lane_point(direction, near).offset(&left, axis_shift + half_width);
    let b = lane_point(direction, far).offset(&left, axis_shift - half_width);
    Rect::from_corners(a, b)
}

/// All four zones plus the shared detector distance
#[derive(Debug, Clone)]
pub struct DetectionZones {
    zones: [DetectionZone; 4],
    detector_distance: f32,
}

impl Default for DetectionZones {
    fn default() -> Self {
        Self::new(DEFAULT_DETECTOR_DISTANCE)
    }
}

impl DetectionZones {
    pub fn new(detector_distance: f32) -> Self {
        let distance = clamp_detector_distance(detector_distance);
        Self {
            zones: Direction::ALL.map(|direction| DetectionZone::new(direction, distance)),
            detector_distance: distance,
        }
    }

    pub fn detector_distance(&self) -> f32 {
        self.detector_distance
    }

    /// Move every zone; out-of-range distances are clamped
    pub fn set_detector_distance(&mut self, distance: f32) {
        let clamped = clamp_detector_distance(distance);
        if clamped != distance {
            debug!("Detector distance {distance} clamped to {clamped}");
        }
        if clamped == self.detector_distance {
            return;
        }

        self.detector_distance = clamped;
        for zone in &mut self.zones {
            zone.rect = zone_rect(zone.direction, clamped);
        }
    }

    pub fn scan(&mut self, vehicles: &[Vehicle]) {
        for zone in &mut self.zones {
            zone.scan(vehicles);
        }
    }

    pub fn zone(&self, direction: Direction) -> &DetectionZone {
        &self.zones[direction.index()]
    }

    pub fn zones(&self) -> &[DetectionZone; 4] {
        &self.zones
    }

    /// Priority data in North, East, South, West order
    pub fn priority_data(&self) -> [PriorityData; 4] {
        Direction::ALL.map(|direction| self.zone(direction).priority_data())
    }

    pub fn counts(&self) -> [ZoneCounts; 4] {
        Direction::ALL.map(|direction| self.zone(direction).counts())
    }

    pub fn reset(&mut self) {
        for zone in &mut self.zones {
            zone.clear();
        }
    }
}

fn clamp_detector_distance(distance: f32) -> f32 {
    if distance.is_nan() {
        return DEFAULT_DETECTOR_DISTANCE;
    }
    distance.clamp(MIN_DETECTOR_DISTANCE, MAX_DETECTOR_DISTANCE)
}
