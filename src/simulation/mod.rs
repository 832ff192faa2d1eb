//! Four-way intersection simulation
//!
//! This module contains the whole simulation core: geometry, vehicle
//! movement, detection zones, both signal controllers and the engine that
//! ties them together. Nothing here depends on a renderer; the engine can be
//! driven headless or stepped from tests.

mod adaptive;
mod controller;
mod detection;
mod fixed_timer;
mod fleet;
mod intersection;
mod path;
mod settings;
mod signals;
mod stats;
mod types;
mod vehicle;
mod world;

// Re-export public types for external use
pub use adaptive::{AdaptiveConfig, AdaptiveController, AdaptivePhase};
pub use controller::{ControlMode, PhaseInfo, TrafficController};
pub use detection::{
    DetectedVehicle, DetectionZone, DetectionZones, PriorityData, ZoneCounts,
    DEFAULT_DETECTOR_DISTANCE, MAX_DETECTOR_DISTANCE, MIN_DETECTOR_DISTANCE, ZONE_DEPTH,
};
pub use fixed_timer::{
    FixedTimerController, PhaseDurations, PhaseKind, DEFAULT_ALL_RED_DURATION,
    DEFAULT_GREEN_DURATION, DEFAULT_YELLOW_DURATION, PHASE_COUNT,
};
pub use fleet::FleetManager;
pub use intersection::{
    center, distance_to_stop_line, in_footprint, is_off_screen, lane_point, spawn_point,
    stop_line_point, Rect,
};
pub use path::{bezier_point, generate_path, path_length, Waypoint, CURVE_STEPS, LEG_STEPS, STRAIGHT_PATH_STEPS};
pub use settings::{Settings, SettingsUpdate, DEFAULT_CAR_SPEED, DEFAULT_SPAWN_RATE, DEFAULT_TURN_RATE};
pub use signals::{SignalBank, SignalColor};
pub use stats::{DirectionStats, Stats};
pub use types::{
    Axis, Direction, Position, TurnIntent, VehicleId, ACCELERATION, CANVAS_HEIGHT, CANVAS_WIDTH,
    CENTER_X, CENTER_Y, COMMITTED_DISTANCE, DECELERATION, INTERSECTION_SIZE, LANE_WIDTH,
    OFFSCREEN_MARGIN, PATH_END_DISTANCE, ROAD_LENGTH, ROAD_WIDTH, SAFE_FOLLOWING_DISTANCE,
    SPAWN_DISTANCE, STOPPED_SPEED, STOP_LINE_BUFFER, STOP_LINE_DISTANCE, TURNING_RADIUS,
    TURN_CONTROL_FACTOR, VEHICLE_LENGTH, YELLOW_DECISION_DISTANCE,
};
pub use vehicle::{Vehicle, VehicleState};
pub use world::{Simulation, MAX_TICK_SECS};
