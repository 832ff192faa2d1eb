//! Path generation
//!
//! Each vehicle gets a flat list of waypoints once, at spawn. Straight paths
//! are a linear interpolation; turning paths are an approach leg, a sampled
//! cubic Bezier through the intersection, and a departure leg.

use super::intersection::{lane_point, spawn_point, stop_line_point};
use super::types::{
    Direction, Position, TurnIntent, PATH_END_DISTANCE, STOP_LINE_DISTANCE, TURNING_RADIUS,
    TURN_CONTROL_FACTOR,
};

/// Number of interpolation steps on a straight path
pub const STRAIGHT_PATH_STEPS: usize = 100;

/// Parametric step used to sample turn curves
pub const CURVE_STEP: f32 = 0.05;

/// Number of curve intervals, `1 / CURVE_STEP`
pub const CURVE_STEPS: usize = 20;

/// Steps on each straight leg of a turning path
pub const LEG_STEPS: usize = 40;

/// A point on a vehicle's path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub position: Position,
    pub heading: f32,
}

impl Waypoint {
    pub fn new(position: Position, heading: f32) -> Self {
        Self { position, heading }
    }
}

/// Build the full path for a vehicle entering from `origin` with `turn`
pub fn generate_path(origin: Direction, turn: TurnIntent) -> Vec<Waypoint> {
    match turn {
        TurnIntent::Straight => straight_path(origin),
        TurnIntent::Left | TurnIntent::Right => turn_path(origin, turn),
    }
}

fn straight_path(origin: Direction) -> Vec<Waypoint> {
    let heading = origin.heading();
    let start = spawn_point(origin);
    let end = lane_point(origin, PATH_END_DISTANCE);

    (0..=STRAIGHT_PATH_STEPS)
        .map(|i| {
            let t = i as f32 / STRAIGHT_PATH_STEPS as f32;
            Waypoint::new(start.lerp(&end, t), heading)
        })
        .collect()
}

fn turn_path(origin: Direction, turn: TurnIntent) -> Vec<Waypoint> {
    let exit_direction = turn.exit_heading_direction(origin);
    let spawn_heading = origin.heading();
    let exit_heading = exit_direction.heading();

    let spawn = spawn_point(origin);
    let entry = stop_line_point(origin);
    let exit = lane_point(exit_direction, STOP_LINE_DISTANCE);
    let end = lane_point(exit_direction, PATH_END_DISTANCE);

    let control_offset = TURNING_RADIUS * TURN_CONTROL_FACTOR;
    let control1 = entry.offset(&origin.forward(), control_offset);
    let control2 = exit.offset(&exit_direction.forward(), -control_offset);

    let mut path = Vec::with_capacity(2 * LEG_STEPS + CURVE_STEPS + 1);

    for i in 0..=LEG_STEPS {
        let t = i as f32 / LEG_STEPS as f32;
        path.push(Waypoint::new(spawn.lerp(&entry, t), spawn_heading));
    }

    let mut previous = entry;
    for k in 1..=CURVE_STEPS {
        let t = k as f32 * CURVE_STEP;
        let point = bezier_point(t, &entry, &control1, &control2, &exit);
        path.push(Waypoint::new(point, previous.angle_to(&point)));
        previous = point;
    }

    for j in 1..=LEG_STEPS {
        let t = j as f32 / LEG_STEPS as f32;
        path.push(Waypoint::new(exit.lerp(&end, t), exit_heading));
    }

    path
}

/// Point on the cubic Bezier defined by `p0..p3` at parameter `t`
pub fn bezier_point(t: f32, p0: &Position, p1: &Position, p2: &Position, p3: &Position) -> Position {
    let u = 1.0 - t;
    let uu = u * u;
    let tt = t * t;
    let a = uu * u;
    let b = 3.0 * uu * t;
    let c = 3.0 * u * tt;
    let d = tt * t;

    Position::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

/// Total length of a path
pub fn path_length(path: &[Waypoint]) -> f32 {
    path.windows(2)
        .map(|pair| pair[0].position.distance(&pair[1].position))
        .sum()
}
