//! Core types for the intersection simulation
//!
//! Directions, turn intents, positions and the geometry/physics constants
//! shared by every other module.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// A unique identifier for a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub usize);

/// Direction of travel on approach, also used as the lane identifier
///
/// A `North` vehicle spawns on the south arm and drives toward decreasing `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

/// The two signal axes of the intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    NorthSouth,
    EastWest,
}

impl Direction {
    /// All directions in index order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Direction at `index` wrapped onto 0..4
    pub fn wrapping(index: usize) -> Direction {
        Direction::ALL[index % 4]
    }

    /// Offset this direction by `steps` clockwise quarter turns
    pub fn rotated(self, steps: usize) -> Direction {
        Direction::wrapping(self.index() + steps)
    }

    pub fn opposite(self) -> Direction {
        self.rotated(2)
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::North | Direction::South => Axis::NorthSouth,
            Direction::East | Direction::West => Axis::EastWest,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::East => "East",
            Direction::South => "South",
            Direction::West => "West",
        }
    }

    /// Unit vector of travel in the canvas frame (y grows downward)
    pub fn forward(self) -> Position {
        match self {
            Direction::North => Position::new(0.0, -1.0),
            Direction::East => Position::new(1.0, 0.0),
            Direction::South => Position::new(0.0, 1.0),
            Direction::West => Position::new(-1.0, 0.0),
        }
    }

    /// Unit vector pointing to the left of travel
    pub fn left(self) -> Position {
        let f = self.forward();
        Position::new(f.y, -f.x)
    }

    /// Heading angle of travel, `atan2(dy, dx)`
    pub fn heading(self) -> f32 {
        let f = self.forward();
        f.y.atan2(f.x)
    }

    /// Whether `other` is further along this direction of travel than `from`
    pub fn is_ahead(self, from: &Position, other: &Position) -> bool {
        match self {
            Direction::North => other.y < from.y,
            Direction::East => other.x > from.x,
            Direction::South => other.y > from.y,
            Direction::West => other.x < from.x,
        }
    }
}

impl TryFrom<usize> for Direction {
    type Error = anyhow::Error;

    fn try_from(index: usize) -> Result<Self> {
        match Direction::ALL.get(index) {
            Some(direction) => Ok(*direction),
            None => bail!("direction index {index} is outside 0..4"),
        }
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Direction::North),
            "east" | "e" => Ok(Direction::East),
            "south" | "s" => Ok(Direction::South),
            "west" | "w" => Ok(Direction::West),
            other => bail!("unknown direction '{other}'"),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a vehicle does at the intersection, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnIntent {
    Straight,
    /// Counter-clockwise on screen, North to West
    Left,
    /// Clockwise on screen, North to East
    Right,
}

impl TurnIntent {
    /// Target exit direction. For a turn this is the direction of travel
    /// after the intersection; for Straight it names the far arm by its
    /// inbound lane.
    pub fn target_direction(self, from: Direction) -> Direction {
        match self {
            TurnIntent::Straight => from.rotated(2),
            TurnIntent::Left => from.rotated(3),
            TurnIntent::Right => from.rotated(1),
        }
    }

    /// Direction of travel after the intersection
    pub fn exit_heading_direction(self, from: Direction) -> Direction {
        match self {
            TurnIntent::Straight => from,
            TurnIntent::Left | TurnIntent::Right => self.target_direction(from),
        }
    }

    /// Map a uniform draw in [0, 1) to a turn intent
    ///
    /// `turn_rate` is the combined turning percentage, split evenly between
    /// left and right.
    pub fn from_draw(draw: f32, turn_rate: f32) -> TurnIntent {
        if draw < turn_rate / 200.0 {
            TurnIntent::Left
        } else if draw < turn_rate / 100.0 {
            TurnIntent::Right
        } else {
            TurnIntent::Straight
        }
    }
}

/// A 2D position (or vector) in the canvas frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn lerp(&self, other: &Position, t: f32) -> Position {
        Position {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Angle of the vector from this position to another
    pub fn angle_to(&self, other: &Position) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// This position moved by `vector * amount`
    pub fn offset(&self, vector: &Position, amount: f32) -> Position {
        Position {
            x: self.x + vector.x * amount,
            y: self.y + vector.y * amount,
        }
    }

    pub fn dot(&self, other: &Position) -> f32 {
        self.x * other.x + self.y * other.y
    }
}

/// Canvas width in world units
pub const CANVAS_WIDTH: f32 = 1000.0;

/// Canvas height in world units
pub const CANVAS_HEIGHT: f32 = 1000.0;

pub const CENTER_X: f32 = CANVAS_WIDTH / 2.0;
pub const CENTER_Y: f32 = CANVAS_HEIGHT / 2.0;

pub const ROAD_WIDTH: f32 = 80.0;
pub const LANE_WIDTH: f32 = 40.0;

/// Side length of the square intersection footprint
pub const INTERSECTION_SIZE: f32 = 160.0;

/// Distance from the center to each stop line
pub const STOP_LINE_DISTANCE: f32 = 80.0;

/// Length of each road arm measured from the center
pub const ROAD_LENGTH: f32 = 400.0;

/// Vehicles spawn just outside the visible road
pub const SPAWN_DISTANCE: f32 = ROAD_LENGTH + 50.0;

/// Paths run past the visible bounds plus the removal margin
pub const PATH_END_DISTANCE: f32 = ROAD_LENGTH + 250.0;

/// Margin beyond the canvas before a vehicle is removed
pub const OFFSCREEN_MARGIN: f32 = 100.0;

pub const TURNING_RADIUS: f32 = 60.0;

/// Bezier control point distance as a fraction of the turning radius
pub const TURN_CONTROL_FACTOR: f32 = 0.6;

/// Vehicle body length, the closest a follower may get to its leader
pub const VEHICLE_LENGTH: f32 = 28.0;

/// Minimum gap kept behind the nearest same-direction vehicle ahead
pub const SAFE_FOLLOWING_DISTANCE: f32 = 35.0;

pub const ACCELERATION: f32 = 30.0;
pub const DECELERATION: f32 = 40.0;

/// Below this speed a vehicle counts as stopped
pub const STOPPED_SPEED: f32 = 1.0;

/// On yellow, vehicles closer than this to the stop line must stop
pub const YELLOW_DECISION_DISTANCE: f32 = 50.0;

/// Vehicles further than this past the stop line ignore the signal
pub const COMMITTED_DISTANCE: f32 = 10.0;

/// Slack added to the braking distance when stopping at the line
pub const STOP_LINE_BUFFER: f32 = 2.0;
