//! Intersection geometry
//!
//! Lane positions, stop lines, the intersection footprint and the visible
//! bounds, all derived from a direction's forward/left vectors.

use super::types::{
    Direction, Position, CANVAS_HEIGHT, CANVAS_WIDTH, CENTER_X, CENTER_Y, INTERSECTION_SIZE,
    LANE_WIDTH, OFFSCREEN_MARGIN, SPAWN_DISTANCE, STOP_LINE_DISTANCE,
};

/// The center of the intersection
pub fn center() -> Position {
    Position::new(CENTER_X, CENTER_Y)
}

/// Point on `direction`'s lane at `along` units past the center
///
/// Negative values are upstream of the center.
pub fn lane_point(direction: Direction, along: f32) -> Position {
    center()
        .offset(&direction.forward(), along)
        .offset(&direction.left(), LANE_WIDTH / 2.0)
}

pub fn spawn_point(direction: Direction) -> Position {
    lane_point(direction, -SPAWN_DISTANCE)
}

/// Where `direction`'s lane meets its stop line
pub fn stop_line_point(direction: Direction) -> Position {
    lane_point(direction, -STOP_LINE_DISTANCE)
}

/// Signed distance from `position` to `direction`'s stop line along the
/// direction of travel; positive before the line
pub fn distance_to_stop_line(direction: Direction, position: &Position) -> f32 {
    let to_center = Position::new(CENTER_X - position.x, CENTER_Y - position.y);
    to_center.dot(&direction.forward()) - STOP_LINE_DISTANCE
}

/// Whether `position` lies inside the square intersection footprint
pub fn in_footprint(position: &Position) -> bool {
    let half = INTERSECTION_SIZE / 2.0;
    position.x >= CENTER_X - half
        && position.x <= CENTER_X + half
        && position.y >= CENTER_Y - half
        && position.y <= CENTER_Y + half
}

/// Whether `position` is past the visible bounds plus the removal margin
pub fn is_off_screen(position: &Position) -> bool {
    position.x < -OFFSCREEN_MARGIN
        || position.x > CANVAS_WIDTH + OFFSCREEN_MARGIN
        || position.y < -OFFSCREEN_MARGIN
        || position.y > CANVAS_HEIGHT + OFFSCREEN_MARGIN
}

/// An axis-aligned rectangle, bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Rect {
    /// Smallest rectangle containing both corners
    pub fn from_corners(a: Position, b: Position) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    pub fn contains(&self, position: &Position) -> bool {
        position.x >= self.min_x
            && position.x <= self.max_x
            && position.y >= self.min_y
            && position.y <= self.max_y
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}
