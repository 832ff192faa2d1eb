//! Per-direction signal heads

use serde::{Deserialize, Serialize};

use super::types::{Axis, Direction};

/// Color shown by one signal head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalColor {
    Red,
    Yellow,
    Green,
}

impl SignalColor {
    pub fn name(self) -> &'static str {
        match self {
            SignalColor::Red => "red",
            SignalColor::Yellow => "yellow",
            SignalColor::Green => "green",
        }
    }

    /// Single-letter form used in log summaries
    pub fn symbol(self) -> char {
        match self {
            SignalColor::Red => 'R',
            SignalColor::Yellow => 'Y',
            SignalColor::Green => 'G',
        }
    }
}

/// The four signal heads of the intersection, indexed by direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalBank {
    colors: [SignalColor; 4],
}

impl Default for SignalBank {
    fn default() -> Self {
        Self::all_red()
    }
}

impl SignalBank {
    pub fn all_red() -> Self {
        Self {
            colors: [SignalColor::Red; 4],
        }
    }

    /// Build from colors listed in North, East, South, West order
    pub fn from_colors(colors: [SignalColor; 4]) -> Self {
        Self { colors }
    }

    pub fn color(&self, direction: Direction) -> SignalColor {
        self.colors[direction.index()]
    }

    pub fn colors(&self) -> [SignalColor; 4] {
        self.colors
    }

    pub fn set(&mut self, direction: Direction, color: SignalColor) {
        self.colors[direction.index()] = color;
    }

    pub fn set_all(&mut self, color: SignalColor) {
        self.colors = [color; 4];
    }

    /// Directions currently showing anything but red
    pub fn non_red(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.color(*direction) != SignalColor::Red)
            .collect()
    }

    /// No two conflicting axes are released at once
    pub fn is_conflict_free(&self) -> bool {
        let released = self.non_red();
        let north_south = released.iter().any(|d| d.axis() == Axis::NorthSouth);
        let east_west = released.iter().any(|d| d.axis() == Axis::EastWest);
        !(north_south && east_west)
    }

    /// Compact `N:G E:R S:G W:R` form for logs
    pub fn summary(&self) -> String {
        Direction::ALL
            .iter()
            .map(|d| format!("{}:{}", &d.name()[..1], self.color(*d).symbol()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
