//! Throughput and wait-time statistics

use super::types::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DirectionStats {
    pub passed: usize,
    pub total_wait: f32,
}

impl DirectionStats {
    pub fn average_wait(&self) -> f32 {
        if self.passed > 0 {
            self.total_wait / self.passed as f32
        } else {
            0.0
        }
    }
}

/// Totals for vehicles that have left the simulation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stats {
    pub total_cars_passed: usize,
    pub total_wait_time: f32,
    direction_stats: [DirectionStats; 4],
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_passed(&mut self, direction: Direction, wait_time: f32) {
        self.total_cars_passed += 1;
        self.total_wait_time += wait_time;

        let entry = &mut self.direction_stats[direction.index()];
        entry.passed += 1;
        entry.total_wait += wait_time;
    }

    pub fn average_wait_time(&self) -> f32 {
        if self.total_cars_passed > 0 {
            self.total_wait_time / self.total_cars_passed as f32
        } else {
            0.0
        }
    }

    pub fn direction(&self, direction: Direction) -> &DirectionStats {
        &self.direction_stats[direction.index()]
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
