//! JSON snapshot of a running simulation

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::simulation::{Direction, PhaseInfo, Settings, Simulation, ZoneCounts};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionReport {
    pub passed: usize,
    pub total_wait: f32,
    pub average_wait: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub total_cars_passed: usize,
    pub average_wait_time: f32,
    pub current_cars: usize,
    pub direction_stats: BTreeMap<String, DirectionReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub elapsed_secs: f32,
    pub phase: PhaseInfo,
    pub settings: Settings,
    pub stats: StatsReport,
    pub sensor_stats: BTreeMap<String, ZoneCounts>,
}

impl SimulationReport {
    pub fn capture(sim: &Simulation) -> Self {
        let stats = sim.stats();
        let direction_stats = Direction::ALL
            .iter()
            .map(|&direction| {
                let entry = stats.direction(direction);
                (
                    direction.name().to_string(),
                    DirectionReport {
                        passed: entry.passed,
                        total_wait: entry.total_wait,
                        average_wait: entry.average_wait(),
                    },
                )
            })
            .collect();

        let sensor_stats = sim
            .zones()
            .zones()
            .iter()
            .map(|zone| (zone.direction.name().to_string(), zone.counts()))
            .collect();

        Self {
            elapsed_secs: sim.time(),
            phase: sim.phase_info(),
            settings: sim.settings().clone(),
            stats: StatsReport {
                total_cars_passed: stats.total_cars_passed,
                average_wait_time: stats.average_wait_time(),
                current_cars: sim.vehicles().len(),
                direction_stats,
            },
            sensor_stats,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize simulation report")
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))
    }
}
