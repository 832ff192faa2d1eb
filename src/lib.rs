//! Intersection Simulation Library
//!
//! A four-way signalised intersection simulation with fixed-timer and
//! adaptive signal control, runnable headless or from tests.

pub mod report;
pub mod simulation;
