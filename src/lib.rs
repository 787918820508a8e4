//! 3D Life Simulator
//!
//! A three-dimensional cellular automaton on a padded cubic lattice, with
//! static survive/birth rules and adaptive rules whose thresholds follow the
//! population's growth phase.

pub mod config;
pub mod engine;
pub mod error;
pub mod rules;
pub mod simulation;
pub mod utils;

pub use config::Settings;
pub use engine::{CellCoord, GridEngine, GrowthPhase};
pub use error::{EngineError, RuleError, RuleWarning};
pub use rules::{RuleConfig, RuleEvaluator};
pub use simulation::{Simulation, SimulationReport};

use anyhow::Result;

/// Main entry point: build a simulation from settings and run it to completion
pub fn run_simulation(settings: Settings) -> Result<SimulationReport> {
    let mut simulation = Simulation::new(settings)?;
    Ok(simulation.run())
}
