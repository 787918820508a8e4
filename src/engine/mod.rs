//! Lattice storage, growth phase tracking and generation stepping

pub mod grid_engine;
pub mod lattice;
pub mod phase;

pub use grid_engine::GridEngine;
pub use lattice::{CellCoord, Lattice, NEIGHBOR_OFFSETS, PAD};
pub use phase::{GrowthPhase, PopulationThresholds};
