//! Running simulations, recording them and cross-checking the engine

pub mod report;
pub mod runner;
pub mod validator;

pub use report::{FrameRecord, ReportSummary, SimulationReport};
pub use runner::{compare_presets, Simulation};
pub use validator::{ReferenceValidator, ValidationResult};
