//! Configuration management for the 3D life simulator

pub mod settings;

pub use settings::{
    CliOverrides, OutputConfig, OutputFormat, RulesConfig, Settings, SimulationConfig,
};
