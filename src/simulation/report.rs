//! Per-generation records collected during a simulation run

use crate::engine::{CellCoord, GridEngine};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Snapshot of one generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub generation: u64,
    pub population: usize,
    /// Live cells inside the visible cuboid
    pub visible_population: usize,
    /// Growth phase label, absent for static rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<CellCoord>>,
}

impl FrameRecord {
    /// Capture the engine's current generation
    pub fn capture(engine: &GridEngine, record_cells: bool) -> Self {
        let cells = engine.visible_cells();
        Self {
            generation: engine.generation(),
            population: engine.population(),
            visible_population: cells.len(),
            phase: engine.growth_phase_label().map(str::to_string),
            cells: record_cells.then_some(cells),
        }
    }
}

/// Full record of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub rule_name: String,
    pub visible_size: usize,
    pub seed_radius: usize,
    pub frames: Vec<FrameRecord>,
    /// Generation at which the population first reached zero
    pub extinct_at: Option<u64>,
    #[serde(skip)]
    pub run_time: Duration,
}

impl SimulationReport {
    pub fn new(rule_name: &str, visible_size: usize, seed_radius: usize) -> Self {
        Self {
            rule_name: rule_name.to_string(),
            visible_size,
            seed_radius,
            frames: Vec::new(),
            extinct_at: None,
            run_time: Duration::ZERO,
        }
    }

    pub fn push(&mut self, frame: FrameRecord) {
        if frame.population == 0 && self.extinct_at.is_none() {
            self.extinct_at = Some(frame.generation);
        }
        self.frames.push(frame);
    }

    pub fn initial_population(&self) -> usize {
        self.frames.first().map_or(0, |f| f.population)
    }

    pub fn final_population(&self) -> usize {
        self.frames.last().map_or(0, |f| f.population)
    }

    pub fn peak_population(&self) -> usize {
        self.frames.iter().map(|f| f.population).max().unwrap_or(0)
    }

    /// Number of generations actually stepped
    pub fn generations(&self) -> u64 {
        self.frames.last().map_or(0, |f| f.generation)
    }

    /// Lightweight summary without per-frame data
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            rule_name: self.rule_name.clone(),
            generations: self.generations(),
            initial_population: self.initial_population(),
            final_population: self.final_population(),
            peak_population: self.peak_population(),
            extinct_at: self.extinct_at,
        }
    }

    /// Save the report as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))
    }

    /// Load a report saved with `save_to_file`
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read report: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse report: {}", path.display()))
    }
}

/// Summary of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub rule_name: String,
    pub generations: u64,
    pub initial_population: usize,
    pub final_population: usize,
    pub peak_population: usize,
    pub extinct_at: Option<u64>,
}
