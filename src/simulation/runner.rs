//! Headless driver: builds an engine from settings and records a run

use super::report::{FrameRecord, ReportSummary, SimulationReport};
use crate::config::Settings;
use crate::engine::GridEngine;
use crate::rules::RuleEvaluator;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::time::Instant;

/// A configured simulation ready to run
pub struct Simulation {
    settings: Settings,
    engine: GridEngine,
}

impl Simulation {
    /// Build the engine described by `settings` and seed it
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate().context("Invalid simulation settings")?;
        let rules = settings.rule_evaluator()?;
        Self::with_rules(settings, rules)
    }

    /// Build a simulation with an explicit rule evaluator, ignoring the rule section of `settings`
    pub fn with_rules(settings: Settings, rules: RuleEvaluator) -> Result<Self> {
        let mut engine = GridEngine::with_rules(settings.simulation.visible_size, rules)
            .context("Failed to allocate lattice")?;
        engine.reset(settings.simulation.seed_radius);

        Ok(Self { settings, engine })
    }

    /// Run the configured number of steps
    pub fn run(&mut self) -> SimulationReport {
        self.run_with(|_| {})
    }

    /// Run the configured number of steps, calling `on_frame` after each generation
    pub fn run_with<F>(&mut self, mut on_frame: F) -> SimulationReport
    where
        F: FnMut(&FrameRecord),
    {
        let start_time = Instant::now();
        let record_cells = self.settings.output.record_cells;
        let mut report = SimulationReport::new(
            self.engine.rules().config().name(),
            self.settings.simulation.visible_size,
            self.settings.simulation.seed_radius,
        );

        report.push(FrameRecord::capture(&self.engine, record_cells));

        for _ in 0..self.settings.simulation.steps {
            self.engine.step();
            let frame = FrameRecord::capture(&self.engine, record_cells);
            on_frame(&frame);
            report.push(frame);

            if self.settings.simulation.stop_on_extinction && self.engine.population() == 0 {
                break;
            }
        }

        report.run_time = start_time.elapsed();
        report
    }

    pub fn engine(&self) -> &GridEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GridEngine {
        &mut self.engine
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

/// Run one independent simulation per preset, in parallel, with shared settings
pub fn compare_presets(settings: &Settings, names: &[String]) -> Result<Vec<ReportSummary>> {
    names
        .par_iter()
        .map(|name| -> Result<ReportSummary> {
            let (rules, _) = RuleEvaluator::from_preset(name);
            let mut simulation = Simulation::with_rules(settings.clone(), rules)
                .with_context(|| format!("Failed to build simulation for preset {}", name))?;
            Ok(simulation.run().summary())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::preset_names;

    fn small_settings(steps: usize) -> Settings {
        let mut settings = Settings::default();
        settings.simulation.visible_size = 10;
        settings.simulation.seed_radius = 3;
        settings.simulation.steps = steps;
        settings
    }

    #[test]
    fn test_run_records_every_generation() {
        let mut simulation = Simulation::new(small_settings(2)).unwrap();
        let report = simulation.run();

        let populations: Vec<usize> = report.frames.iter().map(|f| f.population).collect();
        assert_eq!(populations, vec![123, 128, 282]);
        assert_eq!(report.rule_name, "default");
        assert_eq!(simulation.engine().generation(), 2);
    }

    #[test]
    fn test_run_with_callback() {
        let mut simulation = Simulation::new(small_settings(3)).unwrap();
        let mut seen = Vec::new();
        simulation.run_with(|frame| seen.push(frame.generation));
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn test_stops_on_extinction() {
        let mut settings = small_settings(20);
        settings.simulation.visible_size = 16;
        settings.simulation.seed_radius = 4;
        settings.rules.preset = "pulse".to_string();

        let report = Simulation::new(settings).unwrap().run();
        assert_eq!(report.extinct_at, Some(3));
        assert_eq!(report.frames.len(), 4);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut settings = small_settings(2);
        settings.simulation.visible_size = 0;
        assert!(Simulation::new(settings).is_err());
    }

    #[test]
    fn test_compare_presets() {
        let names = preset_names();
        let summaries = compare_presets(&small_settings(2), &names).unwrap();

        assert_eq!(summaries.len(), names.len());
        for (summary, name) in summaries.iter().zip(&names) {
            assert_eq!(&summary.rule_name, name);
            assert_eq!(summary.initial_population, 123);
        }
        assert_eq!(summaries[0].final_population, 282);
    }
}
