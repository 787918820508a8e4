//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::engine::CellCoord;
use crate::simulation::{FrameRecord, ReportSummary, SimulationReport};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use std::time::{Duration, Instant};

/// Renders z-slices of the visible cuboid as text
pub struct SliceFormatter;

impl SliceFormatter {
    /// Format one z-slice in compact form
    pub fn format_slice(cells: &[CellCoord], size: usize, z: usize) -> String {
        let live: HashSet<(usize, usize)> = cells
            .iter()
            .filter(|c| c.z == z)
            .map(|c| (c.x, c.y))
            .collect();

        let mut output = String::with_capacity(size * (size + 1));
        for y in 0..size {
            for x in 0..size {
                output.push(if live.contains(&(x, y)) { '█' } else { '·' });
            }
            output.push('\n');
        }
        output
    }

    /// Format one z-slice with coordinates
    pub fn format_slice_with_coords(cells: &[CellCoord], size: usize, z: usize) -> String {
        let live: HashSet<(usize, usize)> = cells
            .iter()
            .filter(|c| c.z == z)
            .map(|c| (c.x, c.y))
            .collect();

        let mut output = String::new();

        // Header with column numbers
        output.push_str("   ");
        for x in 0..size {
            output.push_str(&format!("{:2}", x % 10));
        }
        output.push('\n');

        // Rows with row numbers
        for y in 0..size {
            output.push_str(&format!("{:2} ", y));
            for x in 0..size {
                output.push_str(if live.contains(&(x, y)) { "██" } else { "··" });
            }
            output.push('\n');
        }

        output
    }
}

/// Formats simulation reports for the console and for files
pub struct ReportFormatter;

impl ReportFormatter {
    /// Per-generation table of one run
    pub fn format_report(report: &SimulationReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== Run: {} ===\n", report.rule_name));
        output.push_str(&format!(
            "Grid: {0}x{0}x{0}, seed radius {1}\n",
            report.visible_size, report.seed_radius
        ));
        output.push_str(&format!("Run Time: {:.3}s\n", report.run_time.as_secs_f64()));
        output.push_str(&format!(
            "Population: {} → {} (peak {})\n",
            report.initial_population(),
            report.final_population(),
            report.peak_population()
        ));
        if let Some(generation) = report.extinct_at {
            output.push_str(&format!("Extinct at generation {}\n", generation));
        }
        output.push('\n');

        output.push_str("Gen    | Population | Visible | Phase\n");
        output.push_str("-------|------------|---------|--------\n");
        for frame in &report.frames {
            output.push_str(&format!(
                "{:6} | {:10} | {:7} | {}\n",
                frame.generation,
                frame.population,
                frame.visible_population,
                frame.phase.as_deref().unwrap_or("-")
            ));
        }

        output
    }

    /// Side-by-side summary of several runs
    pub fn format_comparison(summaries: &[ReportSummary]) -> String {
        if summaries.is_empty() {
            return "No runs to compare".to_string();
        }

        let mut output = String::new();
        output.push_str("Preset Comparison:\n");
        output.push_str("Rule         | Gens | Initial | Final  | Peak   | Extinct\n");
        output.push_str("-------------|------|---------|--------|--------|--------\n");

        for summary in summaries {
            output.push_str(&format!(
                "{:12} | {:4} | {:7} | {:6} | {:6} | {}\n",
                summary.rule_name,
                summary.generations,
                summary.initial_population,
                summary.final_population,
                summary.peak_population,
                summary
                    .extinct_at
                    .map_or_else(|| "-".to_string(), |g| g.to_string())
            ));
        }

        output
    }

    /// Render the center z-slice of every recorded frame
    fn create_visual_evolution(report: &SimulationReport) -> String {
        let mut output = String::new();
        let size = report.visible_size;
        let z = size / 2;

        output.push_str(&format!("Visual Evolution - {} (slice z = {})\n", report.rule_name, z));
        output.push_str(&"=".repeat(50));
        output.push('\n');

        for frame in &report.frames {
            output.push_str(&format!(
                "\nGeneration {} (Living: {}):\n",
                frame.generation, frame.population
            ));
            match frame.cells {
                Some(ref cells) => {
                    output.push_str(&SliceFormatter::format_slice_with_coords(cells, size, z))
                }
                None => output.push_str("(cells not recorded)\n"),
            }
        }

        output
    }

    /// Save a report to `output_dir` in the requested format, returning the written path
    pub fn save_report<P: AsRef<Path>>(
        report: &SimulationReport,
        output_dir: P,
        format: OutputFormat,
    ) -> Result<std::path::PathBuf> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        let stem = format!("run_{}", report.rule_name);
        let path = match format {
            OutputFormat::Text => {
                let path = output_dir.join(format!("{}.txt", stem));
                std::fs::write(&path, Self::format_report(report))?;
                path
            }
            OutputFormat::Json => {
                let path = output_dir.join(format!("{}.json", stem));
                report.save_to_file(&path)?;
                path
            }
            OutputFormat::Visual => {
                let path = output_dir.join(format!("{}_visual.txt", stem));
                std::fs::write(&path, Self::create_visual_evolution(report))?;
                path
            }
        };

        Ok(path)
    }
}

/// Single-line status shown while generations are being computed
pub struct GenerationTicker {
    target: usize,
    generation: u64,
    population: usize,
    phase: Option<String>,
    last_redraw: Instant,
    started: Instant,
}

impl GenerationTicker {
    const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

    /// `target` is the number of generations the run was asked for
    pub fn new(target: usize) -> Self {
        let now = Instant::now();
        Self {
            target,
            generation: 0,
            population: 0,
            phase: None,
            last_redraw: now,
            started: now,
        }
    }

    /// Record a finished generation, redrawing the status line at most every 100ms
    pub fn observe(&mut self, frame: &FrameRecord) {
        self.generation = frame.generation;
        self.population = frame.population;
        self.phase.clone_from(&frame.phase);

        if self.last_redraw.elapsed() > Self::REDRAW_INTERVAL {
            print!("\r{}", self.status_line());
            std::io::Write::flush(&mut std::io::stdout()).ok();
            self.last_redraw = Instant::now();
        }
    }

    pub fn status_line(&self) -> String {
        let mut line = format!(
            "Generation {}/{} | population {}",
            self.generation, self.target, self.population
        );
        if let Some(ref phase) = self.phase {
            line.push_str(&format!(" | {}", phase));
        }
        line.push_str(&format!(" | {:.1}s", self.started.elapsed().as_secs_f64()));
        line
    }

    /// Overwrite the status line with the final tally
    pub fn finish(&self) {
        println!(
            "\rStopped after generation {} with {} live cell(s) in {:.1}s",
            self.generation,
            self.population,
            self.started.elapsed().as_secs_f64()
        );
    }
}

/// How a console message is tinted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Completed work, matching reference
    Pass,
    /// Divergence or failure
    Fail,
    /// Extinction, missing files and fallbacks
    Caution,
    /// Progress narration
    Note,
}

impl Tone {
    fn ansi(self) -> u8 {
        match self {
            Tone::Fail => 31,
            Tone::Pass => 32,
            Tone::Caution => 33,
            Tone::Note => 36,
        }
    }
}

/// Tinted console messages; honours `NO_COLOR` and `TERM=dumb`
pub struct Console;

impl Console {
    pub fn paint(tone: Tone, text: &str) -> String {
        if Self::tint_enabled() {
            format!("\x1b[{}m{}\x1b[0m", tone.ansi(), text)
        } else {
            text.to_string()
        }
    }

    fn tint_enabled() -> bool {
        std::env::var_os("NO_COLOR").is_none()
            && std::env::var("TERM").map_or(true, |term| term != "dumb")
    }

    pub fn pass(text: &str) -> String {
        Self::paint(Tone::Pass, text)
    }

    pub fn fail(text: &str) -> String {
        Self::paint(Tone::Fail, text)
    }

    pub fn caution(text: &str) -> String {
        Self::paint(Tone::Caution, text)
    }

    pub fn note(text: &str) -> String {
        Self::paint(Tone::Note, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_report() -> SimulationReport {
        let mut report = SimulationReport::new("default", 3, 1);
        report.push(FrameRecord {
            generation: 0,
            population: 2,
            visible_population: 2,
            phase: None,
            cells: Some(vec![CellCoord::new(0, 0, 1), CellCoord::new(2, 1, 1)]),
        });
        report
    }

    #[test]
    fn test_slice_formatting() {
        let cells = vec![CellCoord::new(0, 0, 1), CellCoord::new(2, 1, 1), CellCoord::new(1, 1, 0)];

        let compact = SliceFormatter::format_slice(&cells, 3, 1);
        assert_eq!(compact, "█··\n··█\n···\n");

        let with_coords = SliceFormatter::format_slice_with_coords(&cells, 3, 1);
        assert!(with_coords.contains(" 0 1 2"));
    }

    #[test]
    fn test_report_formatting() {
        let text = ReportFormatter::format_report(&sample_report());
        assert!(text.contains("=== Run: default ==="));
        assert!(text.contains("Grid: 3x3x3"));

        let comparison = ReportFormatter::format_comparison(&[sample_report().summary()]);
        assert!(comparison.contains("default"));
        assert_eq!(ReportFormatter::format_comparison(&[]), "No runs to compare");
    }

    #[test]
    fn test_save_report() {
        let temp_dir = tempdir().unwrap();
        let report = sample_report();

        for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Visual] {
            let path = ReportFormatter::save_report(&report, temp_dir.path(), format).unwrap();
            assert!(path.exists());
        }

        let loaded = SimulationReport::load_from_file(temp_dir.path().join("run_default.json")).unwrap();
        assert_eq!(loaded.frames, report.frames);
    }

    #[test]
    fn test_generation_ticker_status() {
        let mut ticker = GenerationTicker::new(50);
        assert!(ticker.status_line().starts_with("Generation 0/50 | population 0 | "));

        ticker.observe(&FrameRecord {
            generation: 12,
            population: 340,
            visible_population: 300,
            phase: Some("Decay".to_string()),
            cells: None,
        });
        assert!(ticker
            .status_line()
            .starts_with("Generation 12/50 | population 340 | Decay | "));

        // Static rules carry no phase column
        ticker.observe(&FrameRecord {
            generation: 13,
            population: 0,
            visible_population: 0,
            phase: None,
            cells: None,
        });
        let line = ticker.status_line();
        assert!(line.starts_with("Generation 13/50 | population 0 | "));
        assert!(!line.contains("Decay"));
    }

    #[test]
    fn test_console_tones() {
        for tone in [Tone::Pass, Tone::Fail, Tone::Caution, Tone::Note] {
            let painted = Console::paint(tone, "gen 7");
            assert!(painted == "gen 7" || painted == format!("\x1b[{}mgen 7\x1b[0m", tone.ansi()));
        }
        assert!(Console::caution("extinct").contains("extinct"));
    }
}
