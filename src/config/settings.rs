//! Configuration settings for the 3D life simulator

use crate::rules::{load_rule_from_file, RuleEvaluator};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub simulation: SimulationConfig,
    pub rules: RulesConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub visible_size: usize,
    pub seed_radius: usize,
    pub steps: usize,
    #[serde(default = "default_true")]
    pub stop_on_extinction: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    pub preset: String,
    /// JSON rule file; takes precedence over `preset` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub directory: PathBuf,
    #[serde(default)]
    pub record_cells: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
    Visual,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                visible_size: 40,
                seed_radius: 6,
                steps: 50,
                stop_on_extinction: true,
            },
            rules: RulesConfig {
                preset: crate::rules::DEFAULT_PRESET.to_string(),
                custom_file: None,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                directory: PathBuf::from("output/runs"),
                record_cells: false,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.simulation.visible_size == 0 {
            anyhow::bail!("Visible size must be positive");
        }

        if self.simulation.steps == 0 {
            anyhow::bail!("Number of steps must be positive");
        }

        if let Some(ref custom_file) = self.rules.custom_file {
            if !custom_file.exists() {
                anyhow::bail!("Custom rule file does not exist: {}", custom_file.display());
            }
        }

        Ok(())
    }

    /// Build the rule evaluator these settings describe. Unknown preset names
    /// fall back to the default rule with a warning; broken custom files are errors.
    pub fn rule_evaluator(&self) -> Result<RuleEvaluator> {
        match self.rules.custom_file {
            Some(ref path) => {
                let config = load_rule_from_file(path)
                    .with_context(|| format!("Failed to load custom rule: {}", path.display()))?;
                Ok(RuleEvaluator::new(config)?)
            }
            None => Ok(RuleEvaluator::from_preset(&self.rules.preset).0),
        }
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(visible_size) = cli_overrides.visible_size {
            self.simulation.visible_size = visible_size;
        }
        if let Some(seed_radius) = cli_overrides.seed_radius {
            self.simulation.seed_radius = seed_radius;
        }
        if let Some(steps) = cli_overrides.steps {
            self.simulation.steps = steps;
        }
        if let Some(ref preset) = cli_overrides.preset {
            self.rules.preset = preset.clone();
            self.rules.custom_file = None;
        }
        if let Some(ref rule_file) = cli_overrides.rule_file {
            self.rules.custom_file = Some(rule_file.clone());
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.directory = output_dir.clone();
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub visible_size: Option<usize>,
    pub seed_radius: Option<usize>,
    pub steps: Option<usize>,
    pub preset: Option<String>,
    pub rule_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}
