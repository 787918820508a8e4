//! Main CLI application for the 3D life simulator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use life3d::{
    config::{CliOverrides, OutputFormat, Settings},
    rules::{presets, save_rule_to_file},
    simulation::{compare_presets, ReferenceValidator, Simulation},
    utils::{Console, GenerationTicker, ReportFormatter, SliceFormatter},
};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "life3d")]
#[command(about = "3D Life Simulator")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
    Visual,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Visual => OutputFormat::Visual,
        }
    }
}

#[derive(clap::Args)]
struct RunArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.yaml")]
    config: PathBuf,

    /// Visible edge length of the cube (overrides config)
    #[arg(short, long)]
    size: Option<usize>,

    /// Seed sphere radius (overrides config)
    #[arg(short, long)]
    radius: Option<usize>,

    /// Number of generations (overrides config)
    #[arg(short = 'n', long)]
    steps: Option<usize>,

    /// Rule preset name (overrides config)
    #[arg(short, long)]
    preset: Option<String>,

    /// JSON rule file (overrides config and preset)
    #[arg(long)]
    rule_file: Option<PathBuf>,
}

impl RunArgs {
    fn load_settings(&self) -> Result<Settings> {
        let mut settings = if self.config.exists() {
            Settings::from_file(&self.config)
                .with_context(|| format!("Failed to load config from {}", self.config.display()))?
        } else {
            println!(
                "{}",
                Console::caution(&format!(
                    "Config file {} not found, using defaults",
                    self.config.display()
                ))
            );
            Settings::default()
        };

        settings.merge_with_cli(&CliOverrides {
            visible_size: self.size,
            seed_radius: self.radius,
            steps: self.steps,
            preset: self.preset.clone(),
            rule_file: self.rule_file.clone(),
            ..Default::default()
        });

        settings.validate().context("Configuration validation failed")?;
        Ok(settings)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and save its report
    Run {
        #[command(flatten)]
        args: RunArgs,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Print the center slice of the final generation
        #[arg(long)]
        show_slice: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create example configuration and rule files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// List the built-in rule presets
    Presets,

    /// Run a simulation, checking every step against a dense brute-force reference
    Verify {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Run every preset (or the given ones) side by side
    Compare {
        #[command(flatten)]
        args: RunArgs,

        /// Presets to compare (defaults to the whole catalogue)
        #[arg(long = "with", value_delimiter = ',')]
        names: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            args,
            output,
            format,
            show_slice,
            verbose,
        } => run_command(args, output, format.map(Into::into), show_slice, verbose),
        Commands::Setup { directory, force } => setup_command(directory, force),
        Commands::Presets => presets_command(),
        Commands::Verify { args } => verify_command(args),
        Commands::Compare { args, names } => compare_command(args, names),
    }
}

fn run_command(
    args: RunArgs,
    output_dir: Option<PathBuf>,
    format: Option<OutputFormat>,
    show_slice: bool,
    verbose: bool,
) -> Result<()> {
    println!("{}", Console::note("🔄 Starting 3D Life Simulator"));

    let mut settings = args.load_settings()?;
    settings.merge_with_cli(&CliOverrides {
        output_dir,
        format,
        ..Default::default()
    });
    if settings.output.format == OutputFormat::Visual {
        settings.output.record_cells = true;
    }

    let mut simulation = Simulation::new(settings.clone()).context("Failed to create simulation")?;

    if verbose {
        let engine = simulation.engine();
        println!("Configuration:");
        println!("  Rule: {}", engine.rules().config());
        println!("  Visible size: {}", settings.simulation.visible_size);
        println!("  Seed radius: {}", settings.simulation.seed_radius);
        println!("  Steps: {}", settings.simulation.steps);
        println!("  Seeded population: {}", engine.population());
        println!(
            "  Phase thresholds: decay > {}, growth < {}",
            engine.thresholds().decay,
            engine.thresholds().growth
        );
        println!();
    }

    let mut ticker = GenerationTicker::new(settings.simulation.steps);
    let report = simulation.run_with(|frame| ticker.observe(frame));
    ticker.finish();

    match report.extinct_at {
        Some(generation) => println!(
            "{}",
            Console::caution(&format!("💀 Population died out at generation {}", generation))
        ),
        None => println!(
            "{}",
            Console::pass(&format!(
                "✅ Ran {} generation(s) in {:.3}s, final population {}",
                report.generations(),
                report.run_time.as_secs_f64(),
                report.final_population()
            ))
        ),
    }

    if verbose {
        println!("\n{}", ReportFormatter::format_report(&report));
    }

    if show_slice {
        let engine = simulation.engine();
        let size = engine.visible_size();
        println!("\nCenter slice (z = {}):", engine.center().z);
        println!(
            "{}",
            SliceFormatter::format_slice(&engine.visible_cells(), size, engine.center().z)
        );
    }

    println!("\n{}", Console::note("💾 Saving report..."));
    let path = ReportFormatter::save_report(&report, &settings.output.directory, settings.output.format)
        .context("Failed to save report")?;
    println!("{}", Console::pass(&format!("Report saved to {}", path.display())));

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", Console::note("🛠️  Setting up project structure..."));

    let config_dir = directory.join("config");
    let rules_dir = directory.join("rules");
    let output_dir = directory.join("output/runs");

    for dir in [&config_dir, &rules_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    // Create default configuration
    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    // One editable rule file per preset
    for config in presets() {
        let path = rules_dir.join(format!("{}.json", config.name()));
        if path.exists() && !force {
            println!("Skipped: {} (already exists)", path.display());
            continue;
        }
        save_rule_to_file(&config, &path)
            .with_context(|| format!("Failed to write rule file {}", path.display()))?;
    }
    println!("Created preset rule files in: {}", rules_dir.display());

    // Example configuration variants
    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    let mut small_config = Settings::default();
    small_config.simulation.visible_size = 10;
    small_config.simulation.seed_radius = 3;
    small_config.simulation.steps = 10;
    small_config.to_file(&examples_dir.join("small.yaml"))?;

    let mut adaptive_config = Settings::default();
    adaptive_config.simulation.visible_size = 60;
    adaptive_config.simulation.seed_radius = 8;
    adaptive_config.simulation.steps = 200;
    adaptive_config.rules.preset = "adaptive".to_string();
    adaptive_config.output.format = OutputFormat::Json;
    adaptive_config.to_file(&examples_dir.join("adaptive.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", Console::pass("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Tweak or add rule files in {}", rules_dir.display());
    println!("3. Run: cargo run -- run --config config/default.yaml");

    Ok(())
}

fn presets_command() -> Result<()> {
    println!("{}", Console::note("Available rule presets:"));
    for config in presets() {
        println!("  {}", config);
    }
    Ok(())
}

fn verify_command(args: RunArgs) -> Result<()> {
    println!("{}", Console::note("🔍 Verifying engine against dense reference..."));

    let settings = args.load_settings()?;
    let steps = settings.simulation.steps;
    let mut simulation = Simulation::new(settings).context("Failed to create simulation")?;

    let result = ReferenceValidator::validate_run(simulation.engine_mut(), steps);
    println!("{}", result);

    if result.is_valid {
        println!("{}", Console::pass("✅ Engine matches the reference"));
    } else {
        println!("{}", Console::fail("❌ Engine diverged from the reference"));
        if let Some(error) = result.error_message {
            println!("Error: {}", error);
        }
    }

    Ok(())
}

fn compare_command(args: RunArgs, names: Vec<String>) -> Result<()> {
    println!("{}", Console::note("🔬 Comparing presets..."));

    let settings = args.load_settings()?;
    let names = if names.is_empty() {
        life3d::rules::preset_names()
    } else {
        names
    };

    let start_time = Instant::now();
    let summaries = compare_presets(&settings, &names).context("Failed to compare presets")?;

    println!("{}", ReportFormatter::format_comparison(&summaries));
    println!(
        "{}",
        Console::pass(&format!(
            "Compared {} preset(s) in {:.3}s",
            summaries.len(),
            start_time.elapsed().as_secs_f64()
        ))
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "life3d", "run", "--config", "test.yaml", "--steps", "5", "--format", "json",
        ]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["life3d", "compare", "--with", "default,crystal"]).unwrap();
        match cli.command {
            Commands::Compare { names, .. } => assert_eq!(names, vec!["default", "crystal"]),
            _ => panic!("expected compare command"),
        }
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path().to_path_buf(), false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("rules/adaptive.json").exists());
        assert!(Settings::from_file(&temp_dir.path().join("config/examples/small.yaml")).is_ok());
    }
}
