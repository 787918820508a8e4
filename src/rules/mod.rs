//! Rule configurations and the rule evaluator

pub mod config;
pub mod evaluator;
pub mod io;
pub mod presets;

pub use config::{PhaseTable, RuleConfig, Thresholds, MAX_NEIGHBORS};
pub use evaluator::RuleEvaluator;
pub use io::{load_rule_from_file, parse_rule, save_rule_to_file};
pub use presets::{default_rule, preset, preset_names, presets, DEFAULT_PRESET};
