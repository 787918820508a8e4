//! Per-cell decision function driven by the loaded rule

use super::config::RuleConfig;
use super::presets::{self, DEFAULT_PRESET};
use crate::engine::GrowthPhase;
use crate::error::{RuleError, RuleWarning};

/// Holds the active rule and answers "is this cell alive next generation?"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEvaluator {
    config: RuleConfig,
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self {
            config: presets::default_rule(),
        }
    }
}

impl RuleEvaluator {
    /// Create an evaluator from a custom configuration
    pub fn new(config: RuleConfig) -> Result<Self, RuleError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an evaluator from a preset name, falling back to the default rule
    pub fn from_preset(name: &str) -> (Self, Option<RuleWarning>) {
        let mut evaluator = Self::default();
        let warning = evaluator.load_preset(name);
        (evaluator, warning)
    }

    /// Select a named preset. Unknown names load the default rule and return a warning.
    pub fn load_preset(&mut self, name: &str) -> Option<RuleWarning> {
        match presets::preset(name) {
            Some(config) => {
                self.config = config;
                None
            }
            None => {
                let warning = RuleWarning::UnknownPreset {
                    requested: name.to_string(),
                    fallback: DEFAULT_PRESET.to_string(),
                };
                eprintln!("Warning: {}", warning);
                self.config = presets::default_rule();
                Some(warning)
            }
        }
    }

    /// Replace the active rule. Invalid configurations are rejected and the
    /// previous rule stays loaded.
    pub fn load_custom(&mut self, config: RuleConfig) -> Result<(), RuleError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Decide whether a cell is alive next generation
    #[inline]
    pub fn is_alive(&self, was_alive: bool, neighbors: u8, phase: GrowthPhase) -> bool {
        self.config.thresholds_for(phase).allows(was_alive, neighbors)
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn is_adaptive(&self) -> bool {
        self.config.is_adaptive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::config::{PhaseTable, Thresholds};

    fn phased() -> RuleConfig {
        RuleConfig::Adaptive {
            name: "phased".to_string(),
            phases: PhaseTable {
                growth: Thresholds::new(1, 2, 3).unwrap(),
                stable: Thresholds::new(4, 5, 6).unwrap(),
                decay: Thresholds::new(7, 8, 9).unwrap(),
            },
        }
    }

    #[test]
    fn test_static_rule_ignores_phase() {
        let evaluator = RuleEvaluator::default();

        for phase in GrowthPhase::ALL {
            assert!(evaluator.is_alive(true, 4, phase));
            assert!(!evaluator.is_alive(true, 6, phase));
            assert!(evaluator.is_alive(false, 5, phase));
            assert!(!evaluator.is_alive(false, 4, phase));
        }
    }

    #[test]
    fn test_adaptive_rule_selects_by_phase() {
        let evaluator = RuleEvaluator::new(phased()).unwrap();

        assert!(evaluator.is_alive(true, 2, GrowthPhase::Growth));
        assert!(!evaluator.is_alive(true, 2, GrowthPhase::Stable));
        assert!(!evaluator.is_alive(true, 2, GrowthPhase::Decay));

        assert!(evaluator.is_alive(false, 6, GrowthPhase::Stable));
        assert!(!evaluator.is_alive(false, 6, GrowthPhase::Decay));
        assert!(evaluator.is_alive(true, 8, GrowthPhase::Decay));
    }

    #[test]
    fn test_evaluation_is_pure() {
        let evaluator = RuleEvaluator::new(phased()).unwrap();
        let before = evaluator.clone();

        for n in 0..=26 {
            for phase in GrowthPhase::ALL {
                for was_alive in [false, true] {
                    let first = evaluator.is_alive(was_alive, n, phase);
                    let second = evaluator.is_alive(was_alive, n, phase);
                    assert_eq!(first, second);
                }
            }
        }
        assert_eq!(evaluator, before);
    }

    #[test]
    fn test_unknown_preset_falls_back() {
        let mut evaluator = RuleEvaluator::new(phased()).unwrap();
        let warning = evaluator.load_preset("no-such-rule");

        assert!(matches!(warning, Some(RuleWarning::UnknownPreset { .. })));
        assert_eq!(evaluator.config().name(), DEFAULT_PRESET);
        assert!(!evaluator.is_adaptive());
    }

    #[test]
    fn test_known_preset_loads() {
        let (evaluator, warning) = RuleEvaluator::from_preset("adaptive");
        assert!(warning.is_none());
        assert!(evaluator.is_adaptive());
    }

    #[test]
    fn test_invalid_custom_keeps_previous() {
        let mut evaluator = RuleEvaluator::new(phased()).unwrap();
        let broken = RuleConfig::Static {
            name: "broken".to_string(),
            thresholds: Thresholds {
                survive_min: 6,
                survive_max: 2,
                birth: 5,
            },
        };

        assert!(evaluator.load_custom(broken).is_err());
        assert_eq!(evaluator.config().name(), "phased");

        let fine = presets::default_rule();
        assert!(evaluator.load_custom(fine.clone()).is_ok());
        assert_eq!(evaluator.config(), &fine);
    }
}
