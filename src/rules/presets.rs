//! Built-in catalogue of named rule configurations

use super::config::{PhaseTable, RuleConfig, Thresholds};

/// Name of the configuration used when nothing else is requested
pub const DEFAULT_PRESET: &str = "default";

const fn triple(survive_min: u8, survive_max: u8, birth: u8) -> Thresholds {
    Thresholds {
        survive_min,
        survive_max,
        birth,
    }
}

fn static_rule(name: &str, thresholds: Thresholds) -> RuleConfig {
    RuleConfig::Static {
        name: name.to_string(),
        thresholds,
    }
}

fn adaptive_rule(name: &str, growth: Thresholds, stable: Thresholds, decay: Thresholds) -> RuleConfig {
    RuleConfig::Adaptive {
        name: name.to_string(),
        phases: PhaseTable {
            growth,
            stable,
            decay,
        },
    }
}

/// Every preset, in catalogue order
pub fn presets() -> Vec<RuleConfig> {
    vec![
        default_rule(),
        static_rule("crystal", triple(5, 7, 6)),
        static_rule("amoeba", triple(3, 8, 5)),
        static_rule("coral", triple(5, 8, 6)),
        adaptive_rule("adaptive", triple(3, 6, 4), triple(4, 5, 5), triple(5, 6, 6)),
        adaptive_rule("pulse", triple(2, 6, 4), triple(4, 6, 5), triple(6, 7, 7)),
    ]
}

/// Names of every preset, in catalogue order
pub fn preset_names() -> Vec<String> {
    presets().into_iter().map(|p| p.name().to_string()).collect()
}

/// Look up a preset by name, ignoring case
pub fn preset(name: &str) -> Option<RuleConfig> {
    presets()
        .into_iter()
        .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
}

/// The fallback static rule: survive on 4-5 neighbors, birth on 5 or more
pub fn default_rule() -> RuleConfig {
    static_rule(DEFAULT_PRESET, triple(4, 5, 5))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GrowthPhase;

    #[test]
    fn test_catalogue_is_valid() {
        for config in presets() {
            assert!(config.validate().is_ok(), "{} failed validation", config.name());
        }
    }

    #[test]
    fn test_survive_ranges_exclude_zero() {
        // Sparse stepping never revisits isolated cells, which is only
        // equivalent to dense evaluation when survival needs a neighbor.
        for config in presets() {
            for phase in GrowthPhase::ALL {
                assert!(config.thresholds_for(phase).survive_min > 0, "{}", config.name());
            }
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(preset("Crystal").map(|p| p.name().to_string()), Some("crystal".to_string()));
        assert!(preset("adaptive").unwrap().is_adaptive());
        assert!(preset("does-not-exist").is_none());
        assert_eq!(preset(DEFAULT_PRESET), Some(default_rule()));
    }

    #[test]
    fn test_names_are_unique() {
        let names = preset_names();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
        assert_eq!(names[0], DEFAULT_PRESET);
    }
}
