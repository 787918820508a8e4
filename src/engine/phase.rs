//! Population-driven growth phase used by adaptive rules

use serde::{Deserialize, Serialize};
use std::fmt;

/// Population regime selecting which adaptive threshold triple applies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthPhase {
    #[default]
    Growth,
    Stable,
    Decay,
}

impl GrowthPhase {
    pub const ALL: [GrowthPhase; 3] = [GrowthPhase::Growth, GrowthPhase::Stable, GrowthPhase::Decay];

    /// Display label ("Growth", "Stable", "Decay")
    pub fn label(self) -> &'static str {
        match self {
            GrowthPhase::Growth => "Growth",
            GrowthPhase::Stable => "Stable",
            GrowthPhase::Decay => "Decay",
        }
    }

    /// Key used in rule configuration files
    pub fn key(self) -> &'static str {
        match self {
            GrowthPhase::Growth => "growth",
            GrowthPhase::Stable => "stable",
            GrowthPhase::Decay => "decay",
        }
    }
}

impl fmt::Display for GrowthPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Population levels, derived from the visible volume, at which the phase flips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationThresholds {
    pub decay: usize,
    pub growth: usize,
}

impl PopulationThresholds {
    pub fn for_visible_size(visible_size: usize) -> Self {
        let volume = visible_size.pow(3);
        Self {
            decay: volume / 300,
            growth: volume / 2000,
        }
    }

    /// Level-triggered transition. Between the two thresholds the current
    /// phase is kept, so Stable is never entered by this function.
    pub fn next_phase(&self, current: GrowthPhase, population: usize) -> GrowthPhase {
        if population > self.decay {
            GrowthPhase::Decay
        } else if population < self.growth {
            GrowthPhase::Growth
        } else {
            current
        }
    }
}
