//! Rule configuration types and their JSON shape

use crate::engine::GrowthPhase;
use crate::error::RuleError;
use serde::{Deserialize, Serialize};

/// Largest possible live-neighbor count in a 26-cell Moore neighborhood
pub const MAX_NEIGHBORS: u8 = 26;

/// Survive range and birth threshold for one rule (or one adaptive phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Thresholds {
    pub survive_min: u8,
    pub survive_max: u8,
    pub birth: u8,
}

impl Thresholds {
    /// Build a threshold triple, rejecting out-of-range values and inverted survive ranges
    pub fn new(survive_min: u8, survive_max: u8, birth: u8) -> Result<Self, RuleError> {
        let thresholds = Self {
            survive_min,
            survive_max,
            birth,
        };
        thresholds.validate("static")?;
        Ok(thresholds)
    }

    /// Check the invariants of this triple, naming `phase` in any error
    pub fn validate(&self, phase: &str) -> Result<(), RuleError> {
        for (field, value) in [
            ("survive min", self.survive_min),
            ("survive max", self.survive_max),
            ("birth", self.birth),
        ] {
            if value > MAX_NEIGHBORS {
                return Err(RuleError::ThresholdOutOfRange {
                    phase: phase.to_string(),
                    field,
                    value,
                });
            }
        }

        if self.survive_min > self.survive_max {
            return Err(RuleError::InvalidRange {
                phase: phase.to_string(),
                min: self.survive_min,
                max: self.survive_max,
            });
        }

        Ok(())
    }

    /// Decide the next state of a cell from its current state and live-neighbor count
    #[inline]
    pub fn allows(&self, was_alive: bool, neighbors: u8) -> bool {
        if was_alive {
            (self.survive_min..=self.survive_max).contains(&neighbors)
        } else {
            neighbors >= self.birth
        }
    }
}

/// One threshold triple per growth phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhaseTable {
    pub growth: Thresholds,
    pub stable: Thresholds,
    pub decay: Thresholds,
}

impl PhaseTable {
    pub fn get(&self, phase: GrowthPhase) -> &Thresholds {
        match phase {
            GrowthPhase::Growth => &self.growth,
            GrowthPhase::Stable => &self.stable,
            GrowthPhase::Decay => &self.decay,
        }
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        for phase in GrowthPhase::ALL {
            self.get(phase).validate(phase.key())?;
        }
        Ok(())
    }
}

/// A loaded rule: either fixed thresholds or one triple per growth phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRuleConfig", into = "RawRuleConfig")]
pub enum RuleConfig {
    Static { name: String, thresholds: Thresholds },
    Adaptive { name: String, phases: PhaseTable },
}

impl RuleConfig {
    pub fn name(&self) -> &str {
        match self {
            RuleConfig::Static { name, .. } | RuleConfig::Adaptive { name, .. } => name,
        }
    }

    pub fn is_adaptive(&self) -> bool {
        matches!(self, RuleConfig::Adaptive { .. })
    }

    /// Thresholds in force for `phase`; static rules ignore the phase
    #[inline]
    pub fn thresholds_for(&self, phase: GrowthPhase) -> &Thresholds {
        match self {
            RuleConfig::Static { thresholds, .. } => thresholds,
            RuleConfig::Adaptive { phases, .. } => phases.get(phase),
        }
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        match self {
            RuleConfig::Static { thresholds, .. } => thresholds.validate("static"),
            RuleConfig::Adaptive { phases, .. } => phases.validate(),
        }
    }
}

impl std::fmt::Display for RuleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn triple(t: &Thresholds) -> String {
            format!("S{}-{}/B{}+", t.survive_min, t.survive_max, t.birth)
        }

        match self {
            RuleConfig::Static { name, thresholds } => {
                write!(f, "{} (static {})", name, triple(thresholds))
            }
            RuleConfig::Adaptive { name, phases } => write!(
                f,
                "{} (adaptive growth {}, stable {}, decay {})",
                name,
                triple(&phases.growth),
                triple(&phases.stable),
                triple(&phases.decay)
            ),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawThresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    survive: Option<[u8; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    birth: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawStates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    growth: Option<RawThresholds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decay: Option<RawThresholds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stable: Option<RawThresholds>,
}

/// Wire shape of a rule, with the `adaptive` flag selecting which fields apply
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawRuleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    adaptive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    survive: Option<[u8; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    birth: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    states: Option<RawStates>,
}

impl RawThresholds {
    fn resolve(
        self,
        phase: &str,
        survive_field: &'static str,
        birth_field: &'static str,
    ) -> Result<Thresholds, RuleError> {
        let [survive_min, survive_max] = self.survive.ok_or(RuleError::MissingField {
            field: survive_field,
        })?;
        let birth = self.birth.ok_or(RuleError::MissingField { field: birth_field })?;

        let thresholds = Thresholds {
            survive_min,
            survive_max,
            birth,
        };
        thresholds.validate(phase)?;
        Ok(thresholds)
    }
}

impl From<Thresholds> for RawThresholds {
    fn from(t: Thresholds) -> Self {
        Self {
            survive: Some([t.survive_min, t.survive_max]),
            birth: Some(t.birth),
        }
    }
}

impl TryFrom<RawRuleConfig> for RuleConfig {
    type Error = RuleError;

    fn try_from(raw: RawRuleConfig) -> Result<Self, Self::Error> {
        let name = raw.name.ok_or(RuleError::MissingField { field: "name" })?;

        if !raw.adaptive {
            let thresholds = RawThresholds {
                survive: raw.survive,
                birth: raw.birth,
            }
            .resolve("static", "survive", "birth")?;
            return Ok(RuleConfig::Static { name, thresholds });
        }

        // Partial phase tables are rejected rather than filled from defaults
        let states = raw.states.ok_or(RuleError::MissingField { field: "states" })?;
        let growth = states
            .growth
            .ok_or(RuleError::MissingField { field: "states.growth" })?
            .resolve("growth", "states.growth.survive", "states.growth.birth")?;
        let stable = states
            .stable
            .ok_or(RuleError::MissingField { field: "states.stable" })?
            .resolve("stable", "states.stable.survive", "states.stable.birth")?;
        let decay = states
            .decay
            .ok_or(RuleError::MissingField { field: "states.decay" })?
            .resolve("decay", "states.decay.survive", "states.decay.birth")?;

        Ok(RuleConfig::Adaptive {
            name,
            phases: PhaseTable {
                growth,
                stable,
                decay,
            },
        })
    }
}

impl From<RuleConfig> for RawRuleConfig {
    fn from(config: RuleConfig) -> Self {
        match config {
            RuleConfig::Static { name, thresholds } => Self {
                name: Some(name),
                adaptive: false,
                survive: Some([thresholds.survive_min, thresholds.survive_max]),
                birth: Some(thresholds.birth),
                states: None,
            },
            RuleConfig::Adaptive { name, phases } => Self {
                name: Some(name),
                adaptive: true,
                survive: None,
                birth: None,
                states: Some(RawStates {
                    growth: Some(phases.growth.into()),
                    decay: Some(phases.decay.into()),
                    stable: Some(phases.stable.into()),
                }),
            },
        }
    }
}
