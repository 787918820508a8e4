//! Typed errors for the engine and the rule layer

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the grid engine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("visible size must be positive, got {size}")]
    InvalidSize { size: usize },

    #[error("visible size {size} is too large to allocate")]
    TooLarge { size: usize },
}

/// Errors raised while building or loading a rule configuration
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("survive range for {phase} has min {min} greater than max {max}")]
    InvalidRange { phase: String, min: u8, max: u8 },

    #[error("{field} for {phase} is {value}, expected a value in 0..=26")]
    ThresholdOutOfRange {
        phase: String,
        field: &'static str,
        value: u8,
    },

    #[error("rule configuration is missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("failed to parse rule configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to access rule file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Non-fatal conditions surfaced by the rule evaluator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleWarning {
    UnknownPreset { requested: String, fallback: String },
}

impl std::fmt::Display for RuleWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleWarning::UnknownPreset { requested, fallback } => write!(
                f,
                "unknown rule preset '{}', falling back to '{}'",
                requested, fallback
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::InvalidSize { size: 0 };
        assert_eq!(err.to_string(), "visible size must be positive, got 0");
        let err = EngineError::TooLarge { size: 1 << 21 };
        assert_eq!(err.to_string(), "visible size 2097152 is too large to allocate");

        let err = RuleError::InvalidRange {
            phase: "decay".to_string(),
            min: 6,
            max: 4,
        };
        assert!(err.to_string().contains("min 6 greater than max 4"));

        let warning = RuleWarning::UnknownPreset {
            requested: "nope".to_string(),
            fallback: "default".to_string(),
        };
        assert!(warning.to_string().contains("'nope'"));
    }
}
