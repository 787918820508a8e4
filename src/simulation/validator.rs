//! Dense brute-force cross-check of the sparse stepping engine

use crate::engine::{CellCoord, GridEngine, GrowthPhase};
use std::fmt;
use std::time::Instant;

/// Re-evaluates every lattice cell densely and compares with the engine's result
pub struct ReferenceValidator;

/// A cell whose engine state disagrees with the dense reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub generation: u64,
    /// Lattice coordinates, padding included
    pub cell: CellCoord,
    pub expected_alive: bool,
    pub actual_alive: bool,
    pub neighbor_count: u8,
    pub description: String,
}

/// Outcome of checking one transition
#[derive(Debug, Clone)]
pub struct TransitionCheck {
    pub generation: u64,
    pub phase: GrowthPhase,
    pub expected_population: usize,
    pub actual_population: usize,
    pub violations: Vec<RuleViolation>,
}

impl TransitionCheck {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty() && self.expected_population == self.actual_population
    }
}

/// Result of validating a sequence of steps
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub checks: Vec<TransitionCheck>,
    pub cells_checked: usize,
    pub validation_time_ms: u64,
    pub error_message: Option<String>,
}

/// Dense next-generation state for every lattice cell
struct DenseStep {
    phase: GrowthPhase,
    next_alive: Vec<bool>,
    neighbor_counts: Vec<u8>,
}

impl ReferenceValidator {
    /// Phase the engine will use for its next step
    pub fn predicted_phase(engine: &GridEngine) -> GrowthPhase {
        if engine.rules().is_adaptive() {
            engine
                .thresholds()
                .next_phase(engine.growth_phase(), engine.population())
        } else {
            engine.growth_phase()
        }
    }

    fn dense_step(engine: &GridEngine) -> DenseStep {
        let lattice = engine.lattice();
        let phase = Self::predicted_phase(engine);

        let neighbor_counts: Vec<u8> = (0..lattice.volume())
            .map(|id| lattice.neighbors(id).filter(|&n| lattice.is_alive(n)).count() as u8)
            .collect();

        // Cells without live neighbors are never re-evaluated, so they end up dead
        let next_alive = neighbor_counts
            .iter()
            .enumerate()
            .map(|(id, &n)| n > 0 && engine.rules().is_alive(lattice.is_alive(id), n, phase))
            .collect();

        DenseStep {
            phase,
            next_alive,
            neighbor_counts,
        }
    }

    /// Advance `engine` one step and compare the result against the dense reference
    pub fn check_step(engine: &mut GridEngine) -> TransitionCheck {
        let dense = Self::dense_step(engine);
        let previous: Vec<bool> = (0..engine.lattice().volume())
            .map(|id| engine.lattice().is_alive(id))
            .collect();

        engine.step();

        let lattice = engine.lattice();
        let generation = engine.generation();
        let mut violations = Vec::new();

        for (id, &expected_alive) in dense.next_alive.iter().enumerate() {
            let actual_alive = lattice.is_alive(id);
            if expected_alive != actual_alive {
                let neighbor_count = dense.neighbor_counts[id];
                violations.push(RuleViolation {
                    generation,
                    cell: lattice.coords(id),
                    expected_alive,
                    actual_alive,
                    neighbor_count,
                    description: format!(
                        "cell was {} with {} live neighbors in {} phase",
                        if previous[id] { "alive" } else { "dead" },
                        neighbor_count,
                        dense.phase
                    ),
                });
            }
        }

        TransitionCheck {
            generation,
            phase: dense.phase,
            expected_population: dense.next_alive.iter().filter(|&&a| a).count(),
            actual_population: engine.population(),
            violations,
        }
    }

    /// Step `engine` `steps` times, checking every transition
    pub fn validate_run(engine: &mut GridEngine, steps: usize) -> ValidationResult {
        let start_time = Instant::now();
        let checks: Vec<TransitionCheck> = (0..steps).map(|_| Self::check_step(engine)).collect();

        let is_valid = checks.iter().all(TransitionCheck::is_valid);
        let error_message = checks.iter().find(|c| !c.is_valid()).map(|c| {
            format!(
                "Generation {}: {} violation(s), expected population {} but engine has {}",
                c.generation,
                c.violations.len(),
                c.expected_population,
                c.actual_population
            )
        });

        ValidationResult {
            is_valid,
            cells_checked: checks.len() * engine.lattice().volume(),
            checks,
            validation_time_ms: start_time.elapsed().as_millis() as u64,
            error_message,
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reference Validation:")?;
        writeln!(f, "  Valid: {}", self.is_valid)?;
        writeln!(f, "  Transitions checked: {}", self.checks.len())?;
        writeln!(f, "  Cells checked: {}", self.cells_checked)?;
        writeln!(f, "  Time: {}ms", self.validation_time_ms)?;

        for check in self.checks.iter().filter(|c| !c.is_valid()).take(5) {
            writeln!(f, "  Generation {} ({}):", check.generation, check.phase)?;
            for violation in check.violations.iter().take(3) {
                writeln!(
                    f,
                    "    ({}, {}, {}): expected {}, got {} - {}",
                    violation.cell.x,
                    violation.cell.y,
                    violation.cell.z,
                    violation.expected_alive,
                    violation.actual_alive,
                    violation.description
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_run_is_valid() {
        let mut engine = GridEngine::new(10).unwrap();
        engine.reset(3);

        let result = ReferenceValidator::validate_run(&mut engine, 5);
        assert!(result.is_valid, "{}", result);
        assert_eq!(result.checks.len(), 5);
        assert_eq!(result.checks[0].actual_population, 128);
        assert_eq!(result.checks[1].actual_population, 282);
        assert!(result.error_message.is_none());
    }

    #[test]
    fn test_adaptive_run_is_valid() {
        let mut engine = GridEngine::new(16).unwrap();
        engine.rules_mut().load_preset("pulse");
        engine.reset(4);

        let result = ReferenceValidator::validate_run(&mut engine, 4);
        assert!(result.is_valid, "{}", result);
        // 16^3 / 300 = 13: 257 -> 108 -> 18 -> 0 under Decay, then back to Growth
        let phases: Vec<GrowthPhase> = result.checks.iter().map(|c| c.phase).collect();
        assert_eq!(
            phases,
            vec![GrowthPhase::Decay, GrowthPhase::Decay, GrowthPhase::Decay, GrowthPhase::Growth]
        );
        assert_eq!(result.checks[2].actual_population, 0);
    }

    #[test]
    fn test_predicted_phase() {
        let mut engine = GridEngine::new(10).unwrap();
        engine.reset(3);
        assert_eq!(ReferenceValidator::predicted_phase(&engine), GrowthPhase::Growth);

        engine.rules_mut().load_preset("adaptive");
        assert_eq!(ReferenceValidator::predicted_phase(&engine), GrowthPhase::Decay);
    }

    #[test]
    fn test_empty_lattice() {
        let mut engine = GridEngine::new(6).unwrap();
        let check = ReferenceValidator::check_step(&mut engine);
        assert!(check.is_valid());
        assert_eq!(check.actual_population, 0);
    }
}
