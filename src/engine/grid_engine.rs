//! Sparse generation stepping over the padded lattice

use super::lattice::{CellCoord, Lattice, NEIGHBOR_OFFSETS, PAD};
use super::phase::{GrowthPhase, PopulationThresholds};
use crate::error::EngineError;
use crate::rules::RuleEvaluator;
use itertools::iproduct;

/// Owns the lattice, the live set and the active rule, and advances generations
#[derive(Debug, Clone)]
pub struct GridEngine {
    lattice: Lattice,
    rules: RuleEvaluator,
    thresholds: PopulationThresholds,
    live: Vec<usize>,
    next_live: Vec<usize>,
    candidates: Vec<usize>,
    phase: GrowthPhase,
    population: usize,
    generation: u64,
}

impl GridEngine {
    /// Create an empty engine using the default rule. Call `reset` to seed it.
    pub fn new(visible_size: usize) -> Result<Self, EngineError> {
        Self::with_rules(visible_size, RuleEvaluator::default())
    }

    /// Create an empty engine with the given rule evaluator
    pub fn with_rules(visible_size: usize, rules: RuleEvaluator) -> Result<Self, EngineError> {
        Ok(Self {
            lattice: Lattice::new(visible_size)?,
            rules,
            thresholds: PopulationThresholds::for_visible_size(visible_size),
            live: Vec::new(),
            next_live: Vec::new(),
            candidates: Vec::new(),
            phase: GrowthPhase::Growth,
            population: 0,
            generation: 0,
        })
    }

    /// Reallocate the lattice, discarding all cells. Does not seed.
    /// On error the previous lattice is left untouched.
    pub fn resize(&mut self, visible_size: usize) -> Result<(), EngineError> {
        self.lattice = Lattice::new(visible_size)?;
        self.thresholds = PopulationThresholds::for_visible_size(visible_size);
        self.live.clear();
        self.next_live.clear();
        self.candidates.clear();
        self.phase = GrowthPhase::Growth;
        self.population = 0;
        self.generation = 0;
        Ok(())
    }

    /// Clear the lattice and seed a sphere of `seed_radius` around the visible center
    pub fn reset(&mut self, seed_radius: usize) {
        self.lattice.clear();
        self.live.clear();
        self.next_live.clear();
        self.candidates.clear();

        let side = self.lattice.side();
        let center = PAD + self.lattice.visible_size() / 2;
        // Every cell lies within 2*side of the center, so larger radii seed the same set
        let radius = seed_radius.min(2 * side);
        let radius_sq = radius * radius;

        for (z, y, x) in iproduct!(0..side, 0..side, 0..side) {
            let dist_sq = x.abs_diff(center).pow(2) + y.abs_diff(center).pow(2) + z.abs_diff(center).pow(2);
            if dist_sq <= radius_sq {
                let id = self.lattice.index(CellCoord::new(x, y, z));
                self.lattice.set_alive(id, true);
                self.live.push(id);
            }
        }

        self.phase = GrowthPhase::Growth;
        self.population = self.live.len();
        self.generation = 0;
    }

    /// Mark a cell alive, in lattice coordinates (padding included).
    /// Returns false if the cell was already alive or lies outside the lattice.
    pub fn insert_cell(&mut self, coord: CellCoord) -> bool {
        if !self.lattice.in_bounds(coord) {
            return false;
        }

        let id = self.lattice.index(coord);
        if self.lattice.is_alive(id) {
            return false;
        }

        self.lattice.set_alive(id, true);
        self.live.push(id);
        self.population = self.live.len();
        true
    }

    /// Advance one generation
    pub fn step(&mut self) {
        if self.rules.is_adaptive() {
            self.phase = self.thresholds.next_phase(self.phase, self.population);
        }

        self.candidates.clear();
        for &id in &self.live {
            let coord = self.lattice.coords(id);
            for offset in &NEIGHBOR_OFFSETS {
                if let Some(neighbor) = self.lattice.offset(coord, offset) {
                    if self.lattice.touch(neighbor) {
                        self.candidates.push(neighbor);
                    }
                }
            }
        }

        // Live cells nobody touched have zero neighbors and are dropped
        for &id in &self.live {
            if !self.lattice.is_queued(id) {
                self.lattice.set_alive(id, false);
            }
        }

        self.next_live.clear();
        for &id in &self.candidates {
            let was_alive = self.lattice.is_alive(id);
            let neighbors = self.lattice.neighbor_count(id);
            let alive = self.rules.is_alive(was_alive, neighbors, self.phase);

            self.lattice.set_alive(id, alive);
            if alive {
                self.next_live.push(id);
            }
            self.lattice.clear_scratch(id);
        }
        self.candidates.clear();

        std::mem::swap(&mut self.live, &mut self.next_live);
        self.population = self.live.len();
        self.generation += 1;
    }

    /// Advance `generations` steps
    pub fn step_n(&mut self, generations: usize) {
        for _ in 0..generations {
            self.step();
        }
    }

    /// Live cells inside the visible cuboid, in zero-based visible coordinates
    pub fn visible_cells(&self) -> Vec<CellCoord> {
        let mut cells = Vec::with_capacity(self.live.len());
        self.visible_cells_into(&mut cells);
        cells
    }

    /// Refill `buffer` with the visible live cells, reusing its allocation
    pub fn visible_cells_into(&self, buffer: &mut Vec<CellCoord>) {
        buffer.clear();
        buffer.extend(
            self.live
                .iter()
                .filter_map(|&id| self.lattice.to_visible(self.lattice.coords(id))),
        );
    }

    /// Center of the visible region in zero-based visible coordinates
    pub fn center(&self) -> CellCoord {
        let c = self.lattice.visible_size() / 2;
        CellCoord::new(c, c, c)
    }

    pub fn population(&self) -> usize {
        self.population
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn growth_phase(&self) -> GrowthPhase {
        self.phase
    }

    /// Phase label, or `None` while a static rule is loaded
    pub fn growth_phase_label(&self) -> Option<&'static str> {
        self.rules.is_adaptive().then(|| self.phase.label())
    }

    /// Ids of the live cells, padding included
    pub fn live_cells(&self) -> &[usize] {
        &self.live
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn visible_size(&self) -> usize {
        self.lattice.visible_size()
    }

    pub fn thresholds(&self) -> PopulationThresholds {
        self.thresholds
    }

    pub fn rules(&self) -> &RuleEvaluator {
        &self.rules
    }

    /// Mutable access to the rule evaluator. Changes apply from the next `step`.
    pub fn rules_mut(&mut self) -> &mut RuleEvaluator {
        &mut self.rules
    }
}
