// engine.rs - Generation stepping, statistics and cycle detection

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::grid::Grid;
use crate::rule::Rule;

const HISTORY: usize = 10;                            // generations remembered for cycle checks

/// Derived from the grid after each step; never edited directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub alive: usize,
    pub generation: u64,
}

/// Computes the next generation into the grid's back buffer, then swaps the
/// buffers. Returns the number of live cells in the new generation.
///
/// Every cell is read from `current` before any write becomes visible.
pub fn step_generation(grid: &mut Grid, rule: &Rule) -> usize {
    let mut alive = 0;

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let neighbors = grid.count_neighbors(row, col);
            let next = rule.next_state(grid.get(row, col), neighbors);
            grid.set_next(row * grid.cols() + col, next);
            alive += next as usize;
        }
    }

    grid.swap_buffers();
    alive
}

fn fingerprint(grid: &Grid) -> u64 {
    let mut hasher = DefaultHasher::new();
    grid.cells().hash(&mut hasher);
    hasher.finish()
}

/// Owns the grid and rule of one simulation run.
#[derive(Debug, Clone)]
pub struct Engine {
    grid: Grid,
    rule: Rule,
    stats: GenerationStats,
    history: [u64; HISTORY],
    history_count: usize,
    cycling: bool,
}

impl Engine {
    pub fn new(grid: Grid, rule: Rule) -> Self {
        let mut engine = Self {
            stats: GenerationStats::default(),
            grid,
            rule,
            history: [0; HISTORY],
            history_count: 0,
            cycling: false,
        };
        engine.reset_tracking();
        engine
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn stats(&self) -> GenerationStats {
        self.stats
    }

    /// True once a generation repeated one of the last few generations.
    pub fn is_cycling(&self) -> bool {
        self.cycling
    }

    pub fn step(&mut self) -> GenerationStats {
        self.stats.alive = step_generation(&mut self.grid, &self.rule);
        self.stats.generation += 1;
        self.cycling = self.check_for_cycle();

        log::debug!(
            "generation {} alive {}{}",
            self.stats.generation,
            self.stats.alive,
            if self.cycling { " (cycle)" } else { "" }
        );

        self.stats
    }

    /// Replaces the grid and starts counting generations from zero.
    pub fn reset(&mut self, grid: Grid) {
        self.grid = grid;
        self.reset_tracking();
    }

    pub fn clear(&mut self) {
        self.grid.clear();
        self.reset_tracking();
    }

    pub fn toggle_cell(&mut self, row: usize, col: usize) -> bool {
        let alive = self.grid.toggle(row, col);
        if alive {
            self.stats.alive += 1;
        } else {
            self.stats.alive -= 1;
        }
        self.history = [0; HISTORY];
        self.history_count = 0;
        self.cycling = false;
        self.check_for_cycle();
        alive
    }

    fn reset_tracking(&mut self) {
        self.stats = GenerationStats {
            alive: self.grid.alive_count(),
            generation: 0,
        };
        self.history = [0; HISTORY];
        self.history_count = 0;
        self.cycling = false;
        self.check_for_cycle();
    }

    fn check_for_cycle(&mut self) -> bool {
        let hash = fingerprint(&self.grid);
        let filled = self.history_count.min(HISTORY);
        if self.history[..filled].contains(&hash) {
            return true;
        }
        self.history[self.history_count % HISTORY] = hash;
        self.history_count += 1;
        false
    }
}
