// seed.rs - Initial generations: random fill and centered patterns

use crate::grid::Grid;
use crate::rng::{shuffle, Rand48};

/// Marks exactly `floor(rows * cols * live_fraction)` cells alive, chosen by
/// shuffling every position and keeping the first ones. Everything else dies.
pub fn seed_random_generation(grid: &mut Grid, rng: &mut Rand48, live_fraction: f64) {
    assert!(
        live_fraction > 0.0 && live_fraction < 1.0,
        "live fraction {live_fraction} must be in (0, 1)"
    );

    let total = grid.len();
    let live = (total as f64 * live_fraction).floor() as usize;

    let mut positions: Vec<usize> = (0..total).collect();
    shuffle(&mut positions, rng);

    let cells = grid.cells_mut();
    cells.fill(false);
    for &i in &positions[..live] {
        cells[i] = true;
    }

    log::debug!("seeded {live}/{total} live cells (fraction {live_fraction})");
}

/// Copies `source` into the middle of `target`, which must be at least as
/// large on both axes.
pub fn seed_from_subgrid(target: &mut Grid, source: &Grid) {
    assert!(
        target.rows() >= source.rows() && target.cols() >= source.cols(),
        "{}x{} pattern does not fit in a {}x{} grid",
        source.rows(),
        source.cols(),
        target.rows(),
        target.cols()
    );

    let offset_row = (target.rows() - source.rows()) / 2;
    let offset_col = (target.cols() - source.cols()) / 2;

    for (r, row) in source.iter_rows().enumerate() {
        for (c, &alive) in row.iter().enumerate() {
            target.set(offset_row + r, offset_col + c, alive);
        }
    }
}
