// grid.rs - Double-buffered toroidal grid

/// Moore neighborhood offsets as (row, col) deltas.
const NEIGHBOR_DELTAS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    ( 0, -1),          ( 0, 1),
    ( 1, -1), ( 1, 0), ( 1, 1),
];

/// A `rows x cols` grid of two-state cells with edges wrapping to the
/// opposite side.
///
/// Two equally sized buffers are kept: `current` is what readers see, `next`
/// is written while a generation is computed. Their roles are exchanged with
/// [`Grid::swap_buffers`] once a full pass is done.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    current: Vec<bool>,
    next: Vec<bool>,
}

/// Grids are equal when they show the same generation; the `next` buffer is
/// scratch space and never compared.
impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.current == other.current
    }
}

impl Eq for Grid {}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        let len = rows.checked_mul(cols).unwrap_or(0);
        assert!(len > 0, "grid must have at least one cell (got {rows}x{cols})");

        Self {
            rows,
            cols,
            current: vec![false; len],
            next: vec![false; len],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            self.contains(row, col),
            "cell ({row}, {col}) is outside the {}x{} grid",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.current[self.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        let i = self.index(row, col);
        self.current[i] = alive;
    }

    /// Flips a cell and returns its new state.
    pub fn toggle(&mut self, row: usize, col: usize) -> bool {
        let i = self.index(row, col);
        self.current[i] = !self.current[i];
        self.current[i]
    }

    pub fn clear(&mut self) {
        self.current.fill(false);
    }

    /// Read-only row-major view of the current generation.
    pub fn cells(&self) -> &[bool] {
        &self.current
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.current
    }

    pub fn row(&self, row: usize) -> &[bool] {
        let start = self.index(row, 0);
        &self.current[start..start + self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[bool]> {
        self.current.chunks(self.cols)
    }

    pub fn alive_count(&self) -> usize {
        self.current.iter().filter(|&&alive| alive).count()
    }

    /// Counts live cells among the 8 neighbors of `(row, col)`, wrapping
    /// around both axes.
    pub fn count_neighbors(&self, row: usize, col: usize) -> usize {
        assert!(
            self.contains(row, col),
            "cell ({row}, {col}) is outside the {}x{} grid",
            self.rows,
            self.cols
        );

        let rows = self.rows as isize;
        let cols = self.cols as isize;

        NEIGHBOR_DELTAS
            .iter()
            .filter(|&&(dr, dc)| {
                let nr = (row as isize + dr).rem_euclid(rows) as usize;
                let nc = (col as isize + dc).rem_euclid(cols) as usize;
                self.current[nr * self.cols + nc]
            })
            .count()
    }

    pub(crate) fn set_next(&mut self, index: usize, alive: bool) {
        self.next[index] = alive;
    }

    /// Makes the `next` buffer current. No cells are copied.
    pub(crate) fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }
}
