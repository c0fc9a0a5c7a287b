// rng.rs - Seeded 48-bit LCG and Fisher-Yates shuffle

const MULTIPLIER: u64 = 0x5_DEEC_E66D;
const INCREMENT: u64 = 0xB;
const MASK: u64 = (1 << 48) - 1;
const SEED_LOW: u64 = 0x330E;

/// Deterministic uniform generator following the `drand48` recurrence, so a
/// seed reproduces the same run everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rand48 {
    state: u64,
}

impl Rand48 {
    pub fn new(seed: i64) -> Self {
        let low = (seed as u64) & 0xFFFF_FFFF;
        Self { state: (low << 16) | SEED_LOW }
    }

    fn advance(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT)
            & MASK;
        self.state
    }

    /// Uniform sample in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.advance() as f64 / (1u64 << 48) as f64
    }

    /// Uniform index in `[0, n)`.
    pub fn below(&mut self, n: usize) -> usize {
        (self.uniform() * n as f64) as usize
    }
}

/// Fisher-Yates: walks from the last index down to 1, swapping each element
/// with one drawn from `[0, i]`.
pub fn shuffle<T>(items: &mut [T], rng: &mut Rand48) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1);
        items.swap(i, j);
    }
}
