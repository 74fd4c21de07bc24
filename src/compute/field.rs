//! Field store - double-buffered grids, debit accumulation, colors and seeds.
//!
//! All buffers are flat row-major arrays indexed by `y * width + x` and are
//! allocated once at creation. Kernels borrow them through the view types
//! below, which cannot outlive a single kernel invocation.

use std::sync::atomic::{AtomicU32, Ordering};

use rand::Rng;

use super::codec::{canonical, genome_of};
use super::color::Rgb;

/// Offsets of the 8 neighbours, in the fixed order NW, N, NE, W, E, SW, S, SE.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Range of freshly drawn per-cell seeds.
const SEED_RANGE: std::ops::RangeInclusive<u32> = 1..=50_000;

/// Per-cell LCG step shared by seed advancement and gene draws.
#[inline]
pub fn lcg(seed: u32) -> u32 {
    seed.wrapping_mul(58321).wrapping_add(11113) % 65535
}

/// Toroidal grid geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Torus {
    pub width: usize,
    pub height: usize,
}

impl Torus {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Index of the cell at `(x + dx, y + dy)` with wrap-around on both axes.
    #[inline]
    pub fn wrap(&self, x: usize, y: usize, dx: isize, dy: isize) -> usize {
        let wx = (x as isize + dx).rem_euclid(self.width as isize) as usize;
        let wy = (y as isize + dy).rem_euclid(self.height as isize) as usize;
        self.idx(wx, wy)
    }

    /// Indices of the 8 neighbours of `(x, y)` in [`NEIGHBOR_OFFSETS`] order.
    #[inline]
    pub fn neighbors(&self, x: usize, y: usize) -> [usize; 8] {
        NEIGHBOR_OFFSETS.map(|(dx, dy)| self.wrap(x, y, dx, dy))
    }
}

/// Shared debit buffer. Many writers add concurrently during the transition
/// kernel; the flush kernel drains it with exclusive access.
pub struct AccumulationBuffer {
    slots: Vec<AtomicU32>,
}

impl AccumulationBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    /// Add `amount` energy units to slot `idx`.
    #[inline]
    pub fn add(&self, idx: usize, amount: u32) {
        self.slots[idx].fetch_add(amount, Ordering::Relaxed);
    }

    #[inline]
    pub fn get(&self, idx: usize) -> u32 {
        self.slots[idx].load(Ordering::Relaxed)
    }

    /// Exclusive access to the slots, for draining without atomics.
    pub fn slots_mut(&mut self) -> &mut [AtomicU32] {
        &mut self.slots
    }

    pub fn is_clear(&self) -> bool {
        self.slots.iter().all(|s| s.load(Ordering::Relaxed) == 0)
    }
}

/// Everything the transition kernel touches during one invocation.
pub struct TransitionView<'a> {
    pub torus: Torus,
    pub current: &'a [u32],
    pub next: &'a mut [u32],
    pub seeds: &'a mut [u32],
    pub debits: &'a AccumulationBuffer,
}

/// Everything the flush kernel touches during one invocation.
pub struct FlushView<'a> {
    pub torus: Torus,
    pub next: &'a mut [u32],
    pub debits: &'a mut AccumulationBuffer,
    pub colors: &'a mut [Rgb],
}

/// Owner of all per-cell state of a run.
pub struct Field {
    torus: Torus,
    current: Vec<u32>,
    next: Vec<u32>,
    debits: AccumulationBuffer,
    colors: Vec<Rgb>,
    seeds: Vec<u32>,
}

impl Field {
    /// Create a field from initial words, drawing per-cell seeds from `rng`.
    ///
    /// Words are reduced to their genome; initial energy is always zero.
    pub fn new<R: Rng>(torus: Torus, initial: &[u32], rng: &mut R) -> Self {
        let seeds = Self::draw_seeds(torus.len(), rng);
        Self::with_seeds(torus, initial, seeds)
    }

    /// Create a field from initial words and pre-drawn seeds.
    pub fn with_seeds(torus: Torus, initial: &[u32], seeds: Vec<u32>) -> Self {
        debug_assert_eq!(initial.len(), torus.len());
        debug_assert_eq!(seeds.len(), torus.len());
        let current = initial.iter().map(|&w| genome_of(w)).collect();
        Self::from_parts(torus, current, seeds)
    }

    /// Create a field from full cell words (energy included), as when
    /// resuming from a snapshot.
    pub fn from_words<R: Rng>(torus: Torus, words: &[u32], rng: &mut R) -> Self {
        debug_assert_eq!(words.len(), torus.len());
        let seeds = Self::draw_seeds(torus.len(), rng);
        let current = words.iter().map(|&w| canonical(w)).collect();
        Self::from_parts(torus, current, seeds)
    }

    /// Draw `len` fresh per-cell seeds.
    pub fn draw_seeds<R: Rng>(len: usize, rng: &mut R) -> Vec<u32> {
        (0..len).map(|_| rng.gen_range(SEED_RANGE)).collect()
    }

    fn from_parts(torus: Torus, current: Vec<u32>, seeds: Vec<u32>) -> Self {
        let len = torus.len();
        Self {
            torus,
            next: current.clone(),
            current,
            debits: AccumulationBuffer::new(len),
            colors: vec![Rgb::BLACK; len],
            seeds,
        }
    }

    #[inline]
    pub fn torus(&self) -> Torus {
        self.torus
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.torus.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.torus.height
    }

    /// Current generation.
    pub fn grid(&self) -> &[u32] {
        &self.current
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.current[self.torus.idx(x, y)]
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn seeds(&self) -> &[u32] {
        &self.seeds
    }

    pub fn debits(&self) -> &AccumulationBuffer {
        &self.debits
    }

    /// Number of live cells in the current generation.
    pub fn population(&self) -> usize {
        self.current.iter().filter(|&&w| genome_of(w) != 0).count()
    }

    pub fn transition_view(&mut self) -> TransitionView<'_> {
        TransitionView {
            torus: self.torus,
            current: &self.current,
            next: &mut self.next,
            seeds: &mut self.seeds,
            debits: &self.debits,
        }
    }

    pub fn flush_view(&mut self) -> FlushView<'_> {
        FlushView {
            torus: self.torus,
            next: &mut self.next,
            debits: &mut self.debits,
            colors: &mut self.colors,
        }
    }

    /// Make the next generation current. Buffers trade roles, nothing is copied.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_wrap_corners() {
        let torus = Torus::new(5, 4);
        assert_eq!(torus.wrap(0, 0, -1, -1), torus.idx(4, 3));
        assert_eq!(torus.wrap(4, 3, 1, 1), torus.idx(0, 0));
        assert_eq!(torus.wrap(2, 0, 0, -1), torus.idx(2, 3));
        assert_eq!(torus.wrap(4, 1, 1, 0), torus.idx(0, 1));
    }

    #[test]
    fn test_neighbors_order() {
        let torus = Torus::new(4, 4);
        let n = torus.neighbors(1, 1);
        assert_eq!(
            n,
            [
                torus.idx(0, 0),
                torus.idx(1, 0),
                torus.idx(2, 0),
                torus.idx(0, 1),
                torus.idx(2, 1),
                torus.idx(0, 2),
                torus.idx(1, 2),
                torus.idx(2, 2),
            ]
        );
    }

    #[test]
    fn test_lcg_range() {
        let mut seed = 1;
        for _ in 0..10_000 {
            seed = lcg(seed);
            assert!(seed < 65535);
        }
        assert_eq!(lcg(0), 11113);
    }

    #[test]
    fn test_field_creation_strips_energy() {
        let torus = Torus::new(3, 2);
        let mut rng = StdRng::seed_from_u64(1);
        let initial = vec![0x3_0004, 0, 0, 0, 0, 0x1ffff];
        let field = Field::new(torus, &initial, &mut rng);
        assert_eq!(field.grid()[0], 0x1_0004);
        assert_eq!(field.grid()[5], 0x1ffff);
        assert_eq!(field.population(), 2);
        assert!(field.seeds().iter().all(|s| SEED_RANGE.contains(s)));
        assert!(field.colors().iter().all(|&c| c == Rgb::BLACK));
        assert!(field.debits().is_clear());
    }

    #[test]
    fn test_accumulation_concurrent_adds() {
        use rayon::prelude::*;

        let buffer = AccumulationBuffer::new(4);
        (0..1000u32).into_par_iter().for_each(|i| {
            buffer.add((i % 4) as usize, 3);
        });
        for idx in 0..4 {
            assert_eq!(buffer.get(idx), 750);
        }
    }

    #[test]
    fn test_swap_exchanges_roles() {
        let torus = Torus::new(2, 1);
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = Field::new(torus, &[1, 2], &mut rng);
        {
            let view = field.transition_view();
            view.next.copy_from_slice(&[5, 6]);
        }
        field.swap();
        assert_eq!(field.grid(), &[5, 6]);
    }
}
