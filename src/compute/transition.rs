//! Transition kernel - death, survival and birth by crossover.
//!
//! The per-cell rule is a pure function of the cell, its 8 neighbours and its
//! seed ([`transition`]). The kernel ([`transition_kernel`]) maps it over every
//! cell in parallel and applies the resulting energy debits to the shared
//! accumulation buffer.

use rayon::prelude::*;

use super::codec::{
    GENOME_BITS, MAX_ENERGY, can_birth, encode, energy_of, gene_count, genome_of, is_alive,
    sustains,
};
use super::field::{TransitionView, lcg};

/// Constants of the transition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionParams {
    /// Energy units added to a surviving cell every tick.
    pub death_speed: u32,
    /// Energy units debited from a parent per gene it passes on.
    pub birth_cost: u32,
    /// Maximum number of non-zero genes a newborn may carry.
    pub max_genes: u32,
}

/// Result of the rule for a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Word written to the next grid at the cell's own position.
    pub word: u32,
    /// Energy debits owed by each neighbour, in neighbour order.
    pub debits: [u32; 8],
}

impl Transition {
    fn dead() -> Self {
        Self {
            word: 0,
            debits: [0; 8],
        }
    }
}

/// Number of neighbours fit to breed when exactly `level` of them qualify.
#[inline]
fn fit_votes(neighbors: &[u32; 8], level: u32) -> u32 {
    neighbors.iter().filter(|&&n| can_birth(n, level)).count() as u32
}

/// The birth level of a neighbourhood: the highest neighbour count `n` such
/// that exactly `n` neighbours carry birth bit `n`.
pub fn birth_level(neighbors: &[u32; 8]) -> Option<u32> {
    (1..=8u32)
        .filter(|&level| fit_votes(neighbors, level) == level)
        .max()
}

/// Combine the genomes of the parents fit at `level`.
///
/// Each gene is inherited with probability proportional to the share of fit
/// parents carrying it, drawn from the LCG stream at `seed + gene`. Every
/// carrier of an inherited gene owes `birth_cost` in `debits`.
pub fn crossover(
    neighbors: &[u32; 8],
    level: u32,
    seed: u32,
    birth_cost: u32,
    debits: &mut [u32; 8],
) -> u32 {
    let fit = neighbors.map(|n| can_birth(n, level));
    let mut genome = 0u32;

    for gene in 0..GENOME_BITS {
        let carries = |j: usize| fit[j] && (neighbors[j] >> gene) & 1 == 1;
        let carriers = (0..8).filter(|&j| carries(j)).count() as u32;
        let threshold = carriers * 65535 / level;
        let roll = lcg(seed.wrapping_add(gene));

        if threshold > roll {
            genome |= 1 << gene;
            if birth_cost > 0 {
                for (j, debit) in debits.iter_mut().enumerate() {
                    if carries(j) {
                        *debit += birth_cost;
                    }
                }
            }
        }
    }

    genome
}

/// Apply the transition rule to one cell.
///
/// `seed` is advanced once if a birth is attempted.
pub fn transition(
    center: u32,
    neighbors: &[u32; 8],
    seed: &mut u32,
    params: &TransitionParams,
) -> Transition {
    let energy = energy_of(center);
    let alive = is_alive(center);
    let live_neighbors = neighbors.iter().filter(|&&n| is_alive(n)).count() as u32;

    if energy >= MAX_ENERGY || live_neighbors == 0 || (alive && !sustains(center, live_neighbors))
    {
        return Transition::dead();
    }

    let incumbent = genome_of(center);
    let mut debits = [0u32; 8];

    let genome = match birth_level(neighbors) {
        Some(level) => {
            let child = crossover(neighbors, level, *seed, params.birth_cost, &mut debits);
            *seed = lcg(*seed);
            if gene_count(child) > params.max_genes {
                0
            } else {
                child
            }
        }
        None => incumbent,
    };

    let word = if genome != incumbent {
        // Newborn (or discarded child): fresh energy.
        encode(0, genome)
    } else if alive {
        let aged = energy + params.death_speed;
        if aged > MAX_ENERGY { 0 } else { encode(aged, genome) }
    } else {
        0
    };

    Transition { word, debits }
}

/// Run the transition rule over every cell of the current grid.
///
/// Writes the next grid and adds birth debits into the accumulation buffer.
/// Rows are processed in parallel; neighbour reads only touch `current`.
pub fn transition_kernel(view: TransitionView<'_>, params: &TransitionParams) {
    let TransitionView {
        torus,
        current,
        next,
        seeds,
        debits,
    } = view;
    let width = torus.width;

    next.par_chunks_mut(width)
        .zip(seeds.par_chunks_mut(width))
        .enumerate()
        .for_each(|(y, (next_row, seed_row))| {
            for x in 0..width {
                let neighbor_idx = torus.neighbors(x, y);
                let neighbors = neighbor_idx.map(|i| current[i]);
                let center = current[torus.idx(x, y)];

                let result = transition(center, &neighbors, &mut seed_row[x], params);
                next_row[x] = result.word;

                for (&idx, &debit) in neighbor_idx.iter().zip(result.debits.iter()) {
                    if debit > 0 {
                        debits.add(idx, debit);
                    }
                }
            }
        });
}
