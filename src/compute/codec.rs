//! Cell codec - packing of genome and energy into a single word.
//!
//! Word layout:
//!
//! ```text
//! bits  0..=7   birth mask   (bit n-1 => born with exactly n neighbours)
//! bits  8..=16  sustain mask (bit n   => survives with exactly n neighbours)
//! bits 17..=24  energy       (0..=255, 255 means death on the next tick)
//! ```

use std::fmt::Write;

/// Number of gene bits in a genome.
pub const GENOME_BITS: u32 = 17;

/// Mask selecting the genome part of a word.
pub const GENOME_MASK: u32 = (1 << GENOME_BITS) - 1;

/// Shift of the energy field.
pub const ENERGY_SHIFT: u32 = GENOME_BITS;

/// Energy at which a cell is forced to die.
pub const MAX_ENERGY: u32 = 0xff;

/// Offset of the sustain mask inside the genome.
const SUSTAIN_SHIFT: u32 = 8;

/// Rule string parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Rule string {0:?} lacks the '/' separator")]
    MissingSeparator(String),
    #[error("Birth digit {0} out of range 1-8")]
    BirthDigitOutOfRange(char),
    #[error("Sustain digit {0} out of range 0-8")]
    SustainDigitOutOfRange(char),
    #[error("Unexpected character {0:?} in rule string")]
    InvalidCharacter(char),
}

/// Pack energy and genome into a cell word.
#[inline]
pub fn encode(energy: u32, genome: u32) -> u32 {
    ((energy & MAX_ENERGY) << ENERGY_SHIFT) | (genome & GENOME_MASK)
}

/// Unpack a cell word into `(energy, genome)`.
#[inline]
pub fn decode(word: u32) -> (u32, u32) {
    (energy_of(word), genome_of(word))
}

#[inline]
pub fn genome_of(word: u32) -> u32 {
    word & GENOME_MASK
}

#[inline]
pub fn energy_of(word: u32) -> u32 {
    (word >> ENERGY_SHIFT) & MAX_ENERGY
}

/// Drop bits outside the layout and clear the energy of dead cells.
#[inline]
pub fn canonical(word: u32) -> u32 {
    let (energy, genome) = decode(word);
    if genome == 0 { 0 } else { encode(energy, genome) }
}

/// A cell is alive iff its genome is non-zero.
#[inline]
pub fn is_alive(word: u32) -> bool {
    genome_of(word) != 0
}

/// Birth mask bit for `n` neighbours (n in 1..=8).
///
/// Only the mask matters: a dead neighbour has an empty mask and is never fit.
#[inline]
pub fn can_birth(word: u32, n: u32) -> bool {
    debug_assert!((1..=8).contains(&n));
    (word >> (n - 1)) & 1 == 1
}

/// Sustain mask bit for `n` live neighbours (n in 0..=8).
#[inline]
pub fn sustains(word: u32, n: u32) -> bool {
    debug_assert!(n <= 8);
    (word >> (SUSTAIN_SHIFT + n)) & 1 == 1
}

/// Number of non-zero genes.
#[inline]
pub fn gene_count(genome: u32) -> u32 {
    (genome & GENOME_MASK).count_ones()
}

/// Format a genome as a canonical `B.../S...` rule string.
pub fn genome_to_string(genome: u32) -> String {
    let mut rule = String::from("B");
    for n in 0..8 {
        if genome & (1 << n) != 0 {
            let _ = write!(rule, "{}", n + 1);
        }
    }
    rule.push_str("/S");
    for n in 0..9 {
        if genome & (1 << (SUSTAIN_SHIFT + n)) != 0 {
            let _ = write!(rule, "{}", n);
        }
    }
    rule
}

/// Parse a rule string into a genome.
///
/// Accepts both `B3/S23` and the bare `3/23` notation.
pub fn string_to_genome(rule: &str) -> Result<u32, FormatError> {
    let (birth, sustain) = rule
        .trim()
        .split_once('/')
        .ok_or_else(|| FormatError::MissingSeparator(rule.to_string()))?;

    let birth = strip_prefix(birth, 'b');
    let sustain = strip_prefix(sustain, 's');

    let mut genome = 0u32;
    for c in birth.chars() {
        let digit = c.to_digit(10).ok_or(FormatError::InvalidCharacter(c))?;
        if !(1..=8).contains(&digit) {
            return Err(FormatError::BirthDigitOutOfRange(c));
        }
        genome |= 1 << (digit - 1);
    }
    for c in sustain.chars() {
        let digit = c.to_digit(10).ok_or(FormatError::InvalidCharacter(c))?;
        if digit > 8 {
            return Err(FormatError::SustainDigitOutOfRange(c));
        }
        genome |= 1 << (SUSTAIN_SHIFT + digit);
    }
    Ok(genome)
}

fn strip_prefix(part: &str, prefix: char) -> &str {
    part.strip_prefix(prefix)
        .or_else(|| part.strip_prefix(prefix.to_ascii_uppercase()))
        .unwrap_or(part)
}
