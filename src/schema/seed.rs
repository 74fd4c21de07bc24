//! Initial field generators for EvoLife experiments.

use std::path::PathBuf;

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::compute::{FormatError, GENOME_BITS, GENOME_MASK, string_to_genome};
use crate::snapshot::Snapshot;

/// Errors raised while building the initial field.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Invalid rule in seed: {0}")]
    Format(#[from] FormatError),
    #[error("Failed to read seed snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("Density {0} outside [0, 1]")]
    InvalidDensity(f32),
    #[error("Zone {0} has an empty rule list")]
    EmptyRules(usize),
    #[error("Generator produced {actual} cells, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Source of the initial grid, consumed once when a run starts.
///
/// Returns `width * height` row-major words. Only the genome bits are used.
pub trait InitialField {
    fn generate(&self, width: usize, height: usize, rng: &mut StdRng)
    -> Result<Vec<u32>, SeedError>;
}

impl<F> InitialField for F
where
    F: Fn(usize, usize, &mut StdRng) -> Result<Vec<u32>, SeedError>,
{
    fn generate(
        &self,
        width: usize,
        height: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<u32>, SeedError> {
        self(width, height, rng)
    }
}

/// Serializable description of the initial field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSeed {
    /// Pattern to use for seeding.
    pub pattern: Pattern,
}

impl Default for FieldSeed {
    fn default() -> Self {
        Self {
            pattern: Pattern::RandomGenomes {
                region: Some(Region::new((0, 0), (100, 100))),
                density: 0.5,
            },
        }
    }
}

/// Half-open rectangle of cells, `min` inclusive and `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub min: (usize, usize),
    pub max: (usize, usize),
}

impl Region {
    pub fn new(min: (usize, usize), max: (usize, usize)) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        (self.min.0..self.max.0).contains(&x) && (self.min.1..self.max.1).contains(&y)
    }
}

/// Genomes a zone draws from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GenePool {
    /// Any 17-bit genome, uniformly.
    Random,
    /// One of the listed rule strings, uniformly.
    Rules { rules: Vec<String> },
    /// `rule` with one uniformly chosen gene flipped.
    Mutated { rule: String },
}

/// One layer of a zoned seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    /// Cells covered by the zone (`None` = whole grid).
    pub region: Option<Region>,
    /// Probability that a covered cell is alive.
    pub density: f32,
    pub pool: GenePool,
}

/// Predefined patterns for initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// Random genomes, alive with probability `density`.
    RandomGenomes {
        region: Option<Region>,
        density: f32,
    },
    /// A mix of named rules, alive with probability `density`.
    Species {
        rules: Vec<String>,
        region: Option<Region>,
        density: f32,
    },
    /// Single-gene mutants of `rule`, alive with probability `density`.
    Mutated {
        rule: String,
        region: Option<Region>,
        density: f32,
    },
    /// Layers tried in order; the first zone covering a cell decides it.
    Zoned { zones: Vec<Zone> },
    /// Explicit `(x, y, rule)` placements.
    Custom { cells: Vec<(usize, usize, String)> },
    /// A saved field pasted at `offset`, clipped to the grid.
    Snapshot {
        path: PathBuf,
        #[serde(default)]
        offset: (usize, usize),
    },
}

/// Parsed form of a [`GenePool`].
enum Sampler {
    Random,
    Choice(Vec<u32>),
    Mutant(u32),
}

/// A zone with its rules parsed.
struct ResolvedZone {
    region: Option<Region>,
    density: f64,
    sampler: Sampler,
}

impl ResolvedZone {
    fn resolve(index: usize, zone: &Zone) -> Result<Self, SeedError> {
        if !(0.0..=1.0).contains(&zone.density) {
            return Err(SeedError::InvalidDensity(zone.density));
        }
        let sampler = match &zone.pool {
            GenePool::Random => Sampler::Random,
            GenePool::Rules { rules } if rules.is_empty() => {
                return Err(SeedError::EmptyRules(index));
            }
            GenePool::Rules { rules } => Sampler::Choice(
                rules
                    .iter()
                    .map(|r| string_to_genome(r))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            GenePool::Mutated { rule } => Sampler::Mutant(string_to_genome(rule)?),
        };
        Ok(Self {
            region: zone.region,
            density: zone.density as f64,
            sampler,
        })
    }

    fn covers(&self, x: usize, y: usize) -> bool {
        self.region.is_none_or(|r| r.contains(x, y))
    }

    fn sample(&self, rng: &mut StdRng) -> u32 {
        if !rng.gen_bool(self.density) {
            return 0;
        }
        match &self.sampler {
            Sampler::Random => rng.gen_range(0..=GENOME_MASK),
            Sampler::Choice(genomes) => genomes.choose(rng).copied().unwrap_or(0),
            Sampler::Mutant(genome) => genome ^ (1 << rng.gen_range(0..GENOME_BITS)),
        }
    }
}

impl Pattern {
    /// Zone layers of the random patterns (empty for placement patterns).
    fn zones(&self) -> Vec<Zone> {
        match self {
            Pattern::RandomGenomes { region, density } => vec![Zone {
                region: *region,
                density: *density,
                pool: GenePool::Random,
            }],
            Pattern::Species {
                rules,
                region,
                density,
            } => vec![Zone {
                region: *region,
                density: *density,
                pool: GenePool::Rules {
                    rules: rules.clone(),
                },
            }],
            Pattern::Mutated {
                rule,
                region,
                density,
            } => vec![Zone {
                region: *region,
                density: *density,
                pool: GenePool::Mutated { rule: rule.clone() },
            }],
            Pattern::Zoned { zones } => zones.clone(),
            Pattern::Custom { .. } | Pattern::Snapshot { .. } => Vec::new(),
        }
    }
}

impl InitialField for FieldSeed {
    fn generate(
        &self,
        width: usize,
        height: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<u32>, SeedError> {
        let mut grid = vec![0u32; width * height];

        match &self.pattern {
            Pattern::Custom { cells } => {
                for (x, y, rule) in cells {
                    let genome = string_to_genome(rule)?;
                    if *x < width && *y < height {
                        grid[y * width + x] = genome;
                    }
                }
            }
            Pattern::Snapshot { path, offset } => {
                let snapshot = Snapshot::load(path)?;
                log::info!(
                    "Seeding from snapshot {} ({}x{})",
                    path.display(),
                    snapshot.width,
                    snapshot.height
                );
                for sy in 0..snapshot.height {
                    let y = sy + offset.1;
                    if y >= height {
                        break;
                    }
                    for sx in 0..snapshot.width {
                        let x = sx + offset.0;
                        if x >= width {
                            break;
                        }
                        grid[y * width + x] = snapshot.get(sx, sy);
                    }
                }
            }
            pattern => {
                let zones = pattern
                    .zones()
                    .iter()
                    .enumerate()
                    .map(|(i, z)| ResolvedZone::resolve(i, z))
                    .collect::<Result<Vec<_>, _>>()?;

                for y in 0..height {
                    for x in 0..width {
                        if let Some(zone) = zones.iter().find(|z| z.covers(x, y)) {
                            grid[y * width + x] = zone.sample(rng);
                        }
                    }
                }
            }
        }

        Ok(grid)
    }
}
