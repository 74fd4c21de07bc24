//! Population statistics and species chart.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::codec::{decode, genome_to_string};

/// Number of species listed in a chart by default.
pub const DEFAULT_CHART_SIZE: usize = 10;

/// Head count of one genome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesCount {
    pub genome: u32,
    /// Rule string of the genome, e.g. `B3/S23`.
    pub rule: String,
    pub count: usize,
}

/// Simulation statistics for monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationStats {
    pub tick: u64,
    /// Live cells.
    pub population: usize,
    /// Distinct genomes among live cells.
    pub species: usize,
    /// Mean energy of live cells (0 when the grid is empty).
    pub mean_energy: f32,
    /// Most populous genomes, largest first.
    pub top_species: Vec<SpeciesCount>,
}

impl SimulationStats {
    /// Compute statistics over a grid, listing the `chart_size` most populous species.
    pub fn from_grid(grid: &[u32], tick: u64, chart_size: usize) -> Self {
        let mut counts: HashMap<u32, usize> = HashMap::new();
        let mut energy_sum = 0u64;
        let mut population = 0usize;

        for &word in grid {
            let (energy, genome) = decode(word);
            if genome != 0 {
                *counts.entry(genome).or_default() += 1;
                energy_sum += energy as u64;
                population += 1;
            }
        }

        let mut ranked: Vec<(u32, usize)> = counts.into_iter().collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let species = ranked.len();

        let top_species = ranked
            .into_iter()
            .take(chart_size)
            .map(|(genome, count)| SpeciesCount {
                genome,
                rule: genome_to_string(genome),
                count,
            })
            .collect();

        Self {
            tick,
            population,
            species,
            mean_energy: if population > 0 {
                energy_sum as f32 / population as f32
            } else {
                0.0
            },
            top_species,
        }
    }
}

impl fmt::Display for SimulationStats {
    /// Species chart: `SN=<species> | B3/S23 (812) | ...`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SN={} |", self.species)?;
        for s in &self.top_species {
            write!(f, " {} ({}) |", s.rule, s.count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::codec::{encode, string_to_genome};

    #[test]
    fn test_species_ranking() {
        let conway = string_to_genome("B3/S23").unwrap();
        let maze = string_to_genome("B3/S12345").unwrap();
        let seeds = string_to_genome("B2/S").unwrap();
        let grid = vec![
            conway,
            0,
            encode(10, conway),
            maze,
            encode(20, seeds),
            0,
            encode(30, conway),
            maze,
        ];

        let stats = SimulationStats::from_grid(&grid, 100, 2);
        assert_eq!(stats.population, 6);
        assert_eq!(stats.species, 3);
        assert!((stats.mean_energy - 10.0).abs() < 1e-6);
        assert_eq!(stats.top_species.len(), 2);
        assert_eq!(stats.top_species[0].rule, "B3/S23");
        assert_eq!(stats.top_species[0].count, 3);
        assert_eq!(stats.top_species[1].genome, maze);
        assert_eq!(
            stats.to_string(),
            "SN=3 | B3/S23 (3) | B3/S12345 (2) |"
        );
    }

    #[test]
    fn test_empty_grid() {
        let stats = SimulationStats::from_grid(&[0; 16], 0, DEFAULT_CHART_SIZE);
        assert_eq!(stats.population, 0);
        assert_eq!(stats.species, 0);
        assert_eq!(stats.mean_energy, 0.0);
        assert_eq!(stats.to_string(), "SN=0 |");
    }
}
