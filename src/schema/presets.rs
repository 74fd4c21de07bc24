//! Named experiments.

use serde::{Deserialize, Serialize};

use super::{FieldSeed, GenePool, Pattern, Region, SimulationConfig, Zone};

/// Configuration and seed of a complete experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    pub config: SimulationConfig,
    pub seed: FieldSeed,
}

/// Names accepted by [`Experiment::preset`].
pub const PRESET_NAMES: &[&str] = &[
    "big_bang",
    "conway",
    "conway_mutated",
    "coexistence",
    "crossbreeding",
    "primordial_soup",
    "tutorial",
];

impl Default for Experiment {
    fn default() -> Self {
        Self::big_bang()
    }
}

impl Experiment {
    /// Look up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        let experiment = match name {
            "big_bang" => Self::big_bang(),
            "conway" => Self::conway(),
            "conway_mutated" => Self::conway_mutated(),
            "coexistence" => Self::coexistence(),
            "crossbreeding" => Self::crossbreeding(),
            "primordial_soup" => Self::primordial_soup(),
            "tutorial" => Self::tutorial(),
            _ => return None,
        };
        Some(experiment)
    }

    /// A 100x100 corner of random genomes bursting over an empty field.
    pub fn big_bang() -> Self {
        Self {
            config: SimulationConfig::default(),
            seed: FieldSeed::default(),
        }
    }

    /// Plain B3/S23 soup: reproduces Conway's Life exactly.
    pub fn conway() -> Self {
        Self {
            config: SimulationConfig {
                max_genes: 14,
                fade_in: 255,
                ..Default::default()
            },
            seed: FieldSeed {
                pattern: Pattern::Species {
                    rules: vec!["B3/S23".into()],
                    region: Some(Region::new((401, 301), (800, 500))),
                    density: 0.5,
                },
            },
        }
    }

    /// Conway soup where every cell has one gene flipped, with slow aging and
    /// costly birth.
    pub fn conway_mutated() -> Self {
        Self {
            config: SimulationConfig {
                death_speed: 1,
                birth_cost: 3,
                max_genes: 14,
                ..Default::default()
            },
            seed: FieldSeed {
                pattern: Pattern::Mutated {
                    rule: "3/23".into(),
                    region: None,
                    density: 0.5,
                },
            },
        }
    }

    /// Several hand-picked rules competing for space, with costly birth.
    pub fn coexistence() -> Self {
        Self {
            config: SimulationConfig {
                width: 1200,
                birth_cost: 15,
                fade_in: 255,
                ..Default::default()
            },
            seed: FieldSeed {
                pattern: Pattern::Species {
                    rules: [
                        "35678/5678",
                        "35678/678",
                        "23567/5678",
                        "3567/35678",
                        "35678/5678",
                        "35678/678",
                        "35678/678",
                    ]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                    region: None,
                    density: 0.5,
                },
            },
        }
    }

    /// Diamoeba in the centre, Conway around it, a mixed band in between.
    pub fn crossbreeding() -> Self {
        let rules = |r: &[&str]| GenePool::Rules {
            rules: r.iter().map(|s| s.to_string()).collect(),
        };
        Self {
            config: SimulationConfig {
                death_speed: 23,
                random_seed: Some(598_275),
                ..Default::default()
            },
            seed: FieldSeed {
                pattern: Pattern::Zoned {
                    zones: vec![
                        Zone {
                            region: Some(Region::new((501, 351), (700, 450))),
                            density: 0.5,
                            pool: rules(&["35678/5678"]),
                        },
                        Zone {
                            region: Some(Region::new((401, 301), (800, 500))),
                            density: 0.5,
                            pool: rules(&["3/23", "35678/5678"]),
                        },
                        Zone {
                            region: None,
                            density: 0.5,
                            pool: rules(&["3/23"]),
                        },
                    ],
                },
            },
        }
    }

    /// The whole field filled with random genomes.
    pub fn primordial_soup() -> Self {
        Self {
            config: SimulationConfig {
                death_speed: 23,
                max_genes: 14,
                ..Default::default()
            },
            seed: FieldSeed {
                pattern: Pattern::RandomGenomes {
                    region: None,
                    density: 0.5,
                },
            },
        }
    }

    /// An R-pentomino, a B34/S34 bomb and a scattering of B357/S238.
    pub fn tutorial() -> Self {
        let mut cells = Vec::new();

        let (cx, cy) = (360, 360);
        for (x, y) in [(0, 1), (0, 2), (0, 3), (1, 0), (2, 0)] {
            cells.push((x + cx, y + cy, "3/23".to_string()));
        }

        let (cx, cy) = (903, 360);
        for (x, y) in [(2, 0), (0, 1), (1, 1), (1, 2), (1, 3), (2, 2), (3, 2)] {
            cells.push((x + cx, y + cy, "34/34".to_string()));
        }

        let c = 150;
        for i in 0..500usize {
            let r = i * 58321 + 11113;
            cells.push((r % 1280, r % 3 + c, "357/238".to_string()));
            cells.push((r % 3 + c, r % 720, "357/238".to_string()));
        }

        Self {
            config: SimulationConfig {
                fade_in: 255,
                random_seed: Some(4123),
                ..Default::default()
            },
            seed: FieldSeed {
                pattern: Pattern::Custom { cells },
            },
        }
    }
}
