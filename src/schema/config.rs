//! Configuration types for EvoLife experiments.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::compute::{FadeParams, GENOME_BITS, MAX_ENERGY, TransitionParams};

fn default_census_interval() -> u64 {
    100
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Energy added to every living cell each tick (aging). A cell is born with
    /// energy 0 and dies at 255, so 1 gives a lifespan of 255 ticks,
    /// 2 about 127, and 0 disables aging.
    pub death_speed: u32,
    /// Energy a parent pays per gene passed to a newborn. 0 makes birth free.
    pub birth_cost: u32,
    /// Maximum number of non-zero genes in a genome (at most 17).
    pub max_genes: u32,
    /// Largest per-tick channel increase of a displayed pixel (255 = instant).
    pub fade_in: u8,
    /// Largest per-tick channel decrease of a displayed pixel.
    pub fade_out: u8,
    /// Fixed seed for reproducible runs. `None` draws from entropy.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Ticks between species charts in the log (0 disables).
    #[serde(default = "default_census_interval")]
    pub census_interval: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            death_speed: 0,
            birth_cost: 0,
            max_genes: 9,
            fade_in: 6,
            fade_out: 6,
            random_seed: None,
            census_interval: default_census_interval(),
        }
    }
}

impl SimulationConfig {
    /// Get total grid size (width * height).
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width * self.height
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.width.checked_mul(self.height).is_none_or(|n| n > u32::MAX as usize) {
            return Err(ConfigError::GridTooLarge);
        }
        if self.max_genes > GENOME_BITS {
            return Err(ConfigError::MaxGenesTooLarge(self.max_genes));
        }
        if self.death_speed > MAX_ENERGY {
            return Err(ConfigError::EnergyOutOfRange {
                name: "death_speed",
                value: self.death_speed,
            });
        }
        if self.birth_cost > MAX_ENERGY {
            return Err(ConfigError::EnergyOutOfRange {
                name: "birth_cost",
                value: self.birth_cost,
            });
        }
        if self.fade_in == 0 || self.fade_out == 0 {
            return Err(ConfigError::InvalidFade);
        }
        Ok(())
    }

    /// Random number generator for seeds and initial fields.
    pub fn rng(&self) -> StdRng {
        match self.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn transition_params(&self) -> TransitionParams {
        TransitionParams {
            death_speed: self.death_speed,
            birth_cost: self.birth_cost,
            max_genes: self.max_genes,
        }
    }

    pub fn fade_params(&self) -> FadeParams {
        FadeParams {
            fade_in: self.fade_in,
            fade_out: self.fade_out,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Grid has more cells than can be indexed")]
    GridTooLarge,
    #[error("max_genes must be at most 17, got {0}")]
    MaxGenesTooLarge(u32),
    #[error("{name} must be at most 255, got {value}")]
    EnergyOutOfRange { name: &'static str, value: u32 },
    #[error("Fade rates must be non-zero")]
    InvalidFade,
    #[error("Snapshot is {actual:?} but the configuration expects {expected:?}")]
    SnapshotDimensions {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_default_config_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let base = SimulationConfig::default();

        let config = SimulationConfig {
            width: 0,
            ..base.clone()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDimensions)));

        let config = SimulationConfig {
            max_genes: 18,
            ..base.clone()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MaxGenesTooLarge(18))
        ));

        let config = SimulationConfig {
            birth_cost: 256,
            ..base.clone()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EnergyOutOfRange {
                name: "birth_cost",
                ..
            })
        ));

        let config = SimulationConfig {
            fade_out: 0,
            ..base
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidFade)));
    }

    #[test]
    fn test_max_genes_boundary() {
        let config = SimulationConfig {
            max_genes: 17,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialization_defaults() {
        let json = r#"{
            "width": 64, "height": 32,
            "death_speed": 23, "birth_cost": 0, "max_genes": 9,
            "fade_in": 255, "fade_out": 6
        }"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.random_seed, None);
        assert_eq!(config.census_interval, 100);
        assert_eq!(config.grid_size(), 64 * 32);

        let roundtrip: SimulationConfig =
            serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(roundtrip, config);
    }

    #[test]
    fn test_fixed_seed_rng() {
        let config = SimulationConfig {
            random_seed: Some(4123),
            ..Default::default()
        };
        let a: u32 = config.rng().gen_range(0..1_000_000);
        let b: u32 = config.rng().gen_range(0..1_000_000);
        assert_eq!(a, b);
    }
}
