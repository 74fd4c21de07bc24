//! EvoLife - A genetic Life-like cellular automaton.
//!
//! Every live cell carries its own birth/survival rule as a 17-bit genome.
//! Newborns inherit genes from the neighbours that caused the birth by
//! probabilistic crossover, parents pay energy for what they pass on, and
//! cells age until their energy runs out. With a single `B3/S23` species and
//! no aging the automaton is exactly Conway's Game of Life.
//!
//! # Architecture
//!
//! - `schema`: Configuration, initial field generators and presets
//! - `compute`: Cell codec, transition and flush kernels, generation driver
//! - `snapshot`: Binary grid snapshots for resuming runs
//!
//! # Example
//!
//! ```rust,no_run
//! use evolife::{
//!     compute::GenerationDriver,
//!     schema::{Experiment, SeedError, SimulationConfig},
//! };
//!
//! let experiment = Experiment::preset("conway").unwrap();
//! let mut driver = GenerationDriver::new(experiment.config, &experiment.seed).unwrap();
//! driver.run(100);
//!
//! println!("{}", driver.stats());
//!
//! // Any closure can act as an initial field.
//! let config = SimulationConfig::default();
//! let empty = |w: usize, h: usize, _: &mut rand::rngs::StdRng| {
//!     Ok::<_, SeedError>(vec![0u32; w * h])
//! };
//! let driver = GenerationDriver::new(config, &empty).unwrap();
//! assert_eq!(driver.field().population(), 0);
//! ```

pub mod compute;
pub mod schema;
pub mod snapshot;

// Re-export commonly used types
pub use compute::{GenerationDriver, SimulationError, SimulationStats};
pub use schema::{Experiment, FieldSeed, Pattern, SimulationConfig};
pub use snapshot::Snapshot;
