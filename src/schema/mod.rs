//! Schema module - Configuration, seeding and preset types for EvoLife experiments.

mod config;
mod presets;
mod seed;

pub use config::*;
pub use presets::*;
pub use seed::*;
