//! Generation driver - runs the two kernels in order and advances time.

use crate::schema::{ConfigError, InitialField, SeedError, SimulationConfig};
use crate::snapshot::Snapshot;

use super::census::{DEFAULT_CHART_SIZE, SimulationStats};
use super::color::Rgb;
use super::field::{Field, Torus};
use super::flush::{FadeParams, flush_kernel};
use super::transition::{TransitionParams, transition_kernel};

/// Where the driver is within a tick. Callers only ever observe `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    RunningTransition,
    RunningFlush,
    Swapped,
}

/// Errors raised while setting up a run.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to seed the field: {0}")]
    Seed(#[from] SeedError),
}

/// Drives an EvoLife field one generation at a time.
pub struct GenerationDriver {
    config: SimulationConfig,
    transition: TransitionParams,
    fade: FadeParams,
    field: Field,
    tick: u64,
    phase: Phase,
}

impl GenerationDriver {
    /// Create a driver with a freshly generated field.
    ///
    /// Per-cell seeds are drawn before the initial field, both from the
    /// configuration's generator, so a fixed `random_seed` reproduces the run.
    pub fn new<G: InitialField + ?Sized>(
        config: SimulationConfig,
        seed: &G,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut rng = config.rng();
        let torus = Torus::new(config.width, config.height);
        let seeds = Field::draw_seeds(torus.len(), &mut rng);

        let initial = seed.generate(config.width, config.height, &mut rng)?;
        if initial.len() != torus.len() {
            return Err(SeedError::SizeMismatch {
                expected: torus.len(),
                actual: initial.len(),
            }
            .into());
        }

        let field = Field::with_seeds(torus, &initial, seeds);
        log::info!(
            "Seeded {}x{} field with {} live cells",
            config.width,
            config.height,
            field.population()
        );

        Ok(Self::from_field(config, field, 0))
    }

    /// Resume a run from a snapshot. Energies are kept, seeds are redrawn.
    pub fn from_snapshot(
        config: SimulationConfig,
        snapshot: &Snapshot,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        if (snapshot.width, snapshot.height) != (config.width, config.height) {
            return Err(ConfigError::SnapshotDimensions {
                expected: (config.width, config.height),
                actual: (snapshot.width, snapshot.height),
            }
            .into());
        }

        let mut rng = config.rng();
        let torus = Torus::new(config.width, config.height);
        let field = Field::from_words(torus, &snapshot.words, &mut rng);
        log::info!("Resumed at tick {}", snapshot.tick);

        Ok(Self::from_field(config, field, snapshot.tick))
    }

    fn from_field(config: SimulationConfig, field: Field, tick: u64) -> Self {
        Self {
            transition: config.transition_params(),
            fade: config.fade_params(),
            config,
            field,
            tick,
            phase: Phase::Idle,
        }
    }

    fn enter(&mut self, phase: Phase) {
        log::trace!("tick {}: {:?} -> {:?}", self.tick, self.phase, phase);
        self.phase = phase;
    }

    /// Advance one generation.
    pub fn step(&mut self) {
        self.enter(Phase::RunningTransition);
        transition_kernel(self.field.transition_view(), &self.transition);

        // Every debit has landed once the parallel transition returns.
        self.enter(Phase::RunningFlush);
        flush_kernel(self.field.flush_view(), &self.fade);

        self.field.swap();
        self.tick += 1;
        self.enter(Phase::Swapped);
        self.enter(Phase::Idle);

        let interval = self.config.census_interval;
        if interval > 0 && self.tick % interval == 0 {
            log::info!("tick {}: {}", self.tick, self.stats());
        }
    }

    /// Run simulation for specified number of steps.
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Completed generations.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Current generation, row-major.
    pub fn grid(&self) -> &[u32] {
        self.field.grid()
    }

    /// Copy of the current generation.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.field.width(),
            self.field.height(),
            self.tick,
            self.field.grid().to_vec(),
        )
    }

    pub fn colors(&self) -> &[Rgb] {
        self.field.colors()
    }

    /// Display colors as packed RGB bytes, 3 per cell.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.field.colors())
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats::from_grid(self.field.grid(), self.tick, DEFAULT_CHART_SIZE)
    }
}
