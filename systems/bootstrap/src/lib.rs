#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a Grid Chase session.
//!
//! Placement and adversary movement draw from one seeded generator, so a
//! [`Config`] fully determines the session it produces.

use grid_chase_core::{
    check_field_size, ConfigurationError, Delta, EntityKind, GlyphMatrix, Legend, Position,
    SessionState,
};
use grid_chase_system_movement::Movement;
use grid_chase_system_turn::{TickOutcome, TurnEngine};
use grid_chase_world::{interior_cells, ring_cells, Grid};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// Fixed interior cell the player starts on.
pub const PLAYER_START: Position = Position::new(1, 1);

/// Parameters describing a session before it is assembled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    field_size: u32,
    adversary_count: u32,
    consumable_count: u32,
    rng_seed: u64,
    legend: Legend,
}

impl Config {
    /// Side length used when none is configured.
    pub const DEFAULT_FIELD_SIZE: u32 = 6;
    /// Adversary count used when none is configured.
    pub const DEFAULT_ADVERSARY_COUNT: u32 = 2;
    /// Consumable count used when none is configured.
    pub const DEFAULT_CONSUMABLE_COUNT: u32 = 3;

    /// Creates a configuration with default dimensions seeded by `rng_seed`.
    #[must_use]
    pub fn new(rng_seed: u64) -> Self {
        Self {
            field_size: Self::DEFAULT_FIELD_SIZE,
            adversary_count: Self::DEFAULT_ADVERSARY_COUNT,
            consumable_count: Self::DEFAULT_CONSUMABLE_COUNT,
            rng_seed,
            legend: Legend::default(),
        }
    }

    /// Replaces the side length of the field.
    #[must_use]
    pub fn with_field_size(mut self, field_size: u32) -> Self {
        self.field_size = field_size;
        self
    }

    /// Replaces the number of adversaries.
    #[must_use]
    pub fn with_adversary_count(mut self, adversary_count: u32) -> Self {
        self.adversary_count = adversary_count;
        self
    }

    /// Replaces the number of consumables.
    #[must_use]
    pub fn with_consumable_count(mut self, consumable_count: u32) -> Self {
        self.consumable_count = consumable_count;
        self
    }

    /// Replaces the glyph legend.
    #[must_use]
    pub fn with_legend(mut self, legend: Legend) -> Self {
        self.legend = legend;
        self
    }

    /// Side length of the square field, wall ring included.
    #[must_use]
    pub const fn field_size(&self) -> u32 {
        self.field_size
    }

    /// Number of adversaries placed at setup.
    #[must_use]
    pub const fn adversary_count(&self) -> u32 {
        self.adversary_count
    }

    /// Number of consumables placed at setup.
    #[must_use]
    pub const fn consumable_count(&self) -> u32 {
        self.consumable_count
    }

    /// Seed for placement and adversary movement.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Glyphs used to draw the session.
    #[must_use]
    pub const fn legend(&self) -> &Legend {
        &self.legend
    }

    /// Checks that a session can be assembled from this configuration.
    ///
    /// The interior, `(field_size - 2)²` cells, must hold the player, every
    /// adversary and every consumable on distinct cells.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        check_field_size(self.field_size)?;

        if self.consumable_count == 0 {
            return Err(ConfigurationError::NoConsumables);
        }

        let side = u64::from(self.field_size - 2);
        let interior_cells = side * side;
        let required =
            1 + u64::from(self.adversary_count) + u64::from(self.consumable_count);
        if required > interior_cells {
            return Err(ConfigurationError::InsufficientCapacity {
                interior_cells,
                required,
            });
        }

        Ok(())
    }
}

/// Assembles sessions from validated configurations.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Validates `config` and places every entity on a fresh grid.
    ///
    /// Entities are inserted player first, then adversaries, consumables and
    /// finally the wall ring. Adversaries and consumables take distinct
    /// shuffled interior cells other than [`PLAYER_START`].
    pub fn session(&self, config: &Config) -> Result<Session, ConfigurationError> {
        config.validate()?;

        let legend = config.legend().clone();
        let size = config.field_size();
        let mut grid = Grid::with_blank(size, legend.blank.clone())?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed());

        let mut free_cells: Vec<Position> = interior_cells(size)
            .filter(|cell| *cell != PLAYER_START)
            .collect();
        free_cells.shuffle(&mut rng);
        let mut free_cells = free_cells.into_iter();

        let _ = grid.spawn(EntityKind::Player, PLAYER_START, legend.player.clone());
        for cell in free_cells
            .by_ref()
            .take(usize::try_from(config.adversary_count()).unwrap_or(usize::MAX))
        {
            let _ = grid.spawn(EntityKind::Adversary, cell, legend.adversary.clone());
        }
        for cell in free_cells
            .by_ref()
            .take(usize::try_from(config.consumable_count()).unwrap_or(usize::MAX))
        {
            let _ = grid.spawn(EntityKind::Consumable, cell, legend.consumable.clone());
        }
        for cell in ring_cells(size) {
            let _ = grid.spawn(EntityKind::Wall, cell, legend.wall.clone());
        }
        let _ = grid.render();

        info!(
            seed = config.rng_seed(),
            field_size = size,
            adversaries = config.adversary_count(),
            consumables = config.consumable_count(),
            "session prepared"
        );

        Ok(Session {
            engine: TurnEngine::new(&legend),
            movement: Movement::from_rng(rng),
            grid,
            legend,
        })
    }
}

/// A running session: the grid plus the systems that advance it.
#[derive(Debug)]
pub struct Session {
    grid: Grid,
    engine: TurnEngine,
    movement: Movement,
    legend: Legend,
}

impl Session {
    /// Resolves one tick with the player's requested step.
    pub fn tick(&mut self, input: Delta) -> TickOutcome {
        self.engine.tick(&mut self.grid, &mut self.movement, input)
    }

    /// Authoritative grid of the session.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Matrix rendered after the most recent tick.
    #[must_use]
    pub const fn matrix(&self) -> &GlyphMatrix {
        self.grid.matrix()
    }

    /// Current session state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.engine.state()
    }

    /// Number of ticks resolved so far.
    #[must_use]
    pub const fn tick_index(&self) -> u64 {
        self.engine.tick_index()
    }

    /// Glyphs the session was drawn with.
    #[must_use]
    pub const fn legend(&self) -> &Legend {
        &self.legend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        assert_eq!(Config::new(0).validate(), Ok(()));
    }

    #[test]
    fn capacity_counts_the_player() {
        let full = Config::new(0)
            .with_field_size(4)
            .with_adversary_count(1)
            .with_consumable_count(2);
        assert_eq!(full.validate(), Ok(()));

        let overfull = full.with_consumable_count(3);
        assert_eq!(
            overfull.validate(),
            Err(ConfigurationError::InsufficientCapacity {
                interior_cells: 4,
                required: 5,
            })
        );
    }
}
