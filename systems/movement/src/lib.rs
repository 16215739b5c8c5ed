#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement system that turns each entity's policy into a proposed cell.
//!
//! The system owns the session's random source. Seeding it at construction
//! makes every adversary walk reproducible, which the replay tests rely on.

use grid_chase_core::{Delta, MovementPolicy, Position};
use grid_chase_world::Entity;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Pure system that proposes one-cell steps for entities.
#[derive(Debug)]
pub struct Movement<R = ChaCha8Rng> {
    rng: R,
}

impl Movement<ChaCha8Rng> {
    /// Creates a movement system backed by a ChaCha generator seeded with `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Movement<R> {
    /// Creates a movement system drawing from the supplied generator.
    #[must_use]
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Resolves the step an entity governed by `policy` takes this tick.
    ///
    /// `input` only matters for [`MovementPolicy::InputDriven`]; anything
    /// outside [`Delta::PLAYER_STEPS`] collapses to [`Delta::NONE`].
    pub fn step_for(&mut self, policy: MovementPolicy, input: Delta) -> Delta {
        match policy {
            MovementPolicy::InputDriven if input.is_player_step() => input,
            MovementPolicy::InputDriven | MovementPolicy::Stationary => Delta::NONE,
            MovementPolicy::RandomWalk => self.random_cardinal(),
        }
    }

    /// Proposes the cell `entity` wants to occupy after this tick.
    pub fn propose(&mut self, entity: &Entity, input: Delta) -> Position {
        let step = self.step_for(entity.policy(), input);
        entity.current().offset(step)
    }

    fn random_cardinal(&mut self) -> Delta {
        let index = self.rng.gen_range(0..Delta::CARDINALS.len());
        Delta::CARDINALS[index]
    }
}
