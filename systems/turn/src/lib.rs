#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn engine that resolves one tick of a Grid Chase session.
//!
//! A tick runs in a fixed order, and the order decides precedence when
//! several outcomes could fire at once:
//!
//! 1. the player proposes a step, which a wall rejects;
//! 2. the player's step is committed;
//! 3. landing on an adversary loses the session and ends the tick;
//! 4. landing on a consumable collects it, and collecting the last one wins
//!    the session and ends the tick;
//! 5. adversaries propose, validate and commit one at a time in insertion
//!    order, so later adversaries observe earlier ones' new cells;
//! 6. the grid is re-rendered from committed state.
//!
//! Move validation compares against pending positions for walls and against
//! committed positions for everything else; terminal checks always compare
//! committed positions. An adversary may never enter a cell another adversary
//! has committed to, so two adversaries can neither share nor swap cells.

use grid_chase_core::{
    Command, CompareBy, Delta, EntityId, EntityKind, Event, Glyph, GlyphMatrix, Legend, Position,
    Rejection, SessionState,
};
use grid_chase_system_movement::Movement;
use grid_chase_world::{apply, occupant_at, Entity, Grid};
use rand::Rng;
use tracing::debug;

/// Result of a single call to [`TurnEngine::tick`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    /// Number of ticks the engine has resolved so far.
    pub tick: u64,
    /// Session state after the tick.
    pub state: SessionState,
    /// Matrix rendered from committed state.
    pub matrix: GlyphMatrix,
    /// Events produced while resolving the tick, in order.
    pub events: Vec<Event>,
}

/// State machine that drives a session from `Running` to `Lost` or `Won`.
#[derive(Clone, Debug)]
pub struct TurnEngine {
    state: SessionState,
    tick_index: u64,
    lost_face: Glyph,
    won_face: Glyph,
}

impl TurnEngine {
    /// Creates a running engine that restyles the player with the legend's
    /// terminal faces when the session ends.
    #[must_use]
    pub fn new(legend: &Legend) -> Self {
        Self {
            state: SessionState::Running,
            tick_index: 0,
            lost_face: legend.player_lost.clone(),
            won_face: legend.player_won.clone(),
        }
    }

    /// Current session state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Number of ticks resolved so far.
    #[must_use]
    pub const fn tick_index(&self) -> u64 {
        self.tick_index
    }

    /// Resolves one tick using `input` as the player's requested step.
    ///
    /// Once the session is `Lost` or `Won` the call is refused: nothing is
    /// mutated, no events are produced and the last rendered matrix is
    /// returned.
    pub fn tick<R: Rng>(
        &mut self,
        grid: &mut Grid,
        movement: &mut Movement<R>,
        input: Delta,
    ) -> TickOutcome {
        if self.state.is_terminal() {
            debug!(state = ?self.state, "tick refused after session ended");
            return self.outcome(grid, Vec::new());
        }

        self.tick_index = self.tick_index.saturating_add(1);
        let mut events = Vec::new();

        match resolve_player(grid, movement, input, &mut events) {
            Some(state) => self.finish(grid, state, &mut events),
            None => resolve_adversaries(grid, movement, &mut events),
        }

        let _ = grid.render();
        debug!(
            tick = self.tick_index,
            state = ?self.state,
            events = events.len(),
            "tick resolved"
        );
        self.outcome(grid, events)
    }

    fn finish(&mut self, grid: &mut Grid, state: SessionState, events: &mut Vec<Event>) {
        self.state = state;
        let face = match state {
            SessionState::Lost => self.lost_face.clone(),
            SessionState::Won => self.won_face.clone(),
            SessionState::Running => return,
        };

        if let Some(player) = grid.player().map(Entity::id) {
            apply(
                grid,
                Command::SetGlyph {
                    entity: player,
                    glyph: face,
                },
                events,
            );
        }
        events.push(Event::SessionEnded { state });

        if state == SessionState::Lost {
            debug!(tick = self.tick_index, "game over");
        } else {
            debug!(tick = self.tick_index, "game clear");
        }
    }

    fn outcome(&self, grid: &Grid, events: Vec<Event>) -> TickOutcome {
        TickOutcome {
            tick: self.tick_index,
            state: self.state,
            matrix: grid.matrix().clone(),
            events,
        }
    }
}

impl Default for TurnEngine {
    fn default() -> Self {
        Self::new(&Legend::default())
    }
}

/// Moves the player and reports the terminal state it triggered, if any.
fn resolve_player<R: Rng>(
    grid: &mut Grid,
    movement: &mut Movement<R>,
    input: Delta,
    events: &mut Vec<Event>,
) -> Option<SessionState> {
    let (player, proposal) = {
        let player = grid.player()?;
        (player.id(), movement.propose(player, input))
    };

    apply(
        grid,
        Command::Propose {
            entity: player,
            to: proposal,
        },
        events,
    );
    if grid
        .occupant_of_kind(proposal, EntityKind::Wall, CompareBy::Pending)
        .is_some()
    {
        apply(
            grid,
            Command::Reject {
                entity: player,
                reason: Rejection::Wall,
            },
            events,
        );
    }
    apply(grid, Command::Commit { entity: player }, events);

    let landed = grid.entity(player)?.current();
    if grid
        .occupant_of_kind(landed, EntityKind::Adversary, CompareBy::Current)
        .is_some()
    {
        return Some(SessionState::Lost);
    }

    let captured = grid
        .occupant_of_kind(landed, EntityKind::Consumable, CompareBy::Current)
        .map(Entity::id);
    if let Some(consumable) = captured {
        apply(grid, Command::Capture { entity: consumable }, events);
        if grid.live_count(EntityKind::Consumable) == 0 {
            return Some(SessionState::Won);
        }
    }

    None
}

fn resolve_adversaries<R: Rng>(grid: &mut Grid, movement: &mut Movement<R>, events: &mut Vec<Event>) {
    let adversaries: Vec<EntityId> = grid
        .entities_of(EntityKind::Adversary)
        .filter(|adversary| adversary.is_alive())
        .map(Entity::id)
        .collect();

    for adversary in adversaries {
        let Some(proposal) = grid
            .entity(adversary)
            .map(|entity| movement.propose(entity, Delta::NONE))
        else {
            continue;
        };

        apply(
            grid,
            Command::Propose {
                entity: adversary,
                to: proposal,
            },
            events,
        );
        if let Some(reason) = adversary_rejection(grid, adversary, proposal) {
            apply(
                grid,
                Command::Reject {
                    entity: adversary,
                    reason,
                },
                events,
            );
        }
        apply(grid, Command::Commit { entity: adversary }, events);
    }
}

fn adversary_rejection(grid: &Grid, adversary: EntityId, proposal: Position) -> Option<Rejection> {
    if grid
        .occupant_of_kind(proposal, EntityKind::Wall, CompareBy::Pending)
        .is_some()
    {
        return Some(Rejection::Wall);
    }

    if grid
        .occupant_of_kind(proposal, EntityKind::Player, CompareBy::Current)
        .is_some()
    {
        return Some(Rejection::Player);
    }

    if grid
        .occupant_of_kind(proposal, EntityKind::Consumable, CompareBy::Current)
        .is_some()
    {
        return Some(Rejection::Consumable);
    }

    let peers = grid
        .entities_of(EntityKind::Adversary)
        .filter(|peer| peer.id() != adversary);
    occupant_at(proposal, peers, CompareBy::Current).map(|_| Rejection::Adversary)
}
