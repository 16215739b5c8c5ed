#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative grid, and pure systems. Systems submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then reports [`Event`] values describing what
//! actually happened. Every type here is plain data; no crate-level state or
//! randomness lives in the core.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest side length accepted for a playing field.
///
/// A one-cell wall ring around anything smaller leaves no room for the
/// player, an adversary and a consumable to start apart.
pub const MINIMUM_FIELD_SIZE: u32 = 4;

/// Largest side length accepted for a playing field.
///
/// Every tick repaints the whole `size × size` matrix and a terminal frame
/// prints one row per line, so fields beyond this are refused up front.
pub const MAXIMUM_FIELD_SIZE: u32 = 256;

/// Checks `size` against [`MINIMUM_FIELD_SIZE`] and [`MAXIMUM_FIELD_SIZE`].
pub const fn check_field_size(size: u32) -> Result<(), ConfigurationError> {
    if size < MINIMUM_FIELD_SIZE {
        return Err(ConfigurationError::FieldTooSmall {
            size,
            minimum: MINIMUM_FIELD_SIZE,
        });
    }
    if size > MAXIMUM_FIELD_SIZE {
        return Err(ConfigurationError::FieldTooLarge {
            size,
            maximum: MAXIMUM_FIELD_SIZE,
        });
    }
    Ok(())
}

/// Location of a single grid cell expressed as `x` (column) and `y` (row).
///
/// Coordinates are signed so that a step can be applied before it is
/// validated; a legally resolved tick never leaves a live entity outside
/// `[0, size - 1]` on either axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the position reached by applying `delta` to this one.
    #[must_use]
    pub const fn offset(self, delta: Delta) -> Self {
        Self {
            x: self.x.saturating_add(delta.dx),
            y: self.y.saturating_add(delta.dy),
        }
    }

    /// Reports whether the position lies inside a square field of `size` cells.
    #[must_use]
    pub fn is_within(&self, size: u32) -> bool {
        let inside = |value: i32| u32::try_from(value).map_or(false, |value| value < size);
        inside(self.x) && inside(self.y)
    }

    /// Reports whether the position lies on the outer ring of a field of `size` cells.
    #[must_use]
    pub fn is_on_ring(&self, size: u32) -> bool {
        if !self.is_within(size) {
            return false;
        }
        let last = i64::from(size) - 1;
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        x == 0 || y == 0 || x == last || y == last
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One-cell displacement applied to a [`Position`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Delta {
    dx: i32,
    dy: i32,
}

impl Delta {
    /// Stay in place.
    pub const NONE: Self = Self::new(0, 0);
    /// Move toward decreasing row indices.
    pub const UP: Self = Self::new(0, -1);
    /// Move toward decreasing column indices.
    pub const LEFT: Self = Self::new(-1, 0);
    /// Move toward increasing row indices.
    pub const DOWN: Self = Self::new(0, 1);
    /// Move toward increasing column indices.
    pub const RIGHT: Self = Self::new(1, 0);

    /// The four cardinal steps, in the order adversaries draw from.
    pub const CARDINALS: [Self; 4] = [Self::RIGHT, Self::LEFT, Self::DOWN, Self::UP];

    /// Every step a player may request, including standing still.
    pub const PLAYER_STEPS: [Self; 5] = [Self::NONE, Self::UP, Self::LEFT, Self::DOWN, Self::RIGHT];

    /// Creates a displacement from raw components.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Vertical component.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }

    /// Maps a single received character onto a player step.
    ///
    /// `w`, `a`, `s` and `d` select up, left, down and right. Every other
    /// character yields [`Delta::NONE`] instead of an error.
    #[must_use]
    pub const fn from_key(key: char) -> Self {
        match key {
            'w' => Self::UP,
            'a' => Self::LEFT,
            's' => Self::DOWN,
            'd' => Self::RIGHT,
            _ => Self::NONE,
        }
    }

    /// Reports whether the delta is one of [`Delta::PLAYER_STEPS`].
    #[must_use]
    pub fn is_player_step(&self) -> bool {
        Self::PLAYER_STEPS.contains(self)
    }
}

impl Default for Delta {
    fn default() -> Self {
        Self::NONE
    }
}

/// Unique identifier assigned to an entity; equal to its insertion index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kind tag carried by every entity on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The controlled agent.
    Player,
    /// Autonomously moving opponent; touching one loses the session.
    Adversary,
    /// Item the player collects; collecting the last one wins the session.
    Consumable,
    /// Immovable cell on the outer ring.
    Wall,
}

impl EntityKind {
    /// Order in which kinds are stamped into the glyph matrix. Later kinds
    /// overwrite earlier ones sharing a cell.
    pub const PAINT_ORDER: [Self; 4] = [Self::Consumable, Self::Adversary, Self::Wall, Self::Player];
}

/// Strategy used to derive an entity's proposed step each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MovementPolicy {
    /// Step taken from the input source.
    InputDriven,
    /// Uniform draw among the four cardinal steps.
    RandomWalk,
    /// Never moves.
    Stationary,
}

impl MovementPolicy {
    /// Selects the policy that governs entities of `kind`.
    #[must_use]
    pub const fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Player => Self::InputDriven,
            EntityKind::Adversary => Self::RandomWalk,
            EntityKind::Consumable | EntityKind::Wall => Self::Stationary,
        }
    }
}

/// Which of an entity's positions an occupancy query compares against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareBy {
    /// Where the entity intends to land this tick. Used to validate moves.
    Pending,
    /// Where the entity actually is. Used for terminal checks.
    Current,
}

/// Lifecycle of a session as driven by the turn engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Ticks are still being processed.
    Running,
    /// The player stepped onto an adversary.
    Lost,
    /// The player collected the last consumable.
    Won,
}

impl SessionState {
    /// Reports whether the state is absorbing.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Lost | Self::Won)
    }
}

/// Display symbol drawn for an entity or an empty cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Glyph(String);

impl Glyph {
    /// Creates a glyph from any string-like symbol.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Borrows the symbol.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static mapping from each entity kind to the glyph that represents it.
///
/// Missing keys fall back to the defaults when deserialised; unknown keys
/// are rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Legend {
    /// Player glyph while the session runs.
    pub player: Glyph,
    /// Player glyph after the session is lost.
    pub player_lost: Glyph,
    /// Player glyph after the session is won.
    pub player_won: Glyph,
    /// Adversary glyph.
    pub adversary: Glyph,
    /// Consumable glyph.
    pub consumable: Glyph,
    /// Wall glyph.
    pub wall: Glyph,
    /// Glyph written into cells nobody occupies.
    pub blank: Glyph,
}

impl Legend {
    /// Glyph used for fresh entities of `kind`.
    #[must_use]
    pub fn glyph_for(&self, kind: EntityKind) -> &Glyph {
        match kind {
            EntityKind::Player => &self.player,
            EntityKind::Adversary => &self.adversary,
            EntityKind::Consumable => &self.consumable,
            EntityKind::Wall => &self.wall,
        }
    }
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            player: Glyph::new("P"),
            player_lost: Glyph::new("X"),
            player_won: Glyph::new("W"),
            adversary: Glyph::new("E"),
            consumable: Glyph::new("F"),
            wall: Glyph::new("#"),
            blank: Glyph::new("_"),
        }
    }
}

/// Dense `size × size` matrix of glyphs in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphMatrix {
    size: u32,
    cells: Vec<Glyph>,
}

impl GlyphMatrix {
    /// Creates a matrix with every cell set to `blank`.
    #[must_use]
    pub fn filled(size: u32, blank: &Glyph) -> Self {
        let capacity_u64 = u64::from(size) * u64::from(size);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            size,
            cells: vec![blank.clone(); capacity],
        }
    }

    /// Side length of the matrix.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Overwrites every cell with `blank`.
    pub fn fill(&mut self, blank: &Glyph) {
        self.cells.fill(blank.clone());
    }

    /// Writes `glyph` at `position`. Returns `false` when the position lies
    /// outside the matrix.
    pub fn stamp(&mut self, position: Position, glyph: &Glyph) -> bool {
        match self.index(position).and_then(|index| self.cells.get_mut(index)) {
            Some(slot) => {
                slot.clone_from(glyph);
                true
            }
            None => false,
        }
    }

    /// Glyph drawn at `position`, if it lies inside the matrix.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<&Glyph> {
        self.index(position).and_then(|index| self.cells.get(index))
    }

    /// Iterator over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Glyph]> {
        let width = usize::try_from(self.size).unwrap_or(0).max(1);
        self.cells.chunks(width)
    }

    /// Copies the matrix into nested owned strings, one vector per row.
    #[must_use]
    pub fn to_strings(&self) -> Vec<Vec<String>> {
        self.rows()
            .map(|row| row.iter().map(|glyph| glyph.as_str().to_owned()).collect())
            .collect()
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !position.is_within(self.size) {
            return None;
        }
        let row = usize::try_from(position.y()).ok()?;
        let column = usize::try_from(position.x()).ok()?;
        let width = usize::try_from(self.size).ok()?;
        Some(row * width + column)
    }
}

/// Reasons a proposed move may be rejected during tick resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// The destination is a wall cell.
    Wall,
    /// The destination is the player's committed cell.
    Player,
    /// The destination holds a live consumable.
    Consumable,
    /// The destination is another adversary's committed cell.
    Adversary,
}

/// Commands that express all permissible grid mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Records where an entity intends to move this tick.
    Propose {
        /// Entity making the proposal.
        entity: EntityId,
        /// Intended destination.
        to: Position,
    },
    /// Discards an entity's proposal, leaving it in place for the tick.
    Reject {
        /// Entity whose proposal is discarded.
        entity: EntityId,
        /// Why the proposal was refused.
        reason: Rejection,
    },
    /// Moves an entity onto its pending position.
    Commit {
        /// Entity to commit.
        entity: EntityId,
    },
    /// Marks a consumable as collected.
    Capture {
        /// Consumable being collected.
        entity: EntityId,
    },
    /// Replaces the glyph drawn for an entity.
    SetGlyph {
        /// Entity to restyle.
        entity: EntityId,
        /// Replacement glyph.
        glyph: Glyph,
    },
}

/// Events reported after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that an entity moved between two cells.
    EntityMoved {
        /// Entity that moved.
        entity: EntityId,
        /// Cell occupied before the move.
        from: Position,
        /// Cell occupied after the move.
        to: Position,
    },
    /// Reports that a proposed move was refused.
    MoveRejected {
        /// Entity whose move was refused.
        entity: EntityId,
        /// Destination that was refused.
        attempted: Position,
        /// Specific reason the move failed.
        reason: Rejection,
    },
    /// Confirms that a consumable was collected.
    ConsumableCaptured {
        /// Consumable that was collected.
        entity: EntityId,
        /// Cell the consumable occupied.
        at: Position,
    },
    /// Announces that the session reached a terminal state.
    SessionEnded {
        /// Terminal state that was reached.
        state: SessionState,
    },
}

/// Errors raised while validating a session configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The field is too small to hold an interior.
    #[error("field_size must be at least {minimum} (received {size})")]
    FieldTooSmall {
        /// Requested side length.
        size: u32,
        /// Smallest accepted side length.
        minimum: u32,
    },
    /// The field is too large to paint every tick.
    #[error("field_size must be at most {maximum} (received {size})")]
    FieldTooLarge {
        /// Requested side length.
        size: u32,
        /// Largest accepted side length.
        maximum: u32,
    },
    /// A session without consumables can never be won.
    #[error("consumable_count must be positive")]
    NoConsumables,
    /// The interior cannot place every entity in a distinct cell.
    #[error("field interior has {interior_cells} cells but {required} entities must be placed")]
    InsufficientCapacity {
        /// Cells available inside the wall ring.
        interior_cells: u64,
        /// Player, adversaries and consumables that need a cell.
        required: u64,
    },
}
