#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state management for Grid Chase.

use grid_chase_core::{
    Command, CompareBy, ConfigurationError, EntityId, EntityKind, Event, Glyph, GlyphMatrix,
    check_field_size, Legend, MovementPolicy, Position,
};

/// Positioned actor living on the grid.
///
/// Entities are never removed from their grid. A collected consumable is
/// flagged dead instead, which keeps identifiers stable and iteration order
/// deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    policy: MovementPolicy,
    current: Position,
    pending: Position,
    alive: bool,
    glyph: Glyph,
}

impl Entity {
    /// Creates a live entity resting at `position`.
    #[must_use]
    pub fn new(id: EntityId, kind: EntityKind, position: Position, glyph: Glyph) -> Self {
        Self {
            id,
            kind,
            policy: MovementPolicy::for_kind(kind),
            current: position,
            pending: position,
            alive: true,
            glyph,
        }
    }

    /// Identifier allocated by the owning grid.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Kind tag of the entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Strategy used to propose the entity's steps.
    #[must_use]
    pub const fn policy(&self) -> MovementPolicy {
        self.policy
    }

    /// Committed cell.
    #[must_use]
    pub const fn current(&self) -> Position {
        self.current
    }

    /// Proposed cell for the tick in progress; equals [`Entity::current`]
    /// outside of resolution.
    #[must_use]
    pub const fn pending(&self) -> Position {
        self.pending
    }

    /// Position compared by occupancy queries in the given mode.
    #[must_use]
    pub const fn position(&self, compare_by: CompareBy) -> Position {
        match compare_by {
            CompareBy::Pending => self.pending,
            CompareBy::Current => self.current,
        }
    }

    /// Whether the entity still participates in queries and rendering.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Symbol drawn for the entity.
    #[must_use]
    pub const fn glyph(&self) -> &Glyph {
        &self.glyph
    }
}

/// Represents the authoritative square playing field.
#[derive(Debug)]
pub struct Grid {
    size: u32,
    blank: Glyph,
    entities: Vec<Entity>,
    matrix: GlyphMatrix,
}

impl Grid {
    /// Creates an empty grid using the default blank glyph.
    pub fn new(size: u32) -> Result<Self, ConfigurationError> {
        Self::with_blank(size, Legend::default().blank)
    }

    /// Creates an empty grid whose unoccupied cells render as `blank`.
    ///
    /// Fails when `size` falls outside the bounds enforced by [`check_field_size`].
    pub fn with_blank(size: u32, blank: Glyph) -> Result<Self, ConfigurationError> {
        check_field_size(size)?;

        let matrix = GlyphMatrix::filled(size, &blank);
        Ok(Self {
            size,
            blank,
            entities: Vec::new(),
            matrix,
        })
    }

    /// Adds a live entity and returns its identifier.
    pub fn spawn(&mut self, kind: EntityKind, position: Position, glyph: Glyph) -> EntityId {
        let id = EntityId::new(u32::try_from(self.entities.len()).unwrap_or(u32::MAX));
        self.entities.push(Entity::new(id, kind, position, glyph));
        id
    }

    /// Side length of the field.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Every entity in insertion order, dead ones included.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Looks up an entity by identifier.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.index(id).map(|index| &self.entities[index])
    }

    /// Entities of `kind` in insertion order, dead ones included.
    pub fn entities_of(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().filter(move |entity| entity.kind == kind)
    }

    /// First live player, if any.
    #[must_use]
    pub fn player(&self) -> Option<&Entity> {
        self.entities_of(EntityKind::Player)
            .find(|entity| entity.alive)
    }

    /// Number of live entities of `kind`.
    #[must_use]
    pub fn live_count(&self, kind: EntityKind) -> usize {
        self.entities_of(kind).filter(|entity| entity.alive).count()
    }

    /// Returns the first live entity of `kind` found at `position`.
    #[must_use]
    pub fn occupant_of_kind(
        &self,
        position: Position,
        kind: EntityKind,
        compare_by: CompareBy,
    ) -> Option<&Entity> {
        occupant_at(position, self.entities_of(kind), compare_by)
    }

    /// Rebuilds the cached glyph matrix from committed state and returns it.
    pub fn render(&mut self) -> &GlyphMatrix {
        paint_matrix(&mut self.matrix, &self.entities, &self.blank);
        &self.matrix
    }

    /// Matrix produced by the most recent [`Grid::render`].
    #[must_use]
    pub const fn matrix(&self) -> &GlyphMatrix {
        &self.matrix
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index(id).map(|index| &mut self.entities[index])
    }

    fn index(&self, id: EntityId) -> Option<usize> {
        let index = usize::try_from(id.get()).ok()?;
        (index < self.entities.len()).then_some(index)
    }
}

/// Scans `candidates` for the first live entity whose comparison position
/// equals `position`.
///
/// An empty candidate set yields `None`.
pub fn occupant_at<'a, I>(position: Position, candidates: I, compare_by: CompareBy) -> Option<&'a Entity>
where
    I: IntoIterator<Item = &'a Entity>,
{
    candidates
        .into_iter()
        .find(|entity| entity.alive && entity.position(compare_by) == position)
}

/// Blanks `matrix` and stamps every live entity's glyph at its committed
/// position following [`EntityKind::PAINT_ORDER`].
///
/// Entities outside the matrix are skipped.
pub fn paint_matrix(matrix: &mut GlyphMatrix, entities: &[Entity], blank: &Glyph) {
    matrix.fill(blank);
    for kind in EntityKind::PAINT_ORDER {
        for entity in entities
            .iter()
            .filter(|entity| entity.kind == kind && entity.alive)
        {
            let _ = matrix.stamp(entity.current, &entity.glyph);
        }
    }
}

/// Cells on the outer ring of a `size × size` field, column by column.
pub fn ring_cells(size: u32) -> impl Iterator<Item = Position> {
    cells(size).filter(move |cell| cell.is_on_ring(size))
}

/// Cells strictly inside the outer ring, row by row.
pub fn interior_cells(size: u32) -> impl Iterator<Item = Position> {
    let side = i32::try_from(size).unwrap_or(i32::MAX);
    (1..side.saturating_sub(1))
        .flat_map(move |y| (1..side.saturating_sub(1)).map(move |x| Position::new(x, y)))
}

fn cells(size: u32) -> impl Iterator<Item = Position> {
    let side = i32::try_from(size).unwrap_or(i32::MAX);
    (0..side).flat_map(move |x| (0..side).map(move |y| Position::new(x, y)))
}

/// Applies the provided command to the grid, mutating state deterministically.
///
/// Walls ignore proposals and commits, and only live consumables can be
/// captured; such commands are dropped without an event.
pub fn apply(grid: &mut Grid, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Propose { entity, to } => {
            if let Some(target) = grid.entity_mut(entity) {
                if target.alive && target.kind != EntityKind::Wall {
                    target.pending = to;
                }
            }
        }
        Command::Reject { entity, reason } => {
            if let Some(target) = grid.entity_mut(entity) {
                let attempted = target.pending;
                target.pending = target.current;
                out_events.push(Event::MoveRejected {
                    entity,
                    attempted,
                    reason,
                });
            }
        }
        Command::Commit { entity } => {
            if let Some(target) = grid.entity_mut(entity) {
                if target.kind == EntityKind::Wall {
                    return;
                }
                let from = target.current;
                target.current = target.pending;
                if from != target.current {
                    out_events.push(Event::EntityMoved {
                        entity,
                        from,
                        to: target.current,
                    });
                }
            }
        }
        Command::Capture { entity } => {
            if let Some(target) = grid.entity_mut(entity) {
                if target.kind == EntityKind::Consumable && target.alive {
                    target.alive = false;
                    out_events.push(Event::ConsumableCaptured {
                        entity,
                        at: target.current,
                    });
                }
            }
        }
        Command::SetGlyph { entity, glyph } => {
            if let Some(target) = grid.entity_mut(entity) {
                target.glyph = glyph;
            }
        }
    }
}

/// Query functions that provide read-only access to the grid state.
pub mod query {
    use super::Grid;
    use grid_chase_core::{EntityId, EntityKind, Position};

    /// Captures a read-only view of every entity on the grid.
    #[must_use]
    pub fn entity_view(grid: &Grid) -> EntityView {
        let snapshots = grid
            .entities()
            .iter()
            .map(|entity| EntitySnapshot {
                id: entity.id(),
                kind: entity.kind(),
                cell: entity.current(),
                alive: entity.is_alive(),
            })
            .collect();
        EntityView { snapshots }
    }

    /// Number of consumables still waiting to be collected.
    #[must_use]
    pub fn remaining_consumables(grid: &Grid) -> usize {
        grid.live_count(EntityKind::Consumable)
    }

    /// Read-only snapshot describing all entities in insertion order.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct EntityView {
        snapshots: Vec<EntitySnapshot>,
    }

    impl EntityView {
        /// Iterator over the captured snapshots in insertion order.
        pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<EntitySnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single entity's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EntitySnapshot {
        /// Identifier allocated to the entity.
        pub id: EntityId,
        /// Kind tag of the entity.
        pub kind: EntityKind,
        /// Committed cell.
        pub cell: Position,
        /// Whether the entity is still live.
        pub alive: bool,
    }
}
