//! Single-unit moves and their legality rules.
//!
//! A [`Move`] is a value: computing its target or checking legality never
//! mutates the world. Only [`Move::execute`] commits, and it does not
//! re-validate. Validation is the caller's job, split into a cheap local
//! pattern check and the connectivity check that costs a BFS.

use std::fmt;

use morph_core::{Direction, Pos, WorldError};

use crate::world::World;

/// Relocation of the unit at `source` one step in `direction`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    /// Cell of the moving unit.
    pub source: Pos,
    /// How it moves.
    pub direction: Direction,
}

impl Move {
    /// Construct a move.
    pub const fn new(source: Pos, direction: Direction) -> Self {
        Self { source, direction }
    }

    /// Cell the unit ends up in.
    pub fn target(&self) -> Pos {
        let (dx, dy) = self.direction.delta();
        self.source.offset(dx, dy)
    }

    /// Intermediate straight-move point of a pivot, `None` for slides.
    pub fn waypoint(&self) -> Option<Pos> {
        self.direction
            .is_pivot()
            .then(|| self.source.step(self.direction.first()))
    }

    /// Local legality: target empty and the neighbour pattern holds.
    ///
    /// A slide needs a wall along one side: the side neighbour and the
    /// diagonal beyond it. A pivot `ab` needs cell `a` empty and cell `b`
    /// occupied.
    pub fn is_valid_ignore_connectivity(&self, world: &World) -> bool {
        self.is_locally_valid(|p| world.has(p))
    }

    /// Local legality against an arbitrary occupancy predicate.
    ///
    /// The planner uses this to evaluate moves of a unit that has been
    /// lifted from its original cell.
    pub fn is_locally_valid(&self, occupied: impl Fn(Pos) -> bool) -> bool {
        if occupied(self.target()) {
            return false;
        }
        let a = self.direction.first();
        match self.direction.second() {
            None => {
                let wall = |side| {
                    let beside = self.source.step(side);
                    occupied(beside) && occupied(beside.step(a))
                };
                wall(a.left()) || wall(a.right())
            }
            Some(b) => !occupied(self.source.step(a)) && occupied(self.source.step(b)),
        }
    }

    /// Full legality: a unit at `source`, local legality, and lifting the
    /// unit leaves the rest of the configuration connected.
    pub fn is_valid(&self, world: &World) -> bool {
        world.has(self.source)
            && self.is_valid_ignore_connectivity(world)
            && world.is_connected(Some(self.source))
    }

    /// Commit the move. Does not re-check legality.
    pub fn execute(&self, world: &mut World) -> Result<(), WorldError> {
        world.move_unit(self.source, self.target())
    }

    /// The legal move taking the unit at `from` to `to`, if one exists.
    ///
    /// At most one direction can match: slides have distinct targets and
    /// the two pivots sharing a diagonal target have mutually exclusive
    /// patterns.
    pub fn to(world: &World, from: Pos, to: Pos) -> Option<Move> {
        Direction::ALL
            .into_iter()
            .map(|d| Move::new(from, d))
            .find(|m| m.target() == to && m.is_valid(world))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.source, self.direction, self.target())
    }
}
