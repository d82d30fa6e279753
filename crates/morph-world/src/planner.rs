//! Breadth-first motion planning over the move graph.

use std::collections::{HashMap, VecDeque};

use morph_core::{Direction, Pos, WorldError};

use crate::moves::Move;
use crate::world::World;

impl World {
    /// Shortest sequence of moves carrying the unit at `from` to `to`.
    ///
    /// The unit is treated as lifted: its original cell does not block it,
    /// and every other unit stays put. Nodes are cells, edges are moves
    /// that are locally legal in that lifted world. Since the rest of the
    /// configuration must stay connected without the unit, that is
    /// checked once up front rather than per edge.
    ///
    /// Returns an empty path when `from == to`.
    pub fn shortest_move_path(&self, from: Pos, to: Pos) -> Result<Vec<Move>, WorldError> {
        if !self.has(from) {
            return Err(WorldError::Vacant { pos: from });
        }
        if from == to {
            return Ok(Vec::new());
        }
        let unreachable = WorldError::Unreachable { from, to };
        if self.has(to) || !self.is_connected(Some(from)) {
            return Err(unreachable);
        }

        let came_from = self.search(from, Some(to));
        if came_from.contains_key(&to) {
            Ok(unwind(&came_from, from, to))
        } else {
            Err(unreachable)
        }
    }

    /// Every cell the lifted unit at `from` can reach, with the move that
    /// first reached it.
    ///
    /// Same graph as [`World::shortest_move_path`]. A cut unit reaches
    /// nothing.
    pub fn move_reach(&self, from: Pos) -> Result<MoveReach, WorldError> {
        if !self.has(from) {
            return Err(WorldError::Vacant { pos: from });
        }
        let came_from = if self.is_connected(Some(from)) {
            self.search(from, None)
        } else {
            HashMap::new()
        };
        Ok(MoveReach { from, came_from })
    }

    fn search(&self, from: Pos, stop: Option<Pos>) -> HashMap<Pos, Move> {
        let occupied = |p: Pos| p != from && self.has(p);
        let mut came_from: HashMap<Pos, Move> = HashMap::new();
        let mut queue = VecDeque::from([from]);

        while let Some(p) = queue.pop_front() {
            for d in Direction::ALL {
                let mv = Move::new(p, d);
                let next = mv.target();
                if next == from || came_from.contains_key(&next) {
                    continue;
                }
                if !mv.is_locally_valid(&occupied) {
                    continue;
                }
                came_from.insert(next, mv);
                if Some(next) == stop {
                    return came_from;
                }
                queue.push_back(next);
            }
        }
        came_from
    }
}

/// Breadth-first tree of the cells one unit can reach, see
/// [`World::move_reach`].
#[derive(Clone, Debug)]
pub struct MoveReach {
    from: Pos,
    came_from: HashMap<Pos, Move>,
}

impl MoveReach {
    /// Reachable cells, the start excluded, in no particular order.
    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.came_from.keys().copied()
    }

    /// Shortest move sequence to `to`, if reachable.
    pub fn path_to(&self, to: Pos) -> Option<Vec<Move>> {
        if to == self.from {
            return Some(Vec::new());
        }
        self.came_from
            .contains_key(&to)
            .then(|| unwind(&self.came_from, self.from, to))
    }
}

fn unwind(came_from: &HashMap<Pos, Move>, from: Pos, to: Pos) -> Vec<Move> {
    let mut path = Vec::new();
    let mut cur = to;
    while cur != from {
        let mv = came_from[&cur];
        path.push(mv);
        cur = mv.source;
    }
    path.reverse();
    path
}
