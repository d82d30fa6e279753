//! The xy-monotone shape predicate.

use morph_core::Pos;

use crate::world::World;

impl World {
    /// Whether every unit is supported from the west and from the south.
    ///
    /// A unit is supported from the west if it sits in the bounding box's
    /// leftmost column or its west neighbour is occupied, and likewise
    /// from the south with the bottom row. Compaction drives towards this
    /// shape. An empty world is trivially monotone.
    pub fn is_xy_monotone(&self) -> bool {
        let Some(b) = self.bounds() else {
            return true;
        };
        self.positions().all(|p| {
            (p.x == b.min_x || self.has(Pos::new(p.x - 1, p.y)))
                && (p.y == b.min_y || self.has(Pos::new(p.x, p.y - 1)))
        })
    }
}
