//! Presence map of the eight cells around a position.

use morph_core::Compass;

/// Which of the eight surrounding cells are occupied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighbourhood {
    present: [bool; 8],
}

impl Neighbourhood {
    /// Whether the cell in direction `c` is occupied.
    pub fn get(&self, c: Compass) -> bool {
        self.present[c.index()]
    }

    pub(crate) fn set(&mut self, c: Compass, occupied: bool) {
        self.present[c.index()] = occupied;
    }

    /// Number of occupied surrounding cells.
    pub fn count(&self) -> usize {
        self.present.iter().filter(|&&b| b).count()
    }

    /// Occupied keys, clockwise from north.
    pub fn occupied(&self) -> impl Iterator<Item = Compass> + '_ {
        Compass::ALL.into_iter().filter(|c| self.get(*c))
    }
}
