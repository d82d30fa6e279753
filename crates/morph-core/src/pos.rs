//! Integer grid positions.

use std::fmt;

use crate::direction::Compass;

/// A cell on the infinite integer grid.
///
/// `x` grows eastwards and `y` grows northwards. Derived ordering is
/// lexicographic on `(x, y)`; algorithms that need a different scan order
/// sort explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Pos {
    /// Construct a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The neighbouring cell in compass direction `c`.
    pub fn step(self, c: Compass) -> Self {
        let (dx, dy) = c.delta();
        self.offset(dx, dy)
    }

    /// The four edge-adjacent cells in N, E, S, W order.
    pub fn neighbours4(self) -> [Pos; 4] {
        [
            self.offset(0, 1),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(-1, 0),
        ]
    }

    /// Whether `other` shares an edge with `self`.
    pub fn is_adjacent4(self, other: Pos) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }

    /// Greedy ordering key used by canonicalization: `x + y`.
    pub const fn potential(self) -> i32 {
        self.x + self.y
    }

    /// Scan key used by compaction: `max(x, y)`.
    pub fn max_coord(self) -> i32 {
        self.x.max(self.y)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Pos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}
