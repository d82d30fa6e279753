//! Compass keys and the twelve move directions.
//!
//! [`Compass`] names the eight cells around a position. [`Direction`]
//! names the twelve ways a unit can move: four straight slides and eight
//! two-letter pivots. For a pivot `ab`, cell `a` must be empty (it is the
//! intermediate waypoint) and cell `b` must hold the unit pivoted around.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

// ── Compass ─────────────────────────────────────────────────────

/// One of the eight cells surrounding a position, clockwise from north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Compass {
    /// North, `(0, +1)`.
    N,
    /// North-east, `(+1, +1)`.
    NE,
    /// East, `(+1, 0)`.
    E,
    /// South-east, `(+1, -1)`.
    SE,
    /// South, `(0, -1)`.
    S,
    /// South-west, `(-1, -1)`.
    SW,
    /// West, `(-1, 0)`.
    W,
    /// North-west, `(-1, +1)`.
    NW,
}

impl Compass {
    /// All eight keys in clockwise order starting at north.
    pub const ALL: [Compass; 8] = [
        Compass::N,
        Compass::NE,
        Compass::E,
        Compass::SE,
        Compass::S,
        Compass::SW,
        Compass::W,
        Compass::NW,
    ];

    /// The four edge-adjacent keys, clockwise from north.
    pub const CARDINAL: [Compass; 4] = [Compass::N, Compass::E, Compass::S, Compass::W];

    /// Index into [`Compass::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Unit offset `(dx, dy)`.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::N => (0, 1),
            Self::NE => (1, 1),
            Self::E => (1, 0),
            Self::SE => (1, -1),
            Self::S => (0, -1),
            Self::SW => (-1, -1),
            Self::W => (-1, 0),
            Self::NW => (-1, 1),
        }
    }

    /// Whether this key is one of N, E, S, W.
    pub const fn is_cardinal(self) -> bool {
        matches!(self, Self::N | Self::E | Self::S | Self::W)
    }

    fn rotate(self, eighths: usize) -> Self {
        Self::ALL[(self.index() + eighths) % 8]
    }

    /// Quarter turn clockwise.
    pub fn right(self) -> Self {
        self.rotate(2)
    }

    /// Quarter turn counter-clockwise.
    pub fn left(self) -> Self {
        self.rotate(6)
    }

    /// Half turn.
    pub fn back(self) -> Self {
        self.rotate(4)
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }
}

impl fmt::Display for Compass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Direction ───────────────────────────────────────────────────

/// Direction of a single-unit move.
///
/// Straight slides carry one letter; pivots carry two. The target of a
/// move is the source plus the vector sum of its letters, so `NE` and
/// `EN` reach the same cell along different paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Slide north.
    N,
    /// Slide east.
    E,
    /// Slide south.
    S,
    /// Slide west.
    W,
    /// Pivot through north around the east neighbour.
    NE,
    /// Pivot through east around the north neighbour.
    EN,
    /// Pivot through east around the south neighbour.
    ES,
    /// Pivot through south around the east neighbour.
    SE,
    /// Pivot through south around the west neighbour.
    SW,
    /// Pivot through west around the south neighbour.
    WS,
    /// Pivot through west around the north neighbour.
    WN,
    /// Pivot through north around the west neighbour.
    NW,
}

impl Direction {
    /// All twelve directions: slides first, then pivots clockwise.
    pub const ALL: [Direction; 12] = [
        Direction::N,
        Direction::E,
        Direction::S,
        Direction::W,
        Direction::NE,
        Direction::EN,
        Direction::ES,
        Direction::SE,
        Direction::SW,
        Direction::WS,
        Direction::WN,
        Direction::NW,
    ];

    /// First letter: the slide direction, or the pivot's waypoint side.
    pub const fn first(self) -> Compass {
        match self {
            Self::N | Self::NE | Self::NW => Compass::N,
            Self::E | Self::EN | Self::ES => Compass::E,
            Self::S | Self::SE | Self::SW => Compass::S,
            Self::W | Self::WS | Self::WN => Compass::W,
        }
    }

    /// Second letter: the pivot neighbour, `None` for slides.
    pub const fn second(self) -> Option<Compass> {
        match self {
            Self::N | Self::E | Self::S | Self::W => None,
            Self::EN | Self::WN => Some(Compass::N),
            Self::NE | Self::SE => Some(Compass::E),
            Self::ES | Self::WS => Some(Compass::S),
            Self::SW | Self::NW => Some(Compass::W),
        }
    }

    /// Whether this is a two-letter pivot.
    pub const fn is_pivot(self) -> bool {
        self.second().is_some()
    }

    /// Total displacement `(dx, dy)`.
    pub const fn delta(self) -> (i32, i32) {
        let (ax, ay) = self.first().delta();
        match self.second() {
            Some(b) => {
                let (bx, by) = b.delta();
                (ax + bx, ay + by)
            }
            None => (ax, ay),
        }
    }

    /// Stable one-byte tag used by the trace codec.
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Direction::tag`].
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    /// Short letter form, e.g. `"SW"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::E => "E",
            Self::S => "S",
            Self::W => "W",
            Self::NE => "NE",
            Self::EN => "EN",
            Self::ES => "ES",
            Self::SE => "SE",
            Self::SW => "SW",
            Self::WS => "WS",
            Self::WN => "WN",
            Self::NW => "NW",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown direction name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseDirectionError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown move direction '{}'", self.input)
    }
}

impl Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseDirectionError {
                input: s.to_string(),
            })
    }
}
