//! Data types for trace recording and playback.

use std::fmt;

use morph_core::{Color, Pos};
use morph_world::{Move, World};

/// One unit of the starting configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitRecord {
    /// Starting cell.
    pub pos: Pos,
    /// Cosmetic color.
    pub color: Color,
}

/// The configuration a trace starts from.
///
/// # Examples
///
/// ```
/// use morph_core::{Color, Pos};
/// use morph_replay::{TraceHeader, UnitRecord};
///
/// let header = TraceHeader {
///     units: vec![UnitRecord { pos: Pos::new(0, 0), color: Color::DEFAULT }],
/// };
/// let world = header.to_world().unwrap();
/// assert_eq!(world.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TraceHeader {
    /// Units in insertion order.
    pub units: Vec<UnitRecord>,
}

impl TraceHeader {
    /// Capture the units of `world`.
    pub fn capture(world: &World) -> Self {
        Self {
            units: world
                .units()
                .map(|u| UnitRecord {
                    pos: u.pos(),
                    color: u.color(),
                })
                .collect(),
        }
    }

    /// Rebuild the starting world.
    ///
    /// Fails with [`ReplayError::DuplicatePosition`](crate::ReplayError::DuplicatePosition)
    /// if two records share a cell.
    pub fn to_world(&self) -> Result<World, crate::ReplayError> {
        let mut world = World::new();
        for u in &self.units {
            world.add(u.pos, u.color)?;
        }
        Ok(world)
    }
}

/// One committed move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Position of the move in the run, from 0.
    pub index: u64,
    /// The move.
    pub mv: Move,
    /// [`world_hash`](crate::world_hash) after the move.
    pub world_hash: u64,
}

/// How a replayed move differed from the recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DivergenceKind {
    /// Frames are not numbered consecutively.
    IndexGap {
        /// Index the replay expected.
        expected: u64,
    },
    /// The recorded move is not legal in the replayed world.
    InvalidMove {
        /// The rejected move.
        mv: Move,
    },
    /// The world after the move hashes differently.
    HashMismatch {
        /// Hash stored in the frame.
        recorded: u64,
        /// Hash of the replayed world.
        replayed: u64,
    },
}

impl fmt::Display for DivergenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexGap { expected } => write!(f, "expected frame {expected}"),
            Self::InvalidMove { mv } => write!(f, "move {mv} is not legal"),
            Self::HashMismatch { recorded, replayed } => write!(
                f,
                "world hash {replayed:#018x} does not match recorded {recorded:#018x}"
            ),
        }
    }
}
