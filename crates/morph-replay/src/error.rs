//! Error types for configuration files and move traces.

use std::error::Error;
use std::fmt;
use std::io;

use morph_core::{Pos, WorldError};

use crate::types::DivergenceKind;

/// Errors from reading, writing or verifying persisted data.
#[derive(Debug)]
pub enum ReplayError {
    /// An I/O error from the underlying reader or writer.
    Io(io::Error),
    /// The JSON document could not be parsed or produced.
    Json(serde_json::Error),
    /// The trace does not start with the expected magic bytes.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found.
        found: u32,
    },
    /// A frame or header could not be decoded.
    MalformedFrame {
        /// What went wrong.
        detail: String,
    },
    /// A frame names a direction tag outside the known set.
    UnknownDirection {
        /// The rejected tag.
        tag: u8,
    },
    /// A configuration was applied to a world that already holds units.
    WorldNotEmpty {
        /// Units already present.
        units: usize,
    },
    /// Two units claim the same cell.
    DuplicatePosition {
        /// The contested cell.
        pos: Pos,
    },
    /// Re-executing a trace did not reproduce the recorded run.
    Divergence {
        /// Index of the first frame that diverged.
        index: u64,
        /// How it diverged.
        kind: DivergenceKind,
    },
    /// A world operation failed while rebuilding or replaying.
    World(WorldError),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected MRPH)"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::MalformedFrame { detail } => write!(f, "malformed frame: {detail}"),
            Self::UnknownDirection { tag } => write!(f, "unknown direction tag {tag}"),
            Self::WorldNotEmpty { units } => {
                write!(f, "cannot load into a world that holds {units} units")
            }
            Self::DuplicatePosition { pos } => {
                write!(f, "more than one unit at position {pos}")
            }
            Self::Divergence { index, kind } => {
                write!(f, "replay diverged at frame {index}: {kind}")
            }
            Self::World(e) => write!(f, "world: {e}"),
        }
    }
}

impl Error for ReplayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::World(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ReplayError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ReplayError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<WorldError> for ReplayError {
    fn from(e: WorldError) -> Self {
        match e {
            WorldError::Occupied { pos } => Self::DuplicatePosition { pos },
            other => Self::World(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_keeps_its_source() {
        let e = ReplayError::from(io::Error::new(io::ErrorKind::UnexpectedEof, "short"));
        assert!(e.source().is_some());
        assert!(e.to_string().starts_with("I/O error"));
    }

    #[test]
    fn occupied_cell_reads_as_duplicate() {
        let e = ReplayError::from(WorldError::Occupied {
            pos: Pos::new(2, 3),
        });
        assert!(matches!(e, ReplayError::DuplicatePosition { pos } if pos == Pos::new(2, 3)));
        assert_eq!(e.to_string(), "more than one unit at position (2, 3)");
    }

    #[test]
    fn divergence_names_the_frame() {
        let e = ReplayError::Divergence {
            index: 7,
            kind: DivergenceKind::HashMismatch {
                recorded: 0xff,
                replayed: 0x1,
            },
        };
        assert!(e.to_string().starts_with("replay diverged at frame 7"));
    }
}
