//! Structural labels assigned by the contour classifier.

use std::fmt;

/// Role of a unit in the chunk/link decomposition of a configuration.
///
/// Labels are recomputed wholesale by each classifier run and go stale
/// as soon as any unit moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Not resolved by the contour walk (interior units, or never classified).
    #[default]
    None,
    /// Joins two structures: a unit in two chunks, in a chunk and a link,
    /// or a contour revisit that closed into neither.
    Connector,
    /// Chunk member whose removal keeps the configuration connected.
    ChunkStable,
    /// Chunk member that is an articulation point.
    ChunkCut,
    /// Link member whose removal keeps the configuration connected.
    LinkStable,
    /// Link member that is an articulation point.
    LinkCut,
}

impl Classification {
    /// `LinkStable` or `LinkCut`.
    pub const fn is_link(self) -> bool {
        matches!(self, Self::LinkStable | Self::LinkCut)
    }

    /// `ChunkStable` or `ChunkCut`.
    pub const fn is_chunk(self) -> bool {
        matches!(self, Self::ChunkStable | Self::ChunkCut)
    }

    /// Single-character glyph used by the labelled ASCII rendering.
    pub const fn glyph(self) -> char {
        match self {
            Self::None => '#',
            Self::Connector => 'X',
            Self::ChunkStable => 'o',
            Self::ChunkCut => 'O',
            Self::LinkStable => 'l',
            Self::LinkCut => 'L',
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Connector => "connector",
            Self::ChunkStable => "chunk-stable",
            Self::ChunkCut => "chunk-cut",
            Self::LinkStable => "link-stable",
            Self::LinkCut => "link-cut",
        };
        f.write_str(s)
    }
}
