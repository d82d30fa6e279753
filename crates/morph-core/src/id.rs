//! Strongly-typed identifiers and the cosmetic [`Color`].

use std::fmt;

/// Stable identity of a unit.
///
/// Assigned sequentially by the world when a unit is added and never
/// reused while that world lives. Classification side-tables key on this
/// rather than on positions, which change as units move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for UnitId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies one chunk found by a single classifier run.
///
/// Chunk ids are only meaningful within the classification that produced
/// them; a fresh run renumbers from zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub u32);

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ChunkId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// RGB color of a unit. Carried through persistence, ignored by algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 3]);

impl Color {
    /// Neutral grey used when no color is given.
    pub const DEFAULT: Color = Color([0x80, 0x80, 0x80]);
}

impl Default for Color {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl From<[u8; 3]> for Color {
    fn from(v: [u8; 3]) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_display_is_hex() {
        assert_eq!(Color([255, 0, 16]).to_string(), "#ff0010");
        assert_eq!(Color::default(), Color::DEFAULT);
    }

    #[test]
    fn ids_display() {
        assert_eq!(UnitId(7).to_string(), "#7");
        assert_eq!(ChunkId::from(3).to_string(), "3");
    }
}
