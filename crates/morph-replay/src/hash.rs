//! Hashing of world state for trace verification.
//!
//! Uses FNV-1a over the occupied cells. Not cryptographically secure; it is
//! an equality check between a recorded and a replayed run.

use morph_world::World;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

#[inline]
fn fnv1a_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

/// Hash of the set of occupied cells.
///
/// Positions are sorted first, so the result depends only on which cells
/// are occupied: not on unit identities, colors, labels or insertion
/// order. The unit count is folded in ahead of the cells.
pub fn world_hash(world: &World) -> u64 {
    let mut cells: Vec<_> = world.positions().collect();
    cells.sort_unstable();

    let mut hash = fnv1a_bytes(FNV_OFFSET, &(cells.len() as u64).to_le_bytes());
    for p in cells {
        hash = fnv1a_bytes(hash, &p.x.to_le_bytes());
        hash = fnv1a_bytes(hash, &p.y.to_le_bytes());
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_core::{Color, Direction, Pos};
    use morph_test_utils::{line, world_from};
    use morph_world::Move;

    #[test]
    fn empty_world_hashes_the_zero_count() {
        let expected = fnv1a_bytes(FNV_OFFSET, &0u64.to_le_bytes());
        assert_eq!(world_hash(&World::new()), expected);
    }

    #[test]
    fn insertion_order_and_color_do_not_matter() {
        let a = world_from(&[(0, 0), (1, 0), (2, 0)]);
        let mut b = World::new();
        for (x, c) in [(2, [1, 2, 3]), (0, [9, 9, 9]), (1, [0, 0, 0])] {
            b.add(Pos::new(x, 0), Color(c)).unwrap();
        }
        assert_eq!(world_hash(&a), world_hash(&b));
    }

    #[test]
    fn a_move_changes_the_hash() {
        let mut w = line(3);
        let before = world_hash(&w);
        Move::new(Pos::new(2, 0), Direction::NW).execute(&mut w).unwrap();
        assert_ne!(before, world_hash(&w));
    }

    #[test]
    fn mirrored_shapes_differ() {
        let a = world_from(&[(0, 0), (1, 0), (0, 1)]);
        let b = world_from(&[(0, 0), (1, 0), (1, 1)]);
        assert_ne!(world_hash(&a), world_hash(&b));
    }
}
