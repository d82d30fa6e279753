//! Speculative chunkiness check.
//!
//! [`Speculation`] is a scoped transaction over a [`World`]: moves applied
//! through it are undone in reverse order, and every unit's label is
//! restored, when the guard drops. [`preserves_chunkiness`] applies a move
//! under a speculation, reclassifies, inspects the result and lets the
//! guard roll everything back on every exit path.

use smallvec::SmallVec;

use morph_core::{Classification, Direction, PhaseError, Pos, WorldError};

use crate::classify::classify;
use crate::moves::Move;
use crate::world::{LabelSnapshot, World};

/// Guard that reverts speculative moves and labels on drop.
pub struct Speculation<'w> {
    world: &'w mut World,
    applied: SmallVec<[(Pos, Pos); 2]>,
    labels: LabelSnapshot,
}

impl<'w> Speculation<'w> {
    /// Snapshot labels and start recording moves.
    pub fn begin(world: &'w mut World) -> Self {
        let labels = world.snapshot_labels();
        Self {
            world,
            applied: SmallVec::new(),
            labels,
        }
    }

    /// Execute `mv` without validation, recording it for rollback.
    pub fn apply(&mut self, mv: Move) -> Result<(), WorldError> {
        let (src, dst) = (mv.source, mv.target());
        self.world.move_unit(src, dst)?;
        self.applied.push((src, dst));
        Ok(())
    }

    /// The world in its speculative state.
    pub fn world(&self) -> &World {
        self.world
    }

    /// Mutable access for reclassification. Moves made through this
    /// reference bypass the rollback log.
    pub fn world_mut(&mut self) -> &mut World {
        self.world
    }
}

impl Drop for Speculation<'_> {
    fn drop(&mut self) {
        for &(src, dst) in self.applied.iter().rev() {
            // Cannot fail: dst holds the unit we put there and src is the
            // cell it left.
            let _ = self.world.move_unit(dst, src);
        }
        self.world.restore_labels(&self.labels);
    }
}

/// Whether moving the unit at `source` to `target` keeps its old
/// neighbourhood inside one chunk.
///
/// Rejects when, after reclassification, any former neighbour of `source`
/// is a link, two former neighbours carry different chunk ids, or the
/// moved unit is a link. The world is left exactly as it was.
///
/// The unit at `source` must be [`Classification::ChunkStable`] according
/// to the current labels.
pub fn preserves_chunkiness(
    world: &mut World,
    source: Pos,
    target: Pos,
) -> Result<bool, PhaseError> {
    let (dx, dy) = (target.x - source.x, target.y - source.y);
    let direction = Direction::ALL
        .into_iter()
        .find(|d| d.delta() == (dx, dy))
        .ok_or_else(|| PhaseError::Precondition {
            reason: format!("{source} -> {target} is not a single move"),
        })?;
    preserves_chunkiness_all(world, &[Move::new(source, direction)])
}

/// [`preserves_chunkiness`] for a combination of moves applied in order.
///
/// The first move's source must be `ChunkStable`. Former neighbours of
/// every source are inspected, along with every moved unit.
pub fn preserves_chunkiness_all(world: &mut World, moves: &[Move]) -> Result<bool, PhaseError> {
    let Some(first) = moves.first() else {
        return Ok(true);
    };
    let class = world.classification(first.source);
    if class != Classification::ChunkStable {
        return Err(PhaseError::Precondition {
            reason: format!("chunkiness check on {} classified {class}", first.source),
        });
    }

    let mut spec = Speculation::begin(world);
    for &mv in moves {
        spec.apply(mv)?;
    }
    classify(spec.world_mut());
    let w = spec.world();

    let moved: SmallVec<[Pos; 2]> = moves.iter().map(Move::target).collect();
    let mut chunk = None;
    for mv in moves {
        for nb in mv.source.neighbours4() {
            let Some(unit) = w.get(nb) else { continue };
            if moved.contains(&nb) {
                continue;
            }
            if unit.classification().is_link() {
                return Ok(false);
            }
            if let Some(c) = unit.chunk() {
                match chunk {
                    None => chunk = Some(c),
                    Some(prev) if prev != c => return Ok(false),
                    Some(_) => {}
                }
            }
        }
    }
    if moved.iter().any(|&p| w.classification(p).is_link()) {
        return Ok(false);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::world;

    fn l_block() -> World {
        world(&[
            (0, 0),
            (1, 0),
            (2, 0),
            (0, 1),
            (1, 1),
            (2, 1),
            (1, 2),
            (2, 2),
        ])
    }

    #[test]
    fn rejects_non_chunk_stable_source() {
        let mut w = world(&[(0, 0), (1, 0), (2, 0)]);
        classify(&mut w);
        assert_eq!(w.classification(Pos::new(1, 0)), Classification::LinkCut);
        let err = preserves_chunkiness(&mut w, Pos::new(1, 0), Pos::new(1, 1)).unwrap_err();
        assert!(matches!(err, PhaseError::Precondition { .. }));
    }

    #[test]
    fn sliding_off_a_corner_exposes_a_link() {
        let mut w = l_block();
        classify(&mut w);
        let before = w.clone();
        let ok = preserves_chunkiness(&mut w, Pos::new(1, 2), Pos::new(0, 2)).unwrap();
        assert!(!ok);
        assert_eq!(w, before);
    }

    #[test]
    fn filling_a_notch_keeps_one_chunk() {
        // 4-4-3-3 staircase; the top-right corner pivots into the notch
        let mut cells = Vec::new();
        for (y, width) in [(0, 4), (1, 4), (2, 3), (3, 3)] {
            cells.extend((0..width).map(|x| (x, y)));
        }
        let mut w = world(&cells);
        classify(&mut w);
        assert_eq!(w.classification(Pos::new(2, 3)), Classification::ChunkStable);
        let before = w.clone();
        let ok = preserves_chunkiness(&mut w, Pos::new(2, 3), Pos::new(3, 2)).unwrap();
        assert!(ok);
        assert_eq!(w, before);
    }

    #[test]
    fn speculation_reverts_on_drop() {
        let mut w = world(&[(0, 0), (1, 0)]);
        classify(&mut w);
        let before = w.clone();
        {
            let mut spec = Speculation::begin(&mut w);
            spec.apply(Move::new(Pos::new(1, 0), Direction::NW)).unwrap();
            spec.apply(Move::new(Pos::new(0, 1), Direction::S)).unwrap_err();
            assert!(spec.world().has(Pos::new(0, 1)));
            classify(spec.world_mut());
        }
        assert_eq!(w, before);
    }

    #[test]
    fn non_adjacent_target_is_a_precondition_error() {
        let mut w = l_block();
        classify(&mut w);
        assert!(preserves_chunkiness(&mut w, Pos::new(2, 2), Pos::new(5, 5)).is_err());
    }
}
