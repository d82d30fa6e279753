//! Re-execution of a recorded trace.

use std::io::Read;

use morph_world::World;

use crate::error::ReplayError;
use crate::hash::world_hash;
use crate::reader::TraceReader;
use crate::types::DivergenceKind;

/// Outcome of a trace that replayed without divergence.
#[derive(Clone, Debug)]
pub struct VerifySummary {
    /// Frames replayed.
    pub frames: u64,
    /// The world after the last frame.
    pub world: World,
}

/// Rebuild the starting world and replay every frame on it.
///
/// Each frame must carry the next index, name a move that
/// [`Move::is_valid`](morph_world::Move::is_valid) accepts, and leave a world
/// whose [`world_hash`] matches the recording. The first frame that
/// fails any of these is reported as [`ReplayError::Divergence`].
pub fn replay_and_verify<R: Read>(
    mut reader: TraceReader<R>,
) -> Result<VerifySummary, ReplayError> {
    let mut world = reader.initial_world()?;
    let mut expected = 0u64;

    while let Some(frame) = reader.next_frame()? {
        let diverged = |kind| ReplayError::Divergence {
            index: frame.index,
            kind,
        };
        if frame.index != expected {
            return Err(diverged(DivergenceKind::IndexGap { expected }));
        }
        if !frame.mv.is_valid(&world) {
            return Err(diverged(DivergenceKind::InvalidMove { mv: frame.mv }));
        }
        frame.mv.execute(&mut world)?;
        let replayed = world_hash(&world);
        if replayed != frame.world_hash {
            return Err(diverged(DivergenceKind::HashMismatch {
                recorded: frame.world_hash,
                replayed,
            }));
        }
        expected += 1;
    }

    Ok(VerifySummary {
        frames: expected,
        world,
    })
}
