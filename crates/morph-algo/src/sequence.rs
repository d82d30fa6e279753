//! The pull interface every phase implements.

use morph_core::PhaseError;
use morph_world::{Move, World};

/// A lazily evaluated stream of moves.
///
/// Each call inspects the world, decides the next move and returns it
/// without executing it. The consumer commits the move before pulling
/// again, so the sequence always sees the effect of its previous output.
///
/// Implementations may rewrite classification labels and may speculate,
/// but must leave unit positions as they found them.
pub trait MoveSequence {
    /// Short name used in logs, metrics and errors.
    fn name(&self) -> &'static str;

    /// The next move, or `Ok(None)` when the sequence is exhausted.
    fn next_move(&mut self, world: &mut World) -> Result<Option<Move>, PhaseError>;
}

impl<S: MoveSequence + ?Sized> MoveSequence for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn next_move(&mut self, world: &mut World) -> Result<Option<Move>, PhaseError> {
        (**self).next_move(world)
    }
}
