//! Move-by-move driver for [`MoveSequence`]s.
//!
//! [`Stepper`] owns the [`World`]. Each [`step()`](Stepper::step) pulls one
//! move, re-validates it against the full legality rules, commits it and
//! updates [`RunMetrics`]. A sequence that emits an illegal move is a bug
//! in that sequence, reported as [`StepError::InvalidMove`] with the world
//! untouched.

use std::time::Instant;

use morph_world::{Move, World};

use crate::config::ReconfigConfig;
use crate::error::StepError;
use crate::metrics::RunMetrics;
use crate::sequence::MoveSequence;

/// Owns a world and commits the moves sequences produce.
#[derive(Debug)]
pub struct Stepper {
    world: World,
    metrics: RunMetrics,
    max_moves: Option<usize>,
}

impl Stepper {
    /// Wrap `world` with no move limit.
    pub fn new(world: World) -> Self {
        Self {
            world,
            metrics: RunMetrics::default(),
            max_moves: None,
        }
    }

    /// Wrap `world` with the move budget from `config.max_moves`.
    pub fn configured(world: World, config: &ReconfigConfig) -> Self {
        Self::new(world).with_move_limit(config.max_moves)
    }

    /// Cap the number of moves committed over this stepper's lifetime.
    pub fn with_move_limit(mut self, limit: Option<usize>) -> Self {
        self.max_moves = limit;
        self
    }

    /// The current world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Give the world back.
    pub fn into_world(self) -> World {
        self.world
    }

    /// Counters accumulated so far.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Pull and commit one move. `Ok(None)` when `seq` is exhausted.
    ///
    /// # Errors
    ///
    /// [`StepError::MoveLimit`] if the budget is spent and `seq` still has
    /// a move to give, [`StepError::InvalidMove`] if the move fails
    /// validation, or the sequence's own error.
    pub fn step(&mut self, seq: &mut dyn MoveSequence) -> Result<Option<Move>, StepError> {
        let started = Instant::now();
        let pulled = seq.next_move(&mut self.world);
        self.metrics.pulls += 1;
        let result = self.commit(seq.name(), pulled?);
        self.metrics.total_us += started.elapsed().as_micros() as u64;
        result
    }

    fn commit(&mut self, phase: &'static str, mv: Option<Move>) -> Result<Option<Move>, StepError> {
        let Some(mv) = mv else {
            return Ok(None);
        };
        if let Some(limit) = self.max_moves {
            if self.metrics.moves as usize >= limit {
                return Err(StepError::MoveLimit { limit });
            }
        }
        if !mv.is_valid(&self.world) {
            return Err(StepError::InvalidMove { phase, mv });
        }
        mv.execute(&mut self.world)?;
        self.metrics.record_move(phase);
        tracing::trace!(phase, source = %mv.source, target = %mv.target(), "move");
        Ok(Some(mv))
    }

    /// Drive `seq` to exhaustion. Returns the number of moves committed.
    pub fn run(&mut self, seq: &mut dyn MoveSequence) -> Result<usize, StepError> {
        self.run_with(seq, |_, _| {})
    }

    /// [`run()`](Stepper::run), calling `observe` after every committed
    /// move with the move and the world it produced.
    pub fn run_with(
        &mut self,
        seq: &mut dyn MoveSequence,
        mut observe: impl FnMut(&Move, &World),
    ) -> Result<usize, StepError> {
        tracing::debug!(phase = seq.name(), units = self.world.len(), "run started");
        let mut committed = 0;
        while let Some(mv) = self.step(seq)? {
            observe(&mv, &self.world);
            committed += 1;
        }
        tracing::debug!(phase = seq.name(), moves = committed, "run finished");
        Ok(committed)
    }
}
