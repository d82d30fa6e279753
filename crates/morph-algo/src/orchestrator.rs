//! The complete procedure: gather, compact, and one retry.
//!
//! An attempt runs [`Gather`] to exhaustion and then compaction. If the
//! configuration is xy-monotone afterwards the run is over. Otherwise one
//! more attempt is made; a second failure is reported as
//! [`PhaseError::RetryExhausted`]. A compaction that gets stuck ends its
//! attempt instead of failing the run.

use morph_core::PhaseError;
use morph_world::{Move, World};

use crate::compact::{Compact, CompactSorted};
use crate::config::ReconfigConfig;
use crate::gather::Gather;
use crate::sequence::MoveSequence;

/// Attempts made before giving up, the first one included.
pub const MAX_ATTEMPTS: u32 = 2;

enum Stage {
    Gather(Gather),
    Compact(Box<dyn MoveSequence>),
    Finished,
}

/// Sequences the phases of a complete reconfiguration.
pub struct Orchestrator {
    config: ReconfigConfig,
    stage: Stage,
    attempt: u32,
}

impl Orchestrator {
    /// Start the first attempt.
    pub fn new(config: ReconfigConfig) -> Self {
        let gather = Gather::new(config.gather.clone());
        Self {
            config,
            stage: Stage::Gather(gather),
            attempt: 1,
        }
    }

    /// The attempt in progress, starting at 1.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Whether the run has completed successfully.
    pub fn is_finished(&self) -> bool {
        matches!(self.stage, Stage::Finished)
    }

    fn compaction(&self) -> Box<dyn MoveSequence> {
        if self.config.sorted_compaction {
            Box::new(CompactSorted::new(self.config.compact.clone()))
        } else {
            Box::new(Compact::new(self.config.compact.clone()))
        }
    }

    fn finish_attempt(&mut self, world: &World) -> Result<(), PhaseError> {
        if world.is_xy_monotone() {
            tracing::debug!(attempt = self.attempt, "configuration is xy-monotone");
            self.stage = Stage::Finished;
            return Ok(());
        }
        if self.attempt >= MAX_ATTEMPTS {
            self.stage = Stage::Finished;
            return Err(PhaseError::RetryExhausted {
                attempts: self.attempt,
            });
        }
        self.attempt += 1;
        tracing::warn!(attempt = self.attempt, "not xy-monotone, retrying");
        self.stage = Stage::Gather(Gather::new(self.config.gather.clone()));
        Ok(())
    }
}

impl MoveSequence for Orchestrator {
    fn name(&self) -> &'static str {
        match &self.stage {
            Stage::Gather(g) => g.name(),
            Stage::Compact(c) => c.name(),
            Stage::Finished => "complete",
        }
    }

    fn next_move(&mut self, world: &mut World) -> Result<Option<Move>, PhaseError> {
        loop {
            let gathering = matches!(self.stage, Stage::Gather(_));
            let pulled = match &mut self.stage {
                Stage::Finished => return Ok(None),
                Stage::Gather(g) => g.next_move(world),
                Stage::Compact(c) => c.next_move(world),
            };
            match pulled {
                Ok(Some(mv)) => return Ok(Some(mv)),
                Ok(None) if gathering => {
                    tracing::debug!(attempt = self.attempt, "gather done, compacting");
                    self.stage = Stage::Compact(self.compaction());
                }
                Ok(None) => self.finish_attempt(world)?,
                Err(PhaseError::Stuck { phase, units }) => {
                    tracing::warn!(phase, units, attempt = self.attempt, "attempt stuck");
                    self.finish_attempt(world)?;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
