//! Errors surfaced by the stepper.

use std::error::Error;
use std::fmt;

use morph_core::{PhaseError, WorldError};
use morph_world::Move;

/// Failure while driving a [`MoveSequence`](crate::MoveSequence).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// A sequence produced a move that fails full validation.
    InvalidMove {
        /// Name of the offending sequence.
        phase: &'static str,
        /// The rejected move.
        mv: Move,
    },
    /// The configured move budget ran out before the sequence finished.
    MoveLimit {
        /// The configured budget.
        limit: usize,
    },
    /// The sequence itself failed.
    Phase(PhaseError),
    /// Committing a validated move failed.
    World(WorldError),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMove { phase, mv } => {
                write!(f, "{phase} produced invalid move {mv}")
            }
            Self::MoveLimit { limit } => write!(f, "move limit of {limit} reached"),
            Self::Phase(e) => write!(f, "phase: {e}"),
            Self::World(e) => write!(f, "world: {e}"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Phase(e) => Some(e),
            Self::World(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PhaseError> for StepError {
    fn from(e: PhaseError) -> Self {
        Self::Phase(e)
    }
}

impl From<WorldError> for StepError {
    fn from(e: WorldError) -> Self {
        Self::World(e)
    }
}
