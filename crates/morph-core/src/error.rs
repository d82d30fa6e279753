//! Error types for the Morph engine.
//!
//! Organized by layer: [`WorldError`] for the world model and planner,
//! [`PhaseError`] for the reconfiguration phases and their orchestration.

use std::error::Error;
use std::fmt;

use crate::pos::Pos;

/// Errors from world mutation and motion planning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldError {
    /// A unit already occupies the position.
    Occupied {
        /// The contested position.
        pos: Pos,
    },
    /// No unit occupies the position.
    Vacant {
        /// The empty position.
        pos: Pos,
    },
    /// The planner found no sequence of legal moves between two cells.
    Unreachable {
        /// Cell of the unit to relocate.
        from: Pos,
        /// Requested destination.
        to: Pos,
    },
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Occupied { pos } => write!(f, "position {pos} is already occupied"),
            Self::Vacant { pos } => write!(f, "no unit at position {pos}"),
            Self::Unreachable { from, to } => {
                write!(f, "no legal move path from {from} to {to}")
            }
        }
    }
}

impl Error for WorldError {}

/// Errors from phase algorithms and the orchestrator.
///
/// Structural exhaustion is not always an error: Gather and Canonicalize
/// report it by finishing normally. Only Compact turns it into
/// [`PhaseError::Stuck`], and only the orchestrator produces
/// [`PhaseError::RetryExhausted`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhaseError {
    /// No candidate move exists while the target shape is not reached.
    Stuck {
        /// Name of the phase that ran out of moves.
        phase: &'static str,
        /// Units in the configuration when it got stuck.
        units: usize,
    },
    /// A light unit has no usable empty neighbour to fill.
    NoTargetCell {
        /// Position of the light unit.
        light: Pos,
    },
    /// An operation was invoked outside its contract.
    Precondition {
        /// Which contract was broken.
        reason: String,
    },
    /// The configuration is still not xy-monotone after the retry.
    RetryExhausted {
        /// Attempts made, including the first.
        attempts: u32,
    },
    /// A world operation failed underneath a phase.
    World(WorldError),
}

impl fmt::Display for PhaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stuck { phase, units } => {
                write!(f, "{phase} is stuck with {units} units and no candidate move")
            }
            Self::NoTargetCell { light } => {
                write!(f, "light unit at {light} has no target cell")
            }
            Self::Precondition { reason } => write!(f, "precondition violated: {reason}"),
            Self::RetryExhausted { attempts } => {
                write!(f, "configuration not xy-monotone after {attempts} attempts")
            }
            Self::World(e) => write!(f, "world: {e}"),
        }
    }
}

impl Error for PhaseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::World(e) => Some(e),
            _ => None,
        }
    }
}

impl From<WorldError> for PhaseError {
    fn from(e: WorldError) -> Self {
        Self::World(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_error_in_phase_error_has_source() {
        let e = PhaseError::from(WorldError::Vacant {
            pos: Pos::new(1, 2),
        });
        assert!(e.source().is_some());
        assert_eq!(e.to_string(), "world: no unit at position (1, 2)");
    }

    #[test]
    fn stuck_message_names_phase() {
        let e = PhaseError::Stuck {
            phase: "compact",
            units: 9,
        };
        assert!(e.to_string().starts_with("compact is stuck"));
        assert!(e.source().is_none());
    }
}
