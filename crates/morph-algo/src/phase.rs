//! Named entry points for running a single phase or the whole procedure.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use crate::canonicalize::Canonicalize;
use crate::compact::{Compact, CompactSorted};
use crate::config::ReconfigConfig;
use crate::gather::Gather;
use crate::orchestrator::Orchestrator;
use crate::sequence::MoveSequence;

/// A runnable phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// [`Gather`] alone.
    Gather,
    /// [`Compact`] alone.
    Compact,
    /// [`CompactSorted`] alone.
    CompactSorted,
    /// [`Canonicalize`] alone.
    Canonicalize,
    /// The [`Orchestrator`]: gather, compact, one retry.
    #[default]
    Complete,
}

impl Phase {
    /// Every phase, in pipeline order.
    pub const ALL: [Phase; 5] = [
        Phase::Gather,
        Phase::Compact,
        Phase::CompactSorted,
        Phase::Canonicalize,
        Phase::Complete,
    ];

    /// Kebab-case name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gather => "gather",
            Self::Compact => "compact",
            Self::CompactSorted => "compact-sorted",
            Self::Canonicalize => "canonicalize",
            Self::Complete => "complete",
        }
    }

    /// A fresh move sequence for this phase.
    pub fn sequence(self, config: &ReconfigConfig) -> Box<dyn MoveSequence> {
        match self {
            Self::Gather => Box::new(Gather::new(config.gather.clone())),
            Self::Compact => Box::new(Compact::new(config.compact.clone())),
            Self::CompactSorted => Box::new(CompactSorted::new(config.compact.clone())),
            Self::Canonicalize => Box::new(Canonicalize::new()),
            Self::Complete => Box::new(Orchestrator::new(config.clone())),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown phase name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsePhaseError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for ParsePhaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown phase {:?}", self.input)
    }
}

impl Error for ParsePhaseError {}

impl FromStr for Phase {
    type Err = ParsePhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| ParsePhaseError {
                input: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for phase in Phase::ALL {
            assert_eq!(phase.to_string().parse::<Phase>(), Ok(phase));
        }
        assert_eq!("Compact-Sorted".parse::<Phase>(), Ok(Phase::CompactSorted));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "shuffle".parse::<Phase>().unwrap_err();
        assert_eq!(err.input, "shuffle");
    }

    #[test]
    fn sequences_report_their_phase() {
        let config = ReconfigConfig::default();
        for phase in [
            Phase::Gather,
            Phase::Compact,
            Phase::CompactSorted,
            Phase::Canonicalize,
        ] {
            assert_eq!(phase.sequence(&config).name(), phase.as_str());
        }
        assert_eq!(Phase::Complete.sequence(&config).name(), "gather");
    }
}
