//! Run configuration, validation, and error types.
//!
//! [`ReconfigConfig`] bundles the tunables of every phase plus the
//! stepper's move budget. [`validate()`](ReconfigConfig::validate) checks
//! them once up front so phases can trust their inputs.

use std::error::Error;
use std::fmt;

// ── GatherConfig ───────────────────────────────────────────────────

/// Tunables for the [`Gather`](crate::Gather) phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatherConfig {
    /// A connector or link cut point is *light* when fewer than this many
    /// units hang off it on the side away from the root. Default: 64.
    pub light_capacity_limit: usize,
    /// Round budget per unit in the configuration. Gather stops after
    /// `max_rounds_per_unit * unit_count` rounds. Default: 4.
    pub max_rounds_per_unit: usize,
}

impl Default for GatherConfig {
    fn default() -> Self {
        Self {
            light_capacity_limit: 64,
            max_rounds_per_unit: 4,
        }
    }
}

// ── CompactConfig ──────────────────────────────────────────────────

/// Tunables shared by [`Compact`](crate::Compact) and
/// [`CompactSorted`](crate::CompactSorted).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompactConfig {
    /// Shortest row or column a chain move may shift. Default: 1.
    pub min_chain_len: usize,
    /// Score subtracted from a chain candidate whose last move ends above
    /// the row of its first source. Other kinds are never penalised.
    /// Default: 1_000_000.
    pub regress_penalty: i64,
    /// Whether a round with no other candidate may carry a unit along the
    /// move graph. With this off such a round fails as stuck.
    /// Default: true.
    pub carry: bool,
}

impl Default for CompactConfig {
    fn default() -> Self {
        Self {
            min_chain_len: 1,
            regress_penalty: 1_000_000,
            carry: true,
        }
    }
}

// ── ReconfigConfig ─────────────────────────────────────────────────

/// Configuration for a complete reconfiguration run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconfigConfig {
    /// Gather phase tunables.
    pub gather: GatherConfig,
    /// Compaction tunables.
    pub compact: CompactConfig,
    /// Whether the orchestrator compacts with
    /// [`CompactSorted`](crate::CompactSorted) (best-scored candidate)
    /// rather than [`Compact`](crate::Compact) (first found). Default: true.
    pub sorted_compaction: bool,
    /// Hard cap on committed moves; `None` for unbounded. Applied by
    /// [`Stepper::configured`](crate::Stepper::configured). Default: `None`.
    pub max_moves: Option<usize>,
}

impl Default for ReconfigConfig {
    fn default() -> Self {
        Self {
            gather: GatherConfig::default(),
            compact: CompactConfig::default(),
            sorted_compaction: true,
            max_moves: None,
        }
    }
}

impl ReconfigConfig {
    /// Check structural invariants of every tunable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gather.light_capacity_limit == 0 {
            return Err(ConfigError::ZeroCapacityLimit);
        }
        if self.gather.max_rounds_per_unit == 0 {
            return Err(ConfigError::ZeroRoundBudget);
        }
        if self.compact.min_chain_len == 0 {
            return Err(ConfigError::ChainTooShort {
                configured: self.compact.min_chain_len,
            });
        }
        if self.compact.regress_penalty < 0 {
            return Err(ConfigError::NegativePenalty {
                value: self.compact.regress_penalty,
            });
        }
        if self.max_moves == Some(0) {
            return Err(ConfigError::ZeroMoveLimit);
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`ReconfigConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `light_capacity_limit` is zero, so no unit could ever be light.
    ZeroCapacityLimit,
    /// `max_rounds_per_unit` is zero.
    ZeroRoundBudget,
    /// `min_chain_len` is zero.
    ChainTooShort {
        /// The configured value.
        configured: usize,
    },
    /// `regress_penalty` is negative.
    NegativePenalty {
        /// The configured value.
        value: i64,
    },
    /// `max_moves` is `Some(0)`.
    ZeroMoveLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacityLimit => write!(f, "light_capacity_limit must be at least 1"),
            Self::ZeroRoundBudget => write!(f, "max_rounds_per_unit must be at least 1"),
            Self::ChainTooShort { configured } => {
                write!(f, "min_chain_len {configured} is below minimum of 1")
            }
            Self::NegativePenalty { value } => {
                write!(f, "regress_penalty must be non-negative, got {value}")
            }
            Self::ZeroMoveLimit => write!(f, "max_moves must be at least 1 when set"),
        }
    }
}

impl Error for ConfigError {}
