//! Reconfiguration phases for Morph.
//!
//! Every phase is a [`MoveSequence`]: a pull-based producer that inspects
//! the [`World`](morph_world::World), returns the next
//! [`Move`](morph_world::Move) and waits for the caller to commit it.
//!
//! - [`Gather`] carries loose units into the joints of weak links
//! - [`Compact`] and [`CompactSorted`] push material toward the south-west
//!   until the configuration is xy-monotone
//! - [`Canonicalize`] descends the `x + y` potential
//! - [`Orchestrator`] runs gather then compaction, with one retry
//!
//! [`Stepper`] owns the world, validates and commits each move, and
//! collects [`RunMetrics`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod canonicalize;
pub mod compact;
pub mod config;
pub mod error;
pub mod gather;
pub mod metrics;
pub mod orchestrator;
pub mod phase;
pub mod sequence;
pub mod stepper;

pub use canonicalize::Canonicalize;
pub use compact::{find_candidates, Candidate, CandidateKind, Compact, CompactSorted};
pub use config::{CompactConfig, ConfigError, GatherConfig, ReconfigConfig};
pub use error::StepError;
pub use gather::Gather;
pub use metrics::RunMetrics;
pub use orchestrator::{Orchestrator, MAX_ATTEMPTS};
pub use phase::{ParsePhaseError, Phase};
pub use sequence::MoveSequence;
pub use stepper::Stepper;
