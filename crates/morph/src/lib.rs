//! Morph: reconfiguration of sliding-square modular robots.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Morph sub-crates. For most users, adding `morph` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use morph::prelude::*;
//!
//! // An L whose top row hangs out to the east.
//! let world = World::from_positions([
//!     (0, 0), (1, 0), (2, 0),
//!     (0, 1), (1, 1), (2, 1),
//!     (1, 2), (2, 2),
//! ])
//! .unwrap();
//!
//! let mut stepper = Stepper::new(world);
//! let mut seq = Phase::Complete.sequence(&ReconfigConfig::default());
//! let moves = stepper.run(seq.as_mut()).unwrap();
//!
//! assert_eq!(moves, 2);
//! assert!(stepper.world().is_xy_monotone());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `morph-core` | positions, directions, ids, labels, errors |
//! | [`world`] | `morph-world` | the world, moves, planner, classifier, oracle |
//! | [`algo`] | `morph-algo` | phases, orchestrator, stepper, run config |
//! | [`replay`] | `morph-replay` | JSON configurations and move traces |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core vocabulary (`morph-core`).
///
/// [`types::Pos`], [`types::Direction`], [`types::Classification`] and the
/// error enums shared by every layer.
pub use morph_core as types;

/// World model and structural analysis (`morph-world`).
///
/// The [`world::World`] itself, [`world::Move`] legality,
/// [`world::classify()`] and [`world::preserves_chunkiness`].
pub use morph_world as world;

/// Reconfiguration phases (`morph-algo`).
///
/// Every phase implements [`algo::MoveSequence`]; drive one with an
/// [`algo::Stepper`].
pub use morph_algo as algo;

/// Persistence (`morph-replay`).
///
/// Load shapes with [`replay::ConfigurationFile`], record runs with
/// [`replay::TraceWriter`] and check them with [`replay::replay_and_verify`].
pub use morph_replay as replay;

/// Common imports for typical Morph usage.
///
/// ```rust
/// use morph::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use morph_core::{Classification, Color, Compass, Direction, Pos, UnitId};

    // Errors
    pub use morph_core::{PhaseError, WorldError};
    pub use morph_algo::{ConfigError, StepError};
    pub use morph_replay::ReplayError;

    // World
    pub use morph_world::{classify, Move, World};

    // Phases
    pub use morph_algo::{
        Canonicalize, Compact, CompactSorted, Gather, MoveSequence, Orchestrator, Phase,
        ReconfigConfig, RunMetrics, Stepper,
    };

    // Persistence
    pub use morph_replay::{ConfigurationFile, TraceReader, TraceWriter};
}
