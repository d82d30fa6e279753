//! Core types for the Morph reconfiguration engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the rest of the workspace: grid positions,
//! compass and move directions, unit identifiers, structural
//! classification labels, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod classification;
pub mod direction;
pub mod error;
pub mod id;
pub mod pos;

pub use classification::Classification;
pub use direction::{Compass, Direction, ParseDirectionError};
pub use error::{PhaseError, WorldError};
pub use id::{ChunkId, Color, UnitId};
pub use pos::Pos;
