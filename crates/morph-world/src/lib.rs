//! World model and structural analysis for Morph.
//!
//! This crate holds the [`World`], a sparse map of unit squares on the
//! integer grid, and everything that reads it:
//!
//! - [`Move`]: one atomic relocation and its legality predicates
//! - [`World::shortest_move_path`]: BFS over the move graph
//! - [`Contour`]: the boundary walk and its outside ring
//! - [`classify()`]: chunk/link decomposition of the configuration
//! - [`preserves_chunkiness`]: speculative check under a [`Speculation`]
//!   guard that always rolls back
//!
//! Connectivity is 4-adjacency throughout. Labels written by the
//! classifier go stale on any move; callers reclassify before reading.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod classify;
pub mod connectivity;
pub mod contour;
pub mod monotone;
pub mod moves;
pub mod neighbourhood;
pub mod oracle;
pub mod planner;
pub mod world;

#[cfg(test)]
pub(crate) mod compliance;

pub use classify::{classify, StackWalk, WalkEvent};
pub use connectivity::{articulation_points, bridge_capacity, component_count, occupied_path};
pub use contour::Contour;
pub use moves::Move;
pub use planner::MoveReach;
pub use neighbourhood::Neighbourhood;
pub use oracle::{preserves_chunkiness, preserves_chunkiness_all, Speculation};
pub use world::{Bounds, LabelSnapshot, Unit, World};
