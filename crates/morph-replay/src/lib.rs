//! Configuration files and move traces for Morph.
//!
//! Two formats live here:
//!
//! - [`ConfigurationFile`]: a versioned JSON document listing the units of a
//!   world, used to load and save shapes
//! - the move trace: a binary log of a run, written by [`TraceWriter`],
//!   read back by [`TraceReader`] and checked by [`replay_and_verify`]
//!
//! # Trace format
//!
//! ```text
//! [MAGIC "MRPH"] [VERSION u8] [unit count u32] [x i32, y i32, rgb 3×u8]*
//! [Frame 1] [Frame 2] ... [Frame N]
//! ```
//!
//! Each frame is `[index u64] [source x i32] [source y i32] [direction u8]
//! [world hash u64]`, all little-endian. The hash is an FNV-1a digest of the
//! occupied cells after the move.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod config_file;
pub mod error;
pub mod hash;
pub mod reader;
pub mod types;
pub mod verify;
pub mod writer;

pub use config_file::{ConfigurationFile, UnitEntry};
pub use error::ReplayError;
pub use hash::world_hash;
pub use reader::{FrameIter, TraceReader};
pub use types::{DivergenceKind, Frame, TraceHeader, UnitRecord};
pub use verify::{replay_and_verify, VerifySummary};
pub use writer::TraceWriter;

/// Magic bytes at the start of every trace file.
pub const MAGIC: [u8; 4] = *b"MRPH";

/// Current binary trace format version.
///
/// History:
/// - v1: header carries the starting units, frames carry a post-move hash
pub const FORMAT_VERSION: u8 = 1;

/// Current version of the JSON configuration document.
pub const CONFIG_VERSION: u32 = 1;
