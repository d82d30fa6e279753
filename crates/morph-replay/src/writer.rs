//! Trace recording writer.
//!
//! [`TraceWriter`] streams frames to any `Write` sink. The header, holding
//! the starting configuration, is written on construction.

use std::io::Write;

use morph_world::{Move, World};

use crate::codec::{encode_frame, encode_header};
use crate::error::ReplayError;
use crate::hash::world_hash;
use crate::types::{Frame, TraceHeader};

/// Writes a move trace to a byte stream.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and the CLI a
/// `BufWriter<File>`.
///
/// # Examples
///
/// ```
/// use morph_core::{Direction, Pos};
/// use morph_replay::{TraceReader, TraceWriter};
/// use morph_world::{Move, World};
///
/// let mut world = World::from_positions([(0, 0), (1, 0), (2, 0)]).unwrap();
///
/// let mut buf = Vec::new();
/// let mut writer = TraceWriter::new(&mut buf, &world).unwrap();
/// let mv = Move::new(Pos::new(2, 0), Direction::NW);
/// mv.execute(&mut world).unwrap();
/// writer.record(&mv, &world).unwrap();
/// assert_eq!(writer.frames_written(), 1);
/// drop(writer);
///
/// let mut reader = TraceReader::open(buf.as_slice()).unwrap();
/// assert_eq!(reader.header().units.len(), 3);
/// let frame = reader.next_frame().unwrap().unwrap();
/// assert_eq!(frame.mv, mv);
/// assert!(reader.next_frame().unwrap().is_none());
/// ```
pub struct TraceWriter<W: Write> {
    writer: W,
    frames_written: u64,
}

impl<W: Write> TraceWriter<W> {
    /// Create a writer, immediately recording `start` as the header.
    pub fn new(writer: W, start: &World) -> Result<Self, ReplayError> {
        Self::with_header(writer, &TraceHeader::capture(start))
    }

    /// Create a writer from an explicit header.
    pub fn with_header(mut writer: W, header: &TraceHeader) -> Result<Self, ReplayError> {
        encode_header(&mut writer, header)?;
        Ok(Self {
            writer,
            frames_written: 0,
        })
    }

    /// Record a committed move together with the world it produced.
    pub fn record(&mut self, mv: &Move, after: &World) -> Result<(), ReplayError> {
        let frame = Frame {
            index: self.frames_written,
            mv: *mv,
            world_hash: world_hash(after),
        };
        self.write_frame(&frame)
    }

    /// Write a pre-built frame as is.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<(), ReplayError> {
        encode_frame(&mut self.writer, frame)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), ReplayError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Consume the writer and return the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
