//! Trace playback reader.
//!
//! [`TraceReader`] reads frames from any `Read` source. The header is
//! validated on construction.

use std::io::Read;

use morph_world::World;

use crate::codec::{decode_frame, decode_header};
use crate::error::ReplayError;
use crate::types::{Frame, TraceHeader};

/// Reads a move trace from a byte stream.
pub struct TraceReader<R: Read> {
    reader: R,
    header: TraceHeader,
    frames_read: u64,
}

impl<R: Read> TraceReader<R> {
    /// Open a trace, reading and validating the header.
    pub fn open(mut reader: R) -> Result<Self, ReplayError> {
        let header = decode_header(&mut reader)?;
        Ok(Self {
            reader,
            header,
            frames_read: 0,
        })
    }

    /// The recorded starting configuration.
    pub fn header(&self) -> &TraceHeader {
        &self.header
    }

    /// A fresh world in the starting configuration.
    pub fn initial_world(&self) -> Result<World, ReplayError> {
        self.header.to_world()
    }

    /// Read the next frame, or `None` if the trace is exhausted.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, ReplayError> {
        let frame = decode_frame(&mut self.reader)?;
        if frame.is_some() {
            self.frames_read += 1;
        }
        Ok(frame)
    }

    /// Number of frames read so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Convert into a frame iterator.
    pub fn frames(self) -> FrameIter<R> {
        FrameIter {
            reader: self.reader,
            frames_read: self.frames_read,
            done: false,
        }
    }
}

/// Iterator adapter over trace frames.
///
/// Yields each decode error once, then stops.
pub struct FrameIter<R: Read> {
    reader: R,
    frames_read: u64,
    done: bool,
}

impl<R: Read> FrameIter<R> {
    /// Number of frames yielded so far, including those read before conversion.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}

impl<R: Read> Iterator for FrameIter<R> {
    type Item = Result<Frame, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match decode_frame(&mut self.reader) {
            Ok(Some(frame)) => {
                self.frames_read += 1;
                Some(Ok(frame))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UnitRecord;
    use crate::writer::TraceWriter;
    use morph_core::{Color, Direction, Pos};
    use morph_test_utils::{cells, line};
    use morph_world::Move;

    fn recorded_line() -> Vec<u8> {
        let mut w = line(3);
        let mut writer = TraceWriter::new(Vec::new(), &w).unwrap();
        for mv in [
            Move::new(Pos::new(2, 0), Direction::NW),
            Move::new(Pos::new(1, 1), Direction::W),
        ] {
            mv.execute(&mut w).unwrap();
            writer.record(&mv, &w).unwrap();
        }
        writer.into_inner()
    }

    #[test]
    fn initial_world_matches_the_recording() {
        let buf = recorded_line();
        let reader = TraceReader::open(buf.as_slice()).unwrap();
        assert_eq!(cells(&reader.initial_world().unwrap()), cells(&line(3)));
        assert_eq!(reader.frames_read(), 0);
    }

    #[test]
    fn frame_iter_yields_all_frames() {
        let buf = recorded_line();
        let reader = TraceReader::open(buf.as_slice()).unwrap();
        let frames: Vec<Frame> = reader.frames().collect::<Result<_, _>>().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].index, 0);
        assert_eq!(frames[1].mv, Move::new(Pos::new(1, 1), Direction::W));
    }

    #[test]
    fn frame_iter_stops_after_an_error() {
        let mut buf = recorded_line();
        buf.truncate(buf.len() - 3);
        let reader = TraceReader::open(buf.as_slice()).unwrap();
        let mut it = reader.frames();
        assert!(it.next().unwrap().is_ok());
        assert!(matches!(
            it.next(),
            Some(Err(ReplayError::MalformedFrame { .. }))
        ));
        assert!(it.next().is_none());
        assert_eq!(it.frames_read(), 1);
    }

    #[test]
    fn duplicate_header_cells_are_rejected() {
        let header = TraceHeader {
            units: vec![
                UnitRecord {
                    pos: Pos::new(1, 1),
                    color: Color::DEFAULT,
                };
                2
            ],
        };
        let buf = TraceWriter::with_header(Vec::new(), &header)
            .unwrap()
            .into_inner();
        let reader = TraceReader::open(buf.as_slice()).unwrap();
        assert!(matches!(
            reader.initial_world(),
            Err(ReplayError::DuplicatePosition { pos }) if pos == Pos::new(1, 1)
        ));
    }

    #[test]
    fn truncated_header_is_an_io_error() {
        let buf = recorded_line();
        let short = &buf[..7];
        assert!(matches!(
            TraceReader::open(short),
            Err(ReplayError::Io(_))
        ));
    }
}
