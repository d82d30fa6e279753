//! Binary encode/decode for the trace format.
//!
//! All integers are little-endian. There is no compression, padding or
//! self-describing schema; the layout is documented at the crate root.

use std::io::{Read, Write};

use morph_core::{Color, Direction, Pos};
use morph_world::Move;

use crate::error::ReplayError;
use crate::types::{Frame, TraceHeader, UnitRecord};
use crate::{FORMAT_VERSION, MAGIC};

/// Upper bound on the capacity reserved from an untrusted unit count.
const MAX_PREALLOC_UNITS: usize = 4096;

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), ReplayError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), ReplayError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u64.
pub fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), ReplayError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian i32.
pub fn write_i32_le(w: &mut dyn Write, v: i32) -> Result<(), ReplayError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a position as two i32s.
pub fn write_pos(w: &mut dyn Write, p: Pos) -> Result<(), ReplayError> {
    write_i32_le(w, p.x)?;
    write_i32_le(w, p.y)
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, ReplayError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, ReplayError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian u64.
pub fn read_u64_le(r: &mut dyn Read) -> Result<u64, ReplayError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Read a little-endian i32.
pub fn read_i32_le(r: &mut dyn Read) -> Result<i32, ReplayError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Read a position written by [`write_pos`].
pub fn read_pos(r: &mut dyn Read) -> Result<Pos, ReplayError> {
    let x = read_i32_le(r)?;
    let y = read_i32_le(r)?;
    Ok(Pos::new(x, y))
}

// ── Header ──────────────────────────────────────────────────────

/// Write the magic, version and starting configuration.
pub fn encode_header(w: &mut dyn Write, header: &TraceHeader) -> Result<(), ReplayError> {
    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;
    let count = u32::try_from(header.units.len()).map_err(|_| ReplayError::MalformedFrame {
        detail: format!("{} units do not fit a u32 count", header.units.len()),
    })?;
    write_u32_le(w, count)?;
    for u in &header.units {
        write_pos(w, u.pos)?;
        w.write_all(&u.color.0)?;
    }
    Ok(())
}

/// Read and check the magic and version, then the starting configuration.
pub fn decode_header(r: &mut dyn Read) -> Result<TraceHeader, ReplayError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(ReplayError::InvalidMagic);
    }
    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(ReplayError::UnsupportedVersion {
            found: u32::from(version),
        });
    }
    let count = read_u32_le(r)? as usize;
    let mut units = Vec::with_capacity(count.min(MAX_PREALLOC_UNITS));
    for _ in 0..count {
        let pos = read_pos(r)?;
        let mut rgb = [0u8; 3];
        r.read_exact(&mut rgb)?;
        units.push(UnitRecord {
            pos,
            color: Color(rgb),
        });
    }
    Ok(TraceHeader { units })
}

// ── Frames ──────────────────────────────────────────────────────

/// Write one frame.
pub fn encode_frame(w: &mut dyn Write, frame: &Frame) -> Result<(), ReplayError> {
    write_u64_le(w, frame.index)?;
    write_pos(w, frame.mv.source)?;
    write_u8(w, frame.mv.direction.tag())?;
    write_u64_le(w, frame.world_hash)
}

/// Read one frame, or `None` at a clean end of stream.
///
/// A stream that ends inside a frame is [`ReplayError::MalformedFrame`].
pub fn decode_frame(r: &mut dyn Read) -> Result<Option<Frame>, ReplayError> {
    // Byte-by-byte so that zero bytes (end of trace) and a partial index
    // (truncation) can be told apart.
    let mut index_buf = [0u8; 8];
    let mut filled = 0;
    while filled < 8 {
        match r.read(&mut index_buf[filled..]) {
            Ok(0) => {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(ReplayError::MalformedFrame {
                    detail: format!("truncated frame header: got {filled} of 8 bytes for index"),
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ReplayError::Io(e)),
        }
    }
    let index = u64::from_le_bytes(index_buf);

    let body = |r: &mut dyn Read| -> Result<Frame, ReplayError> {
        let source = read_pos(r)?;
        let tag = read_u8(r)?;
        let direction = Direction::from_tag(tag).ok_or(ReplayError::UnknownDirection { tag })?;
        let world_hash = read_u64_le(r)?;
        Ok(Frame {
            index,
            mv: Move::new(source, direction),
            world_hash,
        })
    };
    match body(r) {
        Err(ReplayError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Err(ReplayError::MalformedFrame {
                detail: format!("frame {index} ends early"),
            })
        }
        other => other.map(Some),
    }
}
