//! Resumption packing: serialize/restore per-gid private extension state
//! across sessions (spec.md §4.1 "Packing for resumption").

use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::session::Session;

/// `pack(session, out)` (spec.md §4.1). Writes a 4-byte count placeholder,
/// then for each gid set in `used_exts` whose registered handler carries
/// real `pack` logic: gid (4 B), a 4-byte inner-length placeholder, the
/// serialized private data, with the inner length back-patched in place.
pub fn pack(session: &Session, registry: &Registry, out: &mut Vec<u8>) -> Result<()> {
    let count_offset = out.len();
    out.extend_from_slice(&[0u8; 4]);
    let mut count: u32 = 0;

    for gid in session.used_exts().iter_set() {
        let Some(reg) = registry.find_by_gid(gid) else {
            continue;
        };
        if !reg.handler.has_pack() {
            continue;
        }

        out.extend_from_slice(&(gid as u32).to_be_bytes());
        let len_offset = out.len();
        out.extend_from_slice(&[0u8; 4]);
        let payload_start = out.len();

        reg.handler
            .pack(session, out)
            .map_err(|_| Error::HandlerFailed)?;

        let inner_len = (out.len() - payload_start) as u32;
        out[len_offset..len_offset + 4].copy_from_slice(&inner_len.to_be_bytes());
        count += 1;
    }

    out[count_offset..count_offset + 4].copy_from_slice(&count.to_be_bytes());
    Ok(())
}

/// Inverse of [`pack`]. Strictly verifies that each inner `unpack`
/// callback consumed exactly its declared length (spec.md §4.1), else
/// returns `ParsingError`.
pub fn unpack(session: &mut Session, registry: &Registry, buf: &[u8]) -> Result<()> {
    if buf.len() < 4 {
        return Err(Error::ParsingError);
    }
    let count = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
    let mut pos = 4usize;

    for _ in 0..count {
        if buf.len() < pos + 8 {
            return Err(Error::ParsingError);
        }
        let gid = u32::from_be_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]]);
        let inner_len = u32::from_be_bytes([
            buf[pos + 4],
            buf[pos + 5],
            buf[pos + 6],
            buf[pos + 7],
        ]) as usize;
        pos += 8;
        if buf.len() < pos + inner_len {
            return Err(Error::ParsingError);
        }
        let data = &buf[pos..pos + inner_len];
        pos += inner_len;

        let gid = u8::try_from(gid).map_err(|_| Error::ParsingError)?;
        let Some(reg) = registry.find_by_gid(gid) else {
            continue;
        };
        let consumed = reg
            .handler
            .unpack(session, data)
            .map_err(|_| Error::HandlerFailed)?;
        if consumed != data.len() {
            return Err(Error::ParsingError);
        }
        session.mark_used(gid);
    }

    if pos != buf.len() {
        return Err(Error::ParsingError);
    }
    Ok(())
}
