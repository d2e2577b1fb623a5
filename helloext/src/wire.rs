//! Length-prefixed extension-vector parsing and back-patched emission
//! (spec.md §4.1 "Parsing contract" and "Emission"; spec.md §6's wire
//! format `struct { Extension extensions<0..2^16-1>; }`).

use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::registry::{Emit, Registry};
use crate::session::Session;
use crate::types::{MsgKind, ParseType, Role, Validity, PRE_SHARED_KEY_TLS_ID};

struct RawEntry<'a> {
    tls_id: u16,
    data: &'a [u8],
}

/// Split a tiled `{ uint16 tls_id; uint16 len; opaque data[len]; }*` body
/// of exactly `body.len()` bytes into its entries. Any truncation or
/// overrun is `UnexpectedExtensionsLength` (spec.md §4.1).
fn split_entries(body: &[u8]) -> Result<Vec<RawEntry<'_>>> {
    let mut entries = Vec::new();
    let mut offset = 0usize;
    while offset < body.len() {
        let rest = &body[offset..];
        if rest.len() < 4 {
            return Err(Error::UnexpectedExtensionsLength);
        }
        let tls_id = u16::from_be_bytes([rest[0], rest[1]]);
        let len = u16::from_be_bytes([rest[2], rest[3]]) as usize;
        if rest.len() < 4 + len {
            return Err(Error::UnexpectedExtensionsLength);
        }
        entries.push(RawEntry {
            tls_id,
            data: &rest[4..4 + len],
        });
        offset += 4 + len;
    }
    if offset != body.len() {
        return Err(Error::UnexpectedExtensionsLength);
    }
    Ok(entries)
}

/// Where a resolved `tls_id` lookup was found: the session-local vector
/// (searched first) or the global registry (spec.md §4.1 "Dispatch").
enum Resolved {
    Local { idx: usize, gid: u8, validity: Validity },
    Global { gid: u8, validity: Validity },
}

fn resolve<'s>(
    session: &'s Session,
    registry: &Registry,
    tls_id: u16,
    parse_type: ParseType,
) -> Option<Resolved> {
    if let Some(idx) = session
        .session_local()
        .iter()
        .position(|e| e.tls_id == tls_id && e.parse_type.matches(parse_type))
    {
        let e = &session.session_local()[idx];
        return Some(Resolved::Local {
            idx,
            gid: e.gid,
            validity: e.validity,
        });
    }
    registry
        .find_by_tls_id(tls_id, parse_type)
        .map(|e| Resolved::Global {
            gid: e.gid,
            validity: e.validity,
        })
}

/// Call the resolved handler's `recv`, taking a session-local handler out
/// of `session` for the duration of the call and restoring it afterward
/// (the handler must not be reachable through `session`'s own borrow
/// while it is itself being passed `&mut session`).
fn dispatch_recv(
    session: &mut Session,
    registry: &Registry,
    resolved: &Resolved,
    tls_id: u16,
    parse_type: ParseType,
    data: &[u8],
) -> Result<()> {
    match *resolved {
        Resolved::Local { idx, .. } => {
            let entry = session.take_session_local(idx);
            let result = entry.handler.recv(session, data);
            session.restore_session_local(idx, entry);
            result.map_err(|_| Error::HandlerFailed)
        }
        Resolved::Global { .. } => {
            let reg = registry
                .find_by_tls_id(tls_id, parse_type)
                .expect("resolved earlier");
            reg.handler.recv(session, data).map_err(|_| Error::HandlerFailed)
        }
    }
}

/// `parse(session, msg_kind, parse_type, buf)` (spec.md §4.1). `buf` is
/// exactly the length-prefixed extension vector: `uint16 total` followed
/// by `total` bytes of tiled entries, with no trailing bytes.
pub fn parse(
    session: &mut Session,
    registry: &Registry,
    msg_kind: MsgKind,
    parse_type: ParseType,
    buf: &[u8],
) -> Result<()> {
    if buf.len() < 2 {
        return Err(Error::UnexpectedExtensionsLength);
    }
    let total = u16::from_be_bytes([buf[0], buf[1]]) as usize;
    let body = &buf[2..];
    if body.len() != total {
        return Err(Error::UnexpectedExtensionsLength);
    }
    if total == 0 {
        return Ok(());
    }

    let entries = split_entries(body)?;
    let role = session.role();
    let transport = session.transport();
    let message_flag = Validity::message_flag(msg_kind);
    let transport_flag = transport.flag();

    for (idx, entry) in entries.iter().enumerate() {
        if role == Role::Server
            && msg_kind == MsgKind::ClientHello
            && entry.tls_id == PRE_SHARED_KEY_TLS_ID
            && idx + 1 != entries.len()
        {
            crate::fmt::warn!("gtls-helloext: pre_shared_key not last extension");
            return Err(Error::ReceivedIllegalParameter);
        }

        let resolved = match resolve(session, registry, entry.tls_id, parse_type) {
            Some(r) => r,
            None => {
                crate::fmt::trace!("gtls-helloext: unknown extension, ignored");
                continue;
            }
        };

        let (gid, validity) = match resolved {
            Resolved::Local { gid, validity, .. } => (gid, validity),
            Resolved::Global { gid, validity } => (gid, validity),
        };

        if !validity.contains(transport_flag) {
            crate::fmt::trace!("gtls-helloext: extension invalid for transport, ignored");
            continue;
        }
        if !validity.contains(message_flag) {
            crate::fmt::warn!("gtls-helloext: extension arrived in wrong message");
            return Err(Error::ReceivedIllegalExtension);
        }

        match role {
            Role::Client => {
                if !validity.contains(Validity::IGNORE_CLIENT_REQUEST) && !session.is_used(gid) {
                    crate::fmt::warn!("gtls-helloext: extension not advertised by client");
                    return Err(Error::ReceivedIllegalExtension);
                }
            }
            Role::Server => {
                if session.is_used(gid) {
                    crate::fmt::warn!("gtls-helloext: duplicate extension");
                    return Err(Error::ReceivedIllegalExtension);
                }
                session.mark_used(gid);
            }
        }

        dispatch_recv(session, registry, &resolved, entry.tls_id, parse_type, entry.data)?;
    }

    Ok(())
}

/// Internal entries ordered for emission (spec.md §5: "DumbFW last,
/// PreSharedKey last among internals when applicable").
fn ordered_global_gids(registry: &Registry) -> Vec<u8> {
    let mut gids: Vec<(u8, u8)> = registry
        .entries()
        .iter()
        .map(|e| (e.order_weight(), e.gid))
        .collect();
    gids.sort_unstable();
    gids.into_iter().map(|(_, gid)| gid).collect()
}

/// `gen(session, buf, msg_kind, parse_type)` (spec.md §4.1 "Emission").
/// Writes the length-prefixed extension vector to `out`, back-patching
/// the outer 2-byte length and each entry's inner 2-byte length in place.
pub fn gen(
    session: &mut Session,
    registry: &Registry,
    out: &mut Vec<u8>,
    msg_kind: MsgKind,
    parse_type: ParseType,
) -> Result<()> {
    let role = session.role();
    let transport = session.transport();
    let message_flag = Validity::message_flag(msg_kind);
    let transport_flag = transport.flag();

    let outer_offset = out.len();
    out.extend_from_slice(&[0u8, 0u8]);
    session.set_extensions_offset(Some(outer_offset));

    // Session-local entries first, in registration order, then global
    // entries ordered by (weight, gid) (spec.md §5).
    let local_count = session.session_local().len();
    let global_gids = ordered_global_gids(registry);

    for local_idx in 0..local_count {
        emit_one(
            session,
            registry,
            out,
            parse_type,
            message_flag,
            transport_flag,
            role,
            EmitSource::Local(local_idx),
        )?;
    }
    for gid in global_gids {
        emit_one(
            session,
            registry,
            out,
            parse_type,
            message_flag,
            transport_flag,
            role,
            EmitSource::Global(gid),
        )?;
    }

    let total_len = out.len() - (outer_offset + 2);
    let is_hello = !matches!(msg_kind, MsgKind::EncryptedExtensions);
    if total_len == 0 && is_hello {
        // Some peers reject an empty-but-present extensions field.
        out.truncate(outer_offset);
    } else {
        out[outer_offset..outer_offset + 2].copy_from_slice(&(total_len as u16).to_be_bytes());
    }
    Ok(())
}

enum EmitSource {
    Local(usize),
    Global(u8),
}

#[allow(clippy::too_many_arguments)]
fn emit_one(
    session: &mut Session,
    registry: &Registry,
    out: &mut Vec<u8>,
    parse_type: ParseType,
    message_flag: Validity,
    transport_flag: Validity,
    role: Role,
    source: EmitSource,
) -> Result<()> {
    let (tls_id, gid, validity, entry_parse_type) = match &source {
        EmitSource::Local(idx) => {
            let e = &session.session_local()[*idx];
            (e.tls_id, e.gid, e.validity, e.parse_type)
        }
        EmitSource::Global(gid) => {
            let e = registry.find_by_gid(*gid).expect("ordered from registry");
            (e.tls_id, e.gid, e.validity, e.parse_type)
        }
    };

    if !entry_parse_type.matches(parse_type) {
        return Ok(());
    }
    if !validity.contains(transport_flag) || !validity.contains(message_flag) {
        return Ok(());
    }
    if role == Role::Server
        && !validity.contains(Validity::IGNORE_CLIENT_REQUEST)
        && !session.is_used(gid)
    {
        return Ok(());
    }

    let header_pos = out.len();
    out.extend_from_slice(&tls_id.to_be_bytes());
    out.extend_from_slice(&[0u8, 0u8]); // inner length placeholder
    let payload_start = out.len();

    let emit = match source {
        EmitSource::Local(idx) => {
            let entry = session.take_session_local(idx);
            let result = entry.handler.send(session, out);
            session.restore_session_local(idx, entry);
            result
        }
        EmitSource::Global(gid) => {
            let reg = registry.find_by_gid(gid).expect("ordered from registry");
            reg.handler.send(session, out)
        }
    }
    .map_err(|_| Error::HandlerFailed)?;

    let appended = out.len() - payload_start;
    if appended == 0 && emit != Emit::Empty {
        out.truncate(header_pos);
        return Ok(());
    }
    let len_bytes = (appended as u16).to_be_bytes();
    out[header_pos + 2..header_pos + 4].copy_from_slice(&len_bytes);

    if role == Role::Client {
        session.mark_used(gid);
    }
    Ok(())
}
