//! `gnutls_ext_raw_parse`: parse an entire ClientHello body, skipping the
//! fixed prefix before the extensions vector begins (spec.md §4.1).

use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::session::Session;
use crate::types::{ParseType, Transport};

/// Skip the fixed ClientHello prefix (2-byte version, 32-byte random,
/// session-id, and in DTLS a cookie, then cipher suites and compression
/// methods) and dispatch the remaining extensions vector through
/// [`crate::wire::parse`]. `transport` selects the TLS (0x03 version
/// byte) or DTLS (0xFE) framing (spec.md §4.1).
pub fn gnutls_ext_raw_parse<'b>(
    session: &mut Session,
    registry: &Registry,
    transport: Transport,
    buf: &'b [u8],
) -> Result<()> {
    fn take<'b>(pos: &mut usize, n: usize, buf: &'b [u8]) -> Result<&'b [u8]> {
        let end = pos.checked_add(n).ok_or(Error::UnexpectedExtensionsLength)?;
        let slice = buf.get(*pos..end).ok_or(Error::UnexpectedExtensionsLength)?;
        *pos = end;
        Ok(slice)
    }

    let mut pos = 0usize;
    let version = take(&mut pos, 2, buf)?;
    let expected_msb = match transport {
        Transport::Tls => 0x03,
        Transport::Dtls => 0xFE,
    };
    if version[0] != expected_msb {
        return Err(Error::UnexpectedExtensionsLength);
    }

    let _random = take(&mut pos, 32, buf)?;

    let session_id_len = take(&mut pos, 1, buf)?[0] as usize;
    let _session_id = take(&mut pos, session_id_len, buf)?;

    if transport == Transport::Dtls {
        let cookie_len = take(&mut pos, 1, buf)?[0] as usize;
        let _cookie = take(&mut pos, cookie_len, buf)?;
    }

    let cs_len_bytes = take(&mut pos, 2, buf)?;
    let cs_len = u16::from_be_bytes([cs_len_bytes[0], cs_len_bytes[1]]) as usize;
    let _cipher_suites = take(&mut pos, cs_len, buf)?;

    let comp_len = take(&mut pos, 1, buf)?[0] as usize;
    let _compression = take(&mut pos, comp_len, buf)?;

    if pos >= buf.len() {
        return Err(Error::RequestedDataNotAvailable);
    }

    let rest = &buf[pos..];
    crate::wire::parse(
        session,
        registry,
        crate::types::MsgKind::ClientHello,
        ParseType::Client,
        rest,
    )
}
