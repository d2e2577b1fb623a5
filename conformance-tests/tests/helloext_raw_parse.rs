//! `gnutls_ext_raw_parse` against a full ClientHello-shaped buffer,
//! combining the fixed-prefix skip in `raw` with the extension vector
//! dispatch in `wire` — both only observable together through the public
//! entry point, which `gtls-helloext`'s own unit tests exercise piece by
//! piece (prefix-skip and vector-dispatch separately) rather than wired up.

use std::vec::Vec;

use gtls_helloext::error::Error;
use gtls_helloext::registry::{Emit, ExtensionHandler, Registry};
use gtls_helloext::session::Session;
use gtls_helloext::types::{ParseType, RegisterFlags, Role, Transport, Validity};
use gtls_helloext::{raw, types};

struct KeyShare;

impl ExtensionHandler for KeyShare {
    fn recv(&self, session: &mut Session, data: &[u8]) -> gtls_helloext::error::Result<()> {
        session.set_private(2, data.to_vec());
        Ok(())
    }

    fn send(&self, _session: &mut Session, _out: &mut Vec<u8>) -> gtls_helloext::error::Result<Emit> {
        Ok(Emit::Empty)
    }
}

fn client_hello(extensions: &[u8]) -> std::vec::Vec<u8> {
    let mut buf = std::vec::Vec::new();
    buf.extend_from_slice(&[0x03, 0x04]); // legacy_version: TLS 1.2 wire tag
    buf.extend_from_slice(&[0x11; 32]); // random
    buf.push(0); // session_id length
    buf.extend_from_slice(&[0x00, 0x02]); // cipher_suites length
    buf.extend_from_slice(&[0x13, 0x01]); // TLS_AES_128_GCM_SHA256
    buf.push(1); // compression_methods length
    buf.push(0); // null compression
    buf.extend_from_slice(extensions);
    buf
}

#[test]
fn raw_parse_skips_prefix_and_dispatches_key_share() {
    let mut registry = Registry::empty();
    registry
        .register(
            "key_share",
            0x0033,
            ParseType::Client,
            Some(Validity::CLIENT_HELLO | Validity::TLS),
            Transport::Tls,
            std::boxed::Box::new(KeyShare),
            RegisterFlags::empty(),
        )
        .unwrap();

    // outer extensions length 6, one entry: tls_id 0x0033, len 2, 0xAA 0xBB
    let extensions = [0x00, 0x06, 0x00, 0x33, 0x00, 0x02, 0xAA, 0xBB];
    let buf = client_hello(&extensions);

    let mut session = Session::new(Role::Server, Transport::Tls);
    raw::gnutls_ext_raw_parse(&mut session, &registry, Transport::Tls, &buf).unwrap();
    assert_eq!(session.private(2), Some(&[0xAAu8, 0xBB][..]));
}

#[test]
fn wrong_transport_version_byte_is_rejected() {
    let registry = Registry::empty();
    let extensions = [0x00, 0x00];
    let mut buf = client_hello(&extensions);
    buf[0] = 0xFE; // DTLS version tag fed into a TLS parse
    let mut session = Session::new(Role::Server, Transport::Tls);
    let err =
        raw::gnutls_ext_raw_parse(&mut session, &registry, Transport::Tls, &buf).unwrap_err();
    assert_eq!(err, Error::UnexpectedExtensionsLength);
}

/// The exact 9-byte vector: outer length 5, one extension tls_id=0x002B
/// length 1 value 0x0E, then a trailing 0x00 byte.
#[test]
fn trailing_byte_after_tiled_extensions_is_rejected() {
    use gtls_helloext::wire;
    let mut session = Session::new(Role::Server, Transport::Tls);
    let registry = Registry::with_builtins();
    let buf = [0x00, 0x05, 0x00, 0x2B, 0x00, 0x01, 0x0E, 0x00];
    let err = wire::parse(
        &mut session,
        &registry,
        types::MsgKind::ClientHello,
        ParseType::Client,
        &buf,
    )
    .unwrap_err();
    assert_eq!(err, Error::UnexpectedExtensionsLength);
}
