//! TLS Hello-Extension dispatch and wire framing engine (`SPEC_FULL.md`
//! §4.1): length-prefixed iteration over extension blobs, a registry of
//! per-extension handlers keyed by a dense `gid`, and emission with
//! back-patched size fields.
//!
//! This crate is generic over the handshake orchestration built on top of
//! it (spec.md §1 treats handshake top-level orchestration as an external
//! collaborator) — it does not depend on `gtls-pk` or `gtls-asn1`; an
//! orchestrator wires a [`registry::ExtensionHandler`] implementation to
//! whichever of those crates it needs (e.g. a key-share handler calling
//! into `gtls-ecmath`, or a signature-algorithms handler consulting
//! `gtls-pk::policy`).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod builtin;
pub mod error;
pub mod pack;
pub mod raw;
pub mod registry;
pub mod session;
pub mod types;
pub mod wire;

pub use error::{Error, Result};
pub use registry::{Emit, ExtRegistration, ExtensionHandler, Registry, MAX_EXT_TYPES};
pub use session::{Session, UsedExts};
pub use types::{MsgKind, ParseType, RegisterFlags, Role, Transport, Validity};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;
    use alloc::vec::Vec;

    /// S1: outer length 5, one extension tls_id=0x002B length 1 value
    /// 0x0E, then a trailing `0x00` byte -> `UnexpectedExtensionsLength`.
    #[test]
    fn s1_trailing_byte_after_tiled_entries() {
        let mut session = Session::new(Role::Server, Transport::Tls);
        let registry = Registry::with_builtins();
        let buf = [0x00, 0x05, 0x00, 0x2B, 0x00, 0x01, 0x0E, 0x00];
        let err = wire::parse(
            &mut session,
            &registry,
            MsgKind::ClientHello,
            ParseType::Client,
            &buf,
        )
        .unwrap_err();
        assert_eq!(err, Error::UnexpectedExtensionsLength);
    }

    #[test]
    fn zero_length_outer_is_a_no_op() {
        let mut session = Session::new(Role::Server, Transport::Tls);
        let registry = Registry::with_builtins();
        let buf = [0x00, 0x00];
        wire::parse(
            &mut session,
            &registry,
            MsgKind::ClientHello,
            ParseType::Client,
            &buf,
        )
        .unwrap();
    }

    #[test]
    fn truncated_outer_length_is_rejected() {
        let mut session = Session::new(Role::Server, Transport::Tls);
        let registry = Registry::with_builtins();
        let buf = [0x00];
        let err = wire::parse(
            &mut session,
            &registry,
            MsgKind::ClientHello,
            ParseType::Client,
            &buf,
        )
        .unwrap_err();
        assert_eq!(err, Error::UnexpectedExtensionsLength);
    }

    struct Echo {
        gid: u8,
    }

    impl ExtensionHandler for Echo {
        fn recv(&self, session: &mut Session, data: &[u8]) -> error::Result<()> {
            session.set_private(self.gid, data.to_vec());
            Ok(())
        }

        fn send(&self, session: &mut Session, out: &mut Vec<u8>) -> error::Result<Emit> {
            if let Some(data) = session.private(self.gid) {
                out.extend_from_slice(data);
                Ok(Emit::Appended)
            } else {
                Ok(Emit::Empty)
            }
        }
    }

    #[test]
    fn parse_then_dispatch_unknown_gid_is_ignored() {
        // tls_id 0xBEEF is not registered anywhere; a single entry vector
        // carrying it must be accepted and ignored, not rejected.
        let mut session = Session::new(Role::Server, Transport::Tls);
        let registry = Registry::with_builtins();
        let buf = [0x00, 0x05, 0xBE, 0xEF, 0x00, 0x01, 0x42];
        wire::parse(
            &mut session,
            &registry,
            MsgKind::ClientHello,
            ParseType::Client,
            &buf,
        )
        .unwrap();
    }

    #[test]
    fn server_duplicate_extension_is_rejected() {
        let mut session = Session::new(Role::Server, Transport::Tls);
        let mut registry = Registry::with_builtins();
        registry
            .register(
                "echo",
                0x1234,
                ParseType::Client,
                None,
                Transport::Tls,
                Box::new(Echo {
                    gid: 0,
                }),
                RegisterFlags::empty(),
            )
            .unwrap();

        let buf = [
            0x00, 0x0C, // outer len 12
            0x12, 0x34, 0x00, 0x01, 0x01, // entry 1
            0x12, 0x34, 0x00, 0x01, 0x02, // entry 2 (duplicate tls_id)
        ];
        let err = wire::parse(
            &mut session,
            &registry,
            MsgKind::ClientHello,
            ParseType::Client,
            &buf,
        )
        .unwrap_err();
        assert_eq!(err, Error::ReceivedIllegalExtension);
    }

    #[test]
    fn client_rejects_unsolicited_extension() {
        let mut session = Session::new(Role::Client, Transport::Tls);
        let registry = Registry::with_builtins();
        // pre_shared_key is a built-in valid for TLS13_SERVER_HELLO, but
        // the client never advertised it (`used_exts` empty).
        let buf = [0x00, 0x05, 0x00, 0x29, 0x00, 0x01, 0x00];
        let err = wire::parse(
            &mut session,
            &registry,
            MsgKind::Tls13ServerHello,
            ParseType::Any,
            &buf,
        )
        .unwrap_err();
        assert_eq!(err, Error::ReceivedIllegalExtension);
    }

    #[test]
    fn gen_then_parse_roundtrips_a_registered_extension() {
        let mut client_registry = Registry::empty();
        client_registry
            .register(
                "echo",
                0x1234,
                ParseType::Client,
                Some(Validity::CLIENT_HELLO | Validity::TLS),
                Transport::Tls,
                Box::new(Echo {
                    gid: 1,
                }),
                RegisterFlags::empty(),
            )
            .unwrap();

        let mut client = Session::new(Role::Client, Transport::Tls);
        client.set_private(1, alloc::vec![0xAA, 0xBB]);

        let mut out = Vec::new();
        wire::gen(
            &mut client,
            &client_registry,
            &mut out,
            MsgKind::ClientHello,
            ParseType::Client,
        )
        .unwrap();

        // outer length, then one entry: tls_id(2) + len(2) + 2 bytes payload
        assert_eq!(out, [0x00, 0x06, 0x12, 0x34, 0x00, 0x02, 0xAA, 0xBB]);
        assert!(client.is_used(1));

        let mut server_registry = Registry::empty();
        server_registry
            .register(
                "echo",
                0x1234,
                ParseType::Client,
                Some(Validity::CLIENT_HELLO | Validity::TLS),
                Transport::Tls,
                Box::new(Echo {
                    gid: 1,
                }),
                RegisterFlags::empty(),
            )
            .unwrap();
        let mut server = Session::new(Role::Server, Transport::Tls);
        wire::parse(
            &mut server,
            &server_registry,
            MsgKind::ClientHello,
            ParseType::Client,
            &out,
        )
        .unwrap();
        assert_eq!(server.private(1), Some(&[0xAAu8, 0xBB][..]));
    }

    #[test]
    fn empty_outer_is_truncated_for_hello_messages() {
        let mut session = Session::new(Role::Client, Transport::Tls);
        let registry = Registry::empty();
        let mut out = Vec::new();
        wire::gen(
            &mut session,
            &registry,
            &mut out,
            MsgKind::ClientHello,
            ParseType::Client,
        )
        .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn builtin_order_has_dumbfw_after_pre_shared_key() {
        let registry = Registry::with_builtins();
        let psk = registry.find_by_tls_id(types::PRE_SHARED_KEY_TLS_ID, ParseType::Any).unwrap();
        let dumbfw = registry.entries().iter().find(|e| e.name == "dumbfw").unwrap();
        assert!(dumbfw.order_weight() > psk.order_weight());
    }
}
