//! Built-in extensions shipped with the engine itself, as opposed to
//! extensions an orchestrating handshake layer registers on top (spec.md
//! §1: handshake orchestration and cipher-suite policy are out of scope,
//! but the engine still ships the handful of extensions whose *wire
//! framing* is part of this layer's contract).

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::Result;
use crate::registry::{Emit, ExtensionHandler, Registry};
use crate::session::Session;
use crate::types::{ParseType, RegisterFlags, Transport, Validity, PRE_SHARED_KEY_TLS_ID};

/// DumbFW: a zero-length padding workaround for middleboxes that choke on
/// specific ClientHello sizes (`original_source/src/gnutls/lib/ext/dumbfw.c`).
/// It never emits anything itself (`send` always appends zero bytes, so the
/// engine rolls its header back); its only observable effect is its fixed
/// position in the registration order — it must sort after every other
/// built-in extension (spec.md §5: "DumbFW last ... among internals").
struct DumbFw;

impl ExtensionHandler for DumbFw {
    fn recv(&self, _session: &mut Session, _data: &[u8]) -> Result<()> {
        Ok(())
    }

    fn send(&self, _session: &mut Session, _out: &mut Vec<u8>) -> Result<Emit> {
        Ok(Emit::Appended)
    }
}

/// Pre-Shared-Key (RFC 8446 §4.2.11, TLS id 41). The engine's own PSK-last
/// ordering invariant is exercised against this built-in registration
/// (spec.md §4.1/§5); key-share/binder cryptography is out of scope here
/// and left to the handshake orchestrator layered on top, which is why
/// `recv`/`send` only round-trip an opaque blob.
struct PreSharedKey;

impl ExtensionHandler for PreSharedKey {
    fn recv(&self, session: &mut Session, data: &[u8]) -> Result<()> {
        session.set_private(PRE_SHARED_KEY_GID, data.to_vec());
        Ok(())
    }

    fn send(&self, _session: &mut Session, out: &mut Vec<u8>) -> Result<Emit> {
        // The orchestrator populates the actual PSK identity/binder list
        // via a session-local override (`Registry::register` with
        // `OVERRIDE_INTERNAL`); the built-in default emits nothing.
        let _ = out;
        Ok(Emit::Appended)
    }

    fn has_pack(&self) -> bool {
        true
    }

    fn pack(&self, session: &Session, out: &mut Vec<u8>) -> Result<()> {
        if let Some(data) = session.private(PRE_SHARED_KEY_GID) {
            out.extend_from_slice(data);
        }
        Ok(())
    }

    fn unpack(&self, session: &mut Session, data: &[u8]) -> Result<usize> {
        session.set_resumed(PRE_SHARED_KEY_GID, data.to_vec());
        Ok(data.len())
    }
}

// `install` registers Pre-Shared-Key first against an empty registry, so
// it is always assigned gid 1 (gid 0 is reserved, per `MAX_EXT_TYPES`).
const PRE_SHARED_KEY_GID: u8 = 1;

/// Populate `registry` with this crate's built-in extensions. Built-ins
/// are `cannot_be_overridden = false` by default (an orchestrator may
/// replace the Pre-Shared-Key stub with a real binder implementation via
/// `OVERRIDE_INTERNAL`), except DumbFW, which has no real behavior to
/// override.
pub fn install(registry: &mut Registry) {
    registry
        .register_raw(
            "pre_shared_key",
            PRE_SHARED_KEY_TLS_ID,
            ParseType::Any,
            Validity::CLIENT_HELLO | Validity::TLS13_SERVER_HELLO | Validity::TLS | Validity::DTLS,
            Box::new(PreSharedKey),
            RegisterFlags::empty(),
            false,
        )
        .expect("built-in registration has free gid space");

    registry
        .register_raw(
            "dumbfw",
            0x0015, // padding, RFC 7685; reused here as DumbFW's TLS id
            ParseType::Client,
            Validity::CLIENT_HELLO | Validity::TLS,
            Box::new(DumbFw),
            RegisterFlags::empty(),
            true,
        )
        .expect("built-in registration has free gid space");
}

/// Convenience for orchestrators that want a transport-scoped default
/// registry without reaching into [`install`] directly.
pub fn with_builtins_for(_transport: Transport) -> Registry {
    Registry::with_builtins()
}
