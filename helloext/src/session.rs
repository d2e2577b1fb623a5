//! Per-session extension state (spec.md §3's "Session Extension State").

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::registry::{ExtRegistration, MAX_EXT_TYPES};
use crate::types::{MsgKind, ParseType, Role, Transport};

/// `used_exts` bitset: which gids have been seen (server) or advertised
/// (client) in the current handshake (spec.md §3). `MAX_EXT_TYPES` is 64,
/// so a single `u64` covers the whole gid space; gid 0 is never set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsedExts(u64);

impl UsedExts {
    pub fn is_set(self, gid: u8) -> bool {
        debug_assert!((gid as usize) <= MAX_EXT_TYPES);
        gid != 0 && (self.0 & (1u64 << (gid - 1))) != 0
    }

    pub fn set(&mut self, gid: u8) {
        debug_assert!((gid as usize) <= MAX_EXT_TYPES);
        if gid != 0 {
            self.0 |= 1u64 << (gid - 1);
        }
    }

    pub fn clear(&mut self, gid: u8) {
        if gid != 0 {
            self.0 &= !(1u64 << (gid - 1));
        }
    }

    /// Iterate gids (1..=MAX_EXT_TYPES) whose bit is set, ascending.
    pub fn iter_set(self) -> impl Iterator<Item = u8> {
        (1..=MAX_EXT_TYPES as u8).filter(move |&gid| self.is_set(gid))
    }
}

/// Per-session state threaded through parse/emit/pack/unpack (spec.md §3).
pub struct Session {
    role: Role,
    transport: Transport,
    used_exts: UsedExts,
    /// User-registered entries searched before the global registry
    /// (spec.md §3: "user-registered entries live in a per-session
    /// vector"; spec.md §4.1's dispatch resolution order).
    session_local: Vec<ExtRegistration>,
    current_message: MsgKind,
    /// Byte offset of the 2-byte outer length placeholder, recorded by
    /// `gen`/`parse` for diagnostics and by the resumption pack/unpack
    /// pass (spec.md §3: "extensions_offset for back-patching").
    extensions_offset: Option<usize>,
    /// Full captured ClientHello, needed for the TLS 1.3 transcript hash
    /// (spec.md §3). Opaque to this crate; callers own the interpretation.
    client_hello: Option<Vec<u8>>,
    /// Current per-gid private extension data (spec.md §3: "current +
    /// resumed copies, each with a `set` flag" — membership in the map
    /// *is* the set flag).
    private_current: BTreeMap<u8, Vec<u8>>,
    /// Private extension data restored from a previous session via
    /// `unpack`, consulted by resumption-aware handlers.
    private_resumed: BTreeMap<u8, Vec<u8>>,
}

impl Session {
    pub fn new(role: Role, transport: Transport) -> Self {
        Session {
            role,
            transport,
            used_exts: UsedExts::default(),
            session_local: Vec::new(),
            current_message: MsgKind::ClientHello,
            extensions_offset: None,
            client_hello: None,
            private_current: BTreeMap::new(),
            private_resumed: BTreeMap::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn current_message(&self) -> MsgKind {
        self.current_message
    }

    pub fn set_current_message(&mut self, msg: MsgKind) {
        self.current_message = msg;
    }

    pub fn used_exts(&self) -> UsedExts {
        self.used_exts
    }

    pub fn mark_used(&mut self, gid: u8) {
        self.used_exts.set(gid);
    }

    pub fn is_used(&self, gid: u8) -> bool {
        self.used_exts.is_set(gid)
    }

    pub fn extensions_offset(&self) -> Option<usize> {
        self.extensions_offset
    }

    pub fn set_extensions_offset(&mut self, offset: Option<usize>) {
        self.extensions_offset = offset;
    }

    pub fn capture_client_hello(&mut self, bytes: &[u8]) {
        self.client_hello = Some(bytes.to_vec());
    }

    pub fn client_hello(&self) -> Option<&[u8]> {
        self.client_hello.as_deref()
    }

    pub fn session_local(&self) -> &[ExtRegistration] {
        &self.session_local
    }

    pub fn find_session_local(
        &self,
        tls_id: u16,
        parse_type: ParseType,
    ) -> Option<&ExtRegistration> {
        self.session_local
            .iter()
            .find(|e| e.tls_id == tls_id && e.parse_type.matches(parse_type))
    }

    /// Register a per-session (non-global) extension handler. Searched
    /// before the global registry in both dispatch and emission order
    /// (spec.md §4.1, §5).
    pub fn register_session_local(&mut self, entry: ExtRegistration) {
        self.session_local.push(entry);
    }

    /// Remove a session-local entry at `idx` so its handler can be called
    /// with `&mut Session` without aliasing the `session_local` vector it
    /// lives in. Must be paired with [`Session::restore_session_local`].
    pub fn take_session_local(&mut self, idx: usize) -> ExtRegistration {
        self.session_local.remove(idx)
    }

    /// Reinsert an entry removed by [`Session::take_session_local`] at the
    /// same index, preserving registration order.
    pub fn restore_session_local(&mut self, idx: usize, entry: ExtRegistration) {
        self.session_local.insert(idx, entry);
    }

    pub fn set_private(&mut self, gid: u8, data: Vec<u8>) {
        self.private_current.insert(gid, data);
    }

    pub fn private(&self, gid: u8) -> Option<&[u8]> {
        self.private_current.get(&gid).map(|v| v.as_slice())
    }

    pub fn set_resumed(&mut self, gid: u8, data: Vec<u8>) {
        self.private_resumed.insert(gid, data);
    }

    pub fn resumed(&self, gid: u8) -> Option<&[u8]> {
        self.private_resumed.get(&gid).map(|v| v.as_slice())
    }
}
