//! Per-extension handler registry (spec.md §3's "Hello-Extension Entry",
//! §4.1's "Registration"; spec.md §9 Design Note: "model as a trait/
//! interface with methods `recv`, `send`, `pack`, `unpack`, `deinit`").
//!
//! Built-ins live in a fixed-size gid-indexed table; user registrations
//! extend the same table at runtime via [`Registry::register`]. A
//! session additionally carries its own per-session vector (spec.md §3)
//! that is searched *before* this registry — modeled by
//! [`crate::session::Session::register_session_local`].

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::{Error, Result};
use crate::types::{ParseType, RegisterFlags, Validity};

/// Maximum number of gids this engine supports, bounding the width of the
/// `used_exts` bitset (spec.md §3: "a process-local gid drawn from a
/// small dense enumeration (≤ MAX_EXT_TYPES, bounded by the width of a
/// bitset)"). Gid 0 is reserved and never assigned, matching the
/// reference's `extfunc[MAX_EXT_TYPES+1]` table where index 0 is unused.
pub const MAX_EXT_TYPES: usize = 64;

/// What an `emit` callback did, used to distinguish "appended zero bytes,
/// roll the header back" from "deliberately emit an empty extension"
/// (spec.md §4.1 Emission: "a sentinel 'emit empty'").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    /// The callback appended payload bytes (possibly zero, in which case
    /// the header is rolled back unless this variant is [`Emit::Empty`]).
    Appended,
    /// Explicitly emit a zero-length extension body.
    Empty,
}

/// Per-extension behavior (spec.md §3's four function pointers plus
/// deinit). Implementors are usually zero-sized marker types; any actual
/// per-session state lives in the `Session` the callbacks are passed, not
/// in `self`.
pub trait ExtensionHandler {
    /// Parse an extension body received from the peer. A handler that
    /// rejects its own payload returns `Err`, propagated unchanged by the
    /// engine (spec.md §4.1: "its negative return is propagated
    /// unchanged").
    fn recv(&self, session: &mut crate::session::Session, data: &[u8]) -> Result<()>;

    /// Append this extension's payload to `out` (the inner TLV header is
    /// written and back-patched by the engine, not the handler).
    fn send(&self, session: &mut crate::session::Session, out: &mut Vec<u8>) -> Result<Emit>;

    /// Serialize this extension's private session state for resumption
    /// (spec.md §4.1 "Packing for resumption"). Handlers that carry no
    /// resumable state leave the default, which appends nothing.
    fn pack(&self, _session: &crate::session::Session, _out: &mut Vec<u8>) -> Result<()> {
        Ok(())
    }

    /// Inverse of [`ExtensionHandler::pack`]: restore private state from
    /// exactly `data`, returning the number of bytes consumed so the
    /// caller can enforce the "consumed exactly the stated length"
    /// invariant (spec.md §4.1).
    fn unpack(&self, _session: &mut crate::session::Session, data: &[u8]) -> Result<usize> {
        let _ = data;
        Ok(0)
    }

    /// `true` if this handler implements real `pack`/`unpack` logic; the
    /// packing pass skips entries that don't (spec.md §4.1: "whose entry
    /// carries a `pack` callback").
    fn has_pack(&self) -> bool {
        false
    }
}

/// A registered extension (spec.md §3's "Hello-Extension Entry" minus the
/// function pointers, which live in the boxed [`ExtensionHandler`]).
pub struct ExtRegistration {
    pub name: &'static str,
    pub tls_id: u16,
    pub gid: u8,
    pub parse_type: ParseType,
    pub validity: Validity,
    pub cannot_be_overridden: bool,
    pub handler: Box<dyn ExtensionHandler>,
}

impl ExtRegistration {
    /// Ordering weight for emission (spec.md §5: "user-registered first,
    /// then internal, with DumbFW last, PreSharedKey last among internals
    /// when applicable"). Callers sort internal entries ascending by
    /// `(order_weight(), gid)`.
    pub fn order_weight(&self) -> u8 {
        if self.tls_id == crate::types::PRE_SHARED_KEY_TLS_ID {
            2
        } else if self.name == "dumbfw" {
            1
        } else {
            0
        }
    }
}

/// The process-global (or, in embedded builds, statically-held) extension
/// registry. Not internally synchronized (spec.md §5: "documented as not
/// thread-safe; a correct deployment performs all registration before
/// handing sessions to worker threads").
pub struct Registry {
    entries: Vec<ExtRegistration>,
}

impl Registry {
    /// An empty registry with no built-ins. [`crate::builtin::install`]
    /// populates the shipped extensions (DumbFW, Pre-Shared-Key stub).
    pub fn empty() -> Self {
        Registry {
            entries: Vec::new(),
        }
    }

    /// A registry pre-populated with this crate's built-in extensions.
    pub fn with_builtins() -> Self {
        let mut reg = Self::empty();
        crate::builtin::install(&mut reg);
        reg
    }

    pub fn entries(&self) -> &[ExtRegistration] {
        &self.entries
    }

    pub fn find_by_tls_id(&self, tls_id: u16, parse_type: ParseType) -> Option<&ExtRegistration> {
        self.entries
            .iter()
            .find(|e| e.tls_id == tls_id && e.parse_type.matches(parse_type))
    }

    pub fn find_by_gid(&self, gid: u8) -> Option<&ExtRegistration> {
        self.entries.iter().find(|e| e.gid == gid)
    }

    fn max_gid(&self) -> u8 {
        self.entries.iter().map(|e| e.gid).max().unwrap_or(0)
    }

    /// Register a new extension (spec.md §4.1 "Registration"). `internal`
    /// marks built-ins installed via [`crate::builtin::install`] as
    /// non-overridable by default unless explicitly cleared.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn register_raw(
        &mut self,
        name: &'static str,
        tls_id: u16,
        parse_type: ParseType,
        validity: Validity,
        handler: Box<dyn ExtensionHandler>,
        flags: RegisterFlags,
        cannot_be_overridden: bool,
    ) -> Result<u8> {
        if let Some(existing_idx) = self.entries.iter().position(|e| e.tls_id == tls_id) {
            let existing = &self.entries[existing_idx];
            let overridable = !existing.cannot_be_overridden
                && flags.contains(RegisterFlags::OVERRIDE_INTERNAL);
            if !overridable {
                crate::fmt::warn!("gtls-helloext: tls_id already registered");
                return Err(Error::AlreadyRegistered);
            }
            let gid = existing.gid;
            self.entries[existing_idx] = ExtRegistration {
                name,
                tls_id,
                gid,
                parse_type,
                validity,
                cannot_be_overridden,
                handler,
            };
            return Ok(gid);
        }

        let next_gid = self.max_gid() as usize + 1;
        if next_gid > MAX_EXT_TYPES {
            return Err(Error::MemoryError);
        }
        let gid = next_gid as u8;
        self.entries.push(ExtRegistration {
            name,
            tls_id,
            gid,
            parse_type,
            validity,
            cannot_be_overridden,
            handler,
        });
        Ok(gid)
    }

    /// Public registration entry point for user extensions (spec.md
    /// §4.1). Built-ins use [`Registry::register_raw`] directly via
    /// [`crate::builtin::install`] so they can set `cannot_be_overridden`
    /// independently of the caller-facing flag.
    pub fn register(
        &mut self,
        name: &'static str,
        tls_id: u16,
        parse_type: ParseType,
        validity: Option<Validity>,
        transport: crate::types::Transport,
        handler: Box<dyn ExtensionHandler>,
        flags: RegisterFlags,
    ) -> Result<u8> {
        let validity = validity.unwrap_or_else(|| Validity::default_for(transport));
        self.register_raw(name, tls_id, parse_type, validity, handler, flags, false)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
