//! Hello-Extension engine error taxonomy (spec.md §7), grouped the same
//! way every crate in this workspace groups errors: Format / Range /
//! Policy / Resource / State / Crypto (this crate only ever populates
//! Format and State, since it does no cryptography of its own).

/// Errors raised by `gtls-helloext`'s parse/emit/register/pack entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // -- Format --
    /// The outer or an inner extension length field did not tile the
    /// supplied buffer exactly (spec.md §4.1's parsing contract: truncated
    /// total prefix, body shorter/longer than `total`, inner length
    /// overrun, or trailing bytes after the last entry).
    UnexpectedExtensionsLength,
    /// [`crate::raw::gnutls_ext_raw_parse`] was called on a ClientHello
    /// body with no extensions vector remaining after the fixed prefix.
    RequestedDataNotAvailable,
    /// `pack`/`unpack` framing was inconsistent: a callback did not
    /// consume exactly its declared inner length.
    ParsingError,

    // -- State --
    /// An extension arrived in a message it is not valid for (validity
    /// mask does not intersect the current message tag), a duplicate
    /// extension was seen, or PreSharedKey was not the last extension in
    /// a ClientHello.
    ReceivedIllegalExtension,
    /// Pre-Shared-Key (TLS id 41) was followed by another extension in a
    /// ClientHello received by a server (spec.md §4.1).
    ReceivedIllegalParameter,

    // -- Policy / Resource (registration) --
    /// [`crate::registry::Registry::register`] was called with a `tls_id`
    /// that collides with an existing entry whose `cannot_be_overridden`
    /// is set, or without `OVERRIDE_INTERNAL`.
    AlreadyRegistered,
    /// Registering another extension would exceed the `gid` space bounded
    /// by the `used_exts` bitset width ([`crate::MAX_EXT_TYPES`]).
    MemoryError,

    /// A handler's `recv`/`send`/`pack`/`unpack` callback reported failure.
    HandlerFailed,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::UnexpectedExtensionsLength => f.write_str("extension vector length did not tile the buffer"),
            Error::RequestedDataNotAvailable => f.write_str("no extension bytes remain in the ClientHello body"),
            Error::ParsingError => f.write_str("pack/unpack callback did not consume its declared length"),
            Error::ReceivedIllegalExtension => f.write_str("extension arrived in the wrong message, or was duplicated"),
            Error::ReceivedIllegalParameter => f.write_str("pre-shared-key extension was not last"),
            Error::AlreadyRegistered => f.write_str("tls_id already registered and cannot be overridden"),
            Error::MemoryError => f.write_str("extension gid space exhausted"),
            Error::HandlerFailed => f.write_str("extension handler callback failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
