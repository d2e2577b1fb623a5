//! Small enumerations and bitflag sets shared across the engine (spec.md
//! §3's "Hello-Extension Entry" and "Session Extension State" fields).

/// Which side of the handshake a [`crate::session::Session`] is playing.
/// The dispatch and emission rules in spec.md §4.1 differ by role (a
/// client checks `used_exts` on receive; a server sets it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    Client,
    Server,
}

/// Transport the session is running over (spec.md §3's validity bitmask
/// includes `DTLS`/`TLS`; spec.md §6 notes the wire framing is shared).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transport {
    Tls,
    Dtls,
}

/// Which handshake message is currently being parsed or emitted (spec.md
/// §3's "current-message tag").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MsgKind {
    ClientHello,
    Tls12ServerHello,
    Tls13ServerHello,
    EncryptedExtensions,
    HelloRetryRequest,
}

/// An entry's declared parse-type (spec.md §3: "CLIENT, CLIENT_AUTH,
/// TLS12_SERVER, ENCRYPTED_EXT, ANY"). Dispatch resolves a wire `tls_id`
/// against entries whose `parse_type` equals the caller's requested type,
/// or which declared the `Any` wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseType {
    Client,
    ClientAuth,
    Tls12Server,
    EncryptedExt,
    Any,
}

impl ParseType {
    /// `true` if an entry declaring `self` should be considered when the
    /// caller asked to parse/emit `requested`.
    pub fn matches(self, requested: ParseType) -> bool {
        self == ParseType::Any || requested == ParseType::Any || self == requested
    }
}

bitflags::bitflags! {
    /// Validity bitmask (spec.md §3): which messages and transports an
    /// entry is valid for, plus the `IGNORE_CLIENT_REQUEST` modifier that
    /// is logically part of the same mask in the reference implementation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Validity: u16 {
        const CLIENT_HELLO         = 1 << 0;
        const TLS12_SERVER_HELLO   = 1 << 1;
        const TLS13_SERVER_HELLO   = 1 << 2;
        const EE                  = 1 << 3;
        const HRR                 = 1 << 4;
        const DTLS                = 1 << 5;
        const TLS                 = 1 << 6;
        /// A server may emit/accept this extension even when the client
        /// never advertised it (spec.md §4.1's emission/dispatch carve-out).
        const IGNORE_CLIENT_REQUEST = 1 << 7;
    }
}

impl Validity {
    /// Default validity mask for a registration that did not specify one
    /// (spec.md §4.1's "Registration" paragraph), plus the caller's
    /// current transport.
    pub fn default_for(transport: Transport) -> Validity {
        Validity::CLIENT_HELLO
            | Validity::TLS12_SERVER_HELLO
            | Validity::EE
            | transport.flag()
    }

    /// The mask bit that corresponds to a given current message.
    pub fn message_flag(msg: MsgKind) -> Validity {
        match msg {
            MsgKind::ClientHello => Validity::CLIENT_HELLO,
            MsgKind::Tls12ServerHello => Validity::TLS12_SERVER_HELLO,
            MsgKind::Tls13ServerHello => Validity::TLS13_SERVER_HELLO,
            MsgKind::EncryptedExtensions => Validity::EE,
            MsgKind::HelloRetryRequest => Validity::HRR,
        }
    }
}

impl Transport {
    pub fn flag(self) -> Validity {
        match self {
            Transport::Tls => Validity::TLS,
            Transport::Dtls => Validity::DTLS,
        }
    }
}

bitflags::bitflags! {
    /// Flags passed to [`crate::registry::Registry::register`] (spec.md
    /// §4.1's "Registration": `OVERRIDE_INTERNAL`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RegisterFlags: u8 {
        const OVERRIDE_INTERNAL = 1 << 0;
    }
}

/// TLS id of Pre-Shared-Key (spec.md §4.1: "must be the LAST extension in
/// a ClientHello when the recipient is a server").
pub const PRE_SHARED_KEY_TLS_ID: u16 = 41;
