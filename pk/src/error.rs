//! Public-key dispatch error taxonomy (spec.md §7), grouped the same six
//! ways every crate in this workspace groups errors: Format / Range /
//! Policy / Resource / State / Crypto.

/// Errors raised by `gtls-pk`'s public entry points.
///
/// Variants carry only the structured data a caller needs to act; no
/// allocating message strings are required (matching the teacher's
/// `OrtError`/alert-description style of a flat enum of named variants).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // -- Format --
    /// A signature or ciphertext did not parse as the expected DER/fixed-
    /// width shape.
    MalformedSignature,

    // -- Range --
    /// Key parameters (digest length vs. key size, PSS salt length, DH
    /// peer value) fell outside the required interval.
    InvalidPubkeyParams,
    /// A value the caller supplied directly violated a hard range
    /// constraint (GOST digest length mismatch, DH Y ≤ 1).
    InvalidRequest,

    // -- Policy --
    /// The requested behavior is disallowed under the active `Policy`
    /// (deterministic signing requested under FIPS outside self-test).
    Disallowed,

    // -- Resource --
    /// An output buffer was too small for the operation's result.
    BufferTooSmall { required: usize },

    // -- State --
    /// The library is in a terminal error state (`state::is_operational`
    /// returned false); no further crypto calls are served.
    LibraryPoisoned,

    // -- Crypto --
    /// Signature or MAC verification failed.
    VerificationFailed,
    /// The pairwise consistency test run after FIPS-mode key generation
    /// failed; this also poisons the library (spec.md §4.4).
    PctFailed,
    /// A Diffie-Hellman/ECDH derivation produced the all-zero shared
    /// secret (RFC 7748's required rejection for X25519/X448).
    AllZeroSharedSecret,

    /// Wraps an error surfaced by `gtls-asn1` (signature/SPKI (de)serialization).
    Asn1(gtls_asn1::Error),
    /// Wraps an error surfaced by `gtls-ecmath` (point/field arithmetic).
    Ecmath(gtls_ecmath::Error),
}

impl From<gtls_asn1::Error> for Error {
    fn from(e: gtls_asn1::Error) -> Self {
        Error::Asn1(e)
    }
}

impl From<gtls_ecmath::Error> for Error {
    fn from(e: gtls_ecmath::Error) -> Self {
        Error::Ecmath(e)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::MalformedSignature => f.write_str("malformed signature encoding"),
            Error::InvalidPubkeyParams => f.write_str("public-key parameters out of range"),
            Error::InvalidRequest => f.write_str("request parameters out of range"),
            Error::Disallowed => f.write_str("operation disallowed under the active policy"),
            Error::BufferTooSmall { required } => write!(f, "output buffer too small, need {required} bytes"),
            Error::LibraryPoisoned => f.write_str("library is in a terminal error state"),
            Error::VerificationFailed => f.write_str("signature verification failed"),
            Error::PctFailed => f.write_str("pairwise consistency test failed"),
            Error::AllZeroSharedSecret => f.write_str("Diffie-Hellman shared secret is all-zero"),
            Error::Asn1(e) => write!(f, "asn1 error: {e}"),
            Error::Ecmath(e) => write!(f, "ec-math error: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
