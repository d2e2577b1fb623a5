//! Error taxonomy for schema compilation, DER encode, and DER decode
//! (spec.md §4.2, §7; `SPEC_FULL.md` §4.2's supplement keeping the finer
//! `ASN1_TAG_ERROR`/`ASN1_DER_ERROR`/`ASN1_VALUE_NOT_FOUND` distinctions
//! GnuTLS's callers branch on, alongside the umbrella variants spec.md
//! names directly).

use alloc::string::String;

/// Errors raised while compiling a flat schema template into a node tree
/// (`array2tree`, spec.md §4.2).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    /// A cross-reference (OBJECT IDENTIFIER splice, `CONST_ASSIGN` link)
    /// named an identifier the schema never defines.
    IdentifierNotFound(String),
    /// An assignment's tag could not be resolved against the universal
    /// tag set.
    UnknownTag(String),
    /// The schema stream was empty or malformed (missing down/right link
    /// targets).
    EmptyGrammar,
}

impl core::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SchemaError::IdentifierNotFound(name) => write!(f, "identifier not found: {name}"),
            SchemaError::UnknownTag(name) => write!(f, "unknown tag for: {name}"),
            SchemaError::EmptyGrammar => f.write_str("empty or malformed schema grammar"),
        }
    }
}

/// Errors raised by `encode` (spec.md §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodeError {
    /// The output buffer was too small; two-pass sizing mode reports the
    /// required size instead of failing outright.
    BufferTooSmall { required: usize },
    /// A length or tag value exceeded this crate's compile-time maximums
    /// (spec.md §9 Open Question (b)).
    ValueTooLarge,
    /// A node required for encoding (e.g. an unresolved CHOICE) was
    /// missing a selected alternative.
    MissingValue,
}

impl core::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EncodeError::BufferTooSmall { required } => {
                write!(f, "output buffer too small, need {required} bytes")
            }
            EncodeError::ValueTooLarge => f.write_str("tag or length exceeds maximum encodable size"),
            EncodeError::MissingValue => f.write_str("node has no value to encode"),
        }
    }
}

/// Errors raised by DER decoding (spec.md §4.2's "strict bound checking on
/// every length").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// A length or tag prefix ran past the end of the input.
    Truncated,
    /// A definite length claimed more bytes than remain in the input.
    LengthOverrun,
    /// Trailing bytes remained after the expected structure was fully
    /// consumed.
    TrailingBytes,
    /// A length was encoded in more bytes than its minimal form requires
    /// (DER strict mode forbids this).
    NonMinimalLength,
    /// An indefinite-length (BER-only) encoding was seen; DER requires
    /// definite lengths.
    IndefiniteLength,
    /// The decoded tag did not match what the schema or caller expected.
    TagMismatch,
    /// A value was syntactically well-formed DER but failed a type-specific
    /// constraint (e.g. a non-canonical BOOLEAN octet, BIT STRING unused-bit
    /// count out of range).
    InvalidValue,
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            DecodeError::Truncated => "truncated DER input",
            DecodeError::LengthOverrun => "length overruns remaining input",
            DecodeError::TrailingBytes => "trailing bytes after decoded structure",
            DecodeError::NonMinimalLength => "non-minimal DER length encoding",
            DecodeError::IndefiniteLength => "indefinite length is not valid DER",
            DecodeError::TagMismatch => "unexpected tag",
            DecodeError::InvalidValue => "value fails type-specific constraint",
        };
        f.write_str(s)
    }
}

/// Umbrella error type a caller who does not need the finer distinctions
/// above can match on, matching spec.md §4.2's single `DerError` behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    Schema(SchemaError),
    Encode(EncodeError),
    Decode(DecodeError),
    /// `write_value`/path resolution failed: the dotted path did not
    /// resolve to a node.
    PathNotFound(String),
}

impl From<SchemaError> for Error {
    fn from(e: SchemaError) -> Self {
        Error::Schema(e)
    }
}
impl From<EncodeError> for Error {
    fn from(e: EncodeError) -> Self {
        Error::Encode(e)
    }
}
impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Schema(e) => write!(f, "schema error: {e}"),
            Error::Encode(e) => write!(f, "encode error: {e}"),
            Error::Decode(e) => write!(f, "decode error: {e}"),
            Error::PathNotFound(p) => write!(f, "path not found: {p}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
