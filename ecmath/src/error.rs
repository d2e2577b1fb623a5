/// Errors raised by field and point arithmetic.
///
/// These map to the `Range` and `Crypto` buckets of the workspace-wide error
/// taxonomy (see `SPEC_FULL.md` §4.0.1); there is no `Format` bucket here
/// because this crate never parses wire bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A scalar or coordinate was not in the value's required range
    /// (e.g. an inverse requested for zero, or a decompressed point that
    /// fails its curve-equation check).
    NotOnCurve,
    /// `mod_inv` was asked to invert zero, which has no inverse.
    NotInvertible,
    /// `mod_sqrt` found no square root (the input was a quadratic
    /// non-residue).
    NoSquareRoot,
    /// A Montgomery ladder shared secret evaluated to all-zero, which
    /// RFC 7748 requires implementations to reject.
    AllZeroSharedSecret,
    /// A byte slice handed to a decode routine was the wrong length for
    /// the curve's coordinate size.
    BadLength,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Error::NotOnCurve => "point is not on the curve",
            Error::NotInvertible => "value has no modular inverse",
            Error::NoSquareRoot => "no modular square root exists",
            Error::AllZeroSharedSecret => "Diffie-Hellman shared secret is all-zero",
            Error::BadLength => "coordinate byte length mismatch",
        };
        f.write_str(s)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
