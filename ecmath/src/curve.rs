//! Curve identity and the generic curve-descriptor shape (spec.md §3's
//! "Curve Descriptor").

use crate::field::{FieldElement, Modulus};
use crypto_bigint::Uint;
use zeroize::Zeroize;

/// Every curve form this crate supports. Carried as plain data (not a
/// trait object) because the concrete limb width `L` differs per curve and
/// Rust can't erase a const generic behind a trait object without an extra
/// indirection layer; `gtls-pk` matches on this enum and calls into the
/// concrete `curves::*` module, exactly as the reference's PK dispatch
/// switches on a curve id before touching any curve-specific code (spec.md
/// §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CurveId {
    P256,
    P384,
    P521,
    Gost256A,
    Curve25519,
    Ed25519,
    Curve448,
    Ed448,
}

impl CurveId {
    /// Bit size of the field modulus, per spec.md §3's "Curve Descriptor:
    /// bit size".
    pub const fn bit_size(self) -> usize {
        match self {
            CurveId::P256 => 256,
            CurveId::P384 => 384,
            CurveId::P521 => 521,
            CurveId::Gost256A => 256,
            CurveId::Curve25519 | CurveId::Ed25519 => 255,
            CurveId::Curve448 | CurveId::Ed448 => 448,
        }
    }

    pub const fn byte_size(self) -> usize {
        (self.bit_size() + 7) / 8
    }

    pub const fn form(self) -> CurveForm {
        match self {
            CurveId::P256 | CurveId::P384 | CurveId::P521 | CurveId::Gost256A => {
                CurveForm::ShortWeierstrass
            }
            CurveId::Ed25519 | CurveId::Ed448 => CurveForm::Edwards,
            CurveId::Curve25519 | CurveId::Curve448 => CurveForm::Montgomery,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveForm {
    ShortWeierstrass,
    Edwards,
    Montgomery,
}

/// A scalar: an element of `Z/qZ` where `q` is the group order, represented
/// the same way as a field element but tagged separately so the type
/// system never confuses "reduced mod p" with "reduced mod q" (the
/// reference conflates both as `mpz_t`/limb arrays and relies on the
/// caller to track which modulus is in play; spec.md §3 calls this out as
/// "an analogous record for the group order q").
#[derive(Clone, Copy)]
pub struct Scalar<const L: usize> {
    pub(crate) value: FieldElement<L>,
}

impl<const L: usize> Scalar<L> {
    pub fn from_uint(v: Uint<L>, order: &Modulus<L>) -> Self {
        Scalar {
            value: FieldElement::from_uint(v, order),
        }
    }

    pub fn to_uint(&self) -> Uint<L> {
        self.value.to_uint()
    }
}

impl<const L: usize> Zeroize for Scalar<L> {
    fn zeroize(&mut self) {
        self.value.zeroize();
    }
}

impl<const L: usize> Drop for Scalar<L> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Generic curve constants shared by every form (spec.md §3's "curve
/// constants (b, generator g, ...)"). Weierstrass-only fields (`b`),
/// Edwards-only fields (`d`), and Montgomery-only fields (`a24`) live in
/// their respective `curves::*` submodules next to the params that use
/// them, rather than here as `Option`s nobody but one curve form fills in.
pub struct CurveParams<const L: usize> {
    pub p: Modulus<L>,
    pub order: Modulus<L>,
    pub bit_size: usize,
}
