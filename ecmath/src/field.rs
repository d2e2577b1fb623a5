//! Modular field arithmetic, generic over limb width.
//!
//! Every curve in this crate picks a limb count `L` (`Uint<L>` is a
//! `crypto_bigint` fixed-width integer of `64*L` bits) large enough to hold
//! its field modulus: `L = 4` for the 256-bit curves, `L = 6` for P-384,
//! `L = 7` for the 448-bit curves, `L = 9` for P-521 (521 bits rounded up
//! to a whole number of 64-bit limbs). This mirrors the reference design's
//! "limb count sized from the curve descriptor" (spec.md §3) while reusing
//! one generic implementation instead of one hand-specialized reduction
//! routine per curve; the one genuinely curve-specific reduction (Curve448's
///! pseudo-Mersenne shortcut) is layered on top in `curve448.rs` rather than
//! forking this module.

use crate::fmt::trace;
use crypto_bigint::modular::runtime_mod::{DynResidue, DynResidueParams};
use crypto_bigint::{NonZero, Uint};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

/// Parameters for one prime modulus: the modulus itself plus the Montgomery
/// parameters `crypto_bigint` precomputes from it. This stands in for the
/// reference's `B` / `B_shifted` / `(m+1)/2` fields (spec.md §3's Curve
/// Descriptor) — `DynResidueParams` carries the equivalent Montgomery
/// constants (R, R^2 mod m, the negated modular inverse) under the hood.
#[derive(Clone, Copy)]
pub struct Modulus<const L: usize> {
    params: DynResidueParams<L>,
    modulus: Uint<L>,
}

impl<const L: usize> Modulus<L> {
    /// Build from a big-endian modulus. `m` must be odd (true for every
    /// curve modulus this crate supports; Montgomery form requires it).
    pub const fn new(m: Uint<L>) -> Self {
        Modulus {
            params: DynResidueParams::new(&m),
            modulus: m,
        }
    }

    pub const fn value(&self) -> &Uint<L> {
        &self.modulus
    }
}

/// An element of `Z/mZ`, held in Montgomery form so repeated multiplication
/// (the common case in point arithmetic) avoids a full reduction each time.
#[derive(Clone, Copy)]
pub struct FieldElement<const L: usize> {
    pub(crate) residue: DynResidue<L>,
}

impl<const L: usize> FieldElement<L> {
    pub fn zero(m: &Modulus<L>) -> Self {
        FieldElement {
            residue: DynResidue::zero(m.params),
        }
    }

    pub fn one(m: &Modulus<L>) -> Self {
        FieldElement {
            residue: DynResidue::one(m.params),
        }
    }

    /// Reduce an arbitrary big-endian integer into the field. Corresponds
    /// to spec.md §4.3's generic `ecc_mod`: full-width input, modulus-sized
    /// output in `[0, m)` (not `[0, 2m)` — `crypto_bigint` always returns
    /// the fully reduced canonical representative, which is a strictly
    /// stronger guarantee than the reference's lazily-reduced `[0, 2m)`,
    /// so every caller here is still correct under the reference's weaker
    /// contract).
    pub fn from_uint(v: Uint<L>, m: &Modulus<L>) -> Self {
        FieldElement {
            residue: DynResidue::new(&v, m.params),
        }
    }

    pub fn to_uint(&self) -> Uint<L> {
        self.residue.retrieve()
    }

    /// Constant-time add, mirroring `mod_add`.
    pub fn add(&self, other: &Self) -> Self {
        FieldElement {
            residue: self.residue.add(&other.residue),
        }
    }

    /// Constant-time subtract, mirroring `mod_sub`.
    pub fn sub(&self, other: &Self) -> Self {
        FieldElement {
            residue: self.residue.sub(&other.residue),
        }
    }

    pub fn neg(&self) -> Self {
        FieldElement {
            residue: self.residue.neg(),
        }
    }

    /// `mod_mul`.
    pub fn mul(&self, other: &Self) -> Self {
        FieldElement {
            residue: self.residue.mul(&other.residue),
        }
    }

    /// `mod_sqr`.
    pub fn square(&self) -> Self {
        FieldElement {
            residue: self.residue.square(),
        }
    }

    pub fn double(&self) -> Self {
        self.add(self)
    }

    pub fn mul_small(&self, k: u64, m: &Modulus<L>) -> Self {
        let mut acc = FieldElement::zero(m);
        let mut base = *self;
        let mut k = k;
        while k > 0 {
            if k & 1 == 1 {
                acc = acc.add(&base);
            }
            base = base.double();
            k >>= 1;
        }
        acc
    }

    /// Raise `self` to `exp` via the same fixed-width Montgomery ladder
    /// `invert`/`sqrt` already lean on `DynResidue::pow` for. Exposed
    /// directly for callers that need an exponent other than `p-2`/`(p+1)/4`
    /// (Ed25519's `(p+3)/8` candidate square root, spec.md §4.3).
    pub fn pow(&self, exp: &Uint<L>) -> Self {
        FieldElement {
            residue: self.residue.pow(exp),
        }
    }

    /// `mod_inv` by Fermat's little theorem (`self^(p-2)`): constant-time
    /// with respect to `self` since exponentiation here always walks the
    /// same fixed-width exponent regardless of the base, matching the
    /// reference's requirement that inversion on secret inputs be
    /// branch-free (spec.md §4.3).
    pub fn invert(&self, m: &Modulus<L>) -> crate::error::Result<Self> {
        let p_minus_2 = m
            .value()
            .wrapping_sub(&Uint::<L>::from(2u64));
        let candidate = FieldElement {
            residue: self.residue.pow(&p_minus_2),
        };
        // self * candidate == 1 unless self was zero, in which case Fermat's
        // theorem degenerates to 0^(p-2) = 0 and the product stays zero.
        let is_zero = self.residue.retrieve().is_zero();
        if bool::from(is_zero) {
            return Err(crate::error::Error::NotInvertible);
        }
        Ok(candidate)
    }

    /// `mod_sqrt` for primes `p ≡ 3 (mod 4)` (P-256/P-384/P-521, GOST256A,
    /// and Curve448/Ed448's field, per spec.md §4.3): the square root, if
    /// it exists, is `self^((p+1)/4)`. Caller must verify `result^2 ==
    /// self` — a quadratic non-residue input produces a value whose
    /// square is `-self`, not `self`, silently, which is why `mod_sqrt` is
    /// documented (spec.md §4.3) as needing that follow-up check rather
    /// than trusting the exponentiation alone.
    ///
    /// Curve25519/Ed25519's field modulus is `p ≡ 5 (mod 8)` instead; use
    /// [`sqrt_5mod8`](Self::sqrt_5mod8) there.
    pub fn sqrt(&self, m: &Modulus<L>) -> crate::error::Result<Self> {
        let p = m.value();
        let exp = p
            .wrapping_add(&Uint::<L>::from(1u64))
            .shr_vartime(2);
        let candidate = FieldElement {
            residue: self.residue.pow(&exp),
        };
        let check = candidate.square();
        if bool::from(check.residue.retrieve().ct_eq(&self.residue.retrieve())) {
            Ok(candidate)
        } else {
            Err(crate::error::Error::NoSquareRoot)
        }
    }

    /// `mod_sqrt` for primes `p ≡ 5 (mod 8)` — Curve25519/Ed25519's field
    /// (RFC 8032 §5.1.3's recommended square-root algorithm). The
    /// `p ≡ 3 (mod 4)` shortcut in [`sqrt`](Self::sqrt) does not apply
    /// here, since `(p+1)/4` is not an integer exponent that recovers a
    /// root directly; instead try `self^((p+3)/8)` and, if that candidate's
    /// square lands on `-self` rather than `self`, correct it by
    /// multiplying with a fixed primitive fourth root of unity
    /// `2^((p-1)/4) mod p`.
    pub fn sqrt_5mod8(&self, m: &Modulus<L>) -> crate::error::Result<Self> {
        let p = m.value();
        let exp = p
            .wrapping_add(&Uint::<L>::from(3u64))
            .shr_vartime(3);
        let candidate = FieldElement {
            residue: self.residue.pow(&exp),
        };
        let check = candidate.square();
        if bool::from(check.residue.retrieve().ct_eq(&self.residue.retrieve())) {
            return Ok(candidate);
        }

        let sqrt_minus_one_exp = p.wrapping_sub(&Uint::<L>::from(1u64)).shr_vartime(2);
        let two = FieldElement {
            residue: DynResidue::new(&Uint::<L>::from(2u64), self.residue.params()),
        };
        let sqrt_minus_one = FieldElement {
            residue: two.residue.pow(&sqrt_minus_one_exp),
        };
        let candidate2 = candidate.mul(&sqrt_minus_one);
        let check2 = candidate2.square();
        if bool::from(check2.residue.retrieve().ct_eq(&self.residue.retrieve())) {
            Ok(candidate2)
        } else {
            Err(crate::error::Error::NoSquareRoot)
        }
    }

    pub fn is_zero(&self) -> Choice {
        self.residue.retrieve().is_zero()
    }

    pub fn ct_eq(&self, other: &Self) -> Choice {
        self.residue.retrieve().ct_eq(&other.residue.retrieve())
    }
}

impl<const L: usize> ConditionallySelectable for FieldElement<L> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        FieldElement {
            residue: DynResidue::conditional_select(&a.residue, &b.residue, choice),
        }
    }
}

impl<const L: usize> Zeroize for FieldElement<L> {
    fn zeroize(&mut self) {
        trace!("zeroizing field element");
        let z = Uint::<L>::ZERO;
        // `DynResidue` has no public zero-in-place API; rebuild from a
        // fresh zero value under the same params and overwrite `self`,
        // which is what every other secret-bearing type in this crate does
        // on drop (see `Scalar::zeroize` in `curve.rs`).
        self.residue = DynResidue::new(&z, self.residue.params());
    }
}

/// Sizes `gtls-ecmath` ships concrete curve parameters for.
pub type Limbs256 = [u64; 4];
pub type Limbs384 = [u64; 6];
pub type Limbs448 = [u64; 7];
pub type Limbs521 = [u64; 9];

pub(crate) fn nonzero<const L: usize>(u: Uint<L>) -> NonZero<Uint<L>> {
    NonZero::new(u).expect("curve constant must be nonzero")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::curve25519;

    #[test]
    fn sqrt_5mod8_recovers_perfect_square() {
        let m = curve25519::field();
        let base = FieldElement::from_uint(Uint::<4>::from_u64(12345), &m);
        let square = base.square();
        let root = square.sqrt_5mod8(&m).expect("12345^2 is a square by construction");
        assert!(bool::from(root.square().ct_eq(&square)));
    }

    #[test]
    fn sqrt_3mod4_recovers_perfect_square() {
        let m = crate::curves::p256::params().p;
        let base = FieldElement::from_uint(Uint::<4>::from_u64(777), &m);
        let square = base.square();
        let root = square.sqrt(&m).expect("777^2 is a square by construction");
        assert!(bool::from(root.square().ct_eq(&square)));
    }
}
