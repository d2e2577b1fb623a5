//! Montgomery-ladder scalar multiplication over the `u`-coordinate only
//! (spec.md §4.3's `ecc_mul_m`), used by X25519 and X448. Follows RFC 7748
//! directly: curve equation `By^2 = x^3 + A x^2 + x`, ladder constant
//! `a24 = (A+2)/4`.

use crate::field::{FieldElement, Modulus};
use crate::select::cswap;
use subtle::Choice;

/// `(X, Z)` projective `u`-coordinate-only point.
#[derive(Clone, Copy)]
pub struct Xz<const L: usize> {
    pub x: FieldElement<L>,
    pub z: FieldElement<L>,
}

/// One ladder step (RFC 7748 §5): given `(x2,z2)` and `(x3,z3)` and the
/// base `x1`, produce the doubled and the summed point.
fn ladder_step<const L: usize>(
    x1: &FieldElement<L>,
    x2: &FieldElement<L>,
    z2: &FieldElement<L>,
    x3: &FieldElement<L>,
    z3: &FieldElement<L>,
    a24: &FieldElement<L>,
) -> (FieldElement<L>, FieldElement<L>, FieldElement<L>, FieldElement<L>) {
    let a = x2.add(z2);
    let aa = a.square();
    let b = x2.sub(z2);
    let bb = b.square();
    let e = aa.sub(&bb);
    let c = x3.add(z3);
    let d = x3.sub(z3);
    let da = d.mul(&a);
    let cb = c.mul(&b);
    let x5 = da.add(&cb).square();
    let z5 = x1.mul(&da.sub(&cb).square());
    let x4 = aa.mul(&bb);
    let z4 = e.mul(&bb.add(&a24.mul(&e)));
    (x4, z4, x5, z5)
}

/// Full ladder over `bit_high..=bit_low` active scalar bits, matching
/// spec.md §4.3's description: double the base once up front (top bit
/// forced on), walk down from `bit_high` to `bit_low` doing one
/// conditional-swap-then-step per bit, then apply `bit_low` extra
/// doublings to clear any low bits the caller already cleared in the
/// scalar encoding (X25519/X448 clamping).
pub fn ladder<const L: usize>(
    scalar_bits_msb_first: &[bool],
    extra_low_doublings: u32,
    u: &FieldElement<L>,
    a24: &FieldElement<L>,
    m: &Modulus<L>,
) -> Xz<L> {
    let mut x2 = FieldElement::one(m);
    let mut z2 = FieldElement::zero(m);
    let mut x3 = *u;
    let mut z3 = FieldElement::one(m);

    let mut swap = Choice::from(0u8);
    for &bit in scalar_bits_msb_first {
        let b = Choice::from(bit as u8);
        let do_swap = swap ^ b;
        cswap(do_swap, &mut x2, &mut x3);
        cswap(do_swap, &mut z2, &mut z3);
        swap = b;

        let (nx2, nz2, nx3, nz3) = ladder_step(u, &x2, &z2, &x3, &z3, a24);
        x2 = nx2;
        z2 = nz2;
        x3 = nx3;
        z3 = nz3;
    }
    cswap(swap, &mut x2, &mut x3);
    cswap(swap, &mut z2, &mut z3);

    for _ in 0..extra_low_doublings {
        let (nx2, nz2, _, _) = ladder_step(u, &x2, &z2, &x2, &z2, a24);
        x2 = nx2;
        z2 = nz2;
    }

    Xz { x: x2, z: z2 }
}

impl<const L: usize> Xz<L> {
    /// Canonical affine `u`-coordinate: `x/z`, with a subtract-modulus/
    /// conditional-add final reduction folded into `FieldElement::to_uint`
    /// via `crypto_bigint`'s canonical Montgomery retrieval (spec.md
    /// §4.3: "converts to affine via one modular inversion and a
    /// canonical subtract-m/conditional-add reduction").
    pub fn to_u(&self, m: &Modulus<L>) -> crate::error::Result<FieldElement<L>> {
        let z_inv = self.z.invert(m)?;
        Ok(self.x.mul(&z_inv))
    }
}
