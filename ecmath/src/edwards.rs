//! Edwards-form point arithmetic, projective coordinates `(X, Y, Z)` with
//! affine `(x, y) = (X/Z, Y/Z)` (spec.md §3).
//!
//! Two doubling formulas live here because the reference ships two: the
//! "complete" twisted-Edwards formula (`madd-2008-bbjlp` / `dup-2008`) used
//! for Ed25519, and a second homogeneous-coordinate doubling
//! (`ecc-dup-eh.c`) Nettle uses specifically for Curve448's Edwards form.
//! Both share the same `Point<L>` representation; which doubling formula
//! applies is a property of the curve (`EdwardsVariant`), not the point.

use crate::field::{FieldElement, Modulus};
use subtle::Choice;

#[derive(Clone, Copy)]
pub enum EdwardsVariant {
    /// `-x^2 + y^2 = 1 + d*x^2*y^2` (Ed25519). Complete for every input,
    /// including the identity and doublings, which is what lets scalar
    /// multiplication below be branch-free.
    Twisted,
    /// Ed448's `x^2 + y^2 = 1 + d*x^2*y^2`, doubled via `dup_eh`
    /// (homogeneous projective, not the twisted form's `dup_th`).
    Ed448Homogeneous,
}

#[derive(Clone, Copy)]
pub struct Point<const L: usize> {
    pub x: FieldElement<L>,
    pub y: FieldElement<L>,
    pub z: FieldElement<L>,
}

impl<const L: usize> Point<L> {
    pub fn identity(m: &Modulus<L>) -> Self {
        Point {
            x: FieldElement::zero(m),
            y: FieldElement::one(m),
            z: FieldElement::one(m),
        }
    }

    pub fn to_affine(&self, m: &Modulus<L>) -> crate::error::Result<(FieldElement<L>, FieldElement<L>)> {
        let z_inv = self.z.invert(m)?;
        Ok((self.x.mul(&z_inv), self.y.mul(&z_inv)))
    }

    /// `add_th`: "madd-2008-bbjlp", 10M+1S. Nettle's `d` is the negation
    /// of the paper's, which swaps which of the two cross terms is added
    /// versus subtracted (`F`/`G` below) relative to the textbook
    /// formula — carried over verbatim from `ecc-add-th.c`'s comment,
    /// not re-derived from the paper.
    pub fn add_twisted(&self, other: &Self, d: &FieldElement<L>, m: &Modulus<L>) -> Self {
        let a = self.z.mul(&other.z); // A = Z1*Z2
        let b = a.square(); // B = A^2
        let c = self.x.mul(&other.x); // C = X1*X2
        let dd = self.y.mul(&other.y); // D = Y1*Y2
        let e = d.mul(&c).mul(&dd); // E = d*C*D
        let f = b.sub(&e); // F = B - E  (sign swapped vs paper, see above)
        let g = b.add(&e); // G = B + E
        let x3 = a
            .mul(&f)
            .mul(&self.x.add(&self.y).mul(&other.x.add(&other.y)).sub(&c).sub(&dd));
        let y3 = a.mul(&g).mul(&dd.sub(&c));
        let z3 = f.mul(&g);
        Point { x: x3, y: y3, z: z3 }
    }

    /// `dup_th`: 3M+4S, complete doubling for the twisted form.
    /// `B=(X+Y)^2, C=X^2, D=Y^2, F=-C+D, J=2Z^2-F, X'=(B-C-D)*J,
    /// Y'=F*(C+D), Z'=F*J`.
    pub fn double_twisted(&self) -> Self {
        let b = self.x.add(&self.y).square();
        let c = self.x.square();
        let d = self.y.square();
        let f = d.sub(&c);
        let j = self.z.square().double().sub(&f);
        let x3 = b.sub(&c).sub(&d).mul(&j);
        let y3 = f.mul(&c.add(&d));
        let z3 = f.mul(&j);
        Point { x: x3, y: y3, z: z3 }
    }

    /// `dup_eh`: `B=(X+Y)^2, C=X^2, D=Y^2, E=C+D, H=Z^2, J=E-2H,
    /// X'=(B-E)*J, Y'=E*(C-D), Z'=E*J`, Curve448's homogeneous-coordinate
    /// variant (`ecc-dup-eh.c`) — distinct from `dup_th` above even though
    /// both operate on the same `(X, Y, Z)` shape.
    pub fn double_ed448(&self) -> Self {
        let b = self.x.add(&self.y).square();
        let c = self.x.square();
        let d = self.y.square();
        let e = c.add(&d);
        let h = self.z.square();
        let j = e.sub(&h.double());
        let x3 = b.sub(&e).mul(&j);
        let y3 = e.mul(&c.sub(&d));
        let z3 = e.mul(&j);
        Point { x: x3, y: y3, z: z3 }
    }

    pub fn double(&self, variant: EdwardsVariant) -> Self {
        match variant {
            EdwardsVariant::Twisted => self.double_twisted(),
            EdwardsVariant::Ed448Homogeneous => self.double_ed448(),
        }
    }

    pub fn is_identity(&self, m: &Modulus<L>) -> Choice {
        let (x, y) = self
            .to_affine(m)
            .unwrap_or((FieldElement::zero(m), FieldElement::zero(m)));
        x.is_zero() & y.ct_eq(&FieldElement::one(m))
    }
}

/// Branchless double-and-add scalar multiplication, safe because both
/// doubling formulas above are complete for every input (spec.md §4.3:
/// "complete for the identity and for P = Q, allowing branchless scalar
/// multiplication").
pub fn scalar_mul<const L: usize>(
    scalar_bits: &[bool],
    base: &Point<L>,
    d: &FieldElement<L>,
    variant: EdwardsVariant,
    m: &Modulus<L>,
) -> Point<L> {
    let mut acc = Point::identity(m);
    for &bit in scalar_bits {
        acc = acc.double(variant);
        let sum = acc.add_twisted(base, d, m);
        acc = crate::select::point_select(&acc, &sum, bit);
    }
    acc
}
