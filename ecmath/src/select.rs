//! Small constant-time selection helpers shared by the Edwards and
//! Montgomery ladders, standing in for the reference's `cnd_swap`/
//! `cnd_copy` primitives (spec.md §4.3, §5: "conditional swap and
//! conditional copy must be constant-time with respect to the bit value").

use crate::edwards::Point;
use crate::field::FieldElement;
use subtle::{Choice, ConditionallySelectable};

pub fn point_select<const L: usize>(a: &Point<L>, b: &Point<L>, bit: bool) -> Point<L> {
    let choice = Choice::from(bit as u8);
    Point {
        x: FieldElement::conditional_select(&a.x, &b.x, choice),
        y: FieldElement::conditional_select(&a.y, &b.y, choice),
        z: FieldElement::conditional_select(&a.z, &b.z, choice),
    }
}

/// Constant-time conditional swap of two values, used by the Montgomery
/// ladder's per-bit `(x2,z2) <-> (x3,z3)` swap (RFC 7748 `cswap`).
pub fn cswap<const L: usize>(
    swap: Choice,
    a: &mut FieldElement<L>,
    b: &mut FieldElement<L>,
) {
    let new_a = FieldElement::conditional_select(a, b, swap);
    let new_b = FieldElement::conditional_select(b, a, swap);
    *a = new_a;
    *b = new_b;
}
