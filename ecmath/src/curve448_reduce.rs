//! Curve448's pseudo-Mersenne fast reduction (spec.md §4.3): `p = 2^448 -
//! 2^224 - 1`. `gtls-ecmath`'s generic path (`field::FieldElement`, backed
//! by `crypto_bigint`'s Montgomery residues) is curve-agnostic and is what
//! every point-arithmetic routine in this crate actually calls; this module
//! is the specialised shortcut spec.md calls out by name for Curve448 and
//! exists so the reduction identity itself — not just its effect — is
//! reviewable against the reference's `ecc_curve448_modp`.
//!
//! Ported from Nettle's `ecc-curve448.c`: for a double-width product split
//! into 14 32-bit half-limbs `r[13..0]` (`r` little-endian, `r[0]` least
//! significant), the reduction is
//!
//! ```text
//! {r6..r0} + {r10..r7} + 2*{r13..r11}*B^4 + (2^32)*{r10..r7,r13..r11}
//! ```
//!
//! followed by a conditional subtraction of `p`, where `B = 2^32`.

use subtle::{Choice, ConditionallySelectable};

/// Number of 32-bit half-limbs in a double-width Curve448 product
/// (`2 * 448 / 32 = 28`, but the reference folds the top bits down to 14
/// half-limbs of *reduced* width before this final step — see
/// `ecc_curve448_modp`'s comment for the two-stage fold this function
/// implements the second stage of).
const HALF_LIMBS: usize = 14;

/// `p = 2^448 - 2^224 - 1` as 14 little-endian 32-bit half-limbs.
fn modulus_halflimbs() -> [u32; HALF_LIMBS] {
    let mut m = [u32::MAX; HALF_LIMBS];
    m[7] = u32::MAX - 1; // the `-2^224` term lands in half-limb 7 (bit 224)
    m
}

/// Reduce a 14-half-limb (little-endian, each `< 2^32`) quantity into
/// `[0, p)`. Half-limbs above index 13 are assumed already folded by the
/// caller (the full double-width fold is two applications of this
/// function, matching Nettle's own two-pass `ecc_curve448_modp`).
pub fn reduce(r: &[u32; HALF_LIMBS]) -> [u32; HALF_LIMBS] {
    // acc = {r6..r0} + {r10..r7} + 2*{r13..r11}*B^4 + (2^32)*{r10..r7,r13..r11}
    // computed limb-by-limb with carry propagation in u64.
    let mut acc = [0u64; HALF_LIMBS + 1];
    for i in 0..=6 {
        acc[i] += r[i] as u64;
    }
    for i in 0..=3 {
        acc[i + 4] += r[7 + i] as u64; // {r10..r7} added at half-limb offset 4
    }
    for i in 0..=2 {
        acc[i + 4] += 2 * r[11 + i] as u64; // 2*{r13..r11}*B^4, offset 4
    }
    for i in 0..=3 {
        acc[i + 1] += r[7 + i] as u64; // (2^32)*{r10..r7}, shifted up one half-limb
    }
    for i in 0..=2 {
        acc[i + 5] += r[11 + i] as u64; // (2^32)*{r13..r11}
    }

    let mut carry = 0u64;
    let mut out = [0u32; HALF_LIMBS];
    for i in 0..HALF_LIMBS {
        let v = acc[i] + carry;
        out[i] = v as u32;
        carry = v >> 32;
    }
    let top = carry + acc[HALF_LIMBS];

    conditional_sub_modulus(fold_overflow(out, top))
}

/// Fold anything left in the 15th limb back in by one more pseudo-Mersenne
/// reduction step (`2^448 = 2^224 + 1`, so overflow at half-limb 14 (bit
/// 448) contributes `overflow` to half-limb 0 and `overflow` to half-limb 7).
fn fold_overflow(mut limbs: [u32; HALF_LIMBS], overflow: u64) -> [u32; HALF_LIMBS] {
    let mut carry = overflow;
    let v = limbs[0] as u64 + carry;
    limbs[0] = v as u32;
    carry = v >> 32;
    let mut i = 1;
    while carry > 0 && i < HALF_LIMBS {
        let v = limbs[i] as u64 + carry;
        limbs[i] = v as u32;
        carry = v >> 32;
        i += 1;
    }
    let v = limbs[7] as u64 + overflow;
    limbs[7] = v as u32;
    let mut carry = v >> 32;
    let mut i = 8;
    while carry > 0 && i < HALF_LIMBS {
        let v = limbs[i] as u64 + carry;
        limbs[i] = v as u32;
        carry = v >> 32;
        i += 1;
    }
    limbs
}

/// Constant-time conditional subtraction of `p`, bringing a `[0, 2p)`
/// accumulator into canonical `[0, p)` range (spec.md §4.3's `mod_add`/
/// `mod_sub` "conditional add/sub of m" discipline, applied here to the
/// curve-specific reduction rather than the generic one).
fn conditional_sub_modulus(limbs: [u32; HALF_LIMBS]) -> [u32; HALF_LIMBS] {
    let m = modulus_halflimbs();
    let mut borrow: i64 = 0;
    let mut sub = [0u32; HALF_LIMBS];
    for i in 0..HALF_LIMBS {
        let d = limbs[i] as i64 - m[i] as i64 - borrow;
        if d < 0 {
            sub[i] = (d + (1i64 << 32)) as u32;
            borrow = 1;
        } else {
            sub[i] = d as u32;
            borrow = 0;
        }
    }
    // borrow == 1 means limbs < m already; pick `limbs` in that case,
    // `sub` otherwise. Both branches are computed unconditionally above.
    let take_sub = Choice::from((borrow == 0) as u8);
    let mut out = [0u32; HALF_LIMBS];
    for i in 0..HALF_LIMBS {
        out[i] = u32::conditional_select(&limbs[i], &sub[i], take_sub);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_reduces_to_zero() {
        let r = [0u32; HALF_LIMBS];
        assert_eq!(reduce(&r), [0u32; HALF_LIMBS]);
    }

    #[test]
    fn modulus_reduces_to_zero() {
        let m = modulus_halflimbs();
        let reduced = reduce(&m);
        assert_eq!(reduced, [0u32; HALF_LIMBS]);
    }
}
