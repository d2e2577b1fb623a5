//! EdDSA sign/verify (spec.md §4.4): Ed25519 (RFC 8032 §5.1, SHA-512) and
//! Ed448 (RFC 8032 §5.2, SHAKE256 with the `"SigEd448"` domain-separation
//! prefix). Both share the same twisted/Edwards scalar-mul machinery in
//! `gtls-ecmath::edwards`; what differs is the hash, the clamping masks,
//! and (for Ed448) the prefix fed to every hash call.
//!
//! Unlike ECDSA/DSA, a signature here is a fixed-width `R || S` encoding,
//! never DER (spec.md §6: "EdDSA -> fixed-width R || S, never DER").

use crate::error::{Error, Result};
use alloc::vec::Vec;
use crypto_bigint::Uint;
use gtls_ecmath::edwards::{EdwardsVariant, Point};
use gtls_ecmath::field::{FieldElement, Modulus};
use sha2::{Digest, Sha512};
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake256;
use subtle::{Choice, ConstantTimeEq};

/// Which EdDSA variant a key/signature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Ed25519,
    Ed448,
}

impl Variant {
    fn hash(self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            Variant::Ed25519 => {
                let mut h = Sha512::new();
                for p in parts {
                    h.update(p);
                }
                h.finalize().to_vec()
            }
            Variant::Ed448 => {
                let mut h = Shake256::default();
                // RFC 8032 §5.2.2: every hash call for Ed448 is prefixed
                // with `dom4(phflag=0, context="")` = "SigEd448" || 0x00 ||
                // context-length(0).
                Update::update(&mut h, b"SigEd448\x00\x00");
                for p in parts {
                    Update::update(&mut h, p);
                }
                let mut out = alloc::vec![0u8; 114];
                let mut reader = h.finalize_xof();
                reader.read(&mut out);
                out
            }
        }
    }

    fn seed_len(self) -> usize {
        match self {
            Variant::Ed25519 => 32,
            Variant::Ed448 => 57,
        }
    }

    fn sig_len(self) -> usize {
        match self {
            Variant::Ed25519 => 64,
            Variant::Ed448 => 114,
        }
    }
}

/// Curve-width-specific point ops, `L=4` for Ed25519, `L=7` for Ed448.
/// `pub(crate)` so `dispatch.rs` can build one per algorithm tag without
/// duplicating the base-point/field-parameter wiring.
pub(crate) struct CurveOps<const L: usize> {
    field: Modulus<L>,
    order: Modulus<L>,
    d: FieldElement<L>,
    variant: EdwardsVariant,
    base: Point<L>,
}

pub(crate) fn curve_ops_25519() -> CurveOps<4> {
    use gtls_ecmath::curves::curve25519;
    let field = curve25519::field();
    let gy = FieldElement::from_uint(
        Uint::<4>::from_be_hex("6666666666666666666666666666666666666666666666666666666666666658"),
        &field,
    );
    let gx = FieldElement::from_uint(
        Uint::<4>::from_be_hex("216936D3CD6E53FEC0A4E231FDD6DC5C692CC7609525A7B2C9562D608F25D51A"),
        &field,
    );
    CurveOps {
        field,
        order: curve25519::order(),
        d: FieldElement::from_uint(curve25519::EDWARDS_D, &field),
        variant: EdwardsVariant::Twisted,
        base: Point { x: gx, y: gy, z: FieldElement::one(&field) },
    }
}

pub(crate) fn curve_ops_448() -> CurveOps<7> {
    use gtls_ecmath::curves::curve448;
    let field = curve448::field();
    let gx = FieldElement::from_uint(
        Uint::<7>::from_be_hex(
            "4F1970C66BED0DED221D15A622BF36DA9E146570470F1767EA6DE324A3D3A46412AE1AF72AB66511433B80E18B00938E2626A82BC70CC05E",
        ),
        &field,
    );
    let gy = FieldElement::from_uint(
        Uint::<7>::from_be_hex(
            "693F46716EB6BC248876203756C9C7624BEA73736CA3984087789C1E05A0C2D73AD3FF1CE67C39C4FDBD132C4ED7C8AD9808795BF230FA14",
        ),
        &field,
    );
    CurveOps {
        field,
        order: curve448::order(),
        d: FieldElement::from_uint(curve448::EDWARDS_D, &field),
        variant: EdwardsVariant::Ed448Homogeneous,
        base: Point { x: gx, y: gy, z: FieldElement::one(&field) },
    }
}

fn clamp_scalar(variant: Variant, digest_half: &mut [u8]) {
    match variant {
        Variant::Ed25519 => {
            digest_half[0] &= 248;
            digest_half[31] &= 127;
            digest_half[31] |= 64;
        }
        Variant::Ed448 => {
            digest_half[0] &= 0xFC;
            let last = digest_half.len() - 1;
            digest_half[last] = 0;
            digest_half[last - 1] |= 0x80;
        }
    }
}

/// Decompress a little-endian encoded point: low bits hold `y`, the top
/// bit holds the sign of `x` (RFC 8032 §5.1.3 / §5.2.3). Ed25519's field is
/// `p ≡ 5 (mod 8)`, so recovering `x` goes through
/// [`FieldElement::sqrt_5mod8`](gtls_ecmath::field::FieldElement::sqrt_5mod8);
/// Ed448's field is `p ≡ 3 (mod 4)`, using the shared
/// [`FieldElement::sqrt`](gtls_ecmath::field::FieldElement::sqrt) instead.
fn decompress<const L: usize>(variant: Variant, encoded: &[u8], field: &Modulus<L>, d: &FieldElement<L>) -> Result<Point<L>> {
    if encoded.len() != variant.seed_len() {
        return Err(Error::MalformedSignature);
    }
    let mut buf = encoded.to_vec();
    let sign = (buf[buf.len() - 1] & 0x80) != 0;
    buf[buf.len() - 1] &= 0x7f;
    // Ed448's wire encoding is one byte wider than its field (57 vs. 56):
    // that extra byte carries only the sign bit just extracted above, so
    // drop it before parsing — `y` itself lives entirely in the first
    // `L*8` little-endian bytes.
    buf.truncate(L * 8);
    buf.reverse(); // little-endian wire -> big-endian Uint
    let y_uint = Uint::<L>::from_be_slice_vartime(&buf);
    let y = FieldElement::from_uint(y_uint, field);

    let y2 = y.square();
    let one = FieldElement::one(field);
    let u = y2.sub(&one);
    let v = d.mul(&y2).add(&one);
    let v_inv = v.invert(field).map_err(|_| gtls_ecmath::Error::NotOnCurve)?;
    let u_over_v = u.mul(&v_inv);

    let x = match variant {
        Variant::Ed25519 => u_over_v.sqrt_5mod8(field).map_err(|_| gtls_ecmath::Error::NotOnCurve)?,
        Variant::Ed448 => u_over_v.sqrt(field).map_err(|_| gtls_ecmath::Error::NotOnCurve)?,
    };

    let x_bytes = x.to_uint().to_be_bytes_vartime();
    let x_is_odd = x_bytes.last().map(|b| b & 1 == 1).unwrap_or(false);
    let x_final = if x_is_odd != sign { x.neg() } else { x };

    if bool::from(x_final.is_zero()) && sign {
        return Err(Error::InvalidPubkeyParams);
    }

    Ok(Point { x: x_final, y, z: one })
}

fn compress<const L: usize>(variant: Variant, p: &Point<L>, field: &Modulus<L>) -> Result<Vec<u8>> {
    let (x, y) = p.to_affine(field)?;
    let mut out = y.to_uint().to_be_bytes_vartime();
    out.reverse();
    // Ed448's wire encoding needs one more byte than its field width (57 vs.
    // 56) purely to hold `x`'s sign bit; Ed25519's field already leaves its
    // top bit spare for the same purpose, so this is a no-op there.
    out.resize(variant.seed_len(), 0);
    let x_bytes = x.to_uint().to_be_bytes_vartime();
    let x_is_odd = x_bytes.last().map(|b| b & 1 == 1).unwrap_or(false);
    if x_is_odd {
        let last = out.len() - 1;
        out[last] |= 0x80;
    }
    Ok(out)
}

fn scalar_encode<const L: usize>(s: &Uint<L>, len: usize) -> Vec<u8> {
    let mut be = s.to_be_bytes_vartime();
    be.reverse();
    be.resize(len, 0);
    be
}

fn scalar_decode<const L: usize>(bytes: &[u8]) -> Uint<L> {
    // Ed448's 57-byte scalar encoding is one byte wider than `Uint<7>`'s
    // 56-byte capacity; the value itself always fits in the low `L*8`
    // little-endian bytes (it is bounded by the group order), so any byte
    // beyond that is zero padding and safe to drop.
    let width = bytes.len().min(L * 8);
    let mut be = bytes[..width].to_vec();
    be.reverse();
    Uint::<L>::from_be_slice_vartime(&be)
}

/// Sign `message` with the 32/57-byte seed `seed` (the private key as the
/// wire format defines it, *not* the clamped scalar).
pub fn sign<const L: usize>(variant: Variant, ops: &CurveOps<L>, seed: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    crate::state::check()?;
    if seed.len() != variant.seed_len() {
        return Err(Error::InvalidRequest);
    }
    let h = variant.hash(&[seed]);
    let mut scalar_bytes = h[..variant.seed_len()].to_vec();
    clamp_scalar(variant, &mut scalar_bytes);
    let s = scalar_decode::<L>(&scalar_bytes);
    let prefix = &h[variant.seed_len()..];

    let s_bits = gtls_ecmath::bits_msb_first(&s, L * 64);
    let a_point = gtls_ecmath::edwards::scalar_mul(&s_bits, &ops.base, &ops.d, ops.variant, &ops.field);
    let a_enc = compress(variant, &a_point, &ops.field)?;

    let r_digest = variant.hash(&[prefix, message]);
    let r_scalar = reduce_wide::<L>(&r_digest, &ops.order);
    let r_bits = gtls_ecmath::bits_msb_first(&r_scalar, L * 64);
    let r_point = gtls_ecmath::edwards::scalar_mul(&r_bits, &ops.base, &ops.d, ops.variant, &ops.field);
    let r_enc = compress(variant, &r_point, &ops.field)?;

    let k_digest = variant.hash(&[&r_enc, &a_enc, message]);
    let k_scalar = reduce_wide::<L>(&k_digest, &ops.order);

    let k_fe = FieldElement::from_uint(k_scalar, &ops.order);
    let s_fe = FieldElement::from_uint(s, &ops.order);
    let r_fe = FieldElement::from_uint(r_scalar, &ops.order);
    let s_out = r_fe.add(&k_fe.mul(&s_fe)).to_uint();

    let mut out = r_enc;
    out.extend_from_slice(&scalar_encode::<L>(&s_out, variant.seed_len()));
    Ok(out)
}

/// Verify `sig` over `message` under the wire-encoded public key `pubkey`.
pub fn verify<const L: usize>(
    variant: Variant,
    ops: &CurveOps<L>,
    pubkey: &[u8],
    message: &[u8],
    sig: &[u8],
) -> Result<()> {
    crate::state::check()?;
    if pubkey.len() != variant.seed_len() || sig.len() != variant.sig_len() {
        return Err(Error::MalformedSignature);
    }
    let (r_enc, s_enc) = sig.split_at(variant.seed_len());
    let s = scalar_decode::<L>(s_enc);
    if s >= *ops.order.value() {
        return Err(Error::MalformedSignature);
    }

    let a_point = decompress::<L>(variant, pubkey, &ops.field, &ops.d)?;
    let r_point = decompress::<L>(variant, r_enc, &ops.field, &ops.d)?;

    let k_digest = variant.hash(&[r_enc, pubkey, message]);
    let k_scalar = reduce_wide::<L>(&k_digest, &ops.order);

    let s_bits = gtls_ecmath::bits_msb_first(&s, L * 64);
    let k_bits = gtls_ecmath::bits_msb_first(&k_scalar, L * 64);

    let sb = gtls_ecmath::edwards::scalar_mul(&s_bits, &ops.base, &ops.d, ops.variant, &ops.field);
    let ka = gtls_ecmath::edwards::scalar_mul(&k_bits, &a_point, &ops.d, ops.variant, &ops.field);
    let rhs = r_point.add_twisted(&ka, &ops.d, &ops.field);

    let lhs_enc = compress(variant, &sb, &ops.field)?;
    let rhs_enc = compress(variant, &rhs, &ops.field)?;
    let ok: Choice = lhs_enc.ct_eq(&rhs_enc);
    if bool::from(ok) {
        Ok(())
    } else {
        Err(Error::VerificationFailed)
    }
}

/// Reduce a wide (64- or 114-byte) little-endian hash output mod the group
/// order, the way RFC 8032's `r = hash[...] mod L` step requires.
fn reduce_wide<const L: usize>(wide_le: &[u8], order: &Modulus<L>) -> Uint<L> {
    // Fold down in `L`-sized (big-endian, after reversing the wire's
    // little-endian order) chunks, most-significant chunk first, each fold
    // a multiply-by-2^(chunk width)-and-add mod the order. `2^(chunk width)`
    // itself does not fit in a `Uint<L>` (it is one bit wider), so it is
    // computed as a field element via `pow` rather than parsed from bytes.
    let chunk_bytes = L * 8;
    let mut be = wide_le.to_vec();
    be.reverse();

    let two = FieldElement::from_uint(Uint::<L>::from(2u64), order);
    let shift = two.pow(&Uint::<L>::from((chunk_bytes * 8) as u64));

    let mut acc = FieldElement::zero(order);
    for chunk in be.chunks(chunk_bytes) {
        let piece = FieldElement::from_uint(Uint::<L>::from_be_slice_vartime(chunk), order);
        acc = acc.mul(&shift).add(&piece);
    }
    acc.to_uint()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ed25519_sign_verify_round_trip() {
        let ops = curve_ops_25519();
        let seed = [0x42u8; 32];
        let h = Variant::Ed25519.hash(&[&seed]);
        let mut scalar_bytes = h[..32].to_vec();
        clamp_scalar(Variant::Ed25519, &mut scalar_bytes);
        let s = scalar_decode::<4>(&scalar_bytes);
        let order_bits = ops.order.value().bits_vartime() as usize;
        let s_bits = gtls_ecmath::bits_msb_first(&s, order_bits.max(256));
        let a_point = gtls_ecmath::edwards::scalar_mul(&s_bits, &ops.base, &ops.d, ops.variant, &ops.field);
        let pubkey = compress(Variant::Ed25519, &a_point, &ops.field).unwrap();

        let message = b"eddsa test message";
        let sig = sign(Variant::Ed25519, &ops, &seed, message).unwrap();
        verify(Variant::Ed25519, &ops, &pubkey, message, &sig).unwrap();

        assert!(verify(Variant::Ed25519, &ops, &pubkey, b"tampered", &sig).is_err());
    }
}
