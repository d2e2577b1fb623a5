//! ECDH derive (spec.md §4.4): short-Weierstrass curves (P256/P384/P521/
//! GOST256A) via plain scalar multiplication, and the Montgomery-ladder
//! X25519/X448 variants via `gtls-ecmath::montgomery` (RFC 7748). Both
//! paths reject an all-zero output — RFC 7748 §6.1's mandatory check for
//! Curve25519/Curve448, applied here to the Weierstrass forms too since an
//! all-zero derived secret is never a sound key regardless of curve form.

use crate::error::{Error, Result};
use alloc::vec::Vec;
use crypto_bigint::Uint;
use gtls_ecmath::curve::CurveParams;
use gtls_ecmath::field::FieldElement;
use gtls_ecmath::montgomery::{ladder, Xz};
use gtls_ecmath::weierstrass::Jacobian;

/// ECDH over a short-Weierstrass curve: `d * peer_point`, affine `x`
/// big-endian, padded to `ceil(curve.bit_size/8)` bytes.
pub fn derive_weierstrass<const L: usize>(curve: &CurveParams<L>, peer_point: &Jacobian<L>, d: &Uint<L>) -> Result<Vec<u8>> {
    crate::state::check()?;
    let d_bits = gtls_ecmath::bits_msb_first(d, curve.bit_size);
    let shared = gtls_ecmath::weierstrass::scalar_mul(&d_bits, peer_point, curve);
    if bool::from(shared.is_infinity()) {
        return Err(Error::InvalidPubkeyParams);
    }
    let affine = shared.to_affine(&curve.p)?;
    let byte_size = (curve.bit_size + 7) / 8;
    let out = pad_be(&affine.x.to_uint(), byte_size);
    if out.iter().all(|&b| b == 0) {
        return Err(Error::AllZeroSharedSecret);
    }
    Ok(out)
}

fn pad_be<const L: usize>(v: &Uint<L>, byte_size: usize) -> Vec<u8> {
    let be = v.to_be_bytes_vartime();
    let mut out = alloc::vec![0u8; byte_size];
    let n = be.len().min(byte_size);
    out[byte_size - n..].copy_from_slice(&be[be.len() - n..]);
    out
}

fn le_to_uint<const L: usize>(le: &[u8]) -> Uint<L> {
    let mut be = le.to_vec();
    be.reverse();
    Uint::<L>::from_be_slice_vartime(&be)
}

fn uint_to_le<const L: usize>(v: &Uint<L>, len: usize) -> Vec<u8> {
    let mut be = v.to_be_bytes_vartime();
    be.reverse();
    be.resize(len, 0);
    be
}

/// X25519 (RFC 7748 §5): clamp the 32-byte little-endian scalar, mask the
/// u-coordinate's spare top bit, ladder, reject an all-zero result.
pub fn derive_x25519(private_key: &[u8; 32], peer_u: &[u8; 32]) -> Result<[u8; 32]> {
    crate::state::check()?;
    let field = gtls_ecmath::curves::curve25519::field();
    let a24 = FieldElement::from_uint(Uint::<4>::from(gtls_ecmath::curves::curve25519::A24), &field);

    let mut k = *private_key;
    k[0] &= 248;
    k[31] &= 127;
    k[31] |= 64;
    let scalar = le_to_uint::<4>(&k);

    let mut u_bytes = *peer_u;
    u_bytes[31] &= 0x7f;
    let u = FieldElement::from_uint(le_to_uint::<4>(&u_bytes), &field);

    // Bit 254 (forced to 1 by clamping) down through bit 3; bits 2..0 are
    // forced to 0, handled as three trailing doublings instead of full
    // ladder steps (spec.md §4.3's Montgomery-ladder scratch pattern).
    let all_bits = gtls_ecmath::bits_msb_first(&scalar, 255);
    let main_bits = &all_bits[..all_bits.len() - 3];
    let result: Xz<4> = ladder(main_bits, 3, &u, &a24, &field);
    let out_fe = result.to_u(&field).map_err(|_| gtls_ecmath::Error::AllZeroSharedSecret)?;
    let out = uint_to_le::<4>(&out_fe.to_uint(), 32);
    if out.iter().all(|&b| b == 0) {
        return Err(Error::AllZeroSharedSecret);
    }
    let mut fixed = [0u8; 32];
    fixed.copy_from_slice(&out);
    Ok(fixed)
}

/// X448 (RFC 7748 §5): same shape as [`derive_x25519`] but with Curve448's
/// clamping (no u-coordinate masking — its field fills all 56 bytes) and a
/// 56-byte wire width.
pub fn derive_x448(private_key: &[u8; 56], peer_u: &[u8; 56]) -> Result<[u8; 56]> {
    crate::state::check()?;
    let field = gtls_ecmath::curves::curve448::field();
    let a24 = FieldElement::from_uint(Uint::<7>::from(gtls_ecmath::curves::curve448::A24), &field);

    let mut k = *private_key;
    k[0] &= 252;
    k[55] |= 128;
    let scalar = le_to_uint::<7>(&k);

    let u = FieldElement::from_uint(le_to_uint::<7>(peer_u), &field);

    // Bit 447 (forced to 1) down through bit 2; bits 1..0 forced to 0 by
    // clamping, handled as two trailing doublings.
    let all_bits = gtls_ecmath::bits_msb_first(&scalar, 448);
    let main_bits = &all_bits[..all_bits.len() - 2];
    let result: Xz<7> = ladder(main_bits, 2, &u, &a24, &field);
    let out_fe = result.to_u(&field).map_err(|_| gtls_ecmath::Error::AllZeroSharedSecret)?;
    let out = uint_to_le::<7>(&out_fe.to_uint(), 56);
    if out.iter().all(|&b| b == 0) {
        return Err(Error::AllZeroSharedSecret);
    }
    let mut fixed = [0u8; 56];
    fixed.copy_from_slice(&out);
    Ok(fixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtls_ecmath::curves::p256;
    use gtls_ecmath::weierstrass::{Affine, Jacobian};
    use subtle::Choice;

    fn p256_generator() -> Jacobian<4> {
        let curve = p256::params();
        let affine = Affine {
            x: FieldElement::from_uint(p256::GX, &curve.p),
            y: FieldElement::from_uint(p256::GY, &curve.p),
            infinity: Choice::from(0u8),
        };
        Jacobian::from_affine(&affine, &curve.p)
    }

    #[test]
    fn weierstrass_ecdh_agrees_both_directions() {
        let curve = p256::params();
        let g = p256_generator();

        let da = Uint::<4>::from_u64(111_111);
        let db = Uint::<4>::from_u64(222_222);
        let da_bits = gtls_ecmath::bits_msb_first(&da, curve.bit_size);
        let db_bits = gtls_ecmath::bits_msb_first(&db, curve.bit_size);
        let qa = gtls_ecmath::weierstrass::scalar_mul(&da_bits, &g, &curve);
        let qb = gtls_ecmath::weierstrass::scalar_mul(&db_bits, &g, &curve);

        let shared_a = derive_weierstrass(&curve, &qb, &da).unwrap();
        let shared_b = derive_weierstrass(&curve, &qa, &db).unwrap();
        assert_eq!(shared_a, shared_b);
    }

    // RFC 7748 §5.2 X25519 Diffie-Hellman test vector.
    #[test]
    fn x25519_rfc7748_vector() {
        let private = [
            0x77, 0x07, 0x6d, 0x0a, 0x73, 0x18, 0xa5, 0x7d, 0x3c, 0x16, 0xc1, 0x72, 0x51, 0xb2,
            0x66, 0x45, 0xdf, 0x4c, 0x2f, 0x87, 0xeb, 0xc0, 0x99, 0x2a, 0xb1, 0x77, 0xfb, 0xa5,
            0x1d, 0xb9, 0x2c, 0x2a,
        ];
        let peer_u = [
            0xde, 0x9e, 0xdb, 0x7d, 0x7b, 0x7d, 0xc1, 0xb4, 0xd3, 0x5b, 0x61, 0xc2, 0xec, 0xe4,
            0x35, 0x37, 0x3f, 0x83, 0x43, 0xc8, 0x5b, 0x78, 0x67, 0x4d, 0xad, 0xfc, 0x7e, 0x14,
            0x6f, 0x88, 0x2b, 0x4f,
        ];
        let expected = [
            0x4a, 0x5d, 0x9d, 0x5b, 0xa4, 0xce, 0x2d, 0xe1, 0x72, 0x8e, 0x3b, 0xf4, 0x80, 0x35,
            0x0f, 0x25, 0xe0, 0x7e, 0x21, 0xc9, 0x47, 0xd1, 0x9e, 0x33, 0x76, 0xf0, 0x9b, 0x3c,
            0x1e, 0x16, 0x17, 0x42,
        ];
        let shared = derive_x25519(&private, &peer_u).unwrap();
        assert_eq!(shared, expected);
    }

    #[test]
    fn all_zero_result_is_rejected() {
        // The all-zero scalar times any point on the curve's twist can
        // land on the identity's u-coordinate (0); RFC 7748 requires
        // rejecting it regardless of how it arose.
        let zero_key = [0u8; 32];
        let zero_peer = [0u8; 32];
        assert!(derive_x25519(&zero_key, &zero_peer).is_err());
    }
}
