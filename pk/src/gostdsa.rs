//! GOST R 34.10-2012 digital signature (spec.md §4.4), distinct from
//! ECDSA's equations even though it runs over the same short-Weierstrass
//! machinery (`gtls-ecmath::weierstrass`) and curve table (`GOST256A`):
//! GOST's `s = r*d + k*e mod q` needs no nonce inverse at sign time (the
//! inverse moves to `e` at verify time instead), and its `e` term folds
//! the digest through `mod q` with an `e == 0 -> e = 1` special case the
//! Weierstrass ECDSA path does not have (RFC 7836 §5.2/§5.3; spec.md
//! §4.4: "digest length must equal the curve bit length exactly").
//!
//! Serialisation is a fixed-width big-endian `r || s` concatenation, never
//! DER (spec.md §6). GOST-VKO (`gtls_ecmath::gost::vko`) is the sibling
//! key-agreement primitive and uses little-endian output instead,
//! intentionally — the two are not meant to share an encoding.

use crate::error::{Error, Result};
use crate::policy::Policy;
use alloc::vec::Vec;
use crypto_bigint::Uint;
use gtls_ecmath::curve::CurveParams;
use gtls_ecmath::field::{FieldElement, Modulus};
use gtls_ecmath::weierstrass::{Affine, Jacobian};
use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

/// A signature, big-endian `r`/`s` magnitudes at the curve's native width.
#[derive(Clone)]
pub struct Signature<const L: usize> {
    pub r: Uint<L>,
    pub s: Uint<L>,
}

/// `e = H(M) mod q`, with the `e == 0 -> e = 1` substitution RFC 7836 §5.2
/// step 2 requires (a zero `e` would make the signature independent of the
/// message).
fn digest_to_e<const L: usize>(digest: &[u8], order: &Modulus<L>) -> FieldElement<L> {
    let v = Uint::<L>::from_be_slice_vartime(digest);
    let e = FieldElement::from_uint(v, order);
    if bool::from(e.is_zero()) {
        FieldElement::one(order)
    } else {
        e
    }
}

fn q_uint<const L: usize>(fe: &FieldElement<L>, order: &Modulus<L>) -> Uint<L> {
    FieldElement::from_uint(fe.to_uint(), order).to_uint()
}

fn check_digest_len<const L: usize>(curve: &CurveParams<L>, digest: &[u8]) -> Result<()> {
    if digest.len() * 8 != curve.bit_size {
        return Err(Error::InvalidRequest);
    }
    Ok(())
}

/// Sign `digest` (exactly `curve.bit_size` bits long) with private scalar
/// `d`. Deterministic (RFC 6979) nonce selection follows the same policy
/// gate as ECDSA/DSA.
pub fn sign<const L: usize>(
    curve: &CurveParams<L>,
    generator: &Jacobian<L>,
    d: &Uint<L>,
    digest: &[u8],
    policy: &Policy,
    self_test: bool,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<Signature<L>> {
    crate::state::check()?;
    check_digest_len(curve, digest)?;
    let q_bits = curve.order.value().bits_vartime() as usize;
    let e = digest_to_e(digest, &curve.order);

    loop {
        let k = if policy.allow_deterministic_nonce(self_test) {
            crate::rfc6979::generate_k::<L>(d, digest, &curve.order, q_bits)
        } else {
            draw_random_nonce(curve.order.value(), rng)
        };
        if bool::from(k.is_zero()) {
            continue;
        }

        let k_bits = gtls_ecmath::bits_msb_first(&k, curve.bit_size);
        let point = gtls_ecmath::weierstrass::scalar_mul(&k_bits, generator, curve);
        let affine: Affine<L> = match point.to_affine(&curve.p) {
            Ok(a) => a,
            Err(_) => continue,
        };
        if bool::from(affine.infinity) {
            continue;
        }
        let r = q_uint(&affine.x, &curve.order);
        if bool::from(r.is_zero()) {
            continue;
        }

        let k_fe = FieldElement::from_uint(k, &curve.order);
        let r_fe = FieldElement::from_uint(r, &curve.order);
        let d_fe = FieldElement::from_uint(*d, &curve.order);
        // s = r*d + k*e mod q -- GOST's equation, not ECDSA's k^-1(z+rd).
        let s = r_fe.mul(&d_fe).add(&k_fe.mul(&e)).to_uint();
        if bool::from(s.is_zero()) {
            continue;
        }
        return Ok(Signature { r, s });
    }
}

/// Verify `(r, s)` over `digest` under public point `q_point`.
pub fn verify<const L: usize>(
    curve: &CurveParams<L>,
    generator: &Jacobian<L>,
    q_point: &Jacobian<L>,
    digest: &[u8],
    sig: &Signature<L>,
) -> Result<()> {
    crate::state::check()?;
    check_digest_len(curve, digest)?;
    let order = curve.order.value();
    if bool::from(sig.r.is_zero()) || sig.r >= *order || bool::from(sig.s.is_zero()) || sig.s >= *order {
        return Err(Error::InvalidRequest);
    }
    let e = digest_to_e(digest, &curve.order);
    let v = e.invert(&curve.order).map_err(|_| Error::VerificationFailed)?;

    let s_fe = FieldElement::from_uint(sig.s, &curve.order);
    let r_fe = FieldElement::from_uint(sig.r, &curve.order);
    let z1 = s_fe.mul(&v).to_uint();
    let z2 = r_fe.neg().mul(&v).to_uint();

    let z1_bits = gtls_ecmath::bits_msb_first(&z1, curve.bit_size);
    let z2_bits = gtls_ecmath::bits_msb_first(&z2, curve.bit_size);
    let p1 = gtls_ecmath::weierstrass::scalar_mul(&z1_bits, generator, curve);
    let p2 = gtls_ecmath::weierstrass::scalar_mul(&z2_bits, q_point, curve);
    let sum = p1.add(&p2, &curve.p);
    if bool::from(sum.is_infinity()) {
        return Err(Error::VerificationFailed);
    }
    let affine = sum.to_affine(&curve.p)?;
    let r_check = q_uint(&affine.x, &curve.order);

    if bool::from(r_check.ct_eq(&sig.r)) {
        Ok(())
    } else {
        Err(Error::VerificationFailed)
    }
}

fn draw_random_nonce<const L: usize>(q: &Uint<L>, rng: &mut impl RngCore) -> Uint<L> {
    let byte_len = (q.bits_vartime() as usize + 7) / 8;
    loop {
        let mut bytes = alloc::vec![0u8; byte_len];
        rng.fill_bytes(&mut bytes);
        let candidate = Uint::<L>::from_be_slice_vartime(&bytes);
        if !bool::from(candidate.is_zero()) && candidate < *q {
            return candidate;
        }
    }
}

/// Fixed-width big-endian `r || s`, never DER (spec.md §6).
pub fn encode_fixed<const L: usize>(sig: &Signature<L>, byte_size: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(byte_size * 2);
    out.extend(pad_be(&sig.r, byte_size));
    out.extend(pad_be(&sig.s, byte_size));
    out
}

pub fn decode_fixed<const L: usize>(bytes: &[u8], byte_size: usize) -> Result<Signature<L>> {
    if bytes.len() != byte_size * 2 {
        return Err(Error::MalformedSignature);
    }
    let (r_bytes, s_bytes) = bytes.split_at(byte_size);
    Ok(Signature {
        r: Uint::<L>::from_be_slice_vartime(r_bytes),
        s: Uint::<L>::from_be_slice_vartime(s_bytes),
    })
}

fn pad_be<const L: usize>(v: &Uint<L>, byte_size: usize) -> Vec<u8> {
    let be = v.to_be_bytes_vartime();
    let mut out = alloc::vec![0u8; byte_size];
    let n = be.len().min(byte_size);
    out[byte_size - n..].copy_from_slice(&be[be.len() - n..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtls_ecmath::curves::gost256a;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use sha2::{Digest, Sha256};

    #[test]
    fn sign_verify_round_trip() {
        let curve = gost256a::params();
        let g = crate::ecdsa::generator(gost256a::GX, gost256a::GY, &curve);

        let d = Uint::<4>::from_u64(13_579);
        let d_bits = gtls_ecmath::bits_msb_first(&d, curve.bit_size);
        let q_point = gtls_ecmath::weierstrass::scalar_mul(&d_bits, &g, &curve);

        let digest = Sha256::digest(b"gostdsa message");
        let policy = Policy::new();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let sig = sign(&curve, &g, &d, &digest, &policy, false, &mut rng).unwrap();
        verify(&curve, &g, &q_point, &digest, &sig).unwrap();

        let wrong_digest = Sha256::digest(b"tampered");
        assert!(verify(&curve, &g, &q_point, &wrong_digest, &sig).is_err());
    }

    #[test]
    fn rejects_wrong_digest_length() {
        let curve = gost256a::params();
        let g = crate::ecdsa::generator(gost256a::GX, gost256a::GY, &curve);
        let d = Uint::<4>::from_u64(1);
        let policy = Policy::new();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let short_digest = [0u8; 16];
        assert_eq!(
            sign(&curve, &g, &d, &short_digest, &policy, false, &mut rng).unwrap_err(),
            Error::InvalidRequest
        );
    }

    #[test]
    fn fixed_width_round_trip() {
        let sig = Signature::<4> {
            r: Uint::<4>::from_u64(5),
            s: Uint::<4>::from_u64(6),
        };
        let encoded = encode_fixed(&sig, 32);
        assert_eq!(encoded.len(), 64);
        let decoded: Signature<4> = decode_fixed(&encoded, 32).unwrap();
        assert_eq!(decoded.r, sig.r);
        assert_eq!(decoded.s, sig.s);
    }
}
