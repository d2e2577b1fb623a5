//! ECDSA sign/verify over any short-Weierstrass curve `gtls-ecmath` ships
//! (spec.md §4.4): randomized or RFC 6979 deterministic nonce, `(r, s)`
//! serialised through [`crate::der_sig`] exactly like classic DSA.

use crate::error::{Error, Result};
use crate::policy::Policy;
use alloc::vec::Vec;
use crypto_bigint::Uint;
use gtls_ecmath::curve::CurveParams;
use gtls_ecmath::field::{FieldElement, Modulus};
use gtls_ecmath::weierstrass::{Affine, Jacobian};
use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConstantTimeEq};

/// A signature, big-endian `r`/`s` magnitudes at the curve's native width.
#[derive(Clone)]
pub struct Signature<const L: usize> {
    pub r: Uint<L>,
    pub s: Uint<L>,
}

fn q_uint<const L: usize>(fe: &FieldElement<L>, order: &Modulus<L>) -> Uint<L> {
    FieldElement::from_uint(fe.to_uint(), order).to_uint()
}

/// Left-truncate `digest` to the group order's bit length (spec.md §4.4,
/// same rule classic DSA uses).
fn truncate_digest<const L: usize>(digest: &[u8], q_bits: usize) -> Uint<L> {
    let hlen_bits = digest.len() * 8;
    let mut v = Uint::<L>::from_be_slice_vartime(digest);
    if hlen_bits > q_bits {
        v = v.shr_vartime((hlen_bits - q_bits) as u32);
    }
    v
}

/// Sign `digest` with private scalar `d` over `curve`'s generator point.
/// Deterministic (RFC 6979) nonce selection is used when
/// `policy.allow_deterministic_nonce(self_test)` permits it, matching
/// spec.md §4.4's selection rule.
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
    let q_bits = curve.order.value().bits_vartime() as usize;
    let z = truncate_digest::<L>(digest, q_bits);

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
        let k_inv = match k_fe.invert(&curve.order) {
            Ok(v) => v,
            Err(_) => continue,
        };
        let z_fe = FieldElement::from_uint(z, &curve.order);
        let r_fe = FieldElement::from_uint(r, &curve.order);
        let d_fe = FieldElement::from_uint(*d, &curve.order);
        let s = k_inv.mul(&z_fe.add(&r_fe.mul(&d_fe))).to_uint();
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
    let order = curve.order.value();
    if bool::from(sig.r.is_zero()) || sig.r >= *order || bool::from(sig.s.is_zero()) || sig.s >= *order {
        return Err(Error::InvalidRequest);
    }
    let q_bits = order.bits_vartime() as usize;
    let z = truncate_digest::<L>(digest, q_bits);

    let s_fe = FieldElement::from_uint(sig.s, &curve.order);
    let w = s_fe.invert(&curve.order).map_err(|_| Error::VerificationFailed)?;
    let z_fe = FieldElement::from_uint(z, &curve.order);
    let r_fe = FieldElement::from_uint(sig.r, &curve.order);
    let u1 = w.mul(&z_fe).to_uint();
    let u2 = w.mul(&r_fe).to_uint();

    let u1_bits = gtls_ecmath::bits_msb_first(&u1, curve.bit_size);
    let u2_bits = gtls_ecmath::bits_msb_first(&u2, curve.bit_size);
    let p1 = gtls_ecmath::weierstrass::scalar_mul(&u1_bits, generator, curve);
    let p2 = gtls_ecmath::weierstrass::scalar_mul(&u2_bits, q_point, curve);
    let sum = p1.add(&p2, &curve.p);
    if bool::from(sum.is_infinity()) {
        return Err(Error::VerificationFailed);
    }
    let affine = sum.to_affine(&curve.p)?;
    let v = q_uint(&affine.x, &curve.order);

    let ok: Choice = v.ct_eq(&sig.r);
    if bool::from(ok) {
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

/// Build the curve generator as a Jacobian point, shared by sign/verify
/// callers and by key generation.
pub fn generator<const L: usize>(gx: Uint<L>, gy: Uint<L>, curve: &CurveParams<L>) -> Jacobian<L> {
    let affine = Affine {
        x: FieldElement::from_uint(gx, &curve.p),
        y: FieldElement::from_uint(gy, &curve.p),
        infinity: Choice::from(0u8),
    };
    Jacobian::from_affine(&affine, &curve.p)
}

/// Serialise `(r, s)` as a DER `SEQUENCE { r INTEGER, s INTEGER }` (spec.md
/// §6: "ECDSA/DSA -> DER SEQUENCE").
pub fn encode_der<const L: usize>(sig: &Signature<L>) -> Result<Vec<u8>> {
    crate::der_sig::encode_signature(&sig.r.to_be_bytes_vartime(), &sig.s.to_be_bytes_vartime())
}

pub fn decode_der<const L: usize>(der: &[u8]) -> Result<Signature<L>> {
    let (r, s) = crate::der_sig::decode_signature(der)?;
    Ok(Signature {
        r: Uint::<L>::from_be_slice_vartime(&r),
        s: Uint::<L>::from_be_slice_vartime(&s),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtls_ecmath::curves::p256;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use sha2::{Digest, Sha256};

    #[test]
    fn sign_verify_round_trip_p256() {
        let curve = p256::params();
        let g = generator(p256::GX, p256::GY, &curve);

        // Fixed, arbitrary private scalar, well inside [1, q).
        let d = Uint::<4>::from_u64(424_242);
        let d_bits = gtls_ecmath::bits_msb_first(&d, curve.bit_size);
        let q_point = gtls_ecmath::weierstrass::scalar_mul(&d_bits, &g, &curve);

        let digest = Sha256::digest(b"ecdsa message");
        let policy = Policy::new();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let sig = sign(&curve, &g, &d, &digest, &policy, false, &mut rng).unwrap();
        verify(&curve, &g, &q_point, &digest, &sig).unwrap();

        let wrong_digest = Sha256::digest(b"tampered");
        assert!(verify(&curve, &g, &q_point, &wrong_digest, &sig).is_err());
    }

    #[test]
    fn deterministic_nonce_reproduces_signature() {
        let curve = p256::params();
        let g = generator(p256::GX, p256::GY, &curve);
        let d = Uint::<4>::from_u64(99);
        let digest = Sha256::digest(b"rfc6979");
        let policy = Policy {
            fips: false,
            reproducible: true,
        };
        let mut rng1 = ChaCha20Rng::seed_from_u64(1);
        let mut rng2 = ChaCha20Rng::seed_from_u64(2);
        let sig1 = sign(&curve, &g, &d, &digest, &policy, false, &mut rng1).unwrap();
        let sig2 = sign(&curve, &g, &d, &digest, &policy, false, &mut rng2).unwrap();
        assert_eq!(sig1.r, sig2.r);
        assert_eq!(sig1.s, sig2.s);
    }

    #[test]
    fn der_round_trip() {
        let sig = Signature::<4> {
            r: Uint::<4>::from_u64(1),
            s: Uint::<4>::from_u64(2),
        };
        let der = encode_der(&sig).unwrap();
        let decoded: Signature<4> = decode_der(&der).unwrap();
        assert_eq!(decoded.r, sig.r);
        assert_eq!(decoded.s, sig.s);
    }
}
