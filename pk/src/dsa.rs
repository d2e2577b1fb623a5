//! Classic (finite-field) DSA sign/verify, spec.md §4.4.
//!
//! Scoped to FIPS 186-4's `L=2048/3072, N=256` parameter sets: the group
//! order `q` is always a 256-bit value (`Uint<4>`), while the modulus `p`
//! is generic over `LP` so both `L=2048` (`LP=32`) and `L=3072` (`LP=48`)
//! fit. This is narrower than the full FIPS matrix (`N` can also be 160/
//! 224) but covers every DSA parameter set TLS cipher suites actually
//! negotiate; recorded as a scoping decision in `DESIGN.md`.

use crate::error::{Error, Result};
use crate::policy::Policy;
use alloc::vec::Vec;
use crypto_bigint::modular::runtime_mod::{DynResidue, DynResidueParams};
use crypto_bigint::Uint;
use gtls_ecmath::field::{FieldElement, Modulus};
use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

/// `N = 256` group order width.
pub type Q = Uint<4>;

pub struct DomainParams<const LP: usize> {
    pub p: Uint<LP>,
    pub q: Q,
    pub g: Uint<LP>,
}

pub struct PublicKey<const LP: usize> {
    pub domain: DomainParams<LP>,
    pub y: Uint<LP>,
}

pub struct PrivateKey<const LP: usize> {
    pub domain: DomainParams<LP>,
    pub x: Q,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub r: Q,
    pub s: Q,
}

fn modpow<const LP: usize>(base: &Uint<LP>, exp: &Uint<LP>, modulus: &Uint<LP>) -> Uint<LP> {
    let params = DynResidueParams::new(modulus);
    DynResidue::new(base, params).pow(exp).retrieve()
}

/// Truncate a digest to the leftmost `q`'s bit length (spec.md §4.4:
/// "digest length is truncated to the bit length of q (left truncation,
/// per standard)").
fn truncate_digest_to_q(digest: &[u8], q_bits: usize) -> Q {
    let hlen_bits = digest.len() * 8;
    let mut v = Q::from_be_slice_vartime(digest);
    if hlen_bits > q_bits {
        v = v.shr_vartime((hlen_bits - q_bits) as u32);
    }
    v
}

/// Sign `digest` under `key`. Deterministic (RFC 6979) nonce selection is
/// used when `policy.allow_deterministic_nonce(self_test)` permits it;
/// otherwise `rng` draws a fresh random `k` each call (spec.md §4.4).
pub fn sign<const LP: usize>(
    key: &PrivateKey<LP>,
    digest: &[u8],
    policy: &Policy,
    self_test: bool,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<Signature> {
    crate::state::check()?;
    let q_bits = key.domain.q.bits_vartime() as usize;
    let order = Modulus::<4>::new(key.domain.q);
    let z = truncate_digest_to_q(digest, q_bits);

    loop {
        let k = if policy.allow_deterministic_nonce(self_test) {
            crate::rfc6979::generate_k::<4>(&key.x, digest, &order, q_bits)
        } else {
            draw_random_nonce(&key.domain.q, rng)
        };
        if bool::from(k.is_zero()) {
            continue;
        }

        let k_wide = Uint::<LP>::from_be_slice_vartime(&q_pad::<LP>(&k));
        let r_full = modpow(&key.domain.g, &k_wide, &key.domain.p);
        let r = FieldElement::from_uint(Q::from_be_slice_vartime(&r_full.to_be_bytes_vartime()), &order).to_uint();
        if bool::from(r.is_zero()) {
            continue;
        }

        let k_inv = match invert_mod_q(&k, &order) {
            Ok(v) => v,
            Err(_) => continue,
        };
        let z_fe = FieldElement::from_uint(z, &order);
        let r_fe = FieldElement::from_uint(r, &order);
        let x_fe = FieldElement::from_uint(key.x, &order);
        let s = k_inv.mul(&z_fe.add(&r_fe.mul(&x_fe))).to_uint();
        if bool::from(s.is_zero()) {
            continue;
        }
        return Ok(Signature { r, s });
    }
}

pub fn verify<const LP: usize>(key: &PublicKey<LP>, digest: &[u8], sig: &Signature) -> Result<()> {
    crate::state::check()?;
    let q_bits = key.domain.q.bits_vartime() as usize;
    let order = Modulus::<4>::new(key.domain.q);
    if bool::from(sig.r.is_zero()) || sig.r >= key.domain.q || bool::from(sig.s.is_zero()) || sig.s >= key.domain.q {
        return Err(Error::InvalidRequest);
    }
    let z = truncate_digest_to_q(digest, q_bits);
    let w = invert_mod_q(&sig.s, &order).map_err(|_| Error::VerificationFailed)?;
    let z_fe = FieldElement::from_uint(z, &order);
    let r_fe = FieldElement::from_uint(sig.r, &order);
    let u1 = w.mul(&z_fe).to_uint();
    let u2 = w.mul(&r_fe).to_uint();

    let g_u1 = modpow(&key.domain.g, &Uint::<LP>::from_be_slice_vartime(&q_pad::<LP>(&u1)), &key.domain.p);
    let y_u2 = modpow(&key.y, &Uint::<LP>::from_be_slice_vartime(&q_pad::<LP>(&u2)), &key.domain.p);
    let v_full = {
        let params = DynResidueParams::new(&key.domain.p);
        DynResidue::new(&g_u1, params).mul(&DynResidue::new(&y_u2, params)).retrieve()
    };
    let v = FieldElement::from_uint(Q::from_be_slice_vartime(&v_full.to_be_bytes_vartime()), &order).to_uint();

    if bool::from(v.ct_eq(&FieldElement::from_uint(sig.r, &order).to_uint())) {
        Ok(())
    } else {
        Err(Error::VerificationFailed)
    }
}

fn q_pad<const LP: usize>(v: &Q) -> Vec<u8> {
    let be = v.to_be_bytes_vartime();
    let byte_len = LP * 8;
    let mut out = alloc::vec![0u8; byte_len];
    let n = be.len().min(byte_len);
    out[byte_len - n..].copy_from_slice(&be[be.len() - n..]);
    out
}

fn draw_random_nonce(q: &Q, rng: &mut impl RngCore) -> Q {
    let byte_len = ((q.bits_vartime() as usize) + 7) / 8;
    loop {
        let mut bytes = alloc::vec![0u8; byte_len];
        rng.fill_bytes(&mut bytes);
        let candidate = Q::from_be_slice_vartime(&bytes);
        if !bool::from(candidate.is_zero()) && candidate < *q {
            return candidate;
        }
    }
}

/// Fermat-based inverse mod `q` — valid because `q` is prime for every DSA
/// domain parameter set this crate generates/accepts.
fn invert_mod_q(k: &Q, order: &Modulus<4>) -> gtls_ecmath::Result<FieldElement<4>> {
    FieldElement::from_uint(*k, order).invert(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use sha2::{Digest, Sha256};

    // A small but mathematically valid DSA domain: `q` prime, `p = 30*q+1`
    // prime, `g` of order `q` mod `p` — real relation, just undersized for
    // structural round-trip coverage (a real deployment uses a 2048/3072
    // bit `p`; the arithmetic here is identical either way).
    fn small_domain() -> DomainParams<4> {
        DomainParams {
            p: Uint::<4>::from_be_hex("0000000000000000000000000000000000000000000000000000000F0000014B"),
            q: Uint::<4>::from_be_hex("000000000000000000000000000000000000000000000000000000008000000B"),
            g: Uint::<4>::from_be_hex("0000000000000000000000000000000000000000000000000000000040000000"),
        }
    }

    #[test]
    fn sign_then_verify_round_trip() {
        let domain = small_domain();
        let x = Q::from_be_hex("0000000000000000000000000000000000000000000000000000000000003039");
        let y = Uint::<4>::from_be_hex("0000000000000000000000000000000000000000000000000000000E1CB453F4");
        let private = PrivateKey {
            domain: DomainParams {
                p: domain.p,
                q: domain.q,
                g: domain.g,
            },
            x,
        };
        let public = PublicKey {
            domain: DomainParams {
                p: domain.p,
                q: domain.q,
                g: domain.g,
            },
            y,
        };

        let digest = Sha256::digest(b"dsa message");
        let policy = Policy::new();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let sig = sign(&private, &digest, &policy, false, &mut rng).unwrap();
        verify(&public, &digest, &sig).unwrap();
    }
}
