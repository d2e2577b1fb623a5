//! Classic (finite-field) Diffie-Hellman derive (spec.md §4.4): "DH
//! validates the peer Y is in (1, p−1) and, when q is known, that
//! Y^q ≡ 1 mod p (mandatory in FIPS for TLS 1.3)".

use crate::error::{Error, Result};
use crate::policy::Policy;
use alloc::vec::Vec;
use crypto_bigint::modular::runtime_mod::{DynResidue, DynResidueParams};
use crypto_bigint::Uint;

/// Domain parameters. `q`, the subgroup order, is optional — not every DH
/// group TLS negotiates carries one (RFC 7919's groups do; classic
/// `ffdhe`-less custom groups sometimes don't).
pub struct DomainParams<const LP: usize> {
    pub p: Uint<LP>,
    pub g: Uint<LP>,
    pub q: Option<Uint<LP>>,
}

fn modpow<const LP: usize>(base: &Uint<LP>, exp: &Uint<LP>, modulus: &Uint<LP>) -> Uint<LP> {
    let params = DynResidueParams::new(modulus);
    DynResidue::new(base, params).pow(exp).retrieve()
}

/// Derive the shared secret `peer_y ^ private_x mod p`, big-endian, padded
/// to `p`'s byte width.
///
/// Validates `1 < peer_y < p-1` unconditionally. The subgroup check
/// `peer_y^q ≡ 1 mod p` runs whenever `domain.q` is `Some`; under
/// `policy.fips`, a domain with no `q` is rejected outright rather than
/// silently skipping the check spec.md §4.4 calls mandatory for FIPS/
/// TLS 1.3.
pub fn derive<const LP: usize>(domain: &DomainParams<LP>, private_x: &Uint<LP>, peer_y: &Uint<LP>, policy: &Policy) -> Result<Vec<u8>> {
    crate::state::check()?;
    let one = Uint::<LP>::from(1u64);
    let p_minus_1 = domain.p.wrapping_sub(&one);
    if *peer_y <= one || *peer_y >= p_minus_1 {
        return Err(Error::InvalidRequest);
    }

    match &domain.q {
        Some(q) => {
            let check = modpow(peer_y, q, &domain.p);
            if check != one {
                return Err(Error::InvalidPubkeyParams);
            }
        }
        None if policy.fips => return Err(Error::Disallowed),
        None => {}
    }

    let shared = modpow(peer_y, private_x, &domain.p);
    let out = pad_be(&shared, byte_len(&domain.p));
    if out.iter().all(|&b| b == 0) {
        return Err(Error::AllZeroSharedSecret);
    }
    Ok(out)
}

fn byte_len<const LP: usize>(p: &Uint<LP>) -> usize {
    ((p.bits_vartime() as usize) + 7) / 8
}

fn pad_be<const LP: usize>(v: &Uint<LP>, byte_size: usize) -> Vec<u8> {
    let be = v.to_be_bytes_vartime();
    let mut out = alloc::vec![0u8; byte_size];
    let n = be.len().min(byte_size);
    out[byte_size - n..].copy_from_slice(&be[be.len() - n..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // A small but mathematically valid DH group: `p = 2q+1` both prime,
    // `g` a generator of the order-`q` subgroup. Undersized for real use,
    // structurally identical to a real `ffdhe` group.
    fn small_domain() -> DomainParams<4> {
        DomainParams {
            p: Uint::<4>::from_u64(0x80000087), // safe prime, p = 2q+1
            q: Some(Uint::<4>::from_u64(0x40000043)), // (p-1)/2, prime
            g: Uint::<4>::from_u64(4),           // a quadratic residue, order q
        }
    }

    #[test]
    fn derive_agrees_both_directions() {
        let domain = small_domain();
        let policy = Policy::new();
        let xa = Uint::<4>::from_u64(12345);
        let xb = Uint::<4>::from_u64(54321);
        let ya = modpow(&domain.g, &xa, &domain.p);
        let yb = modpow(&domain.g, &xb, &domain.p);

        let shared_a = derive(&domain, &xa, &yb, &policy).unwrap();
        let shared_b = derive(&domain, &xb, &ya, &policy).unwrap();
        assert_eq!(shared_a, shared_b);
    }

    #[test]
    fn rejects_peer_y_out_of_range() {
        let domain = small_domain();
        let policy = Policy::new();
        let x = Uint::<4>::from_u64(7);
        assert_eq!(derive(&domain, &x, &Uint::<4>::from_u64(1), &policy).unwrap_err(), Error::InvalidRequest);
        assert_eq!(
            derive(&domain, &x, &domain.p.wrapping_sub(&Uint::<4>::from_u64(1)), &policy).unwrap_err(),
            Error::InvalidRequest
        );
    }

    #[test]
    fn fips_requires_known_subgroup_order() {
        let mut domain = small_domain();
        domain.q = None;
        let policy = Policy { fips: true, reproducible: false };
        let x = Uint::<4>::from_u64(7);
        let y = Uint::<4>::from_u64(9);
        assert_eq!(derive(&domain, &x, &y, &policy).unwrap_err(), Error::Disallowed);
    }
}
