//! RFC 6979 deterministic nonce derivation for DSA/ECDSA (spec.md §4.4):
//! `k` is derived from the private key and the message digest via an
//! HMAC-DRBG walk instead of drawn from an RNG, so signing the same
//! message twice with the same key reproduces the same signature.
//!
//! This crate derives `k` with HMAC-SHA-256 regardless of the signature
//! hash in use, matching the common "RFC 6979 over SHA-256" profile most
//! deployments standardize on rather than parameterizing the DRBG's hash
//! per call (documented as a scoping decision in `DESIGN.md`).

use alloc::vec::Vec;
use crypto_bigint::Uint;
use gtls_ecmath::field::Modulus;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn hmac(key: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC accepts any key length");
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().to_vec()
}

/// Big-endian bytes of `v`, left-padded/truncated to exactly `len` bytes.
fn uint_to_be_fixed<const L: usize>(v: &Uint<L>, len: usize) -> Vec<u8> {
    let be = v.to_be_bytes_vartime();
    let mut out = alloc::vec![0u8; len];
    let n = be.len().min(len);
    out[len - n..].copy_from_slice(&be[be.len() - n..]);
    out
}

fn uint_from_be<const L: usize>(bytes: &[u8]) -> Uint<L> {
    Uint::<L>::from_be_slice_vartime(bytes)
}

/// RFC 6979 §2.3.2 `bits2int`: take the leftmost `qlen_bits` bits of the
/// hash output (right-shifting if the hash is longer than `q`).
fn bits2int<const L: usize>(hash: &[u8], qlen_bits: usize) -> Uint<L> {
    let hlen_bits = hash.len() * 8;
    if hlen_bits <= qlen_bits {
        return uint_from_be(hash);
    }
    let shift = hlen_bits - qlen_bits;
    let mut v = uint_from_be::<L>(hash);
    v = v.shr_vartime(shift as u32);
    v
}

/// RFC 6979 §2.3.4 `bits2octets`: `bits2int` followed by a reduction mod
/// `q`, re-encoded as `qlen_bytes` big-endian bytes.
fn bits2octets<const L: usize>(hash: &[u8], qlen_bits: usize, qlen_bytes: usize, order: &Modulus<L>) -> Vec<u8> {
    let z1 = bits2int::<L>(hash, qlen_bits);
    let reduced = gtls_ecmath::field::FieldElement::from_uint(z1, order).to_uint();
    uint_to_be_fixed(&reduced, qlen_bytes)
}

/// Derive the deterministic nonce `k` for a signature over digest `h1`
/// under private key `x` and group order `order` (`qlen_bits`-bit group).
///
/// Returns a `k` already guaranteed `0 < k < q`: the HMAC-DRBG reseed loop
/// (RFC 6979 §3.2 steps f-h, h-3) runs until a candidate lands in range,
/// which happens with overwhelming probability on the first iteration.
pub fn generate_k<const L: usize>(x: &Uint<L>, h1: &[u8], order: &Modulus<L>, qlen_bits: usize) -> Uint<L> {
    let qlen_bytes = qlen_bits.div_ceil(8);
    let x_bytes = uint_to_be_fixed(x, qlen_bytes);
    let h1_octets = bits2octets(h1, qlen_bits, qlen_bytes, order);

    let mut v = alloc::vec![0x01u8; 32];
    let mut k = alloc::vec![0x00u8; 32];

    k = hmac(&k, &[&v, &[0x00], &x_bytes, &h1_octets]);
    v = hmac(&k, &[&v]);
    k = hmac(&k, &[&v, &[0x01], &x_bytes, &h1_octets]);
    v = hmac(&k, &[&v]);

    loop {
        let mut t = Vec::new();
        while t.len() < qlen_bytes {
            v = hmac(&k, &[&v]);
            t.extend_from_slice(&v);
        }
        t.truncate(qlen_bytes);
        let candidate = bits2int::<L>(&t, qlen_bits);
        let in_range = !bool::from(candidate.is_zero()) && candidate < *order.value();
        if in_range {
            return candidate;
        }
        k = hmac(&k, &[&v, &[0x00]]);
        v = hmac(&k, &[&v]);
    }
}
