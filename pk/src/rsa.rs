//! RSA encrypt/decrypt (PKCS#1 v1.5, blinded) and RSA sign (PKCS#1 v1.5
//! and RSA-PSS), spec.md §4.4.
//!
//! Keys are generic over the modulus limb width `L` (`Uint<L>`, `L*64`
//! bits) the same way `gtls-ecmath`'s curves are generic over their field
//! width — a caller picks `L` to fit their key size (`L = 32` for a
//! 2048-bit modulus, `L = 64` for 4096-bit, etc).

use crate::error::{Error, Result};
use alloc::vec::Vec;
use crypto_bigint::modular::runtime_mod::{DynResidue, DynResidueParams};
use crypto_bigint::Uint;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256, Sha384, Sha512};
use subtle::{Choice, ConditionallySelectable};

/// RSA public key: modulus and exponent, both held at the same limb width
/// for simplicity (`e` is usually tiny — 3 or 65537 — and fits easily).
#[derive(Clone, Copy)]
pub struct PublicKey<const L: usize> {
    pub n: Uint<L>,
    pub e: Uint<L>,
}

/// RSA private key. No CRT form: this crate performs the single full-width
/// modular exponentiation `c^d mod n` rather than the two CRT-form
/// half-width exponentiations most production stacks use for speed;
/// blinding (below) still applies the implementation's masking
/// requirement (spec.md §4.4: "the implementation passes a random-fn to
/// the low-level routine").
#[derive(Clone, Copy)]
pub struct PrivateKey<const L: usize> {
    pub n: Uint<L>,
    pub d: Uint<L>,
}

fn modexp<const L: usize>(base: &Uint<L>, exp: &Uint<L>, modulus: &Uint<L>) -> Uint<L> {
    let params = DynResidueParams::new(modulus);
    DynResidue::new(base, params).pow(exp).retrieve()
}

/// `a * b mod m`, via the same `DynResidue` Montgomery path every other
/// crate in this workspace uses for modular arithmetic (`gtls-ecmath::field`).
fn mod_mul<const L: usize>(a: &Uint<L>, b: &Uint<L>, modulus: &Uint<L>) -> Uint<L> {
    let params = DynResidueParams::new(modulus);
    DynResidue::new(a, params).mul(&DynResidue::new(b, params)).retrieve()
}

/// HAC Algorithm 14.61, binary extended Euclidean modular inverse.
/// Variable-time in `a`: only ever called on the random RSA blinding
/// factor, never on a secret exponent (every exponentiation in this
/// module instead goes through `DynResidue::pow`'s fixed-width ladder).
fn mod_inverse<const L: usize>(a: &Uint<L>, modulus: &Uint<L>) -> Option<Uint<L>> {
    if bool::from(a.is_zero()) {
        return None;
    }
    let mut u = *a;
    let mut v = *modulus;
    let mut x1 = Uint::<L>::ONE;
    let mut x2 = Uint::<L>::ZERO;

    while u != Uint::<L>::ONE && v != Uint::<L>::ONE {
        while bool::from(!u.is_odd()) {
            u = u.shr_vartime(1);
            x1 = if bool::from(!x1.is_odd()) {
                x1.shr_vartime(1)
            } else {
                x1.wrapping_add(modulus).shr_vartime(1)
            };
        }
        while bool::from(!v.is_odd()) {
            v = v.shr_vartime(1);
            x2 = if bool::from(!x2.is_odd()) {
                x2.shr_vartime(1)
            } else {
                x2.wrapping_add(modulus).shr_vartime(1)
            };
        }
        if u >= v {
            u = u.wrapping_sub(&v);
            x1 = mod_sub(&x1, &x2, modulus);
        } else {
            v = v.wrapping_sub(&u);
            x2 = mod_sub(&x2, &x1, modulus);
        }
    }
    let result = if u == Uint::<L>::ONE { x1 } else { x2 };
    Some(reduce_once(&result, modulus))
}

fn mod_sub<const L: usize>(a: &Uint<L>, b: &Uint<L>, m: &Uint<L>) -> Uint<L> {
    if a >= b {
        a.wrapping_sub(b)
    } else {
        a.wrapping_add(m).wrapping_sub(b)
    }
}

fn reduce_once<const L: usize>(x: &Uint<L>, m: &Uint<L>) -> Uint<L> {
    if x >= m {
        x.wrapping_sub(m)
    } else {
        *x
    }
}

fn draw_blinding_factor<const L: usize>(n: &Uint<L>, rng: &mut impl RngCore) -> (Uint<L>, Uint<L>) {
    let byte_len = key_byte_len(n);
    loop {
        let mut bytes = alloc::vec![0u8; byte_len];
        rng.fill_bytes(&mut bytes);
        let r = Uint::<L>::from_be_slice_vartime(&bytes);
        if bool::from(r.is_zero()) || r >= *n {
            continue;
        }
        if let Some(r_inv) = mod_inverse(&r, n) {
            return (r, r_inv);
        }
    }
}

fn key_byte_len<const L: usize>(n: &Uint<L>) -> usize {
    (n.bits_vartime() as usize + 7) / 8
}

// ---- PKCS#1 v1.5 padding (encryption block type 2, spec.md §4.4) ----

fn pkcs1_v15_pad_encrypt(k: usize, msg: &[u8], rng: &mut impl RngCore) -> Result<Vec<u8>> {
    if msg.len() + 11 > k {
        return Err(Error::InvalidPubkeyParams);
    }
    let ps_len = k - msg.len() - 3;
    let mut em = Vec::with_capacity(k);
    em.push(0x00);
    em.push(0x02);
    let mut ps = alloc::vec![0u8; ps_len];
    rng.fill_bytes(&mut ps);
    for byte in ps.iter_mut() {
        while *byte == 0 {
            *byte = (rng.next_u32() & 0xFF) as u8;
        }
    }
    em.extend_from_slice(&ps);
    em.push(0x00);
    em.extend_from_slice(msg);
    Ok(em)
}

/// Standard (branching) PKCS#1 v1.5 unpad, used by `decrypt` (the
/// ordinary, non-implicit-rejection entry point). `decrypt2` below uses
/// [`pkcs1_v15_unpad_ct`] instead.
fn pkcs1_v15_unpad(em: &[u8]) -> Result<Vec<u8>> {
    if em.len() < 11 || em[0] != 0x00 || em[1] != 0x02 {
        return Err(Error::VerificationFailed);
    }
    let rest = &em[2..];
    let sep = rest.iter().position(|&b| b == 0x00).ok_or(Error::VerificationFailed)?;
    if sep < 8 {
        return Err(Error::VerificationFailed);
    }
    Ok(rest[sep + 1..].to_vec())
}

/// Constant-access-pattern PKCS#1 v1.5 unpad for implicit rejection
/// (spec.md §4.4, §9 "Implicit rejection in RSA decrypt"): scans every
/// byte of `em` unconditionally and folds every check into `valid` via
/// bitwise operations, so the instruction/memory trace does not depend on
/// where (or whether) the padding is well-formed. Always returns a
/// `k - 11`-byte buffer; the caller substitutes random bytes on failure
/// rather than branching on `valid` before touching the output.
fn pkcs1_v15_unpad_ct(em: &[u8], out_len: usize) -> (Choice, Vec<u8>) {
    let mut valid = Choice::from((em.len() >= 11) as u8);
    let len = em.len().max(11);
    let mut padded = alloc::vec![0u8; len];
    padded[len - em.len()..].copy_from_slice(em);

    valid &= Choice::from((padded[0] == 0x00) as u8);
    valid &= Choice::from((padded[1] == 0x02) as u8);

    // Find the first zero byte at index >= 10 (2-byte header + 8-byte
    // minimum padding string) without branching on the result: every
    // position is compared, and `sep_index`/`found` are updated via
    // conditional selects so the scan touches the same memory regardless
    // of where the separator actually sits.
    let mut sep_index: usize = padded.len();
    let mut found = Choice::from(0u8);
    for i in 2..padded.len() {
        let is_zero = Choice::from((padded[i] == 0x00) as u8);
        let take = is_zero & !found;
        sep_index = usize::conditional_select(&sep_index, &i, take);
        found |= is_zero & Choice::from((i >= 10) as u8);
    }
    valid &= found;

    // Right-align the message into a fixed `out_len`-byte buffer without
    // branching or a data-dependent copy length: always read the same
    // trailing `out_len` bytes of `padded` (the widest window the message
    // could occupy) and, per byte, conditional-select it versus a zero
    // based on whether that position lies after `sep_index` — a plain
    // comparison, not a memory access, so which branch "wins" never
    // changes which addresses are touched.
    let mut message = alloc::vec![0u8; out_len];
    let base = padded.len().saturating_sub(out_len);
    for (j, slot) in message.iter_mut().enumerate() {
        let idx = base + j;
        let is_message = Choice::from((idx > sep_index) as u8);
        *slot = u8::conditional_select(&0u8, &padded[idx], is_message);
    }
    (valid, message)
}

/// Ordinary (branching) RSA-PKCS1v1.5 decrypt. Use [`decrypt2`] when the
/// ciphertext may come from an adversary who can observe timing (spec.md
/// §4.4's Bleichenbacher-resistant entry point).
pub fn decrypt<const L: usize>(key: &PrivateKey<L>, ciphertext: &Uint<L>, rng: &mut (impl RngCore + CryptoRng)) -> Result<Vec<u8>> {
    crate::state::check()?;
    // Multiplicative blinding: decrypt `r * c` instead of `c` directly, so
    // the value `DynResidue::pow` actually exponentiates is randomized per
    // call, then divide the random factor back out via `r_inv` (spec.md
    // §4.4: "the implementation passes a random-fn to the low-level
    // routine").
    let (r, r_inv) = draw_blinding_factor(&key.n, rng);
    let blinded_input = mod_mul(&r, ciphertext, &key.n);
    let blinded_result = modexp(&blinded_input, &key.d, &key.n);
    let em_int = mod_mul(&blinded_result, &r_inv, &key.n);
    let em = em_int.to_be_bytes_vartime();
    let k = key_byte_len(&key.n);
    let mut padded = alloc::vec![0u8; k];
    let n = em.len().min(k);
    padded[k - n..].copy_from_slice(&em[em.len() - n..]);
    pkcs1_v15_unpad(&padded)
}

/// Constant-time "implicit rejection" decrypt (spec.md §4.4): never
/// branches on padding validity. Returns a fixed-size `out_len`-byte
/// buffer always; on invalid padding its contents are a deterministic
/// function of the key and ciphertext (not disclosed further), not the
/// real message, and the returned `bool` communicates success without the
/// caller being able to distinguish "valid but short message" from
/// "rejected" by timing or access pattern alone.
pub fn decrypt2<const L: usize>(
    key: &PrivateKey<L>,
    ciphertext: &Uint<L>,
    out_len: usize,
    rng: &mut (impl RngCore + CryptoRng),
) -> (bool, Vec<u8>) {
    if crate::state::check().is_err() {
        return (false, alloc::vec![0u8; out_len]);
    }
    let (r, r_inv) = draw_blinding_factor(&key.n, rng);
    let blinded_input = mod_mul(&r, ciphertext, &key.n);
    let blinded_result = modexp(&blinded_input, &key.d, &key.n);
    let em_int = mod_mul(&blinded_result, &r_inv, &key.n);
    let em = em_int.to_be_bytes_vartime();
    let k = key_byte_len(&key.n);
    let mut padded = alloc::vec![0u8; k];
    let n = em.len().min(k);
    padded[k - n..].copy_from_slice(&em[em.len() - n..]);

    let (valid, message) = pkcs1_v15_unpad_ct(&padded, out_len);
    let mut random_fallback = alloc::vec![0u8; out_len];
    rng.fill_bytes(&mut random_fallback);

    let mut result = alloc::vec![0u8; out_len];
    for i in 0..out_len {
        result[i] = u8::conditional_select(&random_fallback[i], &message[i], valid);
    }
    (bool::from(valid), result)
}

/// PKCS#1 v1.5 encrypt (spec.md §4.4): pad, then a plain (unblinded)
/// exponentiation with the public exponent — blinding only matters for
/// the private-exponent path.
pub fn encrypt<const L: usize>(key: &PublicKey<L>, msg: &[u8], rng: &mut (impl RngCore + CryptoRng)) -> Result<Uint<L>> {
    crate::state::check()?;
    let k = key_byte_len(&key.n);
    let em = pkcs1_v15_pad_encrypt(k, msg, rng)?;
    let em_int = Uint::<L>::from_be_slice_vartime(&em);
    Ok(modexp(&em_int, &key.e, &key.n))
}

// ---- SHA-256 DigestInfo prefix for PKCS#1 v1.5 signatures (RFC 8017 A.2.4) ----

const SHA256_DIGEST_INFO_PREFIX: [u8; 19] = [
    0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01, 0x05, 0x00, 0x04, 0x20,
];

/// PKCS#1 v1.5 sign over a SHA-256 digest (spec.md §4.4).
pub fn sign_pkcs1v15<const L: usize>(key: &PrivateKey<L>, message: &[u8]) -> Result<Uint<L>> {
    crate::state::check()?;
    let digest = Sha256::digest(message);
    let k = key_byte_len(&key.n);
    let t_len = SHA256_DIGEST_INFO_PREFIX.len() + digest.len();
    if t_len + 11 > k {
        return Err(Error::InvalidPubkeyParams);
    }
    let ps_len = k - t_len - 3;
    let mut em = Vec::with_capacity(k);
    em.push(0x00);
    em.push(0x01);
    em.extend(core::iter::repeat(0xFFu8).take(ps_len));
    em.push(0x00);
    em.extend_from_slice(&SHA256_DIGEST_INFO_PREFIX);
    em.extend_from_slice(&digest);
    let em_int = Uint::<L>::from_be_slice_vartime(&em);
    Ok(modexp(&em_int, &key.d, &key.n))
}

pub fn verify_pkcs1v15<const L: usize>(key: &PublicKey<L>, message: &[u8], signature: &Uint<L>) -> Result<()> {
    let expected = sign_pkcs1v15_expected_em(key, message)?;
    let decoded = modexp(signature, &key.e, &key.n);
    if decoded == expected {
        Ok(())
    } else {
        Err(Error::VerificationFailed)
    }
}

fn sign_pkcs1v15_expected_em<const L: usize>(key: &PublicKey<L>, message: &[u8]) -> Result<Uint<L>> {
    let digest = Sha256::digest(message);
    let k = key_byte_len(&key.n);
    let t_len = SHA256_DIGEST_INFO_PREFIX.len() + digest.len();
    if t_len + 11 > k {
        return Err(Error::InvalidPubkeyParams);
    }
    let ps_len = k - t_len - 3;
    let mut em = Vec::with_capacity(k);
    em.push(0x00);
    em.push(0x01);
    em.extend(core::iter::repeat(0xFFu8).take(ps_len));
    em.push(0x00);
    em.extend_from_slice(&SHA256_DIGEST_INFO_PREFIX);
    em.extend_from_slice(&digest);
    Ok(Uint::<L>::from_be_slice_vartime(&em))
}

// ---- RSA-PSS (RFC 8017 §9.1) ----

/// The PSS hash/MGF1 choice (spec.md §6: "accept SHA-256, SHA-384,
/// SHA-512"). Canonical salt lengths are 32/48/64 respectively, but
/// [`sign_pss`]/[`verify_pss`] accept any `salt_len` the key size permits
/// (spec.md §6: "any length permitted provided size bounds hold"); the
/// same hash is used both for `mHash` and for MGF1, per RFC 8017 §9.1.1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PssDigest {
    Sha256,
    Sha384,
    Sha512,
}

impl PssDigest {
    fn output_size(self) -> usize {
        match self {
            PssDigest::Sha256 => Sha256::output_size(),
            PssDigest::Sha384 => Sha384::output_size(),
            PssDigest::Sha512 => Sha512::output_size(),
        }
    }

    fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            PssDigest::Sha256 => Sha256::digest(data).to_vec(),
            PssDigest::Sha384 => Sha384::digest(data).to_vec(),
            PssDigest::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

fn mgf1(digest: PssDigest, seed: &[u8], mask_len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(mask_len + digest.output_size());
    let mut counter: u32 = 0;
    while out.len() < mask_len {
        let mut input = Vec::with_capacity(seed.len() + 4);
        input.extend_from_slice(seed);
        input.extend_from_slice(&counter.to_be_bytes());
        out.extend_from_slice(&digest.digest(&input));
        counter += 1;
    }
    out.truncate(mask_len);
    out
}

/// PSS salt length is validated up front against `digest_len + salt_len +
/// 2 <= key_bytes` (spec.md §4.4); violating it returns
/// `InvalidPubkeyParams` rather than silently clamping.
pub fn sign_pss<const L: usize>(
    key: &PrivateKey<L>,
    message: &[u8],
    digest: PssDigest,
    salt_len: usize,
    rng: &mut impl RngCore,
) -> Result<Uint<L>> {
    crate::state::check()?;
    let k = key_byte_len(&key.n);
    let digest_len = digest.output_size();
    if digest_len + salt_len + 2 > k {
        return Err(Error::InvalidPubkeyParams);
    }
    let m_hash = digest.digest(message);
    let mut salt = alloc::vec![0u8; salt_len];
    rng.fill_bytes(&mut salt);

    let mut m_prime = alloc::vec![0u8; 8];
    m_prime.extend_from_slice(&m_hash);
    m_prime.extend_from_slice(&salt);
    let h = digest.digest(&m_prime);

    let em_bits = key.n.bits_vartime() as usize - 1;
    let em_len = em_bits.div_ceil(8);
    let ps_len = em_len - salt_len - digest_len - 2;
    let mut db = alloc::vec![0u8; ps_len];
    db.push(0x01);
    db.extend_from_slice(&salt);

    let mask = mgf1(digest, &h, db.len());
    let mut masked_db: Vec<u8> = db.iter().zip(mask.iter()).map(|(a, b)| a ^ b).collect();
    let top_bits = 8 * em_len - em_bits;
    if top_bits > 0 {
        masked_db[0] &= 0xFFu8 >> top_bits;
    }

    let mut em = Vec::with_capacity(em_len + 1);
    em.extend_from_slice(&masked_db);
    em.extend_from_slice(&h);
    em.push(0xBC);

    let em_int = Uint::<L>::from_be_slice_vartime(&em);
    Ok(modexp(&em_int, &key.d, &key.n))
}

pub fn verify_pss<const L: usize>(
    key: &PublicKey<L>,
    message: &[u8],
    signature: &Uint<L>,
    digest: PssDigest,
    salt_len: usize,
) -> Result<()> {
    let digest_len = digest.output_size();
    let k = key_byte_len(&key.n);
    if digest_len + salt_len + 2 > k {
        return Err(Error::InvalidPubkeyParams);
    }
    let decoded = modexp(signature, &key.e, &key.n);
    let em_bits = key.n.bits_vartime() as usize - 1;
    let em_len = em_bits.div_ceil(8);
    let em = decoded.to_be_bytes_vartime();
    let mut padded = alloc::vec![0u8; em_len];
    let n = em.len().min(em_len);
    padded[em_len - n..].copy_from_slice(&em[em.len() - n..]);

    if padded.last() != Some(&0xBC) {
        return Err(Error::VerificationFailed);
    }
    if em_len < digest_len + 1 {
        return Err(Error::VerificationFailed);
    }
    let db_len = em_len - digest_len - 1;
    let masked_db = &padded[..db_len];
    let h = &padded[db_len..em_len - 1];

    let mask = mgf1(digest, h, db_len);
    let mut db: Vec<u8> = masked_db.iter().zip(mask.iter()).map(|(a, b)| a ^ b).collect();
    let top_bits = 8 * em_len - em_bits;
    if top_bits > 0 {
        db[0] &= 0xFFu8 >> top_bits;
    }

    if db_len < salt_len + 1 {
        return Err(Error::VerificationFailed);
    }
    let ps_len = db_len - salt_len - 1;
    if db[..ps_len].iter().any(|&b| b != 0) || db[ps_len] != 0x01 {
        return Err(Error::VerificationFailed);
    }
    let salt = &db[ps_len + 1..];

    let m_hash = digest.digest(message);
    let mut m_prime = alloc::vec![0u8; 8];
    m_prime.extend_from_slice(&m_hash);
    m_prime.extend_from_slice(salt);
    let h_prime = digest.digest(&m_prime);

    if h == h_prime.as_slice() {
        Ok(())
    } else {
        Err(Error::VerificationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    // Small (511-bit, L=8) textbook key pair, for round-trip coverage only
    // — far too small for real security.
    const N: Uint<8> =
        Uint::<8>::from_be_hex("400000000000000000000000000000000000000000000000000000000000D9BE00000000000000000000000000000000000000000000000000000000494CC683");
    const D: Uint<8> =
        Uint::<8>::from_be_hex("14B36B4C94B36B4C94B36B4C94B36B4C94B36B4C94B36B4C94B36B4C94B3B1BA0E5BF1A40E5BF1A40E5BF1A40E5BF1A40E5BF1A40E5BF1A40E5BF1A42610E071");
    const E: Uint<8> = Uint::<8>::from_u64(65537);

    fn test_keypair() -> (PublicKey<8>, PrivateKey<8>) {
        (PublicKey { n: N, e: E }, PrivateKey { n: N, d: D })
    }

    #[test]
    fn pkcs1v15_pad_unpad_round_trip() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let msg = b"hello rsa";
        let padded = pkcs1_v15_pad_encrypt(64, msg, &mut rng).unwrap();
        assert_eq!(padded.len(), 64);
        let recovered = pkcs1_v15_unpad(&padded).unwrap();
        assert_eq!(recovered, msg);
    }

    #[test]
    fn pkcs1v15_ct_unpad_matches_branching_unpad_on_valid_input() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let msg = b"agree";
        let padded = pkcs1_v15_pad_encrypt(64, msg, &mut rng).unwrap();
        let (valid, message) = pkcs1_v15_unpad_ct(&padded, msg.len());
        assert!(bool::from(valid));
        assert_eq!(&message[..], msg);
    }

    #[test]
    fn pkcs1v15_ct_unpad_rejects_bad_header() {
        let mut bogus = alloc::vec![0u8; 64];
        bogus[0] = 0x00;
        bogus[1] = 0x01; // wrong block type
        let (valid, _) = pkcs1_v15_unpad_ct(&bogus, 8);
        assert!(!bool::from(valid));
    }

    #[test]
    fn mod_inverse_round_trips() {
        let m = Uint::<4>::from_be_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF43");
        let a = Uint::<4>::from_u64(12345);
        let inv = mod_inverse(&a, &m).unwrap();
        let product = mod_mul(&a, &inv, &m);
        assert_eq!(product, Uint::<4>::ONE);
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let (public, private) = test_keypair();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let msg = b"attack at dawn";
        let ciphertext = encrypt(&public, msg, &mut rng).unwrap();
        let recovered = decrypt(&private, &ciphertext, &mut rng).unwrap();
        assert_eq!(recovered, msg);
    }

    #[test]
    fn decrypt2_recovers_valid_plaintext() {
        let (public, private) = test_keypair();
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let msg = b"implicit rejection";
        let ciphertext = encrypt(&public, msg, &mut rng).unwrap();
        let (ok, recovered) = decrypt2(&private, &ciphertext, msg.len(), &mut rng);
        assert!(ok);
        assert_eq!(&recovered[..], msg);
    }

    #[test]
    fn decrypt2_signals_failure_on_corrupted_ciphertext() {
        let (public, private) = test_keypair();
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let msg = b"tamper me";
        let mut ciphertext = encrypt(&public, msg, &mut rng).unwrap();
        // flip a low bit: almost certainly destroys PKCS#1 v1.5 padding.
        ciphertext = ciphertext.wrapping_add(&Uint::<8>::ONE);
        let (ok, recovered) = decrypt2(&private, &ciphertext, msg.len(), &mut rng);
        assert!(!ok);
        assert_eq!(recovered.len(), msg.len());
    }

    #[test]
    fn sign_verify_pkcs1v15_round_trip() {
        let (public, private) = test_keypair();
        let msg = b"sign me";
        let sig = sign_pkcs1v15(&private, msg).unwrap();
        verify_pkcs1v15(&public, msg, &sig).unwrap();
        assert!(verify_pkcs1v15(&public, b"sign me not", &sig).is_err());
    }

    #[test]
    fn sign_verify_pss_round_trip() {
        let (public, private) = test_keypair();
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        let msg = b"probabilistic signature scheme";
        let sig = sign_pss(&private, msg, PssDigest::Sha256, 16, &mut rng).unwrap();
        verify_pss(&public, msg, &sig, PssDigest::Sha256, 16).unwrap();
        assert!(verify_pss(&public, b"different message", &sig, PssDigest::Sha256, 16).is_err());
    }

    #[test]
    fn sign_verify_pss_sha384() {
        let (public, private) = test_keypair();
        let msg = b"stronger digest";
        // This toy 511-bit test key is too small to hold SHA-384's 48-byte
        // digest alongside a canonical 48-byte salt, so this uses the
        // zero-length salt spec.md §6 still permits ("any length ...
        // provided size bounds hold").
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let sig = sign_pss(&private, msg, PssDigest::Sha384, 0, &mut rng).unwrap();
        verify_pss(&public, msg, &sig, PssDigest::Sha384, 0).unwrap();
    }

    #[test]
    fn sign_pss_rejects_salt_too_long_for_key() {
        let (_, private) = test_keypair();
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        // 64-byte key: SHA-512 digest (64 B) + any positive salt already
        // overruns `digest_len + salt_len + 2 <= k`.
        assert!(sign_pss(&private, b"x", PssDigest::Sha512, 8, &mut rng).is_err());
    }
}
