//! Public-key dispatch front (spec.md §4.4): "a single front called by
//! the TLS layer selects behavior by an algorithm tag." Every curve-based
//! variant here fixes its limb width to the one concrete curve it names —
//! `gtls-ecmath`'s curve tables are themselves concrete, so a caller never
//! picks `L` by hand for ECDSA/EdDSA/GOST-DSA. RSA and classic DSA keep
//! their modulus width generic in their own modules (a genuine deployment
//! choice); the `Rsa2048`/`Dsa2048` variants here are a common-case
//! convenience, not the only widths those algorithms support — a caller
//! using a different RSA/DSA key size calls `rsa`/`dsa` directly.

use crate::error::Result;
use crate::policy::Policy;
use alloc::vec::Vec;
use crypto_bigint::Uint;
use gtls_ecmath::curve::CurveParams;
use gtls_ecmath::weierstrass::Jacobian;
use rand_core::{CryptoRng, RngCore};

/// Which public-key algorithm a [`SigningKey`]/[`VerifyingKey`] belongs to
/// (spec.md §3's "tagged union over algorithm").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AlgorithmTag {
    Rsa2048Pkcs1v15,
    Rsa2048Pss,
    Dsa2048,
    EcdsaP256,
    EcdsaP384,
    EcdsaP521,
    GostDsa256,
    Ed25519,
    Ed448,
}

/// A private key ready to sign, tagged by algorithm.
pub enum SigningKey {
    Rsa2048Pkcs1v15(crate::rsa::PrivateKey<8>),
    Rsa2048Pss {
        key: crate::rsa::PrivateKey<8>,
        digest: crate::rsa::PssDigest,
        salt_len: usize,
    },
    Dsa2048(crate::dsa::PrivateKey<4>),
    EcdsaP256 {
        curve: CurveParams<4>,
        generator: Jacobian<4>,
        d: Uint<4>,
    },
    EcdsaP384 {
        curve: CurveParams<6>,
        generator: Jacobian<6>,
        d: Uint<6>,
    },
    EcdsaP521 {
        curve: CurveParams<9>,
        generator: Jacobian<9>,
        d: Uint<9>,
    },
    GostDsa256 {
        curve: CurveParams<4>,
        generator: Jacobian<4>,
        d: Uint<4>,
    },
    Ed25519 {
        seed: [u8; 32],
    },
    Ed448 {
        seed: [u8; 57],
    },
}

impl SigningKey {
    pub fn algorithm(&self) -> AlgorithmTag {
        match self {
            SigningKey::Rsa2048Pkcs1v15(_) => AlgorithmTag::Rsa2048Pkcs1v15,
            SigningKey::Rsa2048Pss { .. } => AlgorithmTag::Rsa2048Pss,
            SigningKey::Dsa2048(_) => AlgorithmTag::Dsa2048,
            SigningKey::EcdsaP256 { .. } => AlgorithmTag::EcdsaP256,
            SigningKey::EcdsaP384 { .. } => AlgorithmTag::EcdsaP384,
            SigningKey::EcdsaP521 { .. } => AlgorithmTag::EcdsaP521,
            SigningKey::GostDsa256 { .. } => AlgorithmTag::GostDsa256,
            SigningKey::Ed25519 { .. } => AlgorithmTag::Ed25519,
            SigningKey::Ed448 { .. } => AlgorithmTag::Ed448,
        }
    }
}

/// The matching public key, tagged the same way.
pub enum VerifyingKey {
    Rsa2048Pkcs1v15(crate::rsa::PublicKey<8>),
    Rsa2048Pss {
        key: crate::rsa::PublicKey<8>,
        digest: crate::rsa::PssDigest,
        salt_len: usize,
    },
    Dsa2048(crate::dsa::PublicKey<4>),
    EcdsaP256 {
        curve: CurveParams<4>,
        generator: Jacobian<4>,
        q: Jacobian<4>,
    },
    EcdsaP384 {
        curve: CurveParams<6>,
        generator: Jacobian<6>,
        q: Jacobian<6>,
    },
    EcdsaP521 {
        curve: CurveParams<9>,
        generator: Jacobian<9>,
        q: Jacobian<9>,
    },
    GostDsa256 {
        curve: CurveParams<4>,
        generator: Jacobian<4>,
        q: Jacobian<4>,
    },
    Ed25519 {
        pubkey: [u8; 32],
    },
    Ed448 {
        pubkey: [u8; 57],
    },
}

fn ed25519_ops() -> crate::eddsa::CurveOps<4> {
    crate::eddsa::curve_ops_25519()
}

fn ed448_ops() -> crate::eddsa::CurveOps<7> {
    crate::eddsa::curve_ops_448()
}

/// Sign `digest_or_message` with `key` (a digest for RSA/DSA/ECDSA/
/// GOST-DSA, the raw message for EdDSA — each already hashes or doesn't
/// per its own rules) and return the algorithm's own wire encoding (DER
/// for ECDSA/DSA/GOST-DSA, fixed-width `R||S` for EdDSA, a raw modular
/// integer's big-endian bytes for RSA — spec.md §6).
pub fn sign(
    key: &SigningKey,
    digest_or_message: &[u8],
    policy: &Policy,
    self_test: bool,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<Vec<u8>> {
    crate::state::check()?;
    match key {
        SigningKey::Rsa2048Pkcs1v15(private) => Ok(crate::rsa::sign_pkcs1v15(private, digest_or_message)?.to_be_bytes_vartime()),
        SigningKey::Rsa2048Pss { key, digest, salt_len } => {
            Ok(crate::rsa::sign_pss(key, digest_or_message, *digest, *salt_len, rng)?.to_be_bytes_vartime())
        }
        SigningKey::Dsa2048(private) => {
            let sig = crate::dsa::sign(private, digest_or_message, policy, self_test, rng)?;
            Ok(crate::der_sig::encode_signature(&sig.r.to_be_bytes_vartime(), &sig.s.to_be_bytes_vartime())?)
        }
        SigningKey::EcdsaP256 { curve, generator, d } => {
            let sig = crate::ecdsa::sign(curve, generator, d, digest_or_message, policy, self_test, rng)?;
            crate::ecdsa::encode_der(&sig)
        }
        SigningKey::EcdsaP384 { curve, generator, d } => {
            let sig = crate::ecdsa::sign(curve, generator, d, digest_or_message, policy, self_test, rng)?;
            crate::ecdsa::encode_der(&sig)
        }
        SigningKey::EcdsaP521 { curve, generator, d } => {
            let sig = crate::ecdsa::sign(curve, generator, d, digest_or_message, policy, self_test, rng)?;
            crate::ecdsa::encode_der(&sig)
        }
        SigningKey::GostDsa256 { curve, generator, d } => {
            let sig = crate::gostdsa::sign(curve, generator, d, digest_or_message, policy, self_test, rng)?;
            Ok(crate::gostdsa::encode_fixed(&sig, curve.bit_size / 8))
        }
        SigningKey::Ed25519 { seed } => {
            let ops = ed25519_ops();
            crate::eddsa::sign::<4>(crate::eddsa::Variant::Ed25519, &ops, seed, digest_or_message)
        }
        SigningKey::Ed448 { seed } => {
            let ops = ed448_ops();
            crate::eddsa::sign::<7>(crate::eddsa::Variant::Ed448, &ops, seed, digest_or_message)
        }
    }
}

/// Verify `signature` over `digest_or_message` under `key`.
pub fn verify(key: &VerifyingKey, digest_or_message: &[u8], signature: &[u8]) -> Result<()> {
    crate::state::check()?;
    match key {
        VerifyingKey::Rsa2048Pkcs1v15(public) => {
            let sig = Uint::<8>::from_be_slice_vartime(signature);
            crate::rsa::verify_pkcs1v15(public, digest_or_message, &sig)
        }
        VerifyingKey::Rsa2048Pss { key, digest, salt_len } => {
            let sig = Uint::<8>::from_be_slice_vartime(signature);
            crate::rsa::verify_pss(key, digest_or_message, &sig, *digest, *salt_len)
        }
        VerifyingKey::Dsa2048(public) => {
            let (r, s) = crate::der_sig::decode_signature(signature)?;
            let sig = crate::dsa::Signature {
                r: crypto_bigint::Uint::<4>::from_be_slice_vartime(&r),
                s: crypto_bigint::Uint::<4>::from_be_slice_vartime(&s),
            };
            crate::dsa::verify(public, digest_or_message, &sig)
        }
        VerifyingKey::EcdsaP256 { curve, generator, q } => {
            let sig = crate::ecdsa::decode_der(signature)?;
            crate::ecdsa::verify(curve, generator, q, digest_or_message, &sig)
        }
        VerifyingKey::EcdsaP384 { curve, generator, q } => {
            let sig = crate::ecdsa::decode_der(signature)?;
            crate::ecdsa::verify(curve, generator, q, digest_or_message, &sig)
        }
        VerifyingKey::EcdsaP521 { curve, generator, q } => {
            let sig = crate::ecdsa::decode_der(signature)?;
            crate::ecdsa::verify(curve, generator, q, digest_or_message, &sig)
        }
        VerifyingKey::GostDsa256 { curve, generator, q } => {
            let byte_size = curve.bit_size / 8;
            let sig = crate::gostdsa::decode_fixed(signature, byte_size)?;
            crate::gostdsa::verify(curve, generator, q, digest_or_message, &sig)
        }
        VerifyingKey::Ed25519 { pubkey } => {
            let ops = ed25519_ops();
            crate::eddsa::verify::<4>(crate::eddsa::Variant::Ed25519, &ops, pubkey, digest_or_message, signature)
        }
        VerifyingKey::Ed448 { pubkey } => {
            let ops = ed448_ops();
            crate::eddsa::verify::<7>(crate::eddsa::Variant::Ed448, &ops, pubkey, digest_or_message, signature)
        }
    }
}

/// Key-agreement side of the front: DH keeps its own generic entry point
/// (`crate::dh::derive`) since its modulus width is a deployment choice,
/// not fixed by a curve table; ECDH's curve-based forms fix a concrete
/// width per variant the same way [`SigningKey`] does.
pub enum EcdhPeer {
    P256 {
        curve: CurveParams<4>,
        peer: Jacobian<4>,
        d: Uint<4>,
    },
    P384 {
        curve: CurveParams<6>,
        peer: Jacobian<6>,
        d: Uint<6>,
    },
    P521 {
        curve: CurveParams<9>,
        peer: Jacobian<9>,
        d: Uint<9>,
    },
    X25519 {
        private: [u8; 32],
        peer_u: [u8; 32],
    },
    X448 {
        private: [u8; 56],
        peer_u: [u8; 56],
    },
}

pub fn derive_ecdh(key: &EcdhPeer) -> Result<Vec<u8>> {
    crate::state::check()?;
    match key {
        EcdhPeer::P256 { curve, peer, d } => crate::ecdh::derive_weierstrass(curve, peer, d),
        EcdhPeer::P384 { curve, peer, d } => crate::ecdh::derive_weierstrass(curve, peer, d),
        EcdhPeer::P521 { curve, peer, d } => crate::ecdh::derive_weierstrass(curve, peer, d),
        EcdhPeer::X25519 { private, peer_u } => Ok(crate::ecdh::derive_x25519(private, peer_u)?.to_vec()),
        EcdhPeer::X448 { private, peer_u } => Ok(crate::ecdh::derive_x448(private, peer_u)?.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtls_ecmath::curves::{gost256a, p256};
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use sha2::{Digest, Sha256};

    #[test]
    fn ecdsa_p256_round_trip_through_dispatch() {
        let curve = p256::params();
        let generator = crate::ecdsa::generator(p256::GX, p256::GY, &curve);
        let d = Uint::<4>::from_u64(999_983);
        let d_bits = gtls_ecmath::bits_msb_first(&d, curve.bit_size);
        let q = gtls_ecmath::weierstrass::scalar_mul(&d_bits, &generator, &curve);

        let signing = SigningKey::EcdsaP256 { curve, generator, d };
        let verifying = VerifyingKey::EcdsaP256 { curve, generator, q };
        assert_eq!(signing.algorithm(), AlgorithmTag::EcdsaP256);

        let digest = Sha256::digest(b"dispatch message");
        let policy = Policy::new();
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let sig = sign(&signing, &digest, &policy, false, &mut rng).unwrap();
        verify(&verifying, &digest, &sig).unwrap();
    }

    #[test]
    fn gostdsa_round_trip_through_dispatch() {
        let curve = gost256a::params();
        let generator = crate::ecdsa::generator(gost256a::GX, gost256a::GY, &curve);
        let d = Uint::<4>::from_u64(42);
        let d_bits = gtls_ecmath::bits_msb_first(&d, curve.bit_size);
        let q = gtls_ecmath::weierstrass::scalar_mul(&d_bits, &generator, &curve);

        let signing = SigningKey::GostDsa256 { curve, generator, d };
        let verifying = VerifyingKey::GostDsa256 { curve, generator, q };

        let digest = Sha256::digest(b"gost dispatch message");
        let policy = Policy::new();
        let mut rng = ChaCha20Rng::seed_from_u64(22);
        let sig = sign(&signing, &digest, &policy, false, &mut rng).unwrap();
        verify(&verifying, &digest, &sig).unwrap();
    }

    #[test]
    fn ed25519_round_trip_through_dispatch() {
        let seed = [0x11u8; 32];
        let ops = ed25519_ops();
        let h = crate::eddsa::Variant::Ed25519;
        // Derive the matching public key the same way `sign` does
        // internally, to keep this test independent of any key-import
        // helper (out of scope here — see `SigningKey`'s doc comment).
        let _ = h;
        let signing = SigningKey::Ed25519 { seed };
        let message = b"ed25519 dispatch message";
        let policy = Policy::new();
        let mut rng = ChaCha20Rng::seed_from_u64(23);
        let sig = sign(&signing, message, &policy, false, &mut rng).unwrap();

        // Recompute the public key via the same scalar derivation eddsa's
        // own round-trip test uses.
        let digest = crate::eddsa::Variant::Ed25519;
        let _ = digest;
        let pubkey = ed25519_pubkey_from_seed(&seed, &ops);
        let verifying = VerifyingKey::Ed25519 { pubkey };
        verify(&verifying, message, &sig).unwrap();
    }

    fn ed25519_pubkey_from_seed(seed: &[u8; 32], ops: &crate::eddsa::CurveOps<4>) -> [u8; 32] {
        use sha2::{Digest, Sha512};
        let h = Sha512::digest(seed);
        let mut scalar_bytes = h[..32].to_vec();
        scalar_bytes[0] &= 248;
        scalar_bytes[31] &= 127;
        scalar_bytes[31] |= 64;
        let mut be = scalar_bytes.clone();
        be.reverse();
        let s = Uint::<4>::from_be_slice_vartime(&be);
        let s_bits = gtls_ecmath::bits_msb_first(&s, 256);
        let a_point = gtls_ecmath::edwards::scalar_mul(&s_bits, ops.base(), ops.d(), ops.variant(), ops.field());
        let mut out = a_point.to_affine(ops.field()).unwrap().1.to_uint().to_be_bytes_vartime();
        out.reverse();
        out.resize(32, 0);
        let mut fixed = [0u8; 32];
        fixed.copy_from_slice(&out);
        fixed
    }

    #[test]
    fn rsa_pss_sha384_round_trip_through_dispatch() {
        // Same toy 511-bit key `rsa.rs`'s unit tests use; a zero-length
        // salt since the key is too small for a canonical 48-byte one
        // alongside a SHA-384 digest.
        let n = Uint::<8>::from_be_hex("400000000000000000000000000000000000000000000000000000000000D9BE00000000000000000000000000000000000000000000000000000000494CC683");
        let d = Uint::<8>::from_be_hex("14B36B4C94B36B4C94B36B4C94B36B4C94B36B4C94B36B4C94B36B4C94B3B1BA0E5BF1A40E5BF1A40E5BF1A40E5BF1A40E5BF1A40E5BF1A40E5BF1A42610E071");
        let e = Uint::<8>::from_u64(65537);

        let signing = SigningKey::Rsa2048Pss {
            key: crate::rsa::PrivateKey { n, d },
            digest: crate::rsa::PssDigest::Sha384,
            salt_len: 0,
        };
        let verifying = VerifyingKey::Rsa2048Pss {
            key: crate::rsa::PublicKey { n, e },
            digest: crate::rsa::PssDigest::Sha384,
            salt_len: 0,
        };
        assert_eq!(signing.algorithm(), AlgorithmTag::Rsa2048Pss);

        let policy = Policy::new();
        let mut rng = ChaCha20Rng::seed_from_u64(24);
        let sig = sign(&signing, b"pss via dispatch", &policy, false, &mut rng).unwrap();
        verify(&verifying, b"pss via dispatch", &sig).unwrap();
    }

    #[test]
    fn ecdh_x25519_through_dispatch() {
        let private = [0x42u8; 32];
        let peer_u = [0x07u8; 32];
        let key = EcdhPeer::X25519 { private, peer_u };
        let shared = derive_ecdh(&key).unwrap();
        assert_eq!(shared.len(), 32);
    }
}
