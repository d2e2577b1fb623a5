//! ECDSA P-256 sign/verify through the dispatch front, where the
//! signature in transit is exactly the `gtls-asn1`-encoded DER blob
//! (spec.md §6) rather than a raw `r || s` pair — exercising the seam
//! between `gtls-pk::ecdsa` and `gtls-asn1` that each crate's own tests
//! only cover from one side.

use crypto_bigint::Uint;
use gtls_asn1::der::decode;
use gtls_asn1::Tag;
use gtls_ecmath::bits_msb_first;
use gtls_ecmath::curves::p256;
use gtls_ecmath::weierstrass::scalar_mul;
use gtls_pk::dispatch::{sign, verify, AlgorithmTag, SigningKey, VerifyingKey};
use gtls_pk::ecdsa::generator;
use gtls_pk::Policy;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

#[test]
fn p256_signature_is_a_well_formed_der_sequence_of_two_integers() {
    let curve = p256::params();
    let gen = generator(p256::GX, p256::GY, &curve);
    let d = Uint::<4>::from_u64(424_242_424_2);
    let d_bits = bits_msb_first(&d, curve.bit_size);
    let q = scalar_mul(&d_bits, &gen, &curve);

    let signing = SigningKey::EcdsaP256 { curve, generator: gen, d };
    let verifying = VerifyingKey::EcdsaP256 { curve, generator: gen, q };
    assert_eq!(signing.algorithm(), AlgorithmTag::EcdsaP256);

    let digest = Sha256::digest(b"conformance roundtrip message");
    let policy = Policy::new();
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let sig = sign(&signing, &digest, &policy, false, &mut rng).unwrap();

    // `gtls-pk::der_sig` produced this, so `gtls-asn1` itself must accept
    // it as a plain `SEQUENCE { INTEGER, INTEGER }`.
    let (arena, root) = decode(&sig).unwrap();
    assert_eq!(arena.get(root).tag, Tag::Sequence);
    let children: std::vec::Vec<_> = arena.children(root).collect();
    assert_eq!(children.len(), 2);
    for child in &children {
        assert_eq!(arena.get(*child).tag, Tag::Integer);
    }

    verify(&verifying, &digest, &sig).unwrap();
}
