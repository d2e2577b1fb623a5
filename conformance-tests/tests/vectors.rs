//! Concrete external test vectors that need more than one crate wired
//! together to exercise end-to-end (each crate's own unit tests cover
//! everything that fits inside a single crate boundary already).

use gtls_asn1::der::{decode, encode, encode_integer_i128};
use gtls_asn1::{Arena, Node, NodeValue, Tag};
use gtls_pk::dispatch::{derive_ecdh, sign, verify, EcdhPeer, SigningKey, VerifyingKey};
use gtls_pk::Policy;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// `SEQUENCE { INTEGER 1, INTEGER -1 }` -> `30 06 02 01 01 02 01 FF`
/// (RFC 8017-style DER minimal-encoding rules for `INTEGER`), and decodes
/// back into the same tree shape it started from.
#[test]
fn der_sequence_of_two_integers_encodes_and_round_trips() {
    let mut arena = Arena::new();
    let seq = arena.push(Node::new("seq".into(), Tag::Sequence));
    for (name, n) in [("a", 1i128), ("b", -1i128)] {
        let mut node = Node::new(name.into(), Tag::Integer);
        node.value = NodeValue::Bytes(encode_integer_i128(n));
        let id = arena.push(node);
        arena.append_child(seq, id);
    }
    let der = encode(&arena, seq).unwrap();
    assert_eq!(der, [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0xFF]);

    let (decoded_arena, root) = decode(&der).unwrap();
    let re_encoded = encode(&decoded_arena, root).unwrap();
    assert_eq!(re_encoded, der);
}

/// X25519 scalar multiplication (RFC 7748 §5.2 test vector 1), driven
/// through the algorithm-tagged dispatch front rather than `gtls-pk`'s
/// internal `ecdh` module directly.
#[test]
fn x25519_rfc7748_vector_through_dispatch() {
    let private = [
        0x77, 0x07, 0x6d, 0x0a, 0x73, 0x18, 0xa5, 0x7d, 0x3c, 0x16, 0xc1, 0x72, 0x51, 0xb2, 0x66,
        0x45, 0xdf, 0x4c, 0x2f, 0x87, 0xeb, 0xc0, 0x99, 0x2a, 0xb1, 0x77, 0xfb, 0xa5, 0x1d, 0xb9,
        0x2c, 0x2a,
    ];
    let peer_u = [
        0xde, 0x9e, 0xdb, 0x7d, 0x7b, 0x7d, 0xc1, 0xb4, 0xd3, 0x5b, 0x61, 0xc2, 0xec, 0xe4, 0x35,
        0x37, 0x3f, 0x83, 0x43, 0xc8, 0x5b, 0x78, 0x67, 0x4d, 0xad, 0xfc, 0x7e, 0x14, 0x6f, 0x88,
        0x2b, 0x4f,
    ];
    let expected = [
        0x4a, 0x5d, 0x9d, 0x5b, 0xa4, 0xce, 0x2d, 0xe1, 0x72, 0x8e, 0x3b, 0xf4, 0x80, 0x35, 0x0f,
        0x25, 0xe0, 0x7e, 0x21, 0xc9, 0x47, 0xd1, 0x9e, 0x33, 0x76, 0xf0, 0x9b, 0x3c, 0x1e, 0x16,
        0x17, 0x42,
    ];

    let key = EcdhPeer::X25519 { private, peer_u };
    let shared = derive_ecdh(&key).unwrap();
    assert_eq!(shared, expected);
}

/// Ed25519 sign/verify (RFC 8032 §7.1 test 1): the first 16 bytes of the
/// 64-byte signature over the empty message must match exactly.
#[test]
fn ed25519_rfc8032_test1_vector_through_dispatch() {
    let seed = [
        0x9d, 0x61, 0xb1, 0x9d, 0xef, 0xfd, 0x5a, 0x60, 0xba, 0x84, 0x4a, 0xf4, 0x92, 0xec, 0x2c,
        0xc4, 0x44, 0x49, 0xc5, 0x69, 0x7b, 0x32, 0x69, 0x19, 0x70, 0x3b, 0xac, 0x03, 0x1c, 0xae,
        0x7f, 0x60,
    ];
    let pubkey = [
        0xd7, 0x5a, 0x98, 0x01, 0x82, 0xb1, 0x0a, 0xb7, 0xd5, 0x4b, 0xfe, 0xd3, 0xc9, 0x64, 0x07,
        0x3a, 0x0e, 0xe1, 0x72, 0xf3, 0xda, 0xa6, 0x23, 0x25, 0xaf, 0x02, 0x1a, 0x68, 0xf7, 0x07,
        0x51, 0x1a,
    ];
    let expected_prefix = [
        0xe5, 0x56, 0x43, 0x00, 0xc3, 0x60, 0xac, 0x72, 0x90, 0x86, 0xe2, 0xcc, 0x80, 0x6e, 0x82,
        0x8a,
    ];

    let signing = SigningKey::Ed25519 { seed };
    let policy = Policy::new();
    let mut rng = ChaCha20Rng::seed_from_u64(0);
    let sig = sign(&signing, b"", &policy, false, &mut rng).unwrap();
    assert_eq!(&sig[..16], expected_prefix);

    let verifying = VerifyingKey::Ed25519 { pubkey };
    verify(&verifying, b"", &sig).unwrap();
}
