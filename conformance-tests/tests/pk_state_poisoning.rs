//! `gtls-pk`'s pairwise-consistency-test failure transitions a process-wide
//! flag that every subsequent entry point checks (`gtls_pk::state`). That
//! flag lives in a `static`, so poisoning it would leak across any other
//! test sharing this binary's process — this file is kept on its own so
//! cargo runs it as a separate test binary.

use gtls_pk::error::Error;
use gtls_pk::pct::{encrypt_then_decrypt, sign_then_verify};
use gtls_pk::state;

#[test]
fn failed_pct_poisons_the_library_for_every_later_call() {
    assert!(state::is_operational());

    let result = sign_then_verify(
        |msg| Ok(msg.to_vec()),
        |_msg, _sig| Err(Error::VerificationFailed),
    );
    assert!(result.is_err());
    assert!(!state::is_operational());

    // A second, unrelated PCT helper must also see the library poisoned
    // rather than running and reporting its own (irrelevant) result.
    let second = encrypt_then_decrypt(|msg| Ok(msg.to_vec()), |ct| Ok(ct.to_vec()));
    assert!(second.is_err());

    // `state::check()` is private, but every public dispatch entry point
    // calls it first; a derive that would otherwise succeed must now fail
    // with `LibraryPoisoned`.
    let key = gtls_pk::dispatch::EcdhPeer::X25519 {
        private: [0x42u8; 32],
        peer_u: [0x07u8; 32],
    };
    let err = gtls_pk::dispatch::derive_ecdh(&key).unwrap_err();
    assert_eq!(err, Error::LibraryPoisoned);
}
