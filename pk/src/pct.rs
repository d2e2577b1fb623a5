//! Pairwise consistency test (spec.md §4.4): "after any key generation in
//! FIPS mode, perform a sign-then-verify (for signing algorithms) or
//! encrypt-then-decrypt (for RSA) on canned input; failure transitions the
//! library to an unrecoverable error state."
//!
//! This module only runs the canned exercise and poisons the library on
//! failure (spec.md §7) — it does not itself decide *whether* a PCT is
//! required for a given key generation call; that decision belongs to
//! each algorithm's key-generation entry point (`policy.fips` gates it).

use crate::error::{Error, Result};
use crate::state::{self, PoisonReason};
use alloc::vec::Vec;

/// Canned input every PCT exercises: fixed, not secret, never derived
/// from caller data, so the outcome depends only on whether the freshly
/// generated key itself is sound.
pub const CANNED_MESSAGE: &[u8] = b"gtls-pk pairwise consistency test";

/// Sign-then-verify PCT for a signing algorithm (DSA/ECDSA/EdDSA/
/// GOST-DSA). `sign`/`verify` close over the freshly generated key pair.
pub fn sign_then_verify<S, V>(sign: S, verify: V) -> Result<()>
where
    S: FnOnce(&[u8]) -> Result<Vec<u8>>,
    V: FnOnce(&[u8], &[u8]) -> Result<()>,
{
    let outcome = sign(CANNED_MESSAGE).and_then(|sig| verify(CANNED_MESSAGE, &sig));
    if outcome.is_err() {
        state::poison(PoisonReason::PctFailed);
        return Err(Error::PctFailed);
    }
    Ok(())
}

/// Encrypt-then-decrypt PCT (RSA key generation): the recovered plaintext
/// must match the canned input exactly.
pub fn encrypt_then_decrypt<E, D>(encrypt: E, decrypt: D) -> Result<()>
where
    E: FnOnce(&[u8]) -> Result<Vec<u8>>,
    D: FnOnce(&[u8]) -> Result<Vec<u8>>,
{
    let outcome = (|| -> Result<()> {
        let ct = encrypt(CANNED_MESSAGE)?;
        let pt = decrypt(&ct)?;
        if pt == CANNED_MESSAGE {
            Ok(())
        } else {
            Err(Error::VerificationFailed)
        }
    })();
    if outcome.is_err() {
        state::poison(PoisonReason::PctFailed);
        return Err(Error::PctFailed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_passes_when_verify_accepts() {
        let result = sign_then_verify(
            |msg| Ok(msg.to_vec()),
            |msg, sig| if msg == sig { Ok(()) } else { Err(Error::VerificationFailed) },
        );
        assert!(result.is_ok());
    }

    #[test]
    fn encrypt_then_decrypt_passes_on_identity_roundtrip() {
        let result = encrypt_then_decrypt(|msg| Ok(msg.to_vec()), |ct| Ok(ct.to_vec()));
        assert!(result.is_ok());
    }

    // These two intentionally poison the process-wide state flag
    // (spec.md §7), so they run in their own `#[test]` process via
    // `conformance-tests` rather than here alongside the passing-case
    // tests above, which would otherwise observe a poisoned library from
    // whichever failing test happened to run first in the same binary.
}
