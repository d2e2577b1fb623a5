//! Public-key dispatch (spec.md §4.4): RSA, RSA-PSS, DSA, ECDSA, EdDSA,
//! GOST-DSA, and DH/ECDH, built on `gtls-ecmath` (point/field arithmetic)
//! and `gtls-asn1` (DER signature framing, SPKI parsing).
//!
//! Every signing/verifying/deriving entry point in this crate checks
//! [`state::is_operational`] first (spec.md §7's "single process-wide flag
//! checked at every primitive's entry"); a self-test or pairwise-
//! consistency-test failure anywhere poisons the whole process.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![allow(clippy::many_single_char_names)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod der_sig;
pub mod dh;
pub mod dispatch;
pub mod dsa;
pub mod ecdh;
pub mod ecdsa;
pub mod eddsa;
pub mod error;
pub mod gostdsa;
pub mod pct;
pub mod policy;
pub mod rfc6979;
pub mod rsa;
pub mod state;

pub use error::{Error, Result};
pub use policy::Policy;
