//! `gtls-core`: the TLS Hello-Extension dispatch/wire-framing engine, the
//! ASN.1 DER codec, the elliptic-curve arithmetic layer, and the
//! public-key dispatch that sits on top of it (`SPEC_FULL.md` §0).
//!
//! This root crate is a thin facade, re-exporting each workspace member's
//! public surface under one name — the same role `w5500-hl` plays for its
//! own workspace of focused `w5500-*` crates.
//!
//! Handshake top-level orchestration, cipher-suite policy selection,
//! certificate path building, session-ticket persistence, and OS-level
//! I/O are out of scope (spec.md §1); this crate provides the primitives
//! an orchestrator built on top would call into.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

pub use gtls_asn1 as asn1;
pub use gtls_ecmath as ecmath;
pub use gtls_helloext as helloext;
pub use gtls_pk as pk;
