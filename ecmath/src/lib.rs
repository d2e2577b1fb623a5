//! Modular field arithmetic and point operations for short-Weierstrass,
//! twisted-Edwards, and Montgomery curves.
//!
//! This is the bottom layer of the workspace (`SPEC_FULL.md` §4.3): every
//! other crate here either consumes a `Jacobian`/`Point`/`Xz` directly
//! (`gtls-pk`) or never touches curve math at all (`gtls-asn1`,
//! `gtls-helloext`).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::many_single_char_names)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod curve;
pub mod curve448_reduce;
pub mod curves;
pub mod edwards;
pub mod error;
pub mod field;
pub mod gost;
pub mod montgomery;
pub mod pippenger;
mod select;
pub mod weierstrass;

pub use curve::{CurveForm, CurveId, CurveParams, Scalar};
pub use error::{Error, Result};

use crypto_bigint::Uint;

/// Decompose `value`'s low `bits` bits into a most-significant-first bit
/// vector, matching the reference's bit-at-a-time scalar walks (spec.md
/// §4.3's windowed and Montgomery-ladder multiplications both consume the
/// scalar this way).
pub fn bits_msb_first<const L: usize>(value: &Uint<L>, bits: usize) -> alloc::vec::Vec<bool> {
    let mut out = alloc::vec::Vec::with_capacity(bits);
    for i in (0..bits).rev() {
        out.push(value.bit(i as u32).into());
    }
    out
}

/// Decompose `value`'s low `bits` bits least-significant-first, used by the
/// Pippenger fixed-base table walk (spec.md §4.3).
pub fn bits_lsb_first<const L: usize>(value: &Uint<L>, bits: usize) -> alloc::vec::Vec<bool> {
    let mut out = alloc::vec::Vec::with_capacity(bits);
    for i in 0..bits {
        out.push(value.bit(i as u32).into());
    }
    out
}
