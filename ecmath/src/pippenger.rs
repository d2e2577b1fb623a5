//! Fixed-base scalar multiplication via Pippenger's method (spec.md
//! §4.3): precompute `table[i_0 + i_1*2 + ... + i_{c-1}*2^{c-1}] =
//! i_0*G + i_1*2^k*G + ...` and consume the scalar `c` bits at a time
//! across `k`-bit-separated "combs".
//!
//! This is a fixed-base-only speedup (the base point, and therefore the
//! table, is baked in ahead of time — typically the curve generator for
//! key generation, or a peer's long-lived public key if the caller wants
//! to amortize repeated verifies against it). Variable-base multiplication
//! uses the windowed method in `weierstrass::scalar_mul` / the Montgomery
//! ladder instead.

extern crate alloc;

use crate::curve::CurveParams;
use crate::weierstrass::Jacobian;

pub struct PippengerParams {
    /// Number of bits between "comb teeth" (spec.md §3: "Pippenger table
    /// (indexed by k, c parameters)").
    pub k: u32,
    /// Number of teeth per comb; the table has `2^c` entries.
    pub c: u32,
}

pub struct PippengerTable<const L: usize> {
    pub params: PippengerParams,
    /// `table[i]` = the Jacobian point for comb-index `i`, built once at
    /// curve-descriptor construction time.
    pub table: alloc_table::Table<L>,
}

impl<const L: usize> PippengerTable<L> {
    pub fn build(base: &Jacobian<L>, params: PippengerParams, curve: &CurveParams<L>) -> Self {
        let size = 1usize << params.c;
        let mut table = alloc_table::Table::with_capacity(size, &curve.p);
        table.set(0, Jacobian::infinity(&curve.p));
        // comb[i] for i = 2^j is base multiplied by 2^(j*k); combinations
        // of set bits in the index accumulate the corresponding sum, same
        // recurrence GnuTLS's `_gnutls_ecc_mul_pippenger` precompute uses.
        let mut teeth = heapless_vec(params.c as usize, *base);
        let mut acc = *base;
        for tooth in teeth.iter_mut() {
            *tooth = acc;
            for _ in 0..params.k {
                acc = acc.double(&curve.p);
            }
        }
        for i in 1..size {
            let lowest = i.trailing_zeros() as usize;
            let prev = i & (i - 1);
            let base_point = teeth[lowest];
            let combined = if prev == 0 {
                base_point
            } else {
                table.get(prev).add(&base_point, &curve.p)
            };
            table.set(i, combined);
        }
        PippengerTable { params, table }
    }

    /// Multiply the baked-in base by `scalar_bits` (LSB-first, padded to a
    /// multiple of `k*c`).
    pub fn mul(&self, scalar_bits_lsb_first: &[bool], curve: &CurveParams<L>) -> Jacobian<L> {
        let mut acc = Jacobian::infinity(&curve.p);
        let chunks = (scalar_bits_lsb_first.len() + (self.params.k as usize * self.params.c as usize) - 1)
            / (self.params.k as usize * self.params.c as usize);
        for chunk in (0..chunks).rev() {
            let base_bit = chunk * self.params.k as usize * self.params.c as usize;
            let mut idx = 0usize;
            for tooth in 0..self.params.c as usize {
                let bit_pos = base_bit + tooth * self.params.k as usize;
                if bit_pos < scalar_bits_lsb_first.len() && scalar_bits_lsb_first[bit_pos] {
                    idx |= 1 << tooth;
                }
            }
            acc = acc.add(&self.table.get(idx), &curve.p);
            if chunk > 0 {
                for _ in 0..(self.params.k * self.params.c) {
                    acc = acc.double(&curve.p);
                }
            }
        }
        acc
    }
}

fn heapless_vec<const L: usize>(len: usize, fill: Jacobian<L>) -> alloc::vec::Vec<Jacobian<L>> {
    alloc::vec![fill; len]
}

mod alloc_table {
    use super::*;

    pub struct Table<const L: usize> {
        entries: alloc::vec::Vec<Jacobian<L>>,
    }

    impl<const L: usize> Table<L> {
        pub fn with_capacity(size: usize, m: &crate::field::Modulus<L>) -> Self {
            Table {
                entries: alloc::vec![Jacobian::infinity(m); size],
            }
        }

        pub fn set(&mut self, i: usize, p: Jacobian<L>) {
            self.entries[i] = p;
        }

        pub fn get(&self, i: usize) -> Jacobian<L> {
            self.entries[i]
        }
    }
}
